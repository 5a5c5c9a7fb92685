//! Member domain record.
//!
//! # Responsibility
//! - Define the canonical member shape shared by repository and callers.
//! - Keep the storage key (`username`) immutable after construction.
//!
//! # Invariants
//! - `username` is non-empty and has no setter.
//! - Deserialized members pass `Member::validate()`.

use crate::model::value::{Email, Height, MemberValidationError, Weight};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Postal address of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub province: String,
    pub city: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(
        country: impl Into<String>,
        province: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            province: province.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Every member attribute except the identifying username.
///
/// Used as constructor input so the key stays separate from mutable data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    /// Already-hashed password text. Never hashed or checked here.
    pub password: String,
    pub address: Address,
    pub date_of_birth: NaiveDate,
    /// Gambling limits label, persisted verbatim.
    pub limits: String,
    pub height: Height,
    pub weight: Weight,
    pub body_type: String,
    pub ethnicity: String,
    pub email: Email,
}

/// Canonical member record persisted in `members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedMember")]
pub struct Member {
    username: String,
    /// Already-hashed password text.
    pub password: String,
    pub address: Address,
    pub date_of_birth: NaiveDate,
    pub limits: String,
    pub height: Height,
    pub weight: Weight,
    pub body_type: String,
    pub ethnicity: String,
    pub email: Email,
}

impl Member {
    /// Creates a member from its key and details.
    ///
    /// # Errors
    /// - Returns `EmptyUsername` when `username` is blank.
    pub fn try_new(
        username: impl Into<String>,
        details: MemberDetails,
    ) -> Result<Self, MemberValidationError> {
        let MemberDetails {
            password,
            address,
            date_of_birth,
            limits,
            height,
            weight,
            body_type,
            ethnicity,
            email,
        } = details;

        let member = Self {
            username: username.into(),
            password,
            address,
            date_of_birth,
            limits,
            height,
            weight,
            body_type,
            ethnicity,
            email,
        };
        member.validate()?;
        Ok(member)
    }

    /// Stable storage key. Update and remove locate rows by this value.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Re-checks record-level invariants.
    ///
    /// Value objects validate themselves on construction, so only the
    /// username needs checking here.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.username.trim().is_empty() {
            return Err(MemberValidationError::EmptyUsername);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct UncheckedMember {
    username: String,
    password: String,
    address: Address,
    date_of_birth: NaiveDate,
    limits: String,
    height: Height,
    weight: Weight,
    body_type: String,
    ethnicity: String,
    email: Email,
}

impl TryFrom<UncheckedMember> for Member {
    type Error = MemberValidationError;

    fn try_from(value: UncheckedMember) -> Result<Self, Self::Error> {
        Member::try_new(
            value.username,
            MemberDetails {
                password: value.password,
                address: value.address,
                date_of_birth: value.date_of_birth,
                limits: value.limits,
                height: value.height,
                weight: value.weight,
                body_type: value.body_type,
                ethnicity: value.ethnicity,
                email: value.email,
            },
        )
    }
}
