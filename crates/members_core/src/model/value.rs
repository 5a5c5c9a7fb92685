//! Value objects wrapped around scalar member attributes.
//!
//! # Responsibility
//! - Validate height, weight and email on construction.
//! - Provide explicit parse/format pairs for the flat storage representation.
//!
//! # Invariants
//! - A constructed value object is always valid; there are no setters.
//! - `parse(value.to_string())` yields an equal value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Validation error for member fields and value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// Username is empty or whitespace only.
    EmptyUsername,
    InvalidEmail(String),
    InvalidHeight(String),
    InvalidWeight(String),
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::InvalidHeight(value) => {
                write!(f, "invalid height `{value}`; expected a positive integer")
            }
            Self::InvalidWeight(value) => {
                write!(f, "invalid weight `{value}`; expected a positive integer")
            }
        }
    }
}

impl Error for MemberValidationError {}

/// Member height as a positive whole number. Stored as its decimal text;
/// fractional text such as `170.5` does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Height(u32);

impl Height {
    /// Wraps a positive height value.
    pub fn new(value: u32) -> Result<Self, MemberValidationError> {
        if value == 0 {
            return Err(MemberValidationError::InvalidHeight(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses the stored text form, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, MemberValidationError> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|_| MemberValidationError::InvalidHeight(value.to_string()))?;
        Self::new(parsed)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Display for Height {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Height {
    type Error = MemberValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Height> for u32 {
    fn from(value: Height) -> Self {
        value.0
    }
}

/// Member weight as a positive whole number. Stored as its decimal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight(u32);

impl Weight {
    /// Wraps a positive weight value.
    pub fn new(value: u32) -> Result<Self, MemberValidationError> {
        if value == 0 {
            return Err(MemberValidationError::InvalidWeight(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses the stored text form, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, MemberValidationError> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|_| MemberValidationError::InvalidWeight(value.to_string()))?;
        Self::new(parsed)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Weight {
    type Error = MemberValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for u32 {
    fn from(value: Weight) -> Self {
        value.0
    }
}

/// Validated email address.
///
/// Only the `local@domain.tld` shape is checked; deliverability is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses an email address, trimming surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, MemberValidationError> {
        let trimmed = value.trim();
        if !EMAIL_RE.is_match(trimmed) {
            return Err(MemberValidationError::InvalidEmail(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = MemberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
