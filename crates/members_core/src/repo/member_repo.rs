//! Member store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, keyword search and count APIs over the `members` table.
//! - Own hydration (row -> `Member`) and extraction (`Member` -> row).
//!
//! # Invariants
//! - Every write is keyed by `username`; update/remove never insert.
//! - Update/remove on an unknown username affect 0 rows and are not errors.
//! - Height, weight and email are re-validated when hydrated.
//! - Keyword search is case-sensitive regardless of connection pragmas.
//! - No member field values are written to logs.

use crate::db::write::DATE_FORMAT;
use crate::db::{self, ColumnType, QueryBuilder, RowMap};
use crate::model::member::{Address, Member, MemberDetails};
use crate::model::value::{Email, Height, Weight};
use crate::repo::base::{ensure_table_ready, TableRepository};
use crate::repo::error::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::debug;
use rusqlite::Connection;

pub const MEMBERS_TABLE: &str = "members";
const MEMBER_ALIAS: &str = "member";
const KEY_COLUMN: &str = "username";

/// Persisted columns in write order.
pub const MEMBER_COLUMNS: [&str; 13] = [
    "username",
    "password",
    "country",
    "province",
    "city",
    "postal_code",
    "date_of_birth",
    "limits",
    "height",
    "weight",
    "body_type",
    "ethnicity",
    "email",
];

const MEMBER_COLUMN_TYPES: [ColumnType; 13] = [
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::Date,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
    ColumnType::String,
];

/// Store interface for member persistence.
pub trait MemberStore {
    /// Inserts a new member and returns the affected-row count.
    ///
    /// A duplicate username surfaces the database constraint error.
    fn add(&self, member: &Member) -> RepoResult<usize>;
    /// Replaces the full row keyed by the member's username.
    fn update(&self, member: &Member) -> RepoResult<usize>;
    /// Deletes the row keyed by the member's username.
    fn remove(&self, member: &Member) -> RepoResult<usize> {
        self.remove_by_username(member.username())
    }
    /// Deletes by key alone, without loading the stored row.
    fn remove_by_username(&self, username: &str) -> RepoResult<usize>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Member>>;
    /// Lists members whose username contains `keyword`, matched
    /// case-sensitively with no wildcard characters.
    fn search(&self, keyword: &str, offset: u32, limit: Option<u32>) -> RepoResult<Vec<Member>>;
    /// Counts members matched by [`MemberStore::search`] for `keyword`.
    fn get_search_count(&self, keyword: &str) -> RepoResult<u64>;
    fn count(&self) -> RepoResult<u64>;
    fn find_all(&self, offset: u32, limit: Option<u32>) -> RepoResult<Vec<Member>>;
}

/// SQLite-backed member store.
pub struct SqliteMemberStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, MEMBERS_TABLE, &MEMBER_COLUMNS)?;
        Ok(Self { conn })
    }

    fn search_query(&self, query: QueryBuilder, keyword: &str) -> QueryBuilder {
        query
            .where_clause(format!("instr({MEMBER_ALIAS}.{KEY_COLUMN}, :keyword) > 0"))
            .set_parameter("keyword", keyword.to_string())
    }

    fn count_query(&self) -> QueryBuilder {
        self.create_query_builder()
            .select("count(*) AS count")
            .from(MEMBERS_TABLE, MEMBER_ALIAS)
    }

    fn fetch_count(&self, query: &QueryBuilder) -> RepoResult<u64> {
        let row = query
            .fetch(self.conn)?
            .ok_or_else(|| RepoError::InvalidData("count query returned no row".to_string()))?;
        let text = required(&row, "count")?;
        text.parse::<u64>()
            .map_err(|_| RepoError::InvalidData(format!("invalid row count `{text}`")))
    }
}

impl TableRepository for SqliteMemberStore<'_> {
    type Entity = Member;

    fn connection(&self) -> &Connection {
        self.conn
    }

    fn table_name(&self) -> &'static str {
        MEMBERS_TABLE
    }

    fn alias(&self) -> &'static str {
        MEMBER_ALIAS
    }

    fn key_column(&self) -> &'static str {
        KEY_COLUMN
    }

    fn hydrate(&self, row: &RowMap) -> RepoResult<Member> {
        hydrate_member(row)
    }
}

impl MemberStore for SqliteMemberStore<'_> {
    fn add(&self, member: &Member) -> RepoResult<usize> {
        member.validate()?;

        let affected = db::insert(
            self.conn,
            MEMBERS_TABLE,
            &extract_data(member),
            &MEMBER_COLUMN_TYPES,
        )?;
        debug!("event=member_write module=repo op=add status=ok affected={affected}");
        Ok(affected)
    }

    fn update(&self, member: &Member) -> RepoResult<usize> {
        member.validate()?;

        let affected = db::update(
            self.conn,
            MEMBERS_TABLE,
            &extract_data(member),
            &[(KEY_COLUMN, member.username())],
            &MEMBER_COLUMN_TYPES,
        )?;
        debug!("event=member_write module=repo op=update status=ok affected={affected}");
        Ok(affected)
    }

    fn remove_by_username(&self, username: &str) -> RepoResult<usize> {
        let affected = db::delete(self.conn, MEMBERS_TABLE, &[(KEY_COLUMN, username)])?;
        debug!("event=member_write module=repo op=remove status=ok affected={affected}");
        Ok(affected)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        let query = self
            .base_query(0, None)
            .where_clause(format!("{MEMBER_ALIAS}.{KEY_COLUMN} = :username"))
            .set_parameter("username", username.to_string());

        match query.fetch(self.conn)? {
            Some(row) => Ok(Some(self.hydrate(&row)?)),
            None => Ok(None),
        }
    }

    fn search(&self, keyword: &str, offset: u32, limit: Option<u32>) -> RepoResult<Vec<Member>> {
        let query = self.search_query(self.base_query(offset, limit), keyword);
        let rows = self.execute(&query)?;
        self.hydrate_all(&rows)
    }

    fn get_search_count(&self, keyword: &str) -> RepoResult<u64> {
        let query = self.search_query(self.count_query(), keyword);
        self.fetch_count(&query)
    }

    fn count(&self) -> RepoResult<u64> {
        self.fetch_count(&self.count_query())
    }

    fn find_all(&self, offset: u32, limit: Option<u32>) -> RepoResult<Vec<Member>> {
        let rows = self.execute(&self.base_query(offset, limit))?;
        self.hydrate_all(&rows)
    }
}

/// Flattens a member into `(column, text)` pairs in [`MEMBER_COLUMNS`] order.
pub fn extract_data(member: &Member) -> Vec<(&'static str, String)> {
    let values = [
        member.username().to_string(),
        member.password.clone(),
        member.address.country.clone(),
        member.address.province.clone(),
        member.address.city.clone(),
        member.address.postal_code.clone(),
        member.date_of_birth.format(DATE_FORMAT).to_string(),
        member.limits.clone(),
        member.height.to_string(),
        member.weight.to_string(),
        member.body_type.clone(),
        member.ethnicity.clone(),
        member.email.to_string(),
    ];
    MEMBER_COLUMNS.into_iter().zip(values).collect()
}

/// Type hints matching [`extract_data`] output position by position.
pub fn member_column_types() -> &'static [ColumnType] {
    &MEMBER_COLUMN_TYPES
}

/// Rebuilds a member from a flat row, re-validating value objects.
pub fn hydrate_member(row: &RowMap) -> RepoResult<Member> {
    let date_text = required(row, "date_of_birth")?;
    let date_of_birth = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in {MEMBERS_TABLE}.date_of_birth"
        ))
    })?;

    let height = Height::parse(required(row, "height")?)
        .map_err(|err| column_error(err, "height"))?;
    let weight = Weight::parse(required(row, "weight")?)
        .map_err(|err| column_error(err, "weight"))?;
    let email = Email::parse(required(row, "email")?)
        .map_err(|err| column_error(err, "email"))?;

    let member = Member::try_new(
        required(row, "username")?,
        MemberDetails {
            password: required(row, "password")?.to_string(),
            address: Address::new(
                required(row, "country")?,
                required(row, "province")?,
                required(row, "city")?,
                required(row, "postal_code")?,
            ),
            date_of_birth,
            limits: required(row, "limits")?.to_string(),
            height,
            weight,
            body_type: required(row, "body_type")?.to_string(),
            ethnicity: required(row, "ethnicity")?.to_string(),
            email,
        },
    )?;
    Ok(member)
}

fn required<'row>(row: &'row RowMap, column: &str) -> RepoResult<&'row str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| RepoError::InvalidData(format!("missing column `{column}` in row")))
}

fn column_error(err: impl std::fmt::Display, column: &str) -> RepoError {
    RepoError::InvalidData(format!("{err} in {MEMBERS_TABLE}.{column}"))
}
