//! Member persistence on SQLite.
//!
//! Maps `Member` records to the `members` table through a small query
//! builder and a generic table repository base.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::member::{Address, Member, MemberDetails};
pub use model::value::{Email, Height, MemberValidationError, Weight};
pub use repo::base::TableRepository;
pub use repo::error::{RepoError, RepoResult};
pub use repo::member_repo::{
    extract_data, hydrate_member, member_column_types, MemberStore, SqliteMemberStore,
    MEMBERS_TABLE, MEMBER_COLUMNS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
