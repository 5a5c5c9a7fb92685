//! Generic table repository base.
//!
//! # Responsibility
//! - Provide the shared select/paginate/hydrate plumbing for one table.
//! - Check that a connection carries the schema a repository needs.
//!
//! # Invariants
//! - Base queries select every column of the aliased table ordered by key.

use crate::db::migrations::{current_version, latest_version};
use crate::db::{QueryBuilder, RowMap};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;
use std::collections::HashSet;

/// Shared behavior for repositories mapping one table to one entity type.
///
/// Implementors supply the connection, table naming and row hydration;
/// query construction and bulk hydration come for free.
pub trait TableRepository {
    type Entity;

    fn connection(&self) -> &Connection;
    fn table_name(&self) -> &'static str;
    fn alias(&self) -> &'static str;
    /// Column that uniquely identifies a row; used for stable ordering.
    fn key_column(&self) -> &'static str;
    fn hydrate(&self, row: &RowMap) -> RepoResult<Self::Entity>;

    fn create_query_builder(&self) -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Selects all columns of the table with optional pagination.
    fn base_query(&self, first: u32, max: Option<u32>) -> QueryBuilder {
        self.create_query_builder()
            .select(format!("{}.*", self.alias()))
            .from(self.table_name(), self.alias())
            .order_by(format!("{}.{} ASC", self.alias(), self.key_column()))
            .set_first_result(first)
            .set_max_results(max)
    }

    fn execute(&self, query: &QueryBuilder) -> RepoResult<Vec<RowMap>> {
        Ok(query.fetch_all(self.connection())?)
    }

    fn hydrate_all(&self, rows: &[RowMap]) -> RepoResult<Vec<Self::Entity>> {
        rows.iter().map(|row| self.hydrate(row)).collect()
    }
}

/// Verifies schema version, table presence and required columns.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }

    if let Some(column) = columns.iter().find(|column| !present.contains(**column)) {
        return Err(RepoError::MissingRequiredColumn {
            table,
            column: *column,
        });
    }

    Ok(())
}
