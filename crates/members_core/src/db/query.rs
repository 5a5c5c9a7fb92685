//! Select query builder and row fetching.
//!
//! # Responsibility
//! - Compose `SELECT` statements from builder calls.
//! - Execute them with named parameters and flatten rows to strings.
//!
//! # Invariants
//! - Parameter values are bound by name, never formatted into SQL.
//! - SQL `NULL` columns are omitted from the returned `RowMap`.
//! - Text that is not valid UTF-8 is an error, never replaced.

use super::{DbError, DbResult};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, ToSql};
use std::collections::BTreeMap;

/// One fetched row keyed by result column name.
pub type RowMap = BTreeMap<String, String>;

/// Incrementally built `SELECT` statement.
///
/// Builder methods consume and return `self`, so a query reads as a chain:
///
/// ```
/// use members_core::db::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .select("count(*) AS count")
///     .from("members", "member")
///     .where_clause("username LIKE :username")
///     .set_parameter("username", "%ann%".to_string());
/// assert_eq!(
///     query.to_sql(),
///     "SELECT count(*) AS count FROM members member WHERE username LIKE :username"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    select: Option<String>,
    from: Option<(String, String)>,
    where_clause: Option<String>,
    order_by: Vec<String>,
    parameters: Vec<(String, Value)>,
    first_result: u32,
    max_results: Option<u32>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the select list. Defaults to `*`.
    pub fn select(mut self, expression: impl Into<String>) -> Self {
        self.select = Some(expression.into());
        self
    }

    pub fn from(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.from = Some((table.into(), alias.into()));
        self
    }

    /// Replaces the `WHERE` predicate.
    pub fn where_clause(mut self, predicate: impl Into<String>) -> Self {
        self.where_clause = Some(predicate.into());
        self
    }

    /// Appends an `ORDER BY` term.
    pub fn order_by(mut self, term: impl Into<String>) -> Self {
        self.order_by.push(term.into());
        self
    }

    /// Binds a named parameter. A leading `:` is optional.
    ///
    /// Setting the same name twice keeps the latest value.
    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        let name = if name.starts_with(':') {
            name.to_string()
        } else {
            format!(":{name}")
        };
        let value = value.into();

        match self
            .parameters
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some(slot) => slot.1 = value,
            None => self.parameters.push((name, value)),
        }
        self
    }

    /// Number of leading rows to skip.
    pub fn set_first_result(mut self, first: u32) -> Self {
        self.first_result = first;
        self
    }

    /// Maximum number of rows to return; `None` means unbounded.
    pub fn set_max_results(mut self, max: Option<u32>) -> Self {
        self.max_results = max;
        self
    }

    /// Renders the statement text. Pagination bounds are inlined integers.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {}", self.select.as_deref().unwrap_or("*"));

        if let Some((table, alias)) = &self.from {
            sql.push_str(&format!(" FROM {table} {alias}"));
        }
        if let Some(predicate) = &self.where_clause {
            sql.push_str(&format!(" WHERE {predicate}"));
        }
        if !self.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }

        match (self.max_results, self.first_result) {
            (Some(max), 0) => sql.push_str(&format!(" LIMIT {max}")),
            (Some(max), first) => sql.push_str(&format!(" LIMIT {max} OFFSET {first}")),
            (None, 0) => {}
            (None, first) => sql.push_str(&format!(" LIMIT -1 OFFSET {first}")),
        }

        sql
    }

    /// Executes the query and returns every row.
    pub fn fetch_all(&self, conn: &Connection) -> DbResult<Vec<RowMap>> {
        self.collect_rows(conn, None)
    }

    /// Executes the query and returns the first row, if any.
    pub fn fetch(&self, conn: &Connection) -> DbResult<Option<RowMap>> {
        Ok(self.collect_rows(conn, Some(1))?.into_iter().next())
    }

    fn collect_rows(&self, conn: &Connection, cap: Option<usize>) -> DbResult<Vec<RowMap>> {
        let mut stmt = conn.prepare(&self.to_sql())?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let named: Vec<(&str, &dyn ToSql)> = self
            .parameters
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let mut rows = stmt.query(named.as_slice())?;
        let mut result = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = RowMap::new();
            for (index, column) in columns.iter().enumerate() {
                if let Some(text) = value_to_text(column, row.get_ref(index)?)? {
                    map.insert(column.clone(), text);
                }
            }
            result.push(map);

            if cap.is_some_and(|cap| result.len() >= cap) {
                break;
            }
        }

        Ok(result)
    }
}

fn value_to_text(column: &str, value: ValueRef<'_>) -> DbResult<Option<String>> {
    let text = match value {
        ValueRef::Null => return Ok(None),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => std::str::from_utf8(bytes)
            .map_err(|err| DbError::InvalidValue {
                column: column.to_string(),
                message: format!("stored bytes are not valid UTF-8: {err}"),
            })?
            .to_string(),
    };
    Ok(Some(text))
}
