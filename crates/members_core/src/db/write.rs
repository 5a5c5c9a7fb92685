//! Typed table writes: insert, update and delete.
//!
//! # Responsibility
//! - Build parameterized DML for a table from `(column, value)` pairs.
//! - Bind each value according to its column type hint.
//!
//! # Invariants
//! - Every write value has exactly one type hint, in the same order.
//! - Update and delete always carry at least one equality criterion.

use super::{DbError, DbResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Storage date format for `ColumnType::Date` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameter binding hint for a written column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Bound verbatim as text.
    String,
    /// Validated as an ISO `YYYY-MM-DD` date, then bound as text.
    Date,
}

/// Inserts one row and returns the affected-row count.
pub fn insert(
    conn: &Connection,
    table: &str,
    values: &[(&str, String)],
    types: &[ColumnType],
) -> DbResult<usize> {
    let bound = bind_values(values, types)?;
    let columns = values
        .iter()
        .map(|(column, _)| *column)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=values.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders});");
    Ok(conn.execute(&sql, params_from_iter(bound))?)
}

/// Updates rows matching every `criteria` pair and returns the affected-row count.
///
/// Returns `Ok(0)` when nothing matches; no row is inserted.
pub fn update(
    conn: &Connection,
    table: &str,
    values: &[(&str, String)],
    criteria: &[(&str, &str)],
    types: &[ColumnType],
) -> DbResult<usize> {
    ensure_criteria(table, criteria)?;
    let mut bound = bind_values(values, types)?;

    let assignments = values
        .iter()
        .enumerate()
        .map(|(index, (column, _))| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let predicate = criteria_sql(criteria, values.len());
    bound.extend(criteria.iter().map(|(_, value)| Value::Text((*value).to_string())));

    let sql = format!("UPDATE {table} SET {assignments} WHERE {predicate};");
    Ok(conn.execute(&sql, params_from_iter(bound))?)
}

/// Deletes rows matching every `criteria` pair and returns the affected-row count.
pub fn delete(conn: &Connection, table: &str, criteria: &[(&str, &str)]) -> DbResult<usize> {
    ensure_criteria(table, criteria)?;
    let predicate = criteria_sql(criteria, 0);
    let bound = criteria
        .iter()
        .map(|(_, value)| Value::Text((*value).to_string()));

    let sql = format!("DELETE FROM {table} WHERE {predicate};");
    Ok(conn.execute(&sql, params_from_iter(bound))?)
}

fn ensure_criteria(table: &str, criteria: &[(&str, &str)]) -> DbResult<()> {
    if criteria.is_empty() {
        return Err(DbError::EmptyCriteria {
            table: table.to_string(),
        });
    }
    Ok(())
}

fn criteria_sql(criteria: &[(&str, &str)], first_index: usize) -> String {
    criteria
        .iter()
        .enumerate()
        .map(|(index, (column, _))| format!("{column} = ?{}", first_index + index + 1))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bind_values(values: &[(&str, String)], types: &[ColumnType]) -> DbResult<Vec<Value>> {
    if values.len() != types.len() {
        return Err(DbError::TypeHintMismatch {
            values: values.len(),
            types: types.len(),
        });
    }

    values
        .iter()
        .zip(types)
        .map(|((column, value), kind)| bind_value(column, value, *kind))
        .collect()
}

fn bind_value(column: &str, value: &str, kind: ColumnType) -> DbResult<Value> {
    match kind {
        ColumnType::String => Ok(Value::Text(value.to_string())),
        ColumnType::Date => {
            let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| {
                DbError::InvalidValue {
                    column: column.to_string(),
                    message: format!("expected YYYY-MM-DD date, got `{value}`: {err}"),
                }
            })?;
            Ok(Value::Text(date.format(DATE_FORMAT).to_string()))
        }
    }
}
