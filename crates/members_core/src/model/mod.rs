//! Member domain model.
//!
//! # Responsibility
//! - Define the `Member` record persisted in the `members` table.
//! - Provide validated value objects for fields that carry format rules.
//!
//! # Invariants
//! - Every member is identified by a non-empty `username`.
//! - Value objects are constructed only through their `parse`/`new` paths.

pub mod member;
pub mod value;
