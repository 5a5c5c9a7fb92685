//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the member store contract used by callers.
//! - Isolate SQL details behind the generic table repository base.
//!
//! # Invariants
//! - Repository writes call `Member::validate()` before persistence.
//! - Database errors are propagated, never retried or swallowed.

pub mod base;
pub mod error;
pub mod member_repo;
