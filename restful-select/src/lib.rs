//! Read-side combinators over reducer output.
//!
//! - [`select_all`] / [`select_one`]: rows whose field equals a value
//! - [`extend_rows`]: left join of one collection against another
//!
//! Row lookup compares values by their grouping key: strings verbatim,
//! numbers in shortest integral form when whole, so `1`, `1.0` and `"1"`
//! all select the same rows. Rows lacking the field never match.
//!
//! "Many rows matched" has one policy everywhere: [`select_all`] returns
//! them all, [`select_one`] fails with [`SelectError::AmbiguousSelection`].

mod join;
mod select;

pub use join::{JoinPredicate, JoinPredicateFn, extend_rows, identity_join};
pub use select::{group_key, select_all, select_one};

use serde_json::Value;

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors that can occur while selecting rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
    #[error("expected at most one row with `{key}` = {value}, found {count}")]
    AmbiguousSelection { key: String, value: Value, count: usize },
}
