use crossbook_core::OrderError;
use thiserror::Error;

/// Domain-level errors for matching operations
///
/// Expected outcomes (no match, unknown id) are never errors; a variant here
/// signals a broken book invariant and aborts the current operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    #[error(transparent)]
    Order(#[from] OrderError),
}

pub type MatchingResult<T> = std::result::Result<T, MatchingError>;
