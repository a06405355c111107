//! Error and Result types for Skulk time-value list operations.

use crate::pool::ArrayKind;
use crate::types::DataType;
use thiserror::Error;

/// A convenience `Result` type for time-value list operations.
pub type Result<T> = std::result::Result<T, TvListError>;

/// The error type for time-value list and array pool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TvListError {
    /// Read at an index at or beyond the current list size.
    #[error("Index out of range: index {index}, size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of valid entries in the list.
        size: usize,
    },

    /// The pool refused to hand out another array of this kind.
    #[error("Array pool exhausted: {limit} {kind} arrays already outstanding")]
    PoolExhausted {
        /// Kind of array requested.
        kind: ArrayKind,
        /// Configured outstanding limit for the kind.
        limit: usize,
    },

    /// The allocator could not provide a fresh array.
    #[error("Allocation failed: could not allocate {kind} array of {len} elements")]
    AllocationFailed {
        /// Kind of array requested.
        kind: ArrayKind,
        /// Requested array length.
        len: usize,
    },

    /// A runtime-typed column was accessed with the wrong value type.
    #[error("Type mismatch: column holds {actual}, accessed as {expected}")]
    TypeMismatch {
        /// Type the caller asked for.
        expected: DataType,
        /// Type the column actually stores.
        actual: DataType,
    },

    /// Pool configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
