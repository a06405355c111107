//! Configuration for the primitive array pool.

use crate::error::{Result, TvListError};

/// Default number of elements in every pooled array (`ARRAY_SIZE`).
pub const DEFAULT_ARRAY_SIZE: usize = 32;

/// Configuration shared by a [`PrimitiveArrayPool`](crate::pool::PrimitiveArrayPool)
/// and every list drawing chunks from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of elements in every pooled array.
    ///
    /// Lists address entry `i` as `(i / array_size, i % array_size)`.
    /// Default: 32.
    pub array_size: usize,

    /// Maximum number of arrays of a single kind that may be outstanding at once.
    ///
    /// `None` lets the pool grow on demand without bound. Default: `None`.
    pub max_arrays_per_kind: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            array_size: DEFAULT_ARRAY_SIZE,
            max_arrays_per_kind: None,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration with the given chunk capacity and no outstanding limit.
    pub fn new(array_size: usize) -> Self {
        Self {
            array_size,
            ..Self::default()
        }
    }

    /// Sets the chunk capacity.
    pub fn with_array_size(mut self, array_size: usize) -> Self {
        self.array_size = array_size;
        self
    }

    /// Sets the maximum number of outstanding arrays per kind.
    pub fn with_max_arrays_per_kind(mut self, max: usize) -> Self {
        self.max_arrays_per_kind = Some(max);
        self
    }

    /// Checks that the configuration can back a pool.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::InvalidConfig` if `array_size` is zero or the
    /// per-kind limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.array_size == 0 {
            return Err(TvListError::InvalidConfig(
                "array_size must be greater than zero".to_string(),
            ));
        }
        if self.max_arrays_per_kind == Some(0) {
            return Err(TvListError::InvalidConfig(
                "max_arrays_per_kind must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
