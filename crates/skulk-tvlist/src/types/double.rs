//! 64-bit floating point column buffer.

use super::{DataType, Primitive, Sealed, Value};
use crate::error::Result;
use crate::pool::{FreeList, PrimitiveArrayPool};
use crate::tvlist::TvList;
use std::sync::Arc;

/// Time-value list of `f64` values.
pub type DoubleTvList = TvList<f64>;

impl Sealed for f64 {}

impl Primitive for f64 {
    const DATA_TYPE: DataType = DataType::Double;
    const WIDTH: usize = 8;

    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>> {
        &pool.inner.doubles
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl TvList<f64> {
    /// Appends a double point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk cannot be acquired.
    pub fn put_double(&mut self, timestamp: i64, value: f64) -> Result<()> {
        self.put(timestamp, value)
    }

    /// Appends double points pairwise.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired; see
    /// [`put_batch`](TvList::put_batch).
    pub fn put_doubles(&mut self, timestamps: &[i64], values: &[f64]) -> Result<()> {
        self.put_batch(timestamps, values)
    }

    /// Returns the double value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_double(&self, index: usize) -> Result<f64> {
        self.get(index)
    }
}
