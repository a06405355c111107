//! 32-bit floating point column buffer.

use super::{DataType, Primitive, Sealed, Value};
use crate::error::Result;
use crate::pool::{FreeList, PrimitiveArrayPool};
use crate::tvlist::TvList;
use std::sync::Arc;

/// Time-value list of `f32` values.
pub type FloatTvList = TvList<f32>;

impl Sealed for f32 {}

impl Primitive for f32 {
    const DATA_TYPE: DataType = DataType::Float;
    const WIDTH: usize = 4;

    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>> {
        &pool.inner.floats
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl TvList<f32> {
    /// Appends a float point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk cannot be acquired.
    pub fn put_float(&mut self, timestamp: i64, value: f32) -> Result<()> {
        self.put(timestamp, value)
    }

    /// Appends float points pairwise.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired; see
    /// [`put_batch`](TvList::put_batch).
    pub fn put_floats(&mut self, timestamps: &[i64], values: &[f32]) -> Result<()> {
        self.put_batch(timestamps, values)
    }

    /// Returns the float value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_float(&self, index: usize) -> Result<f32> {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::error::TvListError;

    #[test]
    fn test_put_and_get_float() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(3)).unwrap();
        let mut list = FloatTvList::with_pool(&pool);
        for i in 0..7 {
            list.put_float(i, i as f32 * 0.5).unwrap();
        }
        assert_eq!(list.chunk_count(), 3);
        assert!(list.is_sorted());
        assert_eq!(list.get_float(6).unwrap(), 3.0);
        assert!(matches!(
            list.get_float(7),
            Err(TvListError::IndexOutOfRange { index: 7, size: 7 })
        ));
    }

    #[test]
    fn test_clone_copies_float_chunks() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(2)).unwrap();
        let mut list = FloatTvList::with_pool(&pool);
        list.put_floats(&[2, 1, 3], &[2.0, 1.0, 3.0]).unwrap();

        let mut copy = list.try_clone().unwrap();
        copy.sort().unwrap();
        assert_eq!(copy.get_float(0).unwrap(), 1.0);
        assert_eq!(list.get_float(0).unwrap(), 2.0);
        assert_eq!(list.memory_bytes(), copy.memory_bytes());
        assert_eq!(list.memory_bytes(), 2 * 2 * (8 + 4));
    }
}
