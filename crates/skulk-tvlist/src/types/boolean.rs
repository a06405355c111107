//! Boolean column buffer.

use super::{DataType, Primitive, Sealed, Value};
use crate::error::Result;
use crate::pool::{FreeList, PrimitiveArrayPool};
use crate::tvlist::TvList;
use std::sync::Arc;

/// Time-value list of `bool` values.
pub type BooleanTvList = TvList<bool>;

impl Sealed for bool {}

impl Primitive for bool {
    const DATA_TYPE: DataType = DataType::Boolean;
    const WIDTH: usize = 1;

    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>> {
        &pool.inner.booleans
    }

    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl TvList<bool> {
    /// Appends a boolean point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk cannot be acquired.
    pub fn put_bool(&mut self, timestamp: i64, value: bool) -> Result<()> {
        self.put(timestamp, value)
    }

    /// Appends boolean points pairwise.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired; see
    /// [`put_batch`](TvList::put_batch).
    pub fn put_bools(&mut self, timestamps: &[i64], values: &[bool]) -> Result<()> {
        self.put_batch(timestamps, values)
    }

    /// Returns the boolean value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::pool::ArrayKind;

    #[test]
    fn test_fifth_value_lands_in_second_chunk() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(4)).unwrap();
        let mut list = BooleanTvList::with_pool(&pool);
        for ts in 0..4 {
            list.put_bool(ts, false).unwrap();
        }
        assert_eq!(list.chunk_count(), 1);

        list.put_bool(4, true).unwrap();
        assert_eq!(list.chunk_count(), 2);
        assert_eq!(pool.stats(ArrayKind::Boolean).outstanding, 2);
        assert!(list.get_bool(4).unwrap());
        assert_eq!(list.get_time(4).unwrap(), 4);
    }

    #[test]
    fn test_recycled_chunk_contents_are_overwritten() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(4)).unwrap();
        let mut first = BooleanTvList::with_pool(&pool);
        first.put_bools(&[1, 2, 3, 4], &[true; 4]).unwrap();
        first.dispose();

        let mut second = BooleanTvList::with_pool(&pool);
        second.put_bool(9, false).unwrap();
        assert_eq!(pool.stats(ArrayKind::Boolean).allocated, 1);
        assert!(!second.get_bool(0).unwrap());
        assert_eq!(second.size(), 1);
    }
}
