//! 64-bit integer column buffer.

use super::{DataType, Primitive, Sealed, Value};
use crate::error::Result;
use crate::pool::{FreeList, PrimitiveArrayPool};
use crate::tvlist::TvList;
use std::sync::Arc;

/// Time-value list of `i64` values.
pub type LongTvList = TvList<i64>;

impl Sealed for i64 {}

impl Primitive for i64 {
    const DATA_TYPE: DataType = DataType::Int64;
    const WIDTH: usize = 8;

    // Value chunks; timestamps have their own list.
    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>> {
        &pool.inner.longs
    }

    fn into_value(self) -> Value {
        Value::Int64(self)
    }
}

impl TvList<i64> {
    /// Appends a long point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk cannot be acquired.
    pub fn put_long(&mut self, timestamp: i64, value: i64) -> Result<()> {
        self.put(timestamp, value)
    }

    /// Appends long points pairwise.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired; see
    /// [`put_batch`](TvList::put_batch).
    pub fn put_longs(&mut self, timestamps: &[i64], values: &[i64]) -> Result<()> {
        self.put_batch(timestamps, values)
    }

    /// Returns the long value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_long(&self, index: usize) -> Result<i64> {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::pool::ArrayKind;

    #[test]
    fn test_values_and_timestamps_draw_from_separate_lists() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(2)).unwrap();
        let mut list = LongTvList::with_pool(&pool);
        list.put_longs(&[1, 2, 3], &[i64::MIN, 0, i64::MAX]).unwrap();

        assert_eq!(pool.stats(ArrayKind::Timestamp).outstanding, 2);
        assert_eq!(pool.stats(ArrayKind::Int64).outstanding, 2);
        assert_eq!(list.get_long(0).unwrap(), i64::MIN);
        assert_eq!(list.get_long(2).unwrap(), i64::MAX);
    }

    #[test]
    fn test_increasing_inserts_need_no_sort() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(32)).unwrap();
        let mut list = LongTvList::with_pool(&pool);
        for ts in 0..1_000 {
            list.put_long(ts, ts * 7).unwrap();
            assert!(list.is_sorted());
        }

        let before = pool.stats(ArrayKind::Timestamp);
        list.sort().unwrap();
        assert_eq!(pool.stats(ArrayKind::Timestamp), before);
        for i in 0..1_000 {
            assert_eq!(list.get_time(i).unwrap(), i as i64);
            assert_eq!(list.get_long(i).unwrap(), i as i64 * 7);
        }
    }

    #[test]
    fn test_extreme_timestamps_sort() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(4)).unwrap();
        let mut list = LongTvList::with_pool(&pool);
        list.put_long(i64::MAX, 1).unwrap();
        list.put_long(i64::MIN, 2).unwrap();
        list.put_long(0, 3).unwrap();
        list.sort().unwrap();
        assert_eq!(list.get_time(0).unwrap(), i64::MIN);
        assert_eq!(list.get_time(2).unwrap(), i64::MAX);
        assert_eq!(list.min_time(), i64::MIN);
    }
}
