//! 32-bit integer column buffer.

use super::{DataType, Primitive, Sealed, Value};
use crate::error::Result;
use crate::pool::{FreeList, PrimitiveArrayPool};
use crate::tvlist::TvList;
use std::sync::Arc;

/// Time-value list of `i32` values.
pub type IntTvList = TvList<i32>;

impl Sealed for i32 {}

impl Primitive for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
    const WIDTH: usize = 4;

    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>> {
        &pool.inner.ints
    }

    fn into_value(self) -> Value {
        Value::Int32(self)
    }
}

impl TvList<i32> {
    /// Appends an int point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk cannot be acquired.
    pub fn put_int(&mut self, timestamp: i64, value: i32) -> Result<()> {
        self.put(timestamp, value)
    }

    /// Appends int points pairwise.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired; see
    /// [`put_batch`](TvList::put_batch).
    pub fn put_ints(&mut self, timestamps: &[i64], values: &[i32]) -> Result<()> {
        self.put_batch(timestamps, values)
    }

    /// Returns the int value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_int(&self, index: usize) -> Result<i32> {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::pool::ArrayKind;

    #[test]
    fn test_sort_interleaved_duplicates() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(4)).unwrap();
        let mut list = IntTvList::with_pool(&pool);
        for (ts, v) in [(2, 1), (1, 2), (2, 3), (1, 4), (2, 5)] {
            list.put_int(ts, v).unwrap();
        }
        list.sort().unwrap();

        let values: Vec<i32> = list.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2, 4, 1, 3, 5]);
        let latest: Vec<(i64, i32)> = list.dedup_iter().map(|(ts, v)| (ts, *v)).collect();
        assert_eq!(latest, vec![(1, 4), (2, 5)]);
    }

    #[test]
    fn test_delete_then_reinsert() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(2)).unwrap();
        let mut list = IntTvList::with_pool(&pool);
        list.put_ints(&[10, 20, 30, 40, 50], &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(list.delete_range(20, 40), 3);
        assert_eq!(pool.stats(ArrayKind::Int32).outstanding, 1);

        list.put_int(15, 6).unwrap();
        list.sort().unwrap();
        let got: Vec<(i64, i32)> = list.iter().map(|(ts, v)| (ts, *v)).collect();
        assert_eq!(got, vec![(10, 1), (15, 6), (50, 5)]);
    }
}
