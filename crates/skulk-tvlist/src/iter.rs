//! Read iterators over time-value lists.

use crate::tvlist::TvList;
use crate::types::Primitive;
use std::iter::FusedIterator;

/// Iterator over `(timestamp, &value)` entries in index order.
pub struct Iter<'a, T: Primitive> {
    list: &'a TvList<T>,
    index: usize,
}

impl<'a, T: Primitive> Iter<'a, T> {
    pub(crate) fn new(list: &'a TvList<T>) -> Self {
        Self { list, index: 0 }
    }
}

impl<'a, T: Primitive> Iterator for Iter<'a, T> {
    type Item = (i64, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.list.size {
            return None;
        }
        let i = self.index;
        self.index += 1;
        Some((self.list.time_at(i), self.list.value_at(i)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.size - self.index;
        (remaining, Some(remaining))
    }
}

impl<T: Primitive> ExactSizeIterator for Iter<'_, T> {}

impl<T: Primitive> FusedIterator for Iter<'_, T> {}

/// Iterator over a sorted list that yields one entry per timestamp.
///
/// Within a run of equal timestamps the entry with the highest index wins,
/// which after sorting is the most recently inserted one.
pub struct DedupIter<'a, T: Primitive> {
    list: &'a TvList<T>,
    index: usize,
}

impl<'a, T: Primitive> DedupIter<'a, T> {
    pub(crate) fn new(list: &'a TvList<T>) -> Self {
        Self { list, index: 0 }
    }
}

impl<'a, T: Primitive> Iterator for DedupIter<'a, T> {
    type Item = (i64, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.list.size;
        if self.index >= size {
            return None;
        }
        let time = self.list.time_at(self.index);
        let mut last = self.index;
        while last + 1 < size && self.list.time_at(last + 1) == time {
            last += 1;
        }
        self.index = last + 1;
        Some((time, self.list.value_at(last)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.size - self.index;
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl<T: Primitive> FusedIterator for DedupIter<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::config::PoolConfig;
    use crate::pool::PrimitiveArrayPool;
    use crate::tvlist::TvList;

    #[test]
    fn test_iter_spans_chunks() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(2)).unwrap();
        let mut list = TvList::<i32>::with_pool(&pool);
        for ts in 0..5 {
            list.put(ts, ts as i32 * 3).unwrap();
        }

        let iter = list.iter();
        assert_eq!(iter.len(), 5);
        let collected: Vec<_> = iter.map(|(ts, v)| (ts, *v)).collect();
        assert_eq!(collected, vec![(0, 0), (1, 3), (2, 6), (3, 9), (4, 12)]);
    }

    #[test]
    fn test_dedup_keeps_last_of_each_run() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(2)).unwrap();
        let mut list = TvList::<i32>::with_pool(&pool);
        for (ts, v) in [(1, 10), (1, 11), (2, 20), (3, 30), (3, 31), (3, 32)] {
            list.put(ts, v).unwrap();
        }

        let collected: Vec<_> = list.dedup_iter().map(|(ts, v)| (ts, *v)).collect();
        assert_eq!(collected, vec![(1, 11), (2, 20), (3, 32)]);
    }

    #[test]
    fn test_iterators_on_empty_list() {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(2)).unwrap();
        let list = TvList::<f64>::with_pool(&pool);
        assert_eq!(list.iter().next(), None);
        assert_eq!(list.dedup_iter().next(), None);
    }
}
