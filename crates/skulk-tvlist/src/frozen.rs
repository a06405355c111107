//! Immutable, sorted view of a time-value list after the write phase ends.
//!
//! [`TvList::freeze`](crate::tvlist::TvList::freeze) sorts a list and wraps
//! it in a [`FrozenTvList`]. The frozen view exposes only reads, so it can be
//! shared across flush and query threads (for example behind an `Arc`)
//! without any locking.

use crate::error::Result;
use crate::iter::{DedupIter, Iter};
use crate::tvlist::{TimeValuePair, TvList};
use crate::types::{DataType, Primitive};

/// A sorted, read-only time-value list.
pub struct FrozenTvList<T: Primitive> {
    list: TvList<T>,
}

impl<T: Primitive> FrozenTvList<T> {
    pub(crate) fn new(list: TvList<T>) -> Self {
        debug_assert!(list.is_sorted());
        Self { list }
    }

    /// Returns the data type of the values.
    pub fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    /// Returns the number of entries, duplicates included.
    pub fn size(&self) -> usize {
        self.list.size()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the smallest timestamp, or `i64::MAX` if empty.
    pub fn min_time(&self) -> i64 {
        self.list.min_time()
    }

    /// Returns the largest timestamp, if any.
    pub fn max_time(&self) -> Option<i64> {
        self.list.last_time()
    }

    /// Returns the timestamp at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_time(&self, index: usize) -> Result<i64> {
        self.list.get_time(index)
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.list.get(index)
    }

    /// Returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_time_value_pair(&self, index: usize) -> Result<TimeValuePair<T>> {
        self.list.get_time_value_pair(index)
    }

    /// Iterates over every entry in timestamp order, duplicates included.
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }

    /// Iterates over one entry per timestamp, keeping the latest write.
    pub fn dedup_iter(&self) -> DedupIter<'_, T> {
        self.list.dedup_iter()
    }

    /// Returns the number of distinct timestamps.
    pub fn distinct_count(&self) -> usize {
        self.dedup_iter().count()
    }

    /// Returns the list to the write phase.
    pub fn into_inner(self) -> TvList<T> {
        self.list
    }

    /// Releases every chunk back to the pool and consumes the view.
    pub fn dispose(self) {
        self.list.dispose();
    }
}

impl<T: Primitive + std::fmt::Debug> std::fmt::Debug for FrozenTvList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FrozenTvList").field(&self.list).finish()
    }
}
