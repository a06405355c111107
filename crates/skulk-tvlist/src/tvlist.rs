//! TvList - chunked, pooled buffer of (timestamp, value) pairs for one column.
//!
//! A [`TvList`] accumulates points in insertion order. Entry `i` lives at
//! chunk `i / array_size`, offset `i % array_size` in both the timestamp and
//! the value chunk sequences; both sequences always have the same number of
//! chunks. Chunks are borrowed from a [`PrimitiveArrayPool`] as the list grows
//! and go back to the pool when the list is cleared, range-deleted or dropped.
//!
//! # Write / Read Phases
//!
//! ```text
//! producer: put / put_batch ──> TvList (unsorted, &mut)
//!                                   │ freeze()  (sort + handoff)
//!                                   ▼
//! flush / query: FrozenTvList (sorted, shared &)  ──> dedup_iter()
//! ```
//!
//! Insertion needs `&mut TvList`, and sorting does too, so an insert can
//! never run concurrently with a sort on the same list. After
//! [`TvList::freeze`] the data is immutable and may be read from many threads.

use crate::error::{Result, TvListError};
use crate::frozen::FrozenTvList;
use crate::iter::{DedupIter, Iter};
use crate::pool::{PooledArray, PrimitiveArrayPool};
use crate::sort;
use crate::types::{DataType, Primitive};
use tracing::{debug, warn};

/// A single (timestamp, value) entry read from a list.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeValuePair<T> {
    /// Timestamp of the entry.
    pub timestamp: i64,
    /// Value of the entry.
    pub value: T,
}

impl<T> TimeValuePair<T> {
    /// Creates a new pair.
    pub fn new(timestamp: i64, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// Failed [`TvList::freeze`]: the sort error plus the list, unsorted but
/// otherwise intact.
pub struct FreezeError<T: Primitive> {
    /// Why the sort failed.
    pub error: TvListError,
    /// The list that was being frozen.
    pub list: TvList<T>,
}

impl<T: Primitive> FreezeError<T> {
    /// Returns the list so it can be read, retried or disposed.
    pub fn into_inner(self) -> TvList<T> {
        self.list
    }
}

impl<T: Primitive> std::fmt::Debug for FreezeError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreezeError")
            .field("error", &self.error)
            .field("size", &self.list.size)
            .finish()
    }
}

impl<T: Primitive> std::fmt::Display for FreezeError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to freeze {} list: {}", T::DATA_TYPE, self.error)
    }
}

impl<T: Primitive> std::error::Error for FreezeError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T: Primitive> From<FreezeError<T>> for TvListError {
    fn from(err: FreezeError<T>) -> Self {
        err.error
    }
}

/// Time-value list for one column of element type `T`.
pub struct TvList<T: Primitive> {
    pub(crate) pool: PrimitiveArrayPool,
    pub(crate) array_size: usize,
    pub(crate) timestamps: Vec<PooledArray<i64>>,
    pub(crate) values: Vec<PooledArray<T>>,
    pub(crate) size: usize,
    min_time: i64,
    sorted: bool,
}

impl<T: Primitive> TvList<T> {
    /// Creates an empty list backed by the process-wide pool.
    pub fn new() -> Self {
        Self::with_pool(PrimitiveArrayPool::global())
    }

    /// Creates an empty list backed by the given pool.
    ///
    /// No chunk is acquired until the first insert.
    pub fn with_pool(pool: &PrimitiveArrayPool) -> Self {
        Self {
            pool: pool.clone(),
            array_size: pool.array_size(),
            timestamps: Vec::new(),
            values: Vec::new(),
            size: 0,
            min_time: i64::MAX,
            sorted: true,
        }
    }

    /// Returns the data type stored by this list.
    pub fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    /// Returns the pool this list borrows chunks from.
    pub fn pool(&self) -> &PrimitiveArrayPool {
        &self.pool
    }

    /// Returns the number of entries.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the smallest timestamp inserted, or `i64::MAX` if empty.
    pub fn min_time(&self) -> i64 {
        self.min_time
    }

    /// Returns true if timestamps are known to be non-decreasing.
    ///
    /// The flag is cleared only when an insert is strictly older than the
    /// entry immediately before it.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Returns the number of chunks currently held on each side.
    pub fn chunk_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns the chunk capacity.
    pub fn array_size(&self) -> usize {
        self.array_size
    }

    /// Returns the estimated memory held by this list's chunks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.chunk_count() * self.array_size * (std::mem::size_of::<i64>() + T::WIDTH)
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.array_size, index % self.array_size)
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.size {
            return Err(TvListError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Timestamp at `index`. Caller guarantees `index < size`.
    #[inline]
    pub(crate) fn time_at(&self, index: usize) -> i64 {
        let (chunk, offset) = self.locate(index);
        self.timestamps[chunk][offset]
    }

    /// Value at `index`. Caller guarantees `index < size`.
    #[inline]
    pub(crate) fn value_at(&self, index: usize) -> &T {
        let (chunk, offset) = self.locate(index);
        &self.values[chunk][offset]
    }

    /// Overwrites the entry at `index`. Caller guarantees `index < size`.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, timestamp: i64, value: T) {
        let (chunk, offset) = self.locate(index);
        self.timestamps[chunk][offset] = timestamp;
        self.values[chunk][offset] = value;
    }

    /// Acquires one more chunk on each side if the last chunk is full.
    ///
    /// The timestamp chunk is acquired first; if the value chunk cannot be
    /// acquired, the timestamp chunk goes straight back to the pool and the
    /// list is unchanged.
    fn check_expansion(&mut self) -> Result<()> {
        if self.size < self.timestamps.len() * self.array_size {
            return Ok(());
        }
        let timestamps = self.pool.acquire_timestamps()?;
        self.expand_values()?;
        self.timestamps.push(timestamps);
        Ok(())
    }

    fn expand_values(&mut self) -> Result<()> {
        let values = self.pool.acquire::<T>()?;
        self.values.push(values);
        Ok(())
    }

    fn release_last_time_array(&mut self) {
        self.timestamps.pop();
    }

    fn release_last_value_array(&mut self) {
        self.values.pop();
    }

    fn clear_time(&mut self) {
        self.timestamps.clear();
    }

    fn clear_value(&mut self) {
        self.values.clear();
    }

    /// Appends a point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk is needed and cannot be acquired.
    /// The list is unchanged in that case.
    pub fn put(&mut self, timestamp: i64, value: T) -> Result<()> {
        self.check_expansion()?;
        self.min_time = self.min_time.min(timestamp);
        let index = self.size;
        self.set(index, timestamp, value);
        self.size += 1;
        if self.sorted && self.size > 1 && timestamp < self.time_at(self.size - 2) {
            self.sorted = false;
        }
        Ok(())
    }

    /// Appends points pairwise from `timestamps` and `values`.
    ///
    /// Equivalent to calling [`put`](Self::put) for each pair in order, but
    /// copies a chunk's worth of entries at a time.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired. Points copied
    /// before the failing chunk remain in the list.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    pub fn put_batch(&mut self, timestamps: &[i64], values: &[T]) -> Result<()> {
        assert_eq!(
            timestamps.len(),
            values.len(),
            "timestamp and value batches must have equal length"
        );

        let mut copied = 0;
        while copied < timestamps.len() {
            self.check_expansion()?;
            let (chunk, offset) = self.locate(self.size);
            let n = (self.array_size - offset).min(timestamps.len() - copied);
            let ts_batch = &timestamps[copied..copied + n];

            self.timestamps[chunk][offset..offset + n].copy_from_slice(ts_batch);
            self.values[chunk][offset..offset + n].clone_from_slice(&values[copied..copied + n]);

            let mut prev = if self.size > 0 {
                Some(self.time_at(self.size - 1))
            } else {
                None
            };
            for &ts in ts_batch {
                self.min_time = self.min_time.min(ts);
                if matches!(prev, Some(p) if ts < p) {
                    self.sorted = false;
                }
                prev = Some(ts);
            }

            self.size += n;
            copied += n;
        }
        Ok(())
    }

    /// Returns the timestamp at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_time(&self, index: usize) -> Result<i64> {
        self.check_index(index)?;
        Ok(self.time_at(index))
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.value_at(index).clone())
    }

    /// Returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_time_value_pair(&self, index: usize) -> Result<TimeValuePair<T>> {
        self.check_index(index)?;
        Ok(TimeValuePair::new(
            self.time_at(index),
            self.value_at(index).clone(),
        ))
    }

    /// Returns the timestamp of the most recently placed entry, if any.
    pub fn last_time(&self) -> Option<i64> {
        self.size.checked_sub(1).map(|i| self.time_at(i))
    }

    /// Iterates over entries in index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Iterates over a sorted list, collapsing entries with equal timestamps
    /// to the last one in index order.
    ///
    /// Call [`sort`](Self::sort) first; on an unsorted list the collapse only
    /// merges adjacent duplicates.
    pub fn dedup_iter(&self) -> DedupIter<'_, T> {
        debug_assert!(self.sorted, "dedup_iter called on an unsorted list");
        DedupIter::new(self)
    }

    /// Sorts entries by timestamp. Equal timestamps keep insertion order, so
    /// the last entry of each timestamp run is the latest write.
    ///
    /// A no-op if the list is already sorted.
    ///
    /// # Errors
    ///
    /// Returns a pool error if scratch arrays cannot be acquired. The list
    /// contents are untouched in that case.
    pub fn sort(&mut self) -> Result<()> {
        if self.sorted {
            return Ok(());
        }
        sort::sort_list(self)?;
        self.sorted = true;
        debug!(
            "Sorted {} list: {} entries in {} chunks",
            T::DATA_TYPE,
            self.size,
            self.chunk_count()
        );
        Ok(())
    }

    /// Creates an independent deep copy of this list.
    ///
    /// The copy draws its own chunks from the same pool and shares no array
    /// with `self`.
    ///
    /// # Errors
    ///
    /// Returns a pool error if chunks for the copy cannot be acquired.
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = Self::with_pool(&self.pool);
        for (src_ts, src_values) in self.timestamps.iter().zip(&self.values) {
            let mut ts = self.pool.acquire_timestamps()?;
            let mut values = self.pool.acquire::<T>()?;
            ts.copy_from_slice(src_ts);
            values.clone_from_slice(src_values);
            copy.timestamps.push(ts);
            copy.values.push(values);
        }
        copy.size = self.size;
        copy.min_time = self.min_time;
        copy.sorted = self.sorted;
        Ok(copy)
    }

    /// Removes every entry with `lower <= timestamp <= upper`.
    ///
    /// Surviving entries keep their relative order, `min_time` is recomputed
    /// over them and chunks left empty are returned to the pool. Returns the
    /// number of entries removed.
    pub fn delete_range(&mut self, lower: i64, upper: i64) -> usize {
        let mut new_size = 0;
        let mut min_time = i64::MAX;
        for i in 0..self.size {
            let time = self.time_at(i);
            if time < lower || time > upper {
                if new_size != i {
                    let value = self.value_at(i).clone();
                    self.set(new_size, time, value);
                }
                new_size += 1;
                min_time = min_time.min(time);
            }
        }

        let deleted = self.size - new_size;
        self.size = new_size;
        self.min_time = min_time;

        let keep = self.pool.arrays_for(new_size);
        while self.timestamps.len() > keep {
            self.release_last_time_array();
            self.release_last_value_array();
        }

        if deleted > 0 {
            debug!(
                "Deleted {} entries in [{}, {}] from {} list, {} remain",
                deleted,
                lower,
                upper,
                T::DATA_TYPE,
                new_size
            );
        }
        deleted
    }

    /// Returns every chunk to the pool and resets the list to empty.
    pub fn clear(&mut self) {
        self.clear_time();
        self.clear_value();
        self.size = 0;
        self.min_time = i64::MAX;
        self.sorted = true;
    }

    /// Sorts the list and hands it off as an immutable, shareable view.
    ///
    /// # Errors
    ///
    /// Returns a [`FreezeError`] if sorting fails. It carries the pool error
    /// and the unsorted list, which keeps every entry and chunk.
    pub fn freeze(mut self) -> std::result::Result<FrozenTvList<T>, FreezeError<T>> {
        match self.sort() {
            Ok(()) => Ok(FrozenTvList::new(self)),
            Err(error) => {
                warn!(
                    "Freezing {} list of {} entries failed: {}",
                    T::DATA_TYPE,
                    self.size,
                    error
                );
                Err(FreezeError { error, list: self })
            }
        }
    }

    /// Releases every chunk back to the pool and consumes the list.
    pub fn dispose(self) {
        debug!(
            "Disposing {} list: {} entries, {} chunks",
            T::DATA_TYPE,
            self.size,
            self.chunk_count()
        );
    }
}

impl<T: Primitive> Default for TvList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Primitive + std::fmt::Debug> std::fmt::Debug for TvList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TvList")
            .field("data_type", &T::DATA_TYPE)
            .field("size", &self.size)
            .field("min_time", &self.min_time)
            .field("sorted", &self.sorted)
            .field("chunks", &self.chunk_count())
            .finish()
    }
}

impl<'a, T: Primitive> IntoIterator for &'a TvList<T> {
    type Item = (i64, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
