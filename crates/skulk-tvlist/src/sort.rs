//! Out-of-place sort engine for time-value lists.
//!
//! Sorting never permutes a list's own chunks directly. The entries are first
//! copied into scratch chunks borrowed from the pool, together with each
//! entry's insertion index. The scratch image is sorted by the key
//! `(timestamp, insertion index)`, then copied back over the list and the
//! scratch chunks go back to the pool. If the scratch chunks cannot be
//! acquired, the list is left exactly as it was.
//!
//! Because the insertion index is part of the key, every key is distinct and
//! entries sharing a timestamp end up in insertion order: the last one of a
//! timestamp run is the latest write.
//!
//! # Algorithm
//!
//! - Ranges of at most [`SMALL_RANGE`] entries: take the leading run
//!   (reversing it if strictly descending), then binary insertion sort.
//! - Larger ranges: median-of-three pivot, partition around it, and push both
//!   halves on an explicit work stack, smaller half on top.

use crate::error::Result;
use crate::pool::PooledArray;
use crate::tvlist::TvList;
use crate::types::Primitive;

/// Ranges at or below this length are binary-insertion sorted.
pub(crate) const SMALL_RANGE: usize = 32;

/// Sort key: timestamp first, insertion index second.
type Key = (i64, i64);

/// Scratch image of a list being sorted, plus the pivot slot.
pub(crate) struct SortScratch<T: Primitive> {
    array_size: usize,
    timestamps: Vec<PooledArray<i64>>,
    sequences: Vec<PooledArray<i64>>,
    values: Vec<PooledArray<T>>,
    pivot_time: i64,
    pivot_sequence: i64,
    pivot_value: T,
}

impl<T: Primitive> SortScratch<T> {
    /// Acquires scratch chunks for `list` and copies its entries into them.
    fn load(list: &TvList<T>) -> Result<Self> {
        let pool = &list.pool;
        let mut scratch = Self {
            array_size: list.array_size,
            timestamps: pool.acquire_timestamps_for(list.size)?,
            sequences: pool.acquire_timestamps_for(list.size)?,
            values: pool.acquire_for::<T>(list.size)?,
            pivot_time: 0,
            pivot_sequence: 0,
            pivot_value: T::default(),
        };
        for i in 0..list.size {
            scratch.set_to_sorted(list, i, i);
        }
        Ok(scratch)
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.array_size, index % self.array_size)
    }

    /// Copies list entry `src` into scratch slot `dest`.
    fn set_to_sorted(&mut self, list: &TvList<T>, src: usize, dest: usize) {
        self.set(
            dest,
            list.time_at(src),
            src as i64,
            list.value_at(src).clone(),
        );
    }

    /// Copies scratch slot `src` over list entry `dest`.
    fn set_from_sorted(&self, list: &mut TvList<T>, src: usize, dest: usize) {
        let (chunk, offset) = self.locate(src);
        list.set(
            dest,
            self.timestamps[chunk][offset],
            self.values[chunk][offset].clone(),
        );
    }

    #[inline]
    fn key(&self, index: usize) -> Key {
        let (chunk, offset) = self.locate(index);
        (self.timestamps[chunk][offset], self.sequences[chunk][offset])
    }

    #[inline]
    fn set(&mut self, index: usize, time: i64, sequence: i64, value: T) {
        let (chunk, offset) = self.locate(index);
        self.timestamps[chunk][offset] = time;
        self.sequences[chunk][offset] = sequence;
        self.values[chunk][offset] = value;
    }

    /// Copies slot `src` over slot `dest`.
    fn move_entry(&mut self, src: usize, dest: usize) {
        if src == dest {
            return;
        }
        let (chunk, offset) = self.locate(src);
        let value = self.values[chunk][offset].clone();
        let (time, sequence) = self.key(src);
        self.set(dest, time, sequence, value);
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (a_chunk, a_offset) = self.locate(a);
        let (b_chunk, b_offset) = self.locate(b);
        let (a_time, a_sequence) = self.key(a);
        let (b_time, b_sequence) = self.key(b);
        let a_value = std::mem::take(&mut self.values[a_chunk][a_offset]);
        let b_value = std::mem::replace(&mut self.values[b_chunk][b_offset], a_value);
        self.values[a_chunk][a_offset] = b_value;
        self.timestamps[a_chunk][a_offset] = b_time;
        self.sequences[a_chunk][a_offset] = b_sequence;
        self.timestamps[b_chunk][b_offset] = a_time;
        self.sequences[b_chunk][b_offset] = a_sequence;
    }

    fn save_as_pivot(&mut self, index: usize) {
        let (chunk, offset) = self.locate(index);
        let (time, sequence) = self.key(index);
        self.pivot_time = time;
        self.pivot_sequence = sequence;
        self.pivot_value = self.values[chunk][offset].clone();
    }

    fn set_pivot_to(&mut self, index: usize) {
        let value = std::mem::take(&mut self.pivot_value);
        self.set(index, self.pivot_time, self.pivot_sequence, value);
    }

    #[inline]
    fn pivot_key(&self) -> Key {
        (self.pivot_time, self.pivot_sequence)
    }

    /// Reverses slots `[lo, hi)`.
    fn reverse_range(&mut self, mut lo: usize, mut hi: usize) {
        while lo + 1 < hi {
            hi -= 1;
            self.swap(lo, hi);
            lo += 1;
        }
    }

    /// Sorts slots `[lo, hi)`.
    fn sort_range(&mut self, lo: usize, hi: usize) {
        let mut pending = vec![(lo, hi)];
        while let Some((lo, hi)) = pending.pop() {
            if hi - lo <= SMALL_RANGE {
                self.binary_sort(lo, hi);
                continue;
            }
            let boundary = self.partition(lo, hi);
            let left = (lo, boundary);
            let right = (boundary + 1, hi);
            // Larger half first, so the smaller half is popped next and the
            // stack stays logarithmic.
            if boundary - lo < hi - (boundary + 1) {
                pending.push(right);
                pending.push(left);
            } else {
                pending.push(left);
                pending.push(right);
            }
        }
    }

    /// Returns whichever of `a`, `b`, `c` holds the median key.
    fn median_of_three(&self, a: usize, b: usize, c: usize) -> usize {
        let (ka, kb, kc) = (self.key(a), self.key(b), self.key(c));
        if ka < kb {
            if kb < kc {
                b
            } else if ka < kc {
                c
            } else {
                a
            }
        } else if ka < kc {
            a
        } else if kb < kc {
            c
        } else {
            b
        }
    }

    /// Partitions `[lo, hi)` around a median-of-three pivot and returns the
    /// pivot's final slot. Keys left of it are smaller, keys right are larger.
    fn partition(&mut self, lo: usize, hi: usize) -> usize {
        let last = hi - 1;
        let mid = self.median_of_three(lo, lo + (hi - lo) / 2, last);
        self.save_as_pivot(mid);
        // The pivot's slot takes the last entry; `last` is now a free hole.
        self.move_entry(last, mid);

        let pivot = self.pivot_key();
        let mut boundary = lo;
        for i in lo..last {
            if self.key(i) < pivot {
                self.swap(i, boundary);
                boundary += 1;
            }
        }

        self.move_entry(boundary, last);
        self.set_pivot_to(boundary);
        boundary
    }

    /// Returns the end of the run starting at `lo`, reversing it in place if
    /// it is strictly descending.
    fn count_run_and_make_ascending(&mut self, lo: usize, hi: usize) -> usize {
        let mut run_hi = lo + 1;
        if run_hi == hi {
            return hi;
        }
        if self.key(run_hi) < self.key(lo) {
            run_hi += 1;
            while run_hi < hi && self.key(run_hi) < self.key(run_hi - 1) {
                run_hi += 1;
            }
            self.reverse_range(lo, run_hi);
        } else {
            run_hi += 1;
            while run_hi < hi && self.key(run_hi) >= self.key(run_hi - 1) {
                run_hi += 1;
            }
        }
        run_hi
    }

    /// Binary insertion sort of `[lo, hi)`.
    fn binary_sort(&mut self, lo: usize, hi: usize) {
        if hi - lo < 2 {
            return;
        }
        let start = self.count_run_and_make_ascending(lo, hi);
        for i in start..hi {
            self.save_as_pivot(i);
            let pivot = self.pivot_key();

            let (mut left, mut right) = (lo, i);
            while left < right {
                let mid = (left + right) >> 1;
                if pivot < self.key(mid) {
                    right = mid;
                } else {
                    left = mid + 1;
                }
            }

            for j in (left..i).rev() {
                self.move_entry(j, j + 1);
            }
            self.set_pivot_to(left);
        }
    }
}

/// Sorts `list` in insertion-stable timestamp order.
///
/// On error no entry of `list` has been modified.
pub(crate) fn sort_list<T: Primitive>(list: &mut TvList<T>) -> Result<()> {
    let size = list.size;
    let mut scratch = SortScratch::load(list)?;
    scratch.sort_range(0, size);
    for i in 0..size {
        scratch.set_from_sorted(list, i, i);
    }
    Ok(())
}
