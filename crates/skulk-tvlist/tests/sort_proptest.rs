//! Property-based tests for ordering, last-write-wins, min tracking, clone
//! independence and sort idempotence.
//!
//! Uses proptest to drive lists with arbitrary insertion sequences. Timestamps
//! are drawn from a narrow range so that duplicates are common.

use proptest::prelude::*;
use skulk_tvlist::{ArrayKind, LongTvList, PoolConfig, PrimitiveArrayPool};
use std::collections::BTreeMap;

/// Strategy for insertion sequences: (timestamp, chunk capacity).
/// Values are the insertion index, so the winner of a duplicate is visible.
fn inserts_strategy() -> impl Strategy<Value = (Vec<i64>, usize)> {
    (
        prop::collection::vec(-50i64..50, 0..400),
        prop_oneof![Just(1usize), Just(2), Just(3), Just(8), Just(32)],
    )
}

fn build(pool: &PrimitiveArrayPool, timestamps: &[i64]) -> LongTvList {
    let mut list = LongTvList::with_pool(pool);
    for (i, &ts) in timestamps.iter().enumerate() {
        list.put_long(ts, i as i64).unwrap();
    }
    list
}

proptest! {
    /// After sorting, timestamps are non-decreasing.
    #[test]
    fn test_sort_orders_timestamps((timestamps, array_size) in inserts_strategy()) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let mut list = build(&pool, &timestamps);
        list.sort().unwrap();

        prop_assert!(list.is_sorted());
        prop_assert_eq!(list.size(), timestamps.len());
        for i in 1..list.size() {
            prop_assert!(list.get_time(i - 1).unwrap() <= list.get_time(i).unwrap());
        }
    }

    /// The deduplicated view yields, for every timestamp, the value of the
    /// latest insert with that timestamp.
    #[test]
    fn test_last_write_wins((timestamps, array_size) in inserts_strategy()) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let mut list = build(&pool, &timestamps);
        list.sort().unwrap();

        let mut expected = BTreeMap::new();
        for (i, &ts) in timestamps.iter().enumerate() {
            expected.insert(ts, i as i64);
        }
        let got: Vec<(i64, i64)> = list.dedup_iter().map(|(ts, v)| (ts, *v)).collect();
        let expected: Vec<(i64, i64)> = expected.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    /// Entries sharing a timestamp keep insertion order in the sorted image.
    #[test]
    fn test_sort_is_stable((timestamps, array_size) in inserts_strategy()) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let mut list = build(&pool, &timestamps);
        list.sort().unwrap();

        let mut expected: Vec<(i64, i64)> = timestamps
            .iter()
            .enumerate()
            .map(|(i, &ts)| (ts, i as i64))
            .collect();
        expected.sort_by_key(|&(ts, _)| ts);
        let got: Vec<(i64, i64)> = list.iter().map(|(ts, v)| (ts, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    /// `min_time` equals the smallest timestamp inserted, in any order.
    #[test]
    fn test_min_time_tracks_minimum((timestamps, array_size) in inserts_strategy()) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let list = build(&pool, &timestamps);
        let expected = timestamps.iter().copied().min().unwrap_or(i64::MAX);
        prop_assert_eq!(list.min_time(), expected);
    }

    /// A clone matches its source and mutating one never affects the other.
    #[test]
    fn test_clone_is_independent(
        (timestamps, array_size) in inserts_strategy(),
        extra in -100i64..100
    ) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let mut list = build(&pool, &timestamps);
        let mut copy = list.try_clone().unwrap();

        prop_assert_eq!(copy.size(), list.size());
        prop_assert_eq!(copy.min_time(), list.min_time());
        for i in 0..list.size() {
            prop_assert_eq!(copy.get_time(i).unwrap(), list.get_time(i).unwrap());
            prop_assert_eq!(copy.get_long(i).unwrap(), list.get_long(i).unwrap());
        }

        let snapshot: Vec<(i64, i64)> = list.iter().map(|(ts, v)| (ts, *v)).collect();
        copy.put_long(extra, -1).unwrap();
        copy.sort().unwrap();
        let after: Vec<(i64, i64)> = list.iter().map(|(ts, v)| (ts, *v)).collect();
        prop_assert_eq!(&snapshot, &after);

        let copy_snapshot: Vec<(i64, i64)> = copy.iter().map(|(ts, v)| (ts, *v)).collect();
        list.put_long(extra, -2).unwrap();
        list.sort().unwrap();
        let copy_after: Vec<(i64, i64)> = copy.iter().map(|(ts, v)| (ts, *v)).collect();
        prop_assert_eq!(copy_snapshot, copy_after);
    }

    /// Sorting twice is the same as sorting once.
    #[test]
    fn test_sort_idempotent((timestamps, array_size) in inserts_strategy()) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let mut list = build(&pool, &timestamps);
        list.sort().unwrap();
        let once: Vec<(i64, i64)> = list.iter().map(|(ts, v)| (ts, *v)).collect();
        list.sort().unwrap();
        let twice: Vec<(i64, i64)> = list.iter().map(|(ts, v)| (ts, *v)).collect();
        prop_assert_eq!(once, twice);
    }

    /// Outstanding arrays always equal the chunks lists hold live.
    #[test]
    fn test_pool_conservation(
        (timestamps, array_size) in inserts_strategy(),
        lower in -50i64..50,
        width in 0i64..40
    ) {
        let pool = PrimitiveArrayPool::new(PoolConfig::new(array_size)).unwrap();
        let mut list = build(&pool, &timestamps);
        let copy = list.try_clone().unwrap();
        list.sort().unwrap();
        list.delete_range(lower, lower + width);

        let live = list.chunk_count() + copy.chunk_count();
        prop_assert_eq!(pool.stats(ArrayKind::Timestamp).outstanding, live);
        prop_assert_eq!(pool.stats(ArrayKind::Int64).outstanding, live);

        drop(copy);
        list.dispose();
        prop_assert_eq!(pool.outstanding(), 0);
        for kind in ArrayKind::ALL {
            let stats = pool.stats(kind);
            prop_assert_eq!(stats.allocated, stats.free);
        }
    }
}
