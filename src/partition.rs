//! Deterministic partitioning of a sequence across workers
//!
//! A sequence of length `n` is split into `p` contiguous partitions of
//! `ceil(n / p)` elements each; the last partition absorbs the remainder and
//! may be shorter or empty. Partition `i` is owned by worker `i` for the
//! duration of one iteration. Partitioning is a pure function of
//! `(n, p, rank)` so every worker can derive its own bounds without
//! communication.

use std::ops::Range;

/// Length of every partition except possibly the last: `ceil(n / p)`.
///
/// # Panics
///
/// Panics if `p` is zero.
pub fn chunk_len(n: usize, p: usize) -> usize {
    assert!(p > 0, "worker count must be positive");
    (n + p - 1) / p
}

/// Half-open index range owned by `rank` when `n` elements are split
/// across `p` workers.
///
/// The ranges for ranks `0..p` tile `[0, n)` exactly: no overlaps, no gaps.
/// When `rank * chunk_len(n, p)` falls at or past `n` (the `p > n` case),
/// the range is empty and every operation on it is a no-op.
///
/// # Panics
///
/// Panics if `p` is zero or `rank >= p`.
pub fn partition_range(n: usize, p: usize, rank: usize) -> Range<usize> {
    assert!(rank < p, "rank {} out of range for {} workers", rank, p);
    let chunk = chunk_len(n, p);
    let start = (rank * chunk).min(n);
    let end = (start + chunk).min(n);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        assert_eq!(partition_range(8, 4, 0), 0..2);
        assert_eq!(partition_range(8, 4, 1), 2..4);
        assert_eq!(partition_range(8, 4, 2), 4..6);
        assert_eq!(partition_range(8, 4, 3), 6..8);
    }

    #[test]
    fn test_uneven_split_shortens_last() {
        // ceil(8 / 3) = 3, so the last partition holds the 2 leftovers
        assert_eq!(partition_range(8, 3, 0), 0..3);
        assert_eq!(partition_range(8, 3, 1), 3..6);
        assert_eq!(partition_range(8, 3, 2), 6..8);
    }

    #[test]
    fn test_more_workers_than_elements() {
        // ceil(3 / 5) = 1; ranks 3 and 4 own empty partitions
        assert_eq!(partition_range(3, 5, 0), 0..1);
        assert_eq!(partition_range(3, 5, 2), 2..3);
        assert_eq!(partition_range(3, 5, 3), 3..3);
        assert_eq!(partition_range(3, 5, 4), 3..3);
        assert!(partition_range(3, 5, 4).is_empty());
    }

    #[test]
    fn test_empty_sequence() {
        for rank in 0..4 {
            assert!(partition_range(0, 4, rank).is_empty());
        }
    }

    #[test]
    fn test_single_worker_owns_everything() {
        assert_eq!(partition_range(17, 1, 0), 0..17);
    }

    proptest! {
        /// Partitions tile `[0, n)` exactly once each: consecutive ranges
        /// are adjacent, the first starts at 0 and the last ends at n.
        #[test]
        fn prop_partitions_tile_exactly(n in 0usize..10_000, p in 1usize..64) {
            let mut expected_start = 0;
            for rank in 0..p {
                let range = partition_range(n, p, rank);
                prop_assert_eq!(range.start, expected_start);
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= n);
                expected_start = range.end;
            }
            prop_assert_eq!(expected_start, n);
        }

        #[test]
        fn prop_nonlast_partitions_have_chunk_len(n in 1usize..10_000, p in 1usize..64) {
            let chunk = chunk_len(n, p);
            for rank in 0..p {
                let range = partition_range(n, p, rank);
                if range.end < n {
                    prop_assert_eq!(range.len(), chunk);
                }
            }
        }
    }
}
