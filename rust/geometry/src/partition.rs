// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static work partitioning
//!
//! Grid geometry can be split across rendering workers along its outer
//! dimension (K layers for IJK grids, cell index for unstructured grids).
//! Each worker owns one contiguous range; the last worker absorbs the
//! remainder. The split is fixed when geometry is built.

use std::ops::Range;

/// One worker's share of the outer grid dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    worker_index: u32,
    worker_count: u32,
}

impl Partition {
    /// Single worker owning everything
    pub const SINGLE: Partition = Partition {
        worker_index: 0,
        worker_count: 1,
    };

    /// Create a partition, `None` unless `worker_index < worker_count`
    pub fn new(worker_index: u32, worker_count: u32) -> Option<Self> {
        (worker_index < worker_count).then_some(Self {
            worker_index,
            worker_count,
        })
    }

    #[inline]
    pub fn worker_index(&self) -> u32 {
        self.worker_index
    }

    #[inline]
    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    /// Contiguous sub-range of `0..total` owned by this worker
    pub fn range(&self, total: u64) -> Range<u64> {
        let index = self.worker_index as u64;
        let count = self.worker_count as u64;
        let start = index * total / count;
        let end = if index + 1 == count {
            total
        } else {
            (index + 1) * total / count
        };
        start..end
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::SINGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_worker_owns_everything() {
        assert_eq!(Partition::SINGLE.range(17), 0..17);
    }

    #[test]
    fn test_ranges_tile_the_dimension() {
        let total = 10;
        let ranges: Vec<_> = (0..3)
            .map(|i| Partition::new(i, 3).unwrap().range(total))
            .collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_more_workers_than_layers() {
        let ranges: Vec<_> = (0..4)
            .map(|i| Partition::new(i, 4).unwrap().range(2))
            .collect();
        assert_eq!(ranges, vec![0..0, 0..1, 1..1, 1..2]);
    }

    #[test]
    fn test_invalid_partition() {
        assert!(Partition::new(2, 2).is_none());
        assert!(Partition::new(0, 0).is_none());
    }
}
