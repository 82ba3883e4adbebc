// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Realized geometry - the point/cell container handed to the renderer

use crate::cell::Cell;
use crate::Point3;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one geometry build.
///
/// Every call that realizes geometry yields a fresh instance, so consumers can
/// tell a rebuild from a reused container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryInstance(u64);

impl GeometryInstance {
    fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Position of a local element range inside the global numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexWindow {
    /// Global index of the first local element
    pub offset: u64,
    /// Number of elements in the whole (unpartitioned) representation
    pub total: u64,
}

impl IndexWindow {
    /// Window covering `0..total`
    pub fn full(total: u64) -> Self {
        Self { offset: 0, total }
    }
}

/// Points and cells of one representation (or one worker's share of it)
#[derive(Debug, Clone, PartialEq)]
pub struct RealizedGeometry {
    instance: GeometryInstance,
    pub points: Vec<Point3<f64>>,
    pub cells: Vec<Cell>,
    pub point_window: IndexWindow,
    pub cell_window: IndexWindow,
}

impl RealizedGeometry {
    /// Create geometry that covers its whole representation
    pub fn new(points: Vec<Point3<f64>>, cells: Vec<Cell>) -> Self {
        let point_window = IndexWindow::full(points.len() as u64);
        let cell_window = IndexWindow::full(cells.len() as u64);
        Self {
            instance: GeometryInstance::next(),
            points,
            cells,
            point_window,
            cell_window,
        }
    }

    /// Place the local ranges inside the global numbering
    pub fn with_windows(mut self, point_window: IndexWindow, cell_window: IndexWindow) -> Self {
        self.point_window = point_window;
        self.cell_window = cell_window;
        self
    }

    #[inline]
    pub fn instance(&self) -> GeometryInstance {
        self.instance
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Local index of a globally numbered cell, `None` outside this range
    pub fn local_cell(&self, global: u64) -> Option<usize> {
        let local = global.checked_sub(self.cell_window.offset)?;
        (local < self.cells.len() as u64).then_some(local as usize)
    }

    /// New geometry holding only `local_cells`, with unreferenced points dropped.
    ///
    /// Cells keep the order of `local_cells`; points keep their relative order.
    pub fn subset(&self, local_cells: &[usize]) -> RealizedGeometry {
        let mut used = vec![false; self.points.len()];
        for &c in local_cells {
            for &node in &self.cells[c].nodes {
                used[node as usize] = true;
            }
        }

        let mut remap: FxHashMap<u64, u64> = FxHashMap::default();
        let mut points = Vec::with_capacity(used.iter().filter(|&&u| u).count());
        for (index, point) in self.points.iter().enumerate() {
            if used[index] {
                remap.insert(index as u64, points.len() as u64);
                points.push(*point);
            }
        }

        let cells = local_cells
            .iter()
            .map(|&c| self.cells[c].remap(|n| remap.get(&n).copied().unwrap_or(n)))
            .collect();
        RealizedGeometry::new(points, cells)
    }

    /// Axis-aligned bounds of the points, `None` when empty
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in &self.points[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellType;
    use approx::assert_relative_eq;

    fn strip() -> RealizedGeometry {
        let points = (0..6)
            .map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.0))
            .collect();
        let cells = vec![
            Cell::new(CellType::Quad, [0, 1, 4, 3]),
            Cell::new(CellType::Quad, [1, 2, 5, 4]),
        ];
        RealizedGeometry::new(points, cells)
    }

    #[test]
    fn test_instances_are_unique() {
        assert_ne!(strip().instance(), strip().instance());
    }

    #[test]
    fn test_local_cell_respects_window() {
        let geometry = strip().with_windows(IndexWindow::full(6), IndexWindow { offset: 4, total: 10 });
        assert_eq!(geometry.local_cell(3), None);
        assert_eq!(geometry.local_cell(5), Some(1));
        assert_eq!(geometry.local_cell(6), None);
    }

    #[test]
    fn test_subset_compacts_points() {
        let subset = strip().subset(&[1]);
        assert_eq!(subset.point_count(), 4);
        assert_eq!(subset.cells[0].nodes.as_slice(), &[0, 1, 3, 2]);
        assert_relative_eq!(subset.points[0].x, 1.0);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = strip().bounds().unwrap();
        assert_relative_eq!(min.x, 0.0);
        assert_relative_eq!(max.x, 2.0);
        assert_relative_eq!(max.y, 1.0);
    }
}
