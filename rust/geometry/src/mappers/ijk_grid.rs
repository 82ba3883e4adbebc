// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IJK grid mapper
//!
//! Cells are hexahedra read straight off the node lattice. Under multi-worker
//! partitioning each worker keeps a contiguous range of K layers together with
//! the node layers bounding it.

use super::{BuildContext, GeometryBuilder};
use crate::cell::{Cell, CellType};
use crate::points::PointBuffer;
use crate::realized::{IndexWindow, RealizedGeometry};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct IjkGridBuilder;

impl GeometryBuilder for IjkGridBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let data = ctx.source.ijk_grid(id)?;
        let (ni, nj, nk) = (data.ni, data.nj, data.nk);
        let layer = (ni + 1) * (nj + 1);
        let expected = layer * (nk + 1);
        if data.points.len() as u64 != expected {
            return Err(Error::MissingData(format!(
                "IJK grid {id} ({ni}x{nj}x{nk}) has {} nodes, expected {expected}",
                data.points.len()
            )));
        }

        let points = PointBuffer::load(data.points)?.into_points();
        let k_range = ctx.partition.range(nk);
        let node_start = (k_range.start * layer) as usize;
        let node_end = ((k_range.end + 1) * layer) as usize;
        let points = points[node_start..node_end].to_vec();

        let node = |i: u64, j: u64, k: u64| ((k - k_range.start) * (nj + 1) + j) * (ni + 1) + i;
        let cell_count = ((k_range.end - k_range.start) * ni * nj) as usize;
        let mut cells = Vec::with_capacity(cell_count);
        for k in k_range.clone() {
            for j in 0..nj {
                for i in 0..ni {
                    cells.push(Cell::new(
                        CellType::Hexahedron,
                        [
                            node(i, j, k),
                            node(i + 1, j, k),
                            node(i + 1, j + 1, k),
                            node(i, j + 1, k),
                            node(i, j, k + 1),
                            node(i + 1, j, k + 1),
                            node(i + 1, j + 1, k + 1),
                            node(i, j + 1, k + 1),
                        ],
                    ));
                }
            }
        }

        Ok(RealizedGeometry::new(points, cells).with_windows(
            IndexWindow {
                offset: k_range.start * layer,
                total: expected,
            },
            IndexWindow {
                offset: k_range.start * ni * nj,
                total: ni * nj * nk,
            },
        ))
    }
}
