// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D grid (lattice surface) mapper

use super::{BuildContext, GeometryBuilder};
use crate::cell::{Cell, CellType};
use crate::points::{PointBuffer, RawPoints};
use crate::realized::RealizedGeometry;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct Grid2dBuilder;

impl GeometryBuilder for Grid2dBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let data = ctx.source.grid_2d(id)?;
        let (ni, nj) = (data.ni, data.nj);
        if data.z_values.len() as u64 != ni * nj {
            return Err(Error::MissingData(format!(
                "2D grid {id} has {} Z values for {ni}x{nj} nodes",
                data.z_values.len()
            )));
        }

        // Lattice X/Y come from origin and offsets, Z from the per-node array.
        // NaN Z marks a hole and is passed through to the renderer.
        let mut xyz = Vec::with_capacity(data.z_values.len() * 3);
        for j in 0..nj {
            for i in 0..ni {
                let (fi, fj) = (i as f64, j as f64);
                xyz.push(data.origin[0] + fi * data.i_offset[0] + fj * data.j_offset[0]);
                xyz.push(data.origin[1] + fi * data.i_offset[1] + fj * data.j_offset[1]);
                xyz.push(data.z_values[(j * ni + i) as usize]);
            }
        }
        let points = PointBuffer::load(RawPoints::new(xyz, data.depth_oriented))?.into_points();

        let node = |i: u64, j: u64| j * ni + i;
        let mut cells = Vec::new();
        for j in 0..nj.saturating_sub(1) {
            for i in 0..ni.saturating_sub(1) {
                cells.push(Cell::new(
                    CellType::Quad,
                    [node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)],
                ));
            }
        }
        Ok(RealizedGeometry::new(points, cells))
    }
}
