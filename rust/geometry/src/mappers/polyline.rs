// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyline mapper - one patch of a polyline set

use super::{BuildContext, GeometryBuilder};
use crate::cell::{Cell, CellType};
use crate::points::PointBuffer;
use crate::realized::RealizedGeometry;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct PolylineBuilder {
    patch: usize,
}

impl PolylineBuilder {
    pub fn new(patch: usize) -> Self {
        Self { patch }
    }
}

impl GeometryBuilder for PolylineBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let data = ctx.source.polyline_patch(id, self.patch)?;
        let declared: u64 = data.node_counts.iter().map(|&n| n as u64).sum();
        if declared != data.points.len() as u64 {
            return Err(Error::MissingData(format!(
                "polyline patch {} of {id} declares {declared} nodes but holds {}",
                self.patch,
                data.points.len()
            )));
        }

        let mut cells = Vec::with_capacity(data.node_counts.len());
        let mut first = 0u64;
        for (line, &count) in data.node_counts.iter().enumerate() {
            let count = count as u64;
            let closed = data.closed.get(line).copied().unwrap_or(false);
            let mut nodes: Vec<u64> = (first..first + count).collect();
            if closed && count > 2 {
                nodes.push(first);
            }
            cells.push(Cell::new(CellType::PolyLine, nodes));
            first += count;
        }

        let points = PointBuffer::load(data.points)?.into_points();
        Ok(RealizedGeometry::new(points, cells))
    }
}
