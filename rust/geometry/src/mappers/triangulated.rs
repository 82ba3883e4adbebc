// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangulated surface mapper - one patch of a triangulated set

use super::{BuildContext, GeometryBuilder};
use crate::cell::{Cell, CellType};
use crate::points::PointBuffer;
use crate::realized::RealizedGeometry;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct TriangulatedBuilder {
    patch: usize,
}

impl TriangulatedBuilder {
    pub fn new(patch: usize) -> Self {
        Self { patch }
    }
}

impl GeometryBuilder for TriangulatedBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let data = ctx.source.triangulated_patch(id, self.patch)?;
        let point_count = data.points.len() as u64;
        if let Some(bad) = data
            .triangles
            .iter()
            .position(|t| t.iter().any(|&n| n >= point_count))
        {
            return Err(Error::OutOfRange(format!(
                "triangle {bad} of {id} patch {} references a node beyond {point_count}",
                self.patch
            )));
        }

        let cells = data
            .triangles
            .iter()
            .map(|t| Cell::new(CellType::Triangle, *t))
            .collect();
        let points = PointBuffer::load(data.points)?.into_points();
        Ok(RealizedGeometry::new(points, cells))
    }
}
