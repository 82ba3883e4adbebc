// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unstructured grid mapper
//!
//! Every cell in the worker's range goes through the canonicalizer. Cells are
//! independent, so they are canonicalized in parallel; the lowest-indexed
//! malformed cell aborts the whole build. All points are kept since
//! face-based cells may reference any of them.

use super::{BuildContext, GeometryBuilder};
use crate::canonical::canonicalize_cell;
use crate::cell::Cell;
use crate::points::PointBuffer;
use crate::realized::{IndexWindow, RealizedGeometry};
use crate::source::UnstructuredGridData;
use crate::{Error, Result};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnstructuredGridBuilder;

fn build_cell(data: &UnstructuredGridData, cell: u64) -> Result<Cell> {
    let index = cell as usize;
    let face_ids = &data.cell_faces[index];
    let outward = data
        .cell_face_outward
        .get(index)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let faces = face_ids
        .iter()
        .map(|&f| {
            data.faces
                .get(f as usize)
                .map(Vec::as_slice)
                .ok_or_else(|| Error::malformed(cell, format!("face {f} does not exist")))
        })
        .collect::<Result<Vec<&[u64]>>>()?;

    let point_count = data.points.len() as u64;
    if let Some(node) = faces.iter().flat_map(|f| f.iter()).find(|&&n| n >= point_count) {
        return Err(Error::malformed(
            cell,
            format!("node {node} exceeds {point_count} points"),
        ));
    }

    Ok(canonicalize_cell(cell, &faces, outward)?.into_cell())
}

impl GeometryBuilder for UnstructuredGridBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let data = ctx.source.unstructured_grid(id)?;
        let total = data.cell_faces.len() as u64;
        let range = ctx.partition.range(total);

        // Indexed collect keeps cell order, so the lowest malformed cell wins
        let built: Vec<Result<Cell>> = (range.start as usize..range.end as usize)
            .into_par_iter()
            .map(|cell| build_cell(&data, cell as u64))
            .collect();
        let cells = built
            .into_iter()
            .collect::<Result<Vec<Cell>>>()
            .inspect_err(|e| tracing::warn!(id = %id, error = %e, "Unstructured grid build aborted"))?;

        let points = PointBuffer::load(data.points)?.into_points();
        let point_window = IndexWindow::full(points.len() as u64);
        Ok(RealizedGeometry::new(points, cells).with_windows(
            point_window,
            IndexWindow {
                offset: range.start,
                total,
            },
        ))
    }
}
