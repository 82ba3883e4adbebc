// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sub-representation mapper
//!
//! A cell subset of a supporting grid. The subset's global cell indices are
//! translated into the supporting geometry's local (per-worker) range; cells
//! owned by other workers are skipped. Property values follow the
//! sub-representation's own element order, so the positions of the kept
//! indices are remembered for property loading.

use super::{BuildContext, GeometryBuilder};
use crate::property::{Attachment, IndexableElement, PropertyWindow, ValueSelection};
use crate::realized::{IndexWindow, RealizedGeometry};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct SubRepresentationBuilder {
    element_count: usize,
    kept: Vec<usize>,
}

impl SubRepresentationBuilder {
    /// Positions in the element list whose cells are realized locally
    pub fn kept_positions(&self) -> &[usize] {
        &self.kept
    }
}

impl GeometryBuilder for SubRepresentationBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let supporting = ctx.supporting.as_ref().ok_or_else(|| {
            Error::MissingData(format!("supporting geometry of sub-representation {id}"))
        })?;
        let data = ctx.source.sub_representation(id)?;
        if data.element != IndexableElement::Cells {
            return Err(Error::Unsupported(format!(
                "sub-representation {id} selects {:?}, only cell subsets are rendered",
                data.element
            )));
        }

        let total = supporting.cell_window.total;
        let mut kept = Vec::new();
        let mut local_cells = Vec::new();
        for (position, &global) in data.indices.iter().enumerate() {
            if global >= total {
                return Err(Error::OutOfRange(format!(
                    "sub-representation {id} selects cell {global} of {total}"
                )));
            }
            if let Some(local) = supporting.local_cell(global) {
                kept.push(position);
                local_cells.push(local);
            }
        }

        let geometry = supporting.subset(&local_cells);
        let point_window = IndexWindow::full(geometry.point_count() as u64);
        let cell_window = IndexWindow::full(data.indices.len() as u64);
        self.element_count = data.indices.len();
        self.kept = kept;
        Ok(geometry.with_windows(point_window, cell_window))
    }

    fn property_window(
        &self,
        property_id: &str,
        _geometry: &RealizedGeometry,
        attachment: Attachment,
    ) -> Result<PropertyWindow> {
        match attachment {
            Attachment::Cells => Ok(PropertyWindow {
                expected: self.element_count,
                selection: ValueSelection::Indices(self.kept.clone()),
            }),
            Attachment::Points => Err(Error::unsupported(
                property_id,
                "sub-representations only carry cell properties",
            )),
        }
    }

    fn reset(&mut self) {
        self.element_count = 0;
        self.kept.clear();
    }
}
