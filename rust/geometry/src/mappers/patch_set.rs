// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multi-patch polyline and triangulated sets
//!
//! Each patch gets its own mapper, named sequentially. Property values of the
//! set are stored patch after patch, so a loaded property is split across the
//! patch mappers in order.

use super::{
    BuildContext, GeometryPart, Mapper, PolylineBuilder, RepresentationMapper,
    TriangulatedBuilder,
};
use crate::property::{Attachment, PropertyData, PropertyWindow};
use crate::realized::RealizedGeometry;
use crate::{Error, Result};
use std::sync::Arc;

pub struct PatchSetMapper {
    id: String,
    display_name: String,
    patches: Vec<Box<dyn RepresentationMapper>>,
}

fn patch_name(index: usize) -> String {
    format!("Patch {index}")
}

impl PatchSetMapper {
    pub fn polylines(id: &str, display_name: &str, patch_count: usize) -> Self {
        let patches = (0..patch_count)
            .map(|i| {
                Box::new(Mapper::new(id, patch_name(i), PolylineBuilder::new(i)))
                    as Box<dyn RepresentationMapper>
            })
            .collect();
        Self::with_patches(id, display_name, patches)
    }

    pub fn triangulated(id: &str, display_name: &str, patch_count: usize) -> Self {
        let patches = (0..patch_count)
            .map(|i| {
                Box::new(Mapper::new(id, patch_name(i), TriangulatedBuilder::new(i)))
                    as Box<dyn RepresentationMapper>
            })
            .collect();
        Self::with_patches(id, display_name, patches)
    }

    fn with_patches(
        id: &str,
        display_name: &str,
        patches: Vec<Box<dyn RepresentationMapper>>,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            patches,
        }
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    fn windows(&self, property_id: &str, attachment: Attachment) -> Result<Vec<PropertyWindow>> {
        self.patches
            .iter()
            .map(|p| p.property_window(property_id, attachment))
            .collect()
    }
}

impl RepresentationMapper for PatchSetMapper {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_realized(&self) -> bool {
        !self.patches.is_empty() && self.patches.iter().all(|p| p.is_realized())
    }

    fn geometry(&self) -> Option<Arc<RealizedGeometry>> {
        None
    }

    fn ensure_geometry(&mut self, ctx: &BuildContext<'_>) -> Result<bool> {
        let mut built = false;
        for index in 0..self.patches.len() {
            match self.patches[index].ensure_geometry(ctx) {
                Ok(b) => built |= b,
                Err(e) => {
                    // Never leave a half-realized set behind
                    for patch in &mut self.patches {
                        patch.remove_self();
                    }
                    return Err(e);
                }
            }
        }
        Ok(built)
    }

    fn realize_detached(&mut self, _ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        Err(Error::Unsupported(format!(
            "{} has {} patches and no single geometry",
            self.id,
            self.patches.len()
        )))
    }

    fn property_window(&self, property_id: &str, attachment: Attachment) -> Result<PropertyWindow> {
        let expected = self
            .windows(property_id, attachment)?
            .iter()
            .map(|w| w.expected)
            .sum();
        Ok(PropertyWindow::contiguous(expected, 0, expected))
    }

    fn load_property(&mut self, data: &PropertyData) -> Result<()> {
        let attachment = data.attachment()?;
        let windows = self.windows(&data.id, attachment)?;
        let expected: usize = windows.iter().map(|w| w.expected).sum();
        if data.values.len() != expected {
            return Err(Error::PropertySizeMismatch {
                id: data.id.clone(),
                expected,
                actual: data.values.len(),
            });
        }

        let mut offset = 0;
        for (index, window) in windows.iter().enumerate() {
            let slice = data.slice(offset..offset + window.expected);
            if let Err(e) = self.patches[index].load_property(&slice) {
                self.remove_property(&data.id);
                return Err(e);
            }
            offset += window.expected;
        }
        Ok(())
    }

    fn remove_property(&mut self, property_id: &str) -> bool {
        let mut removed = false;
        for patch in &mut self.patches {
            removed |= patch.remove_property(property_id);
        }
        removed
    }

    fn has_property(&self, property_id: &str) -> bool {
        self.patches.iter().any(|p| p.has_property(property_id))
    }

    fn property_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.patches.iter().flat_map(|p| p.property_ids()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    fn remove_self(&mut self) {
        for patch in &mut self.patches {
            patch.remove_self();
        }
    }

    fn parts(&self) -> Vec<GeometryPart> {
        self.patches.iter().flat_map(|p| p.parts()).collect()
    }
}
