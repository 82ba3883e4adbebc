// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composite snapshots handed to the rendering collaborator
//!
//! Block indices are reassigned from the full attached list on every snapshot;
//! there is no partial update.

use resqml_lite_geometry::GeometryPart;

/// One top-level block
#[derive(Debug, Clone)]
pub struct CompositeBlock {
    /// Position in the document's attached list
    pub index: usize,
    pub id: String,
    pub display_name: String,
    pub parts: Vec<GeometryPart>,
}

impl CompositeBlock {
    pub fn cell_count(&self) -> usize {
        self.parts.iter().map(|p| p.geometry.cell_count()).sum()
    }
}

/// Blocks of one document, in block-index order
#[derive(Debug, Clone)]
pub struct DocumentComposite {
    pub document_id: String,
    pub blocks: Vec<CompositeBlock>,
}

impl DocumentComposite {
    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.id.as_str()).collect()
    }
}
