// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Documents and their ingestion manifests

use crate::controller::{AttachmentController, Proxy};
use crate::diagnostics::Diagnostic;
use resqml_lite_core::{ObjectKind, ObjectTreeIndex, TimeStep};
use resqml_lite_geometry::DataSource;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::sync::Arc;

new_key_type! {
    /// Stable handle of a document within a [`DocumentSet`](crate::DocumentSet)
    pub struct DocumentKey;
}

/// One discovered object, as reported by the ingestion collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub parent_id: String,
    pub display_name: String,
    pub kind: ObjectKind,
    /// Kind the target claims to have, for partial references
    #[serde(default)]
    pub referenced_kind: Option<ObjectKind>,
}

impl ManifestEntry {
    pub fn new(id: &str, parent_id: &str, display_name: &str, kind: ObjectKind) -> Self {
        Self {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            display_name: display_name.to_string(),
            kind,
            referenced_kind: None,
        }
    }

    pub fn partial_reference(
        id: &str,
        parent_id: &str,
        display_name: &str,
        referenced_kind: ObjectKind,
    ) -> Self {
        Self {
            referenced_kind: Some(referenced_kind),
            ..Self::new(id, parent_id, display_name, ObjectKind::PartialReference)
        }
    }
}

/// A property found in a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesLink {
    pub series_id: String,
    pub property_id: String,
    /// Time indices the property reports; exactly one is supported
    pub steps: Vec<TimeStep>,
}

/// Everything discovered in one document, parents before children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentManifest {
    pub id: String,
    pub name: String,
    pub objects: Vec<ManifestEntry>,
    #[serde(default)]
    pub time_series: Vec<TimeSeriesLink>,
}

impl DocumentManifest {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn object(mut self, entry: ManifestEntry) -> Self {
        self.objects.push(entry);
        self
    }

    pub fn time_series(mut self, link: TimeSeriesLink) -> Self {
        self.time_series.push(link);
        self
    }
}

/// A loaded document: its records, its data source and its attachment state
pub struct Document {
    pub(crate) index: ObjectTreeIndex,
    pub(crate) source: Arc<dyn DataSource>,
    pub(crate) controller: AttachmentController,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Classify every manifest entry and apply time-series links
    pub(crate) fn ingest(manifest: &DocumentManifest, source: Arc<dyn DataSource>) -> Self {
        let mut document = Self {
            index: ObjectTreeIndex::new(&manifest.id, &manifest.name),
            source,
            controller: AttachmentController::new(),
            diagnostics: Vec::new(),
        };

        for entry in &manifest.objects {
            document.register(entry);
        }

        for link in &manifest.time_series {
            match document
                .index
                .promote_to_time_series(&link.property_id, &link.series_id, &link.steps)
            {
                Ok(_) => {}
                Err(e) => document.diagnostics.push(Diagnostic::warning(
                    &manifest.id,
                    &link.property_id,
                    e.to_string(),
                )),
            }
        }

        tracing::info!(
            document = %manifest.id,
            objects = document.index.len(),
            diagnostics = document.diagnostics.len(),
            "Ingested document"
        );
        document
    }

    pub(crate) fn register(&mut self, entry: &ManifestEntry) {
        if entry.kind != ObjectKind::PartialReference {
            self.index
                .classify(&entry.id, &entry.parent_id, &entry.display_name, entry.kind);
            return;
        }

        match entry.referenced_kind {
            Some(referenced_kind) => {
                self.index.classify_partial_reference(
                    &entry.id,
                    &entry.parent_id,
                    &entry.display_name,
                    referenced_kind,
                );
                self.controller
                    .insert_proxy(Proxy::new(&entry.id, referenced_kind));
            }
            None => {
                tracing::warn!(id = %entry.id, "Partial reference without a declared kind");
                self.index.classify(
                    &entry.id,
                    &entry.parent_id,
                    &entry.display_name,
                    ObjectKind::PartialReference,
                );
                self.index.mark_unusable(&entry.id);
                self.diagnostics.push(Diagnostic::error(
                    self.index.document_id(),
                    Some(&entry.id),
                    "partial reference does not declare the kind of its target",
                ));
            }
        }
    }

    pub fn id(&self) -> &str {
        self.index.document_id()
    }

    pub fn index(&self) -> &ObjectTreeIndex {
        &self.index
    }

    pub fn controller(&self) -> &AttachmentController {
        &self.controller
    }

    /// Top-level ids in block order
    pub fn attached_ids(&self) -> &[String] {
        self.controller.attached_ids()
    }

    /// Diagnostics accumulated since the document was added
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
