// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RESQML-Lite Processing
//!
//! Visualization state for one or more loaded RESQML documents.
//!
//! ## Overview
//!
//! - **Routing**: [`resolve_owning_mapper`] sends frames, markers and
//!   properties to the representation that renders them
//! - **Attachment**: each document owns an [`AttachmentController`], a mapper
//!   arena plus the ordered list of top-level blocks shown to the renderer
//! - **Documents**: [`DocumentSet`] ingests [`DocumentManifest`]s, resolves
//!   partial references across documents and drives visualize/unvisualize
//!
//! ## Quick Start
//!
//! ```rust
//! use resqml_lite_core::ObjectKind;
//! use resqml_lite_geometry::{IjkGridData, MemorySource, RawPoints};
//! use resqml_lite_processing::{DocumentManifest, DocumentSet, ManifestEntry, ProcessingConfig};
//! use std::sync::Arc;
//!
//! let mut xyz = Vec::new();
//! for k in 0..2 {
//!     for j in 0..2 {
//!         for i in 0..2 {
//!             xyz.extend([i as f64, j as f64, k as f64]);
//!         }
//!     }
//! }
//! let mut source = MemorySource::new();
//! source.insert_ijk_grid(
//!     "grid",
//!     IjkGridData { ni: 1, nj: 1, nk: 1, points: RawPoints::new(xyz, false) },
//! );
//!
//! let manifest = DocumentManifest::new("doc", "model.epc")
//!     .object(ManifestEntry::new("grid", "doc", "Grid", ObjectKind::IjkGrid));
//!
//! let mut set = DocumentSet::new(ProcessingConfig::single()).unwrap();
//! set.add_document(&manifest, Arc::new(source));
//! assert_eq!(set.visualize("grid"), "");
//! assert_eq!(set.composite()[0].block_ids(), vec!["grid"]);
//! ```
//!
//! ## Configuration
//!
//! [`ProcessingConfig::from_env`] reads `RESQML_WORKER_INDEX` and
//! `RESQML_WORKER_COUNT`.

pub mod composite;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod document;
pub mod document_set;
pub mod error;
pub mod routing;

pub use composite::{CompositeBlock, DocumentComposite};
pub use config::ProcessingConfig;
pub use controller::{AttachmentController, MapperKey, Proxy};
pub use diagnostics::{Diagnostic, Severity};
pub use document::{Document, DocumentKey, DocumentManifest, ManifestEntry, TimeSeriesLink};
pub use document_set::{AddDocumentReport, DocumentSet};
pub use error::{Error, Result};
pub use routing::{resolve_owning_mapper, Route, RouteTarget};
