// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RESQML-Lite Core
//!
//! Classification of RESQML data objects into a parent/child tree.
//!
//! ## Overview
//!
//! - **Taxonomy**: [`ObjectKind`] enumerates the object families the viewer
//!   knows how to place (grids, surfaces, wells, properties, references)
//! - **Records**: one [`ObjectRecord`] per identifier, carrying its declared
//!   parent and the parent's kind frozen at creation time
//! - **Tree index**: [`ObjectTreeIndex`] registers records in discovery order
//!   and answers lookups for routing
//!
//! ## Quick Start
//!
//! ```rust
//! use resqml_lite_core::{ObjectKind, ObjectTreeIndex};
//!
//! let mut index = ObjectTreeIndex::new("doc-uuid", "model.epc");
//! index.classify("horizon-uuid", "doc-uuid", "Top", ObjectKind::Interpretation2d);
//! let surface = index.classify("surface-uuid", "horizon-uuid", "Top", ObjectKind::TriangulatedSet);
//! assert_eq!(surface.parent_kind, ObjectKind::Interpretation2d);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for records and kinds

pub mod error;
pub mod record;
pub mod taxonomy;
pub mod tree_index;

pub use error::{Error, Result};
pub use record::{ObjectRecord, TimeStep, NO_TIMESTAMP, NO_TIME_INDEX};
pub use taxonomy::ObjectKind;
pub use tree_index::ObjectTreeIndex;
