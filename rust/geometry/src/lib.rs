// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RESQML-Lite Geometry
//!
//! Turns raw RESQML buffers into renderable point/cell geometry:
//! polyhedral cell canonicalization, depth-aware point loading, property
//! attachment and the per-kind representation mappers.
//!
//! ```
//! use resqml_lite_geometry::{canonicalize_cell, CellType};
//!
//! let faces = [
//!     vec![0, 3, 2, 1],
//!     vec![4, 5, 6, 7],
//!     vec![0, 1, 5, 4],
//!     vec![1, 2, 6, 5],
//!     vec![2, 3, 7, 6],
//!     vec![3, 0, 4, 7],
//! ];
//! let cell = canonicalize_cell(0, &faces, &[true; 6]).unwrap();
//! assert_eq!(cell.cell_type(), CellType::Hexahedron);
//! ```

pub mod canonical;
pub mod cell;
pub mod error;
pub mod mappers;
pub mod partition;
pub mod points;
pub mod property;
pub mod realized;
pub mod source;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use canonical::{canonicalize_cell, CanonicalCell};
pub use cell::{Cell, CellNodes, CellType, FaceNodes};
pub use error::{Error, Result};
pub use mappers::{
    create_mapper, BuildContext, GeometryBuilder, GeometryPart, Mapper, PartialReferenceProxy,
    PatchSetMapper, RepresentationMapper,
};
pub use partition::Partition;
pub use points::{PointBuffer, RawPoints};
pub use property::{
    Attachment, IndexableElement, PropertyArray, PropertyData, PropertyKind, PropertyValues,
    PropertyWindow, ValueSelection,
};
pub use realized::{GeometryInstance, IndexWindow, RealizedGeometry};
pub use source::{
    DataSource, Grid2dData, IjkGridData, MemorySource, PolylinePatch, SubRepresentationData,
    TrajectoryData, TriangulatedPatch, UnstructuredGridData, WellboreMarkerData,
};
