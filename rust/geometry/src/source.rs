// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data source seam
//!
//! The ingestion layer (EPC reader, ETP client) is outside this workspace. It
//! supplies raw buffers on demand through [`DataSource`]; mappers never touch
//! files or the network themselves.

use crate::points::RawPoints;
use crate::property::{IndexableElement, PropertyData};
use crate::{Error, Result};
use rustc_hash::FxHashMap;

/// IJK grid as a node lattice.
///
/// Node `(i, j, k)` is stored at `(k * (nj + 1) + j) * (ni + 1) + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct IjkGridData {
    pub ni: u64,
    pub nj: u64,
    pub nk: u64,
    pub points: RawPoints,
}

/// Face-based unstructured grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnstructuredGridData {
    pub points: RawPoints,
    /// Cyclic node list of every face
    pub faces: Vec<Vec<u64>>,
    /// Face indices of every cell
    pub cell_faces: Vec<Vec<u64>>,
    /// Per cell, per face: right-hand-rule normal points out of the cell
    pub cell_face_outward: Vec<Vec<bool>>,
}

/// Regular 2D lattice with per-node Z
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2dData {
    /// Node counts along I and J
    pub ni: u64,
    pub nj: u64,
    pub origin: [f64; 3],
    pub i_offset: [f64; 3],
    pub j_offset: [f64; 3],
    /// Z of node `(i, j)` at `j * ni + i`
    pub z_values: Vec<f64>,
    pub depth_oriented: bool,
}

/// One patch of a polyline set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylinePatch {
    pub points: RawPoints,
    /// Node count of each polyline, consecutive in `points`
    pub node_counts: Vec<u32>,
    /// Per polyline: last node connects back to the first
    pub closed: Vec<bool>,
}

/// One patch of a triangulated set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangulatedPatch {
    pub points: RawPoints,
    pub triangles: Vec<[u64; 3]>,
}

/// Wellbore trajectory stations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryData {
    pub points: RawPoints,
    /// Measured depth of each station, increasing
    pub measured_depths: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellboreMarkerData {
    pub measured_depth: f64,
}

/// Element subset of a supporting representation
#[derive(Debug, Clone, PartialEq)]
pub struct SubRepresentationData {
    pub element: IndexableElement,
    /// Global element indices in the supporting representation
    pub indices: Vec<u64>,
}

/// Ingestion collaborator supplying raw buffers by object id
pub trait DataSource: Send + Sync {
    fn ijk_grid(&self, id: &str) -> Result<IjkGridData>;

    fn unstructured_grid(&self, id: &str) -> Result<UnstructuredGridData>;

    fn grid_2d(&self, id: &str) -> Result<Grid2dData>;

    /// Number of patches of a polyline or triangulated set
    fn patch_count(&self, id: &str) -> Result<usize>;

    fn polyline_patch(&self, id: &str, patch: usize) -> Result<PolylinePatch>;

    fn triangulated_patch(&self, id: &str, patch: usize) -> Result<TriangulatedPatch>;

    fn wellbore_trajectory(&self, id: &str) -> Result<TrajectoryData>;

    fn wellbore_marker(&self, id: &str) -> Result<WellboreMarkerData>;

    fn sub_representation(&self, id: &str) -> Result<SubRepresentationData>;

    fn property(&self, id: &str) -> Result<PropertyData>;
}

/// In-memory source for callers that already hold their buffers
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    ijk_grids: FxHashMap<String, IjkGridData>,
    unstructured_grids: FxHashMap<String, UnstructuredGridData>,
    grids_2d: FxHashMap<String, Grid2dData>,
    polyline_patches: FxHashMap<String, Vec<PolylinePatch>>,
    triangulated_patches: FxHashMap<String, Vec<TriangulatedPatch>>,
    trajectories: FxHashMap<String, TrajectoryData>,
    markers: FxHashMap<String, WellboreMarkerData>,
    sub_representations: FxHashMap<String, SubRepresentationData>,
    properties: FxHashMap<String, PropertyData>,
}

fn missing<T>(what: &str, id: &str) -> Result<T> {
    Err(Error::MissingData(format!("no {what} data for {id}")))
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ijk_grid(&mut self, id: impl Into<String>, data: IjkGridData) -> &mut Self {
        self.ijk_grids.insert(id.into(), data);
        self
    }

    pub fn insert_unstructured_grid(
        &mut self,
        id: impl Into<String>,
        data: UnstructuredGridData,
    ) -> &mut Self {
        self.unstructured_grids.insert(id.into(), data);
        self
    }

    pub fn insert_grid_2d(&mut self, id: impl Into<String>, data: Grid2dData) -> &mut Self {
        self.grids_2d.insert(id.into(), data);
        self
    }

    pub fn insert_polyline_set(
        &mut self,
        id: impl Into<String>,
        patches: Vec<PolylinePatch>,
    ) -> &mut Self {
        self.polyline_patches.insert(id.into(), patches);
        self
    }

    pub fn insert_triangulated_set(
        &mut self,
        id: impl Into<String>,
        patches: Vec<TriangulatedPatch>,
    ) -> &mut Self {
        self.triangulated_patches.insert(id.into(), patches);
        self
    }

    pub fn insert_trajectory(&mut self, id: impl Into<String>, data: TrajectoryData) -> &mut Self {
        self.trajectories.insert(id.into(), data);
        self
    }

    pub fn insert_marker(&mut self, id: impl Into<String>, data: WellboreMarkerData) -> &mut Self {
        self.markers.insert(id.into(), data);
        self
    }

    pub fn insert_sub_representation(
        &mut self,
        id: impl Into<String>,
        data: SubRepresentationData,
    ) -> &mut Self {
        self.sub_representations.insert(id.into(), data);
        self
    }

    pub fn insert_property(&mut self, data: PropertyData) -> &mut Self {
        self.properties.insert(data.id.clone(), data);
        self
    }
}

impl DataSource for MemorySource {
    fn ijk_grid(&self, id: &str) -> Result<IjkGridData> {
        match self.ijk_grids.get(id) {
            Some(data) => Ok(data.clone()),
            None => missing("IJK grid", id),
        }
    }

    fn unstructured_grid(&self, id: &str) -> Result<UnstructuredGridData> {
        match self.unstructured_grids.get(id) {
            Some(data) => Ok(data.clone()),
            None => missing("unstructured grid", id),
        }
    }

    fn grid_2d(&self, id: &str) -> Result<Grid2dData> {
        match self.grids_2d.get(id) {
            Some(data) => Ok(data.clone()),
            None => missing("2D grid", id),
        }
    }

    fn patch_count(&self, id: &str) -> Result<usize> {
        if let Some(patches) = self.polyline_patches.get(id) {
            return Ok(patches.len());
        }
        match self.triangulated_patches.get(id) {
            Some(patches) => Ok(patches.len()),
            None => missing("patch", id),
        }
    }

    fn polyline_patch(&self, id: &str, patch: usize) -> Result<PolylinePatch> {
        match self.polyline_patches.get(id).and_then(|p| p.get(patch)) {
            Some(data) => Ok(data.clone()),
            None => missing("polyline patch", &format!("{id} patch {patch}")),
        }
    }

    fn triangulated_patch(&self, id: &str, patch: usize) -> Result<TriangulatedPatch> {
        match self.triangulated_patches.get(id).and_then(|p| p.get(patch)) {
            Some(data) => Ok(data.clone()),
            None => missing("triangulated patch", &format!("{id} patch {patch}")),
        }
    }

    fn wellbore_trajectory(&self, id: &str) -> Result<TrajectoryData> {
        match self.trajectories.get(id) {
            Some(data) => Ok(data.clone()),
            None => missing("wellbore trajectory", id),
        }
    }

    fn wellbore_marker(&self, id: &str) -> Result<WellboreMarkerData> {
        match self.markers.get(id) {
            Some(data) => Ok(*data),
            None => missing("wellbore marker", id),
        }
    }

    fn sub_representation(&self, id: &str) -> Result<SubRepresentationData> {
        match self.sub_representations.get(id) {
            Some(data) => Ok(data.clone()),
            None => missing("sub-representation", id),
        }
    }

    fn property(&self, id: &str) -> Result<PropertyData> {
        match self.properties.get(id) {
            Some(data) => Ok(data.clone()),
            None => missing("property", id),
        }
    }
}
