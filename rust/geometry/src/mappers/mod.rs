// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Representation mappers
//!
//! One mapper per geometry-bearing object. A mapper owns at most one realized
//! geometry and the property arrays loaded onto it. Kind-specific behavior is
//! limited to geometry construction and property attachment rules, captured by
//! [`GeometryBuilder`]; [`Mapper`] wraps a builder with the shared lifecycle.
//! Multi-patch sets are the one exception and implement
//! [`RepresentationMapper`] directly through [`PatchSetMapper`].

mod grid_2d;
mod ijk_grid;
mod partial;
mod patch_set;
mod polyline;
mod sub_representation;
mod trajectory;
mod triangulated;
mod unstructured;


pub use grid_2d::Grid2dBuilder;
pub use ijk_grid::IjkGridBuilder;
pub use partial::PartialReferenceProxy;
pub use patch_set::PatchSetMapper;
pub use polyline::PolylineBuilder;
pub use sub_representation::SubRepresentationBuilder;
pub use trajectory::TrajectoryBuilder;
pub use triangulated::TriangulatedBuilder;
pub use unstructured::UnstructuredGridBuilder;

use crate::partition::Partition;
use crate::property::{Attachment, PropertyArray, PropertyData, PropertyWindow};
use crate::realized::RealizedGeometry;
use crate::source::{DataSource, WellboreMarkerData};
use crate::{Error, Result};
use resqml_lite_core::ObjectKind;
use std::sync::Arc;

/// Inputs available while realizing geometry
pub struct BuildContext<'a> {
    pub source: &'a dyn DataSource,
    pub partition: Partition,
    /// Geometry of the supporting representation, for sub-representations
    pub supporting: Option<Arc<RealizedGeometry>>,
}

impl<'a> BuildContext<'a> {
    pub fn new(source: &'a dyn DataSource, partition: Partition) -> Self {
        Self {
            source,
            partition,
            supporting: None,
        }
    }

    pub fn with_supporting(mut self, supporting: Arc<RealizedGeometry>) -> Self {
        self.supporting = Some(supporting);
        self
    }
}

/// One renderable block of a mapper
#[derive(Debug, Clone)]
pub struct GeometryPart {
    pub name: String,
    pub geometry: Arc<RealizedGeometry>,
    pub properties: Vec<Arc<PropertyArray>>,
}

/// Kind-specific geometry construction
pub trait GeometryBuilder: Send {
    /// Realize geometry for object `id`
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry>;

    /// Raw-value layout of a property attached to `geometry`.
    ///
    /// Defaults to the geometry's point or cell window, which keeps property
    /// slicing in step with the partition used at build time.
    fn property_window(
        &self,
        property_id: &str,
        geometry: &RealizedGeometry,
        attachment: Attachment,
    ) -> Result<PropertyWindow> {
        let _ = property_id;
        let (window, local) = match attachment {
            Attachment::Points => (geometry.point_window, geometry.point_count()),
            Attachment::Cells => (geometry.cell_window, geometry.cell_count()),
        };
        Ok(PropertyWindow::contiguous(
            window.total as usize,
            window.offset as usize,
            local,
        ))
    }

    fn attach_marker(
        &mut self,
        owner_id: &str,
        geometry: &RealizedGeometry,
        marker_id: &str,
        marker: &WellboreMarkerData,
    ) -> Result<()> {
        let _ = (geometry, marker);
        Err(Error::Unsupported(format!(
            "{owner_id} cannot hold wellbore marker {marker_id}"
        )))
    }

    fn detach_marker(&mut self, marker_id: &str) -> bool {
        let _ = marker_id;
        false
    }

    fn marker_ids(&self) -> Vec<String> {
        Vec::new()
    }

    /// Blocks rendered next to the main geometry
    fn extra_parts(&self, display_name: &str) -> Vec<GeometryPart> {
        let _ = display_name;
        Vec::new()
    }

    /// Drop builder-held derived state
    fn reset(&mut self) {}
}

/// Capability interface shared by every mapper
pub trait RepresentationMapper: Send {
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    fn is_realized(&self) -> bool;

    /// Realized geometry usable as a sub-representation support
    fn geometry(&self) -> Option<Arc<RealizedGeometry>>;

    /// Realize geometry unless already realized; `true` when a build happened
    fn ensure_geometry(&mut self, ctx: &BuildContext<'_>) -> Result<bool>;

    /// Build geometry without keeping it
    fn realize_detached(&mut self, ctx: &BuildContext<'_>) -> Result<RealizedGeometry>;

    fn property_window(&self, property_id: &str, attachment: Attachment) -> Result<PropertyWindow>;

    fn load_property(&mut self, data: &PropertyData) -> Result<()>;

    fn remove_property(&mut self, property_id: &str) -> bool;

    fn has_property(&self, property_id: &str) -> bool;

    fn property_ids(&self) -> Vec<String>;

    /// Destroy realized geometry and every loaded property
    fn remove_self(&mut self);

    fn parts(&self) -> Vec<GeometryPart>;

    fn attach_marker(&mut self, marker_id: &str, marker: &WellboreMarkerData) -> Result<()> {
        let _ = marker;
        Err(Error::Unsupported(format!(
            "{} cannot hold wellbore marker {marker_id}",
            self.id()
        )))
    }

    fn detach_marker(&mut self, marker_id: &str) -> bool {
        let _ = marker_id;
        false
    }

    /// Markers currently placed on this mapper
    fn marker_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Single-geometry mapper driven by a [`GeometryBuilder`]
pub struct Mapper<B> {
    id: String,
    display_name: String,
    geometry: Option<Arc<RealizedGeometry>>,
    properties: Vec<Arc<PropertyArray>>,
    builder: B,
}

impl<B: GeometryBuilder> Mapper<B> {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, builder: B) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            geometry: None,
            properties: Vec::new(),
            builder,
        }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn properties(&self) -> &[Arc<PropertyArray>] {
        &self.properties
    }

    fn realized(&self) -> Result<&Arc<RealizedGeometry>> {
        self.geometry
            .as_ref()
            .ok_or_else(|| Error::GeometryNotRealized(self.id.clone()))
    }
}

impl<B: GeometryBuilder> RepresentationMapper for Mapper<B> {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_realized(&self) -> bool {
        self.geometry.is_some()
    }

    fn geometry(&self) -> Option<Arc<RealizedGeometry>> {
        self.geometry.clone()
    }

    fn ensure_geometry(&mut self, ctx: &BuildContext<'_>) -> Result<bool> {
        if self.geometry.is_some() {
            return Ok(false);
        }
        let geometry = self.builder.build(&self.id, ctx)?;
        tracing::debug!(
            id = %self.id,
            instance = geometry.instance().get(),
            points = geometry.point_count(),
            cells = geometry.cell_count(),
            "Realized geometry"
        );
        self.geometry = Some(Arc::new(geometry));
        Ok(true)
    }

    fn realize_detached(&mut self, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        self.builder.build(&self.id, ctx)
    }

    fn property_window(&self, property_id: &str, attachment: Attachment) -> Result<PropertyWindow> {
        self.builder
            .property_window(property_id, self.realized()?, attachment)
    }

    fn load_property(&mut self, data: &PropertyData) -> Result<()> {
        let attachment = data.attachment()?;
        let window = self.property_window(&data.id, attachment)?;
        let array = data.extract(attachment, &window)?;
        tracing::debug!(
            id = %self.id,
            property = %data.id,
            values = array.values.len(),
            ?attachment,
            "Loaded property"
        );
        self.properties.retain(|p| p.id != data.id);
        self.properties.push(Arc::new(array));
        Ok(())
    }

    fn remove_property(&mut self, property_id: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p.id != property_id);
        before != self.properties.len()
    }

    fn has_property(&self, property_id: &str) -> bool {
        self.properties.iter().any(|p| p.id == property_id)
    }

    fn property_ids(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.id.clone()).collect()
    }

    fn remove_self(&mut self) {
        if self.geometry.take().is_some() {
            tracing::debug!(id = %self.id, properties = self.properties.len(), "Destroyed geometry");
        }
        self.properties.clear();
        self.builder.reset();
    }

    fn parts(&self) -> Vec<GeometryPart> {
        let Some(geometry) = &self.geometry else {
            return Vec::new();
        };
        let mut parts = vec![GeometryPart {
            name: self.display_name.clone(),
            geometry: Arc::clone(geometry),
            properties: self.properties.clone(),
        }];
        parts.extend(self.builder.extra_parts(&self.display_name));
        parts
    }

    fn attach_marker(&mut self, marker_id: &str, marker: &WellboreMarkerData) -> Result<()> {
        let geometry = Arc::clone(self.realized()?);
        self.builder
            .attach_marker(&self.id, &geometry, marker_id, marker)
    }

    fn detach_marker(&mut self, marker_id: &str) -> bool {
        self.builder.detach_marker(marker_id)
    }

    fn marker_ids(&self) -> Vec<String> {
        self.builder.marker_ids()
    }
}

/// Create the mapper for a geometry-bearing object.
///
/// Polyline and triangulated sets with more than one patch get a
/// [`PatchSetMapper`]. Kinds that are routed to another object's mapper
/// (frames, markers, properties) or carry no geometry are rejected.
pub fn create_mapper(
    kind: ObjectKind,
    id: &str,
    display_name: &str,
    source: &dyn DataSource,
) -> Result<Box<dyn RepresentationMapper>> {
    let mapper: Box<dyn RepresentationMapper> = match kind {
        ObjectKind::IjkGrid => Box::new(Mapper::new(id, display_name, IjkGridBuilder)),
        ObjectKind::UnstructuredGrid => {
            Box::new(Mapper::new(id, display_name, UnstructuredGridBuilder))
        }
        ObjectKind::Grid2d => Box::new(Mapper::new(id, display_name, Grid2dBuilder)),
        ObjectKind::Polyline => Box::new(Mapper::new(id, display_name, PolylineBuilder::new(0))),
        ObjectKind::PolylineSet => match source.patch_count(id)? {
            0 => return Err(Error::MissingData(format!("{id} has no patches"))),
            1 => Box::new(Mapper::new(id, display_name, PolylineBuilder::new(0))),
            count => Box::new(PatchSetMapper::polylines(id, display_name, count)),
        },
        ObjectKind::TriangulatedSet => match source.patch_count(id)? {
            0 => return Err(Error::MissingData(format!("{id} has no patches"))),
            1 => Box::new(Mapper::new(id, display_name, TriangulatedBuilder::new(0))),
            count => Box::new(PatchSetMapper::triangulated(id, display_name, count)),
        },
        ObjectKind::WellboreTrajectory => {
            Box::new(Mapper::new(id, display_name, TrajectoryBuilder::default()))
        }
        ObjectKind::SubRepresentation => Box::new(Mapper::new(
            id,
            display_name,
            SubRepresentationBuilder::default(),
        )),
        other => {
            return Err(Error::Unsupported(format!(
                "{id} of kind {other} has no mapper of its own"
            )))
        }
    };
    Ok(mapper)
}
