// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RESQML Object Taxonomy
//!
//! Fast kind checking using an enum instead of string comparison.

use std::fmt;

/// Classification of a RESQML data object for tree building and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    // Document root
    Document,

    // Interpretations
    Interpretation1d,
    Interpretation2d,
    Interpretation3d,

    // Grids
    IjkGrid,
    UnstructuredGrid,
    Grid2d,

    // Surfaces and lines
    Polyline,
    PolylineSet,
    TriangulatedSet,

    // Wells
    WellboreTrajectory,
    WellboreFrame,
    WellboreMarkerFrame,
    WellboreMarker,

    // Subsets and references
    SubRepresentation,
    PartialReference,

    // Properties
    Property,
    TimeSeriesProperty,

    // Fallback
    Unknown,
}

impl ObjectKind {
    /// Parse a kind from a RESQML data-object type name.
    ///
    /// Accepts qualified (`resqml20.obj_IjkGridRepresentation`), prefixed
    /// (`obj_IjkGridRepresentation`) and bare (`IjkGridRepresentation`) forms.
    pub fn from_resqml_type(name: &str) -> Self {
        let name = name.rsplit('.').next().unwrap_or(name);
        let name = name.strip_prefix("obj_").unwrap_or(name);
        match name {
            "IjkGridRepresentation" => Self::IjkGrid,
            "UnstructuredGridRepresentation" => Self::UnstructuredGrid,
            "Grid2dRepresentation" => Self::Grid2d,

            "PolylineRepresentation" => Self::Polyline,
            "PolylineSetRepresentation" => Self::PolylineSet,
            "TriangulatedSetRepresentation" => Self::TriangulatedSet,

            "WellboreTrajectoryRepresentation" => Self::WellboreTrajectory,
            "WellboreFrameRepresentation" => Self::WellboreFrame,
            "WellboreMarkerFrameRepresentation" => Self::WellboreMarkerFrame,
            "WellboreMarker" => Self::WellboreMarker,

            "SubRepresentation" => Self::SubRepresentation,

            "ContinuousProperty" | "DiscreteProperty" | "CategoricalProperty" => Self::Property,

            "WellboreInterpretation" => Self::Interpretation1d,
            "HorizonInterpretation" | "FaultInterpretation" | "GeobodyBoundaryInterpretation" => {
                Self::Interpretation2d
            }
            "EarthModelInterpretation"
            | "StructuralOrganizationInterpretation"
            | "GeobodyInterpretation"
            | "StratigraphicUnitInterpretation" => Self::Interpretation3d,

            _ => Self::Unknown,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "DOCUMENT",
            Self::Interpretation1d => "INTERPRETATION_1D",
            Self::Interpretation2d => "INTERPRETATION_2D",
            Self::Interpretation3d => "INTERPRETATION_3D",
            Self::IjkGrid => "IJK_GRID",
            Self::UnstructuredGrid => "UNSTRUCTURED_GRID",
            Self::Grid2d => "GRID_2D",
            Self::Polyline => "POLYLINE",
            Self::PolylineSet => "POLYLINE_SET",
            Self::TriangulatedSet => "TRIANGULATED_SET",
            Self::WellboreTrajectory => "WELL_TRAJECTORY",
            Self::WellboreFrame => "WELL_FRAME",
            Self::WellboreMarkerFrame => "WELL_MARKER_FRAME",
            Self::WellboreMarker => "WELL_MARKER",
            Self::SubRepresentation => "SUB_REPRESENTATION",
            Self::PartialReference => "PARTIAL_REFERENCE",
            Self::Property => "PROPERTY",
            Self::TimeSeriesProperty => "TIME_SERIES_PROPERTY",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Check if this kind carries renderable geometry
    pub fn is_representation(&self) -> bool {
        matches!(
            self,
            Self::IjkGrid
                | Self::UnstructuredGrid
                | Self::Grid2d
                | Self::Polyline
                | Self::PolylineSet
                | Self::TriangulatedSet
                | Self::WellboreTrajectory
                | Self::WellboreFrame
                | Self::WellboreMarkerFrame
                | Self::SubRepresentation
                | Self::PartialReference
        )
    }

    /// Check if this is a property (plain or time-series linked)
    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property | Self::TimeSeriesProperty)
    }

    /// Check if this is an interpretation bucket
    pub fn is_interpretation(&self) -> bool {
        matches!(
            self,
            Self::Interpretation1d | Self::Interpretation2d | Self::Interpretation3d
        )
    }

    /// Check if this is a 3D grid
    pub fn is_grid(&self) -> bool {
        matches!(self, Self::IjkGrid | Self::UnstructuredGrid)
    }

    /// Check if this belongs to the wellbore family
    pub fn is_well(&self) -> bool {
        matches!(
            self,
            Self::WellboreTrajectory
                | Self::WellboreFrame
                | Self::WellboreMarkerFrame
                | Self::WellboreMarker
        )
    }

    /// Kinds a caller may ask to visualize. Everything else is a metadata node.
    pub fn is_visualizable(&self) -> bool {
        self.is_representation() || self.is_property() || *self == Self::WellboreMarker
    }

    /// Parent kind assumed when the declared parent has not been registered yet.
    pub fn default_parent_kind(&self) -> Self {
        match self {
            Self::Grid2d | Self::Polyline | Self::PolylineSet | Self::TriangulatedSet => {
                Self::Interpretation2d
            }
            Self::WellboreTrajectory
            | Self::WellboreFrame
            | Self::WellboreMarkerFrame
            | Self::WellboreMarker => Self::Interpretation1d,
            Self::IjkGrid | Self::UnstructuredGrid | Self::SubRepresentation => {
                Self::Interpretation3d
            }
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_resqml_type() {
        assert_eq!(
            ObjectKind::from_resqml_type("resqml20.obj_IjkGridRepresentation"),
            ObjectKind::IjkGrid
        );
        assert_eq!(
            ObjectKind::from_resqml_type("obj_TriangulatedSetRepresentation"),
            ObjectKind::TriangulatedSet
        );
        assert_eq!(
            ObjectKind::from_resqml_type("DiscreteProperty"),
            ObjectKind::Property
        );
        assert_eq!(
            ObjectKind::from_resqml_type("resqml22.HorizonInterpretation"),
            ObjectKind::Interpretation2d
        );
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            ObjectKind::from_resqml_type("obj_LocalDepth3dCrs"),
            ObjectKind::Unknown
        );
    }

    #[test]
    fn test_default_parent_buckets() {
        assert_eq!(ObjectKind::Grid2d.default_parent_kind(), ObjectKind::Interpretation2d);
        assert_eq!(
            ObjectKind::WellboreMarker.default_parent_kind(),
            ObjectKind::Interpretation1d
        );
        assert_eq!(
            ObjectKind::SubRepresentation.default_parent_kind(),
            ObjectKind::Interpretation3d
        );
        assert_eq!(ObjectKind::Property.default_parent_kind(), ObjectKind::Unknown);
    }

    #[test]
    fn test_visualizable() {
        assert!(ObjectKind::IjkGrid.is_visualizable());
        assert!(ObjectKind::TimeSeriesProperty.is_visualizable());
        assert!(ObjectKind::WellboreMarker.is_visualizable());
        assert!(!ObjectKind::Interpretation3d.is_visualizable());
        assert!(!ObjectKind::Document.is_visualizable());
    }
}
