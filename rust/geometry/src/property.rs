// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property values and their topological attachment

use crate::{Error, Result};
use std::ops::Range;

/// Where a property array is attached on realized geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Points,
    Cells,
}

/// Declared indexable element of a RESQML property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexableElement {
    Nodes,
    Cells,
    Faces,
    Edges,
    Intervals,
}

impl IndexableElement {
    /// Attachment point on rendered geometry, if one exists
    pub fn attachment(&self) -> Option<Attachment> {
        match self {
            Self::Nodes => Some(Attachment::Points),
            Self::Cells | Self::Intervals => Some(Attachment::Cells),
            Self::Faces | Self::Edges => None,
        }
    }
}

/// Declared RESQML property kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Continuous,
    Discrete,
    Categorical,
    Comment,
    Points,
}

/// Typed numeric values
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValues {
    Real(Vec<f64>),
    Integer(Vec<i64>),
}

impl PropertyValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Integer(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values picked by `selection`; indices must be in bounds
    pub fn select(&self, selection: &ValueSelection) -> PropertyValues {
        fn pick<T: Copy>(values: &[T], selection: &ValueSelection) -> Vec<T> {
            match selection {
                ValueSelection::Range(range) => values[range.clone()].to_vec(),
                ValueSelection::Indices(indices) => indices.iter().map(|&i| values[i]).collect(),
            }
        }
        match self {
            Self::Real(v) => Self::Real(pick(v, selection)),
            Self::Integer(v) => Self::Integer(pick(v, selection)),
        }
    }
}

/// Which raw values a mapper keeps for its local elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSelection {
    Range(Range<usize>),
    Indices(Vec<usize>),
}

impl ValueSelection {
    fn max_index(&self) -> Option<usize> {
        match self {
            Self::Range(range) => range.end.checked_sub(1),
            Self::Indices(indices) => indices.iter().copied().max(),
        }
    }
}

/// How raw property values map onto a mapper's realized geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyWindow {
    /// Number of raw values the property must hold
    pub expected: usize,
    pub selection: ValueSelection,
}

impl PropertyWindow {
    /// Window keeping `local` consecutive values starting at `offset`
    pub fn contiguous(expected: usize, offset: usize, local: usize) -> Self {
        Self {
            expected,
            selection: ValueSelection::Range(offset..offset + local),
        }
    }
}

/// A property as supplied by the data source
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyData {
    pub id: String,
    pub name: String,
    pub kind: PropertyKind,
    pub indexable: IndexableElement,
    /// Values stored per indexable element; only 1 is renderable
    pub values_per_element: u32,
    pub values: PropertyValues,
}

impl PropertyData {
    /// Check the property is renderable and return its attachment point
    pub fn attachment(&self) -> Result<Attachment> {
        if self.values_per_element > 1 {
            return Err(Error::unsupported(
                &self.id,
                format!(
                    "vector-valued property with {} values per element",
                    self.values_per_element
                ),
            ));
        }
        match (self.kind, &self.values) {
            (PropertyKind::Continuous, PropertyValues::Real(_))
            | (PropertyKind::Discrete | PropertyKind::Categorical, PropertyValues::Integer(_)) => {}
            (PropertyKind::Comment | PropertyKind::Points, _) => {
                return Err(Error::unsupported(
                    &self.id,
                    format!("{:?} properties cannot be rendered", self.kind),
                ));
            }
            (kind, _) => {
                return Err(Error::unsupported(
                    &self.id,
                    format!("{kind:?} property with mismatched value type"),
                ));
            }
        }
        self.indexable.attachment().ok_or_else(|| {
            Error::unsupported(
                &self.id,
                format!("indexable element {:?} has no rendered counterpart", self.indexable),
            )
        })
    }

    /// Copy of this property restricted to `range` of its values
    pub fn slice(&self, range: Range<usize>) -> PropertyData {
        PropertyData {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            indexable: self.indexable,
            values_per_element: self.values_per_element,
            values: self.values.select(&ValueSelection::Range(range)),
        }
    }

    /// Validate against `window` and extract the loaded array
    pub fn extract(&self, attachment: Attachment, window: &PropertyWindow) -> Result<PropertyArray> {
        let actual = self.values.len();
        if actual != window.expected {
            return Err(Error::PropertySizeMismatch {
                id: self.id.clone(),
                expected: window.expected,
                actual,
            });
        }
        if window.selection.max_index().is_some_and(|max| max >= actual) {
            return Err(Error::OutOfRange(format!(
                "property {} selection exceeds {} values",
                self.id, actual
            )));
        }
        Ok(PropertyArray {
            id: self.id.clone(),
            name: self.name.clone(),
            attachment,
            values: self.values.select(&window.selection),
        })
    }
}

/// A loaded property array, one value per local point or cell
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyArray {
    pub id: String,
    pub name: String,
    pub attachment: Attachment,
    pub values: PropertyValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn porosity(values: Vec<f64>) -> PropertyData {
        PropertyData {
            id: "poro".into(),
            name: "Porosity".into(),
            kind: PropertyKind::Continuous,
            indexable: IndexableElement::Cells,
            values_per_element: 1,
            values: PropertyValues::Real(values),
        }
    }

    #[test]
    fn test_attachment_from_indexable() {
        assert_eq!(porosity(vec![]).attachment().unwrap(), Attachment::Cells);
        let mut nodes = porosity(vec![]);
        nodes.indexable = IndexableElement::Nodes;
        assert_eq!(nodes.attachment().unwrap(), Attachment::Points);
    }

    #[test]
    fn test_vector_valued_rejected() {
        let mut data = porosity(vec![0.1; 6]);
        data.values_per_element = 3;
        let err = data.attachment().unwrap_err();
        assert!(matches!(err, Error::UnsupportedProperty { .. }));
    }

    #[test]
    fn test_unrenderable_kinds_rejected() {
        let mut data = porosity(vec![]);
        data.kind = PropertyKind::Comment;
        assert!(data.attachment().is_err());

        let mut data = porosity(vec![]);
        data.kind = PropertyKind::Discrete;
        assert!(data.attachment().is_err());

        let mut data = porosity(vec![]);
        data.indexable = IndexableElement::Faces;
        assert!(data.attachment().is_err());
    }

    #[test]
    fn test_extract_window() {
        let data = porosity(vec![0.0, 0.1, 0.2, 0.3]);
        let array = data
            .extract(Attachment::Cells, &PropertyWindow::contiguous(4, 2, 2))
            .unwrap();
        assert_eq!(array.values, PropertyValues::Real(vec![0.2, 0.3]));

        let selected = data
            .extract(
                Attachment::Cells,
                &PropertyWindow {
                    expected: 4,
                    selection: ValueSelection::Indices(vec![3, 0]),
                },
            )
            .unwrap();
        assert_eq!(selected.values, PropertyValues::Real(vec![0.3, 0.0]));
    }

    #[test]
    fn test_extract_size_mismatch() {
        let data = porosity(vec![0.0; 3]);
        let err = data
            .extract(Attachment::Cells, &PropertyWindow::contiguous(8, 0, 8))
            .unwrap_err();
        assert_eq!(
            err,
            Error::PropertySizeMismatch {
                id: "poro".into(),
                expected: 8,
                actual: 3
            }
        );
    }
}
