// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while realizing geometry or loading properties
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Malformed cell {cell}: {reason}")]
    MalformedCell { cell: u64, reason: String },

    #[error("Unsupported property {id}: {reason}")]
    UnsupportedProperty { id: String, reason: String },

    #[error("Property {id} holds {actual} values, expected {expected}")]
    PropertySizeMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Partial reference {id} cannot be resolved: {reason}")]
    PartialReferenceUnresolved { id: String, reason: String },

    #[error("Geometry of {0} is not realized")]
    GeometryNotRealized(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Index out of range: {0}")]
    OutOfRange(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Core error: {0}")]
    Core(#[from] resqml_lite_core::Error),
}

impl Error {
    /// Create a malformed-cell error
    pub fn malformed(cell: u64, reason: impl Into<String>) -> Self {
        Self::MalformedCell {
            cell,
            reason: reason.into(),
        }
    }

    /// Create an unsupported-property error
    pub fn unsupported(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedProperty {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
