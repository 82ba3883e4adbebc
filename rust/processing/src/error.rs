// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use resqml_lite_core::ObjectKind;
use thiserror::Error;

/// Result type for document-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the attachment controller and the document set
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{id} of kind {kind} cannot be visualized")]
    NotVisualizable { id: String, kind: ObjectKind },

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Core(#[from] resqml_lite_core::Error),

    #[error(transparent)]
    Geometry(#[from] resqml_lite_geometry::Error),
}

impl Error {
    /// Whether the controller treats this error as "nothing to do"
    pub fn is_benign_miss(&self) -> bool {
        matches!(
            self,
            Self::NotVisualizable { .. } | Self::Core(resqml_lite_core::Error::NotFound(_))
        )
    }
}
