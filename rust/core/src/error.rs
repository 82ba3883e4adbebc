// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for classification and tree lookups.

use crate::taxonomy::ObjectKind;
use thiserror::Error;

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the object tree index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Property {id} reports {count} time indices; only a single time index is supported")]
    InconsistentMultiTimeIndexProperty { id: String, count: usize },

    #[error("Object {id} is a {kind}, not a property")]
    NotAProperty { id: String, kind: ObjectKind },
}
