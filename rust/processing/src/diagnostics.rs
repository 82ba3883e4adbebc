// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ingestion diagnostics
//!
//! Recoverable problems found while adding a document are collected here
//! instead of aborting ingestion of sibling objects.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Id of the document the problem was found in
    pub document: String,
    /// Offending object, if any
    pub object_id: Option<String>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(document: &str, object_id: &str, message: impl Into<String>) -> Self {
        Self {
            document: document.to_string(),
            object_id: Some(object_id.to_string()),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(document: &str, object_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            document: document.to_string(),
            object_id: object_id.map(str::to_string),
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object_id {
            Some(id) => write!(f, "[{}] {}: {}", self.document, id, self.message),
            None => write!(f, "[{}] {}", self.document, self.message),
        }
    }
}
