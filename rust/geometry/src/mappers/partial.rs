// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial-reference proxies
//!
//! A partial reference names an object that is fully defined in another
//! document and shares its id. The proxy owns no geometry: it records which
//! document holds the target, once the target's actual kind has been checked
//! against the kind the reference declares. `K` is the caller's document
//! handle.

use crate::{Error, Result};
use resqml_lite_core::ObjectKind;

#[derive(Debug, Clone)]
pub struct PartialReferenceProxy<K> {
    id: String,
    declared_kind: ObjectKind,
    target: Option<K>,
    forwarded_properties: Vec<String>,
}

impl<K: Copy + PartialEq> PartialReferenceProxy<K> {
    pub fn new(id: impl Into<String>, declared_kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            declared_kind,
            target: None,
            forwarded_properties: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn declared_kind(&self) -> ObjectKind {
        self.declared_kind
    }

    /// Document holding the target, once resolved
    pub fn target(&self) -> Option<K> {
        self.target
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    /// Bind to the target found in `document`, whose record has `actual_kind`
    pub fn resolve(&mut self, document: K, actual_kind: ObjectKind) -> Result<()> {
        if actual_kind != self.declared_kind {
            return Err(Error::PartialReferenceUnresolved {
                id: self.id.clone(),
                reason: format!(
                    "declared as {} but the referenced object is {}",
                    self.declared_kind, actual_kind
                ),
            });
        }
        self.target = Some(document);
        Ok(())
    }

    /// Forget the target; forwarded properties are returned for cleanup
    pub fn unresolve(&mut self) -> Vec<String> {
        self.target = None;
        std::mem::take(&mut self.forwarded_properties)
    }

    /// Remember a property loaded onto the target on this proxy's behalf
    pub fn record_forwarded(&mut self, property_id: &str) {
        if !self.forwarded_properties.iter().any(|p| p == property_id) {
            self.forwarded_properties.push(property_id.to_string());
        }
    }

    pub fn forget_forwarded(&mut self, property_id: &str) -> bool {
        let before = self.forwarded_properties.len();
        self.forwarded_properties.retain(|p| p != property_id);
        before != self.forwarded_properties.len()
    }

    pub fn take_forwarded(&mut self) -> Vec<String> {
        std::mem::take(&mut self.forwarded_properties)
    }

    pub fn forwarded_properties(&self) -> &[String] {
        &self.forwarded_properties
    }
}
