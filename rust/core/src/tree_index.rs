// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object Tree Index - registry of classified RESQML objects
//!
//! Maps an identifier to its [`ObjectRecord`]. Records are created in
//! discovery order; the ingestion layer registers interpretations and
//! supporting representations before their dependents so that parent kinds
//! can be copied instead of guessed.

use crate::error::{Error, Result};
use crate::record::{ObjectRecord, TimeStep};
use crate::taxonomy::ObjectKind;
use rustc_hash::{FxHashMap, FxHashSet};

/// Registry of every object discovered in one document
#[derive(Debug, Clone)]
pub struct ObjectTreeIndex {
    document_id: String,
    records: FxHashMap<String, ObjectRecord>,
    /// Ids in first-registration order (the document root first)
    order: Vec<String>,
    /// Records hidden from enumeration (unresolved partial references and their dependents)
    unusable: FxHashSet<String>,
}

impl ObjectTreeIndex {
    /// Create an index holding only the document root record
    pub fn new(document_id: impl Into<String>, document_name: impl Into<String>) -> Self {
        let document_id = document_id.into();
        let root = ObjectRecord::new(
            document_id.clone(),
            ObjectKind::Document,
            String::new(),
            ObjectKind::Unknown,
            document_name,
        );
        let mut records = FxHashMap::default();
        records.insert(document_id.clone(), root);
        Self {
            order: vec![document_id.clone()],
            document_id,
            records,
            unusable: FxHashSet::default(),
        }
    }

    /// Id of the document root record
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Insert or overwrite the record for `id`.
    ///
    /// The parent kind is copied from the parent's record when it exists,
    /// otherwise it falls back to the generic interpretation bucket for `kind`.
    /// Records of other objects are never touched, so children keep the
    /// parent kind they were created with.
    pub fn classify(
        &mut self,
        id: &str,
        parent_id: &str,
        display_name: &str,
        kind: ObjectKind,
    ) -> &ObjectRecord {
        let parent_kind = self.infer_parent_kind(parent_id, kind);
        if !self.records.contains_key(parent_id) {
            tracing::debug!(
                id = %id,
                parent_id = %parent_id,
                parent_kind = %parent_kind,
                "Parent not registered yet, using default bucket"
            );
        }
        let record = ObjectRecord::new(id, kind, parent_id, parent_kind, display_name);
        self.insert(record)
    }

    /// Register a partial reference together with the kind it claims its target has
    pub fn classify_partial_reference(
        &mut self,
        id: &str,
        parent_id: &str,
        display_name: &str,
        referenced_kind: ObjectKind,
    ) -> &ObjectRecord {
        let parent_kind = self.infer_parent_kind(parent_id, ObjectKind::PartialReference);
        let mut record = ObjectRecord::new(
            id,
            ObjectKind::PartialReference,
            parent_id,
            parent_kind,
            display_name,
        );
        record.referenced_kind = Some(referenced_kind);
        self.insert(record)
    }

    fn infer_parent_kind(&self, parent_id: &str, kind: ObjectKind) -> ObjectKind {
        match self.records.get(parent_id) {
            // Sub-representations of a partial grid see the grid kind
            Some(parent) if kind == ObjectKind::SubRepresentation => parent.effective_kind(),
            Some(parent) => parent.kind,
            None => kind.default_parent_kind(),
        }
    }

    fn insert(&mut self, record: ObjectRecord) -> &ObjectRecord {
        let id = record.id.clone();
        if self.records.insert(id.clone(), record).is_none() {
            self.order.push(id.clone());
        }
        &self.records[&id]
    }

    /// Promote a property to a time-series property.
    ///
    /// Returns `Ok(true)` when the record changed, `Ok(false)` when it already
    /// carried the same linkage. Properties reporting several time indices are
    /// rejected and left untouched.
    pub fn promote_to_time_series(
        &mut self,
        id: &str,
        time_series_id: &str,
        steps: &[TimeStep],
    ) -> Result<bool> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if !record.kind.is_property() {
            return Err(Error::NotAProperty {
                id: id.to_string(),
                kind: record.kind,
            });
        }

        let step = match steps {
            [step] => *step,
            [] => return Ok(false),
            _ => {
                tracing::warn!(
                    id = %id,
                    count = steps.len(),
                    "Skipping time series promotion of multi time index property"
                );
                return Err(Error::InconsistentMultiTimeIndexProperty {
                    id: id.to_string(),
                    count: steps.len(),
                });
            }
        };

        if record.kind == ObjectKind::TimeSeriesProperty
            && record.time_index == step.index
            && record.timestamp == step.timestamp
            && record.time_series_id.as_deref() == Some(time_series_id)
        {
            return Ok(false);
        }

        record.kind = ObjectKind::TimeSeriesProperty;
        record.time_series_id = Some(time_series_id.to_string());
        record.time_index = step.index;
        record.timestamp = step.timestamp;
        Ok(true)
    }

    /// Get a record, failing with `NotFound` for unregistered ids
    pub fn lookup(&self, id: &str) -> Result<&ObjectRecord> {
        self.records
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Speculative lookup used for routing
    #[inline]
    pub fn get(&self, id: &str) -> Option<&ObjectRecord> {
        self.records.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Number of records, the document root included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in discovery order, unusable ones included
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Direct children of `id` in discovery order
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ObjectRecord> + 'a {
        self.iter().filter(move |record| record.parent_id == id)
    }

    /// Hide `id` and everything below it from [`enumerate_tree`](Self::enumerate_tree)
    pub fn mark_unusable(&mut self, id: &str) {
        for descendant in self.subtree_ids(id) {
            self.unusable.insert(descendant);
        }
    }

    /// Undo [`mark_unusable`](Self::mark_unusable) for `id` and its descendants
    pub fn clear_unusable(&mut self, id: &str) {
        for descendant in self.subtree_ids(id) {
            self.unusable.remove(&descendant);
        }
    }

    #[inline]
    pub fn is_usable(&self, id: &str) -> bool {
        !self.unusable.contains(id)
    }

    /// `id` followed by its descendants, breadth first
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut found = vec![id.to_string()];
        let mut cursor = 0;
        while cursor < found.len() {
            let current = found[cursor].clone();
            for child in self.children_of(&current) {
                // Parent links come from the source and may loop
                if !found.contains(&child.id) {
                    found.push(child.id.clone());
                }
            }
            cursor += 1;
        }
        found
    }

    /// All usable records in discovery order
    pub fn enumerate_tree(&self) -> Vec<ObjectRecord> {
        self.iter()
            .filter(|record| self.is_usable(&record.id))
            .cloned()
            .collect()
    }
}
