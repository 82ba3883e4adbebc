// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-document attachment state
//!
//! Mappers live in one arena keyed by stable handles; the object id is mapped
//! to its handle separately. `attached` is the ordered list of top-level ids
//! currently shown, which fixes the block index of each id in the composite.
//! An id appears at most once and keeps its first-attach position until it is
//! detached.

use crate::document::DocumentKey;
use crate::Result;
use resqml_lite_core::ObjectRecord;
use resqml_lite_geometry::{create_mapper, DataSource, PartialReferenceProxy, RepresentationMapper};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle of a mapper within its document
    pub struct MapperKey;
}

pub type Proxy = PartialReferenceProxy<DocumentKey>;

#[derive(Default)]
pub struct AttachmentController {
    mappers: SlotMap<MapperKey, Box<dyn RepresentationMapper>>,
    keys: FxHashMap<String, MapperKey>,
    proxies: FxHashMap<String, Proxy>,
    attached: Vec<String>,
    dirty: bool,
}

impl AttachmentController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapper(&self, id: &str) -> Option<&dyn RepresentationMapper> {
        let key = *self.keys.get(id)?;
        self.mappers.get(key).map(|m| &**m)
    }

    pub fn mapper_mut(&mut self, id: &str) -> Option<&mut Box<dyn RepresentationMapper>> {
        let key = *self.keys.get(id)?;
        self.mappers.get_mut(key)
    }

    /// Mapper for `record`, created on first use
    pub fn mapper_or_create(
        &mut self,
        record: &ObjectRecord,
        source: &dyn DataSource,
    ) -> Result<&mut Box<dyn RepresentationMapper>> {
        let existing = self
            .keys
            .get(&record.id)
            .copied()
            .filter(|&key| self.mappers.contains_key(key));
        let key = match existing {
            Some(key) => key,
            None => {
                let mapper =
                    create_mapper(record.kind, &record.id, &record.display_name, source)?;
                let key = self.mappers.insert(mapper);
                self.keys.insert(record.id.clone(), key);
                tracing::debug!(id = %record.id, kind = %record.kind, "Created mapper");
                key
            }
        };
        Ok(&mut self.mappers[key])
    }

    /// Destroy the mapper of `id` with its geometry and properties
    pub fn release_mapper(&mut self, id: &str) -> bool {
        let Some(key) = self.keys.remove(id) else {
            return false;
        };
        match self.mappers.remove(key) {
            Some(mut mapper) => {
                mapper.remove_self();
                true
            }
            None => false,
        }
    }

    /// Ids of every mapper in the arena
    pub fn mapper_ids(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    /// Append `id` to the attached list unless present; `true` if appended
    pub fn attach(&mut self, id: &str) -> bool {
        if self.is_attached(id) {
            return false;
        }
        self.attached.push(id.to_string());
        self.dirty = true;
        tracing::debug!(id = %id, block = self.attached.len() - 1, "Attached");
        true
    }

    /// Remove `id` from the attached list; later ids move up one block
    pub fn detach(&mut self, id: &str) -> bool {
        let Some(position) = self.attached.iter().position(|a| a == id) else {
            return false;
        };
        self.attached.remove(position);
        self.dirty = true;
        tracing::debug!(id = %id, "Detached");
        true
    }

    #[inline]
    pub fn is_attached(&self, id: &str) -> bool {
        self.attached.iter().any(|a| a == id)
    }

    pub fn attached_ids(&self) -> &[String] {
        &self.attached
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the composite changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn insert_proxy(&mut self, proxy: Proxy) {
        self.proxies.insert(proxy.id().to_string(), proxy);
    }

    pub fn proxy(&self, id: &str) -> Option<&Proxy> {
        self.proxies.get(id)
    }

    pub fn proxy_mut(&mut self, id: &str) -> Option<&mut Proxy> {
        self.proxies.get_mut(id)
    }

    pub fn proxies(&self) -> impl Iterator<Item = &Proxy> {
        self.proxies.values()
    }

    pub fn proxies_mut(&mut self) -> impl Iterator<Item = &mut Proxy> {
        self.proxies.values_mut()
    }

    /// Destroy every mapper and detach everything; proxies stay resolved
    pub fn reset(&mut self) {
        for (_, mut mapper) in self.mappers.drain() {
            mapper.remove_self();
        }
        self.keys.clear();
        for proxy in self.proxies_mut() {
            proxy.take_forwarded();
        }
        if !self.attached.is_empty() {
            self.attached.clear();
            self.dirty = true;
        }
    }
}
