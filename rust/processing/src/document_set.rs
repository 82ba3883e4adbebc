// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Multi-document facade
//!
//! Routes an id to the document defining it, drives that document's
//! attachment state and resolves partial references across documents. A
//! partial reference shares its id with the object it stands for; lookups
//! prefer the document holding the full definition.

use crate::composite::{CompositeBlock, DocumentComposite};
use crate::config::ProcessingConfig;
use crate::diagnostics::Diagnostic;
use crate::document::{Document, DocumentKey, DocumentManifest, ManifestEntry};
use crate::routing::{resolve_owning_mapper, Route, RouteTarget};
use crate::{Error, Result};
use resqml_lite_core::{ObjectKind, ObjectRecord};
use resqml_lite_geometry::{
    create_mapper, BuildContext, DataSource, Error as GeometryError, Partition, RealizedGeometry,
    RepresentationMapper,
};
use slotmap::SlotMap;
use std::sync::Arc;

/// Outcome of [`DocumentSet::add_document`]
#[derive(Debug, Clone)]
pub struct AddDocumentReport {
    pub document: DocumentKey,
    pub document_id: String,
    /// Records in the document's index, root included
    pub registered: usize,
    /// Problems found while ingesting, including partial-reference resolution
    pub diagnostics: Vec<Diagnostic>,
}

impl AddDocumentReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub struct DocumentSet {
    documents: SlotMap<DocumentKey, Document>,
    /// Documents in the order they were added
    order: Vec<DocumentKey>,
    config: ProcessingConfig,
    partition: Partition,
    /// Set when a removed document took attached blocks with it
    dirty: bool,
}

fn not_found(id: &str) -> Error {
    Error::Core(resqml_lite_core::Error::NotFound(id.to_string()))
}

impl DocumentSet {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        let partition = config.partition()?;
        Ok(Self {
            documents: SlotMap::with_key(),
            order: Vec::new(),
            config,
            partition,
            dirty: false,
        })
    }

    pub fn config(&self) -> ProcessingConfig {
        self.config
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Ingest a document and resolve partial references against every loaded
    /// document. Problems are reported, never raised.
    pub fn add_document(
        &mut self,
        manifest: &DocumentManifest,
        source: Arc<dyn DataSource>,
    ) -> AddDocumentReport {
        if self.remove_document(&manifest.id).is_ok() {
            tracing::warn!(document = %manifest.id, "Replaced a document with the same id");
        }

        let document = Document::ingest(manifest, source);
        let mut diagnostics = document.diagnostics.clone();
        let registered = document.index.len();
        let key = self.documents.insert(document);
        self.order.push(key);
        diagnostics.extend(self.resolve_partial_references(Some(key)));

        AddDocumentReport {
            document: key,
            document_id: manifest.id.clone(),
            registered,
            diagnostics,
        }
    }

    /// Drop a document; proxies elsewhere that pointed into it lose their target
    pub fn remove_document(&mut self, document_id: &str) -> Result<()> {
        let key = self
            .document_key(document_id)
            .ok_or_else(|| Error::DocumentNotFound(document_id.to_string()))?;

        let own_proxies: Vec<String> = self.documents[key]
            .controller
            .proxies()
            .filter(|p| p.is_resolved())
            .map(|p| p.id().to_string())
            .collect();
        for id in own_proxies {
            self.detach_proxy(key, &id);
        }

        for &other in &self.order {
            if other == key {
                continue;
            }
            let document = &mut self.documents[other];
            let dangling: Vec<String> = document
                .controller
                .proxies()
                .filter(|p| p.target() == Some(key))
                .map(|p| p.id().to_string())
                .collect();
            for id in dangling {
                // Mappers built under the proxy render data the target document owned
                for descendant in document.index.subtree_ids(&id) {
                    document.controller.release_mapper(&descendant);
                    document.controller.detach(&descendant);
                }
                if let Some(proxy) = document.controller.proxy_mut(&id) {
                    proxy.unresolve();
                }
                document.index.mark_unusable(&id);
            }
        }

        if let Some(mut removed) = self.documents.remove(key) {
            let shown = !removed.controller.attached_ids().is_empty();
            self.dirty |= removed.controller.take_dirty() || shown;
        }
        self.order.retain(|&k| k != key);
        self.resolve_partial_references(None);
        tracing::info!(document = %document_id, "Removed document");
        Ok(())
    }

    pub fn document_key(&self, document_id: &str) -> Option<DocumentKey> {
        self.order
            .iter()
            .copied()
            .find(|&k| self.documents[k].id() == document_id)
    }

    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.document_key(document_id).map(|k| &self.documents[k])
    }

    /// Documents in the order they were added
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.order.iter().map(|&k| &self.documents[k])
    }

    /// Bind unresolved proxies to the document defining their target.
    ///
    /// Only problems involving `added` are reported, so earlier failures are
    /// not repeated every time a document arrives.
    fn resolve_partial_references(&mut self, added: Option<DocumentKey>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for key in self.order.clone() {
            let pending: Vec<String> = self.documents[key]
                .controller
                .proxies()
                .filter(|p| !p.is_resolved())
                .map(|p| p.id().to_string())
                .collect();

            for id in pending {
                let found = self.find_definition(&id, key);
                let document = &mut self.documents[key];
                let document_id = document.index.document_id().to_string();
                let Some(proxy) = document.controller.proxy_mut(&id) else {
                    continue;
                };

                let failure = match found {
                    Some((target, kind)) => match proxy.resolve(target, kind) {
                        Ok(()) => {
                            document.index.clear_unusable(&id);
                            tracing::debug!(document = %document_id, id = %id, "Resolved partial reference");
                            None
                        }
                        Err(e) => (Some(key) == added || Some(target) == added).then_some(e),
                    },
                    None => (Some(key) == added).then(|| GeometryError::PartialReferenceUnresolved {
                        id: id.clone(),
                        reason: "no loaded document defines the target".into(),
                    }),
                };

                if !document.controller.proxy(&id).is_some_and(|p| p.is_resolved()) {
                    document.index.mark_unusable(&id);
                }
                if let Some(e) = failure {
                    tracing::warn!(document = %document_id, id = %id, error = %e, "Partial reference unusable");
                    let diagnostic = Diagnostic::warning(&document_id, &id, e.to_string());
                    document.diagnostics.push(diagnostic.clone());
                    diagnostics.push(diagnostic);
                }
            }
        }
        diagnostics
    }

    /// Document holding the full definition of `id`, other than `except`
    fn find_definition(&self, id: &str, except: DocumentKey) -> Option<(DocumentKey, ObjectKind)> {
        self.order
            .iter()
            .copied()
            .filter(|&k| k != except)
            .find_map(|k| {
                self.documents[k]
                    .index
                    .get(id)
                    .filter(|r| r.kind != ObjectKind::PartialReference)
                    .map(|r| (k, r.kind))
            })
    }

    // ========================================================================
    // Classification
    // ========================================================================

    /// Register or overwrite one object in a loaded document
    pub fn classify(
        &mut self,
        document_id: &str,
        id: &str,
        parent_id: &str,
        display_name: &str,
        kind: ObjectKind,
    ) -> Result<ObjectRecord> {
        self.classify_entry(document_id, &ManifestEntry::new(id, parent_id, display_name, kind))
    }

    /// Register an entry; partial references are resolved straight away
    pub fn classify_entry(&mut self, document_id: &str, entry: &ManifestEntry) -> Result<ObjectRecord> {
        let key = self
            .document_key(document_id)
            .ok_or_else(|| Error::DocumentNotFound(document_id.to_string()))?;
        self.documents[key].register(entry);
        if entry.kind == ObjectKind::PartialReference {
            self.resolve_partial_references(Some(key));
        }
        Ok(self.documents[key].index.lookup(&entry.id)?.clone())
    }

    /// Record for `id`, taken from the document that fully defines it
    pub fn lookup(&self, id: &str) -> Result<&ObjectRecord> {
        let key = self.locate(id).ok_or_else(|| not_found(id))?;
        Ok(self.documents[key].index.lookup(id)?)
    }

    /// Usable records of every document, documents in load order
    pub fn enumerate_tree(&self) -> Vec<ObjectRecord> {
        self.documents()
            .flat_map(|d| d.index.enumerate_tree())
            .collect()
    }

    pub fn tree_json(&self) -> Result<String> {
        serde_json::to_string(&self.enumerate_tree()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Document defining `id`; documents holding only a partial reference are
    /// the fallback
    fn locate(&self, id: &str) -> Option<DocumentKey> {
        let mut fallback = None;
        for &key in &self.order {
            if let Some(record) = self.documents[key].index.get(id) {
                if record.kind != ObjectKind::PartialReference {
                    return Some(key);
                }
                fallback.get_or_insert(key);
            }
        }
        fallback
    }

    fn route_in(&self, key: DocumentKey, id: &str) -> Result<Route> {
        let index = &self.documents[key].index;
        let record = index.lookup(id)?;
        resolve_owning_mapper(index, id).ok_or_else(|| Error::NotVisualizable {
            id: id.to_string(),
            kind: record.kind,
        })
    }

    /// Document whose arena holds the mapper a route leads to
    fn host_of(&self, key: DocumentKey, route: &Route) -> Result<DocumentKey> {
        if route.is_proxy() {
            self.proxy_target(key, &route.owner_id)
        } else {
            Ok(key)
        }
    }

    fn proxy_target(&self, key: DocumentKey, id: &str) -> Result<DocumentKey> {
        self.documents[key]
            .controller
            .proxy(id)
            .and_then(|p| p.target())
            .filter(|&target| self.documents.contains_key(target))
            .ok_or_else(|| {
                GeometryError::PartialReferenceUnresolved {
                    id: id.to_string(),
                    reason: "target is not loaded or has another kind".into(),
                }
                .into()
            })
    }

    // ========================================================================
    // Visualization
    // ========================================================================

    /// Show `id`. Returns an empty string on success, a diagnostic otherwise.
    ///
    /// Unknown ids and metadata-only objects are silently ignored.
    pub fn visualize(&mut self, id: &str) -> String {
        match self.try_visualize(id) {
            Ok(()) => String::new(),
            Err(e) if e.is_benign_miss() => {
                tracing::debug!(id = %id, reason = %e, "Nothing to visualize");
                String::new()
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Visualization failed");
                e.to_string()
            }
        }
    }

    pub fn try_visualize(&mut self, id: &str) -> Result<()> {
        let key = self.locate(id).ok_or_else(|| not_found(id))?;
        self.visualize_in(key, id)
    }

    fn visualize_in(&mut self, key: DocumentKey, id: &str) -> Result<()> {
        let route = self.route_in(key, id)?;
        if let RouteTarget::Property {
            id: property_id,
            on_frame: true,
        } = &route.target
        {
            return Err(GeometryError::unsupported(
                property_id,
                "wellbore frame properties are not rendered",
            )
            .into());
        }

        let host = self.realize(key, &route.owner_id)?;
        self.documents[key].controller.attach(&route.owner_id);

        match &route.target {
            RouteTarget::Geometry | RouteTarget::Frame(_) => Ok(()),
            RouteTarget::Property { id: property_id, .. } => {
                self.load_property(key, host, &route.owner_id, property_id)
            }
            RouteTarget::Marker(marker_id) => {
                self.place_marker(key, host, &route.owner_id, marker_id)
            }
        }
    }

    /// Realize the owner's geometry, following proxies; returns the hosting
    /// document
    fn realize(&mut self, key: DocumentKey, owner_id: &str) -> Result<DocumentKey> {
        let record = self.documents[key].index.lookup(owner_id)?.clone();
        if record.kind == ObjectKind::PartialReference {
            let target = self.proxy_target(key, owner_id)?;
            return self.realize(target, owner_id);
        }

        let realized = self.documents[key]
            .controller
            .mapper(owner_id)
            .is_some_and(|m| m.is_realized());
        let supporting = match record.kind {
            ObjectKind::SubRepresentation if !realized => {
                Some(self.supporting_geometry(key, &record.parent_id)?)
            }
            _ => None,
        };

        let partition = self.partition;
        let document = &mut self.documents[key];
        let mut ctx = BuildContext::new(document.source.as_ref(), partition);
        if let Some(supporting) = supporting {
            ctx = ctx.with_supporting(supporting);
        }
        let mapper = document
            .controller
            .mapper_or_create(&record, document.source.as_ref())?;
        if let Err(e) = mapper.ensure_geometry(&ctx) {
            if !document.controller.is_attached(owner_id) {
                document.controller.release_mapper(owner_id);
            }
            return Err(e.into());
        }
        Ok(key)
    }

    /// Geometry a sub-representation selects from.
    ///
    /// Borrowed from the supporting mapper when realized, otherwise built
    /// without registering a mapper, so the supporting object's own state is
    /// left alone.
    fn supporting_geometry(&self, key: DocumentKey, supporting_id: &str) -> Result<Arc<RealizedGeometry>> {
        let record = self.documents[key].index.lookup(supporting_id)?;
        let host = if record.kind == ObjectKind::PartialReference {
            self.proxy_target(key, supporting_id)?
        } else {
            key
        };

        let document = &self.documents[host];
        if let Some(geometry) = document
            .controller
            .mapper(supporting_id)
            .and_then(|m| m.geometry())
        {
            return Ok(geometry);
        }

        let host_record = document.index.lookup(supporting_id)?;
        let mut transient = create_mapper(
            host_record.kind,
            supporting_id,
            &host_record.display_name,
            document.source.as_ref(),
        )?;
        let ctx = BuildContext::new(document.source.as_ref(), self.partition);
        let geometry = transient.realize_detached(&ctx)?;
        tracing::debug!(
            id = %supporting_id,
            cells = geometry.cell_count(),
            "Built transient supporting geometry"
        );
        Ok(Arc::new(geometry))
    }

    fn load_property(
        &mut self,
        key: DocumentKey,
        host: DocumentKey,
        owner_id: &str,
        property_id: &str,
    ) -> Result<()> {
        let data = self.documents[key].source.property(property_id)?;
        let mapper = self.documents[host]
            .controller
            .mapper_mut(owner_id)
            .ok_or_else(|| GeometryError::GeometryNotRealized(owner_id.to_string()))?;
        if mapper.has_property(property_id) {
            return Ok(());
        }
        mapper.load_property(&data)?;
        self.note_forwarded(key, host, owner_id, property_id);
        Ok(())
    }

    fn place_marker(
        &mut self,
        key: DocumentKey,
        host: DocumentKey,
        owner_id: &str,
        marker_id: &str,
    ) -> Result<()> {
        let data = self.documents[key].source.wellbore_marker(marker_id)?;
        let mapper = self.documents[host]
            .controller
            .mapper_mut(owner_id)
            .ok_or_else(|| GeometryError::GeometryNotRealized(owner_id.to_string()))?;
        if mapper.marker_ids().iter().any(|m| m == marker_id) {
            return Ok(());
        }
        mapper.attach_marker(marker_id, &data)?;
        self.note_forwarded(key, host, owner_id, marker_id);
        Ok(())
    }

    fn note_forwarded(&mut self, key: DocumentKey, host: DocumentKey, owner_id: &str, item_id: &str) {
        self.documents[host].controller.mark_dirty();
        if host != key {
            let document = &mut self.documents[key];
            if let Some(proxy) = document.controller.proxy_mut(owner_id) {
                proxy.record_forwarded(item_id);
            }
            document.controller.mark_dirty();
        }
    }

    /// Hide `id`: owners lose their geometry, properties and markers only
    /// themselves
    pub fn unvisualize(&mut self, id: &str) {
        let Some(key) = self.locate(id) else {
            tracing::debug!(id = %id, "Nothing to unvisualize");
            return;
        };
        let route = match self.route_in(key, id) {
            Ok(route) => route,
            Err(e) => {
                tracing::debug!(id = %id, reason = %e, "Nothing to unvisualize");
                return;
            }
        };

        match &route.target {
            RouteTarget::Geometry if route.is_proxy() => self.detach_proxy(key, &route.owner_id),
            RouteTarget::Geometry => self.destroy(key, &route.owner_id),
            RouteTarget::Frame(_) => {
                tracing::debug!(id = %id, "Frames are hidden through their trajectory");
            }
            RouteTarget::Property { id: property_id, .. } => {
                self.drop_item(key, &route, property_id, |m, item| m.remove_property(item));
            }
            RouteTarget::Marker(marker_id) => {
                self.drop_item(key, &route, marker_id, |m, item| m.detach_marker(item));
            }
        }
    }

    fn drop_item(
        &mut self,
        key: DocumentKey,
        route: &Route,
        item_id: &str,
        remove: impl FnOnce(&mut Box<dyn RepresentationMapper>, &str) -> bool,
    ) {
        let Ok(host) = self.host_of(key, route) else {
            return;
        };
        let removed = self.documents[host]
            .controller
            .mapper_mut(&route.owner_id)
            .is_some_and(|m| remove(m, item_id));
        if host != key {
            if let Some(proxy) = self.documents[key].controller.proxy_mut(&route.owner_id) {
                proxy.forget_forwarded(item_id);
            }
        }
        if removed {
            self.documents[host].controller.mark_dirty();
            self.documents[key].controller.mark_dirty();
        }
    }

    /// Destroy an owner's mapper and detach it here and through every proxy
    fn destroy(&mut self, key: DocumentKey, owner_id: &str) {
        let document = &mut self.documents[key];
        let released = document.controller.release_mapper(owner_id);
        let detached = document.controller.detach(owner_id);
        if released || detached {
            tracing::debug!(document = %document.id(), id = %owner_id, "Destroyed mapper");
            document.controller.mark_dirty();
        }

        for &other in &self.order {
            if other == key {
                continue;
            }
            let document = &mut self.documents[other];
            let forwarding = document
                .controller
                .proxy(owner_id)
                .is_some_and(|p| p.target() == Some(key));
            if forwarding {
                document.controller.detach(owner_id);
                if let Some(proxy) = document.controller.proxy_mut(owner_id) {
                    proxy.take_forwarded();
                }
            }
        }
    }

    /// Detach a proxy block and unload what it forwarded. The target's
    /// geometry is destroyed only when nothing else shows it.
    fn detach_proxy(&mut self, key: DocumentKey, owner_id: &str) {
        let document = &mut self.documents[key];
        document.controller.detach(owner_id);
        let Some(proxy) = document.controller.proxy_mut(owner_id) else {
            return;
        };
        let forwarded = proxy.take_forwarded();
        let Some(target) = proxy.target() else {
            return;
        };

        let in_use = self.shown_elsewhere(target, owner_id, key);
        let Some(host) = self.documents.get_mut(target) else {
            return;
        };
        if in_use {
            if let Some(mapper) = host.controller.mapper_mut(owner_id) {
                for item in &forwarded {
                    mapper.remove_property(item);
                    mapper.detach_marker(item);
                }
            }
            host.controller.mark_dirty();
        } else {
            host.controller.release_mapper(owner_id);
        }
    }

    /// Whether `id` of document `target` is attached there or through a proxy
    /// in a document other than `except`
    fn shown_elsewhere(&self, target: DocumentKey, id: &str, except: DocumentKey) -> bool {
        if self
            .documents
            .get(target)
            .is_some_and(|d| d.controller.is_attached(id))
        {
            return true;
        }
        self.order
            .iter()
            .filter(|&&k| k != except && k != target)
            .any(|&k| {
                let controller = &self.documents[k].controller;
                controller.is_attached(id)
                    && controller.proxy(id).is_some_and(|p| p.target() == Some(target))
            })
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Ordered blocks of every document
    pub fn composite(&self) -> Vec<DocumentComposite> {
        self.order
            .iter()
            .map(|&key| {
                let document = &self.documents[key];
                let blocks = document
                    .attached_ids()
                    .iter()
                    .enumerate()
                    .filter_map(|(index, id)| {
                        let record = document.index.get(id)?;
                        let host = if record.kind == ObjectKind::PartialReference {
                            self.proxy_target(key, id).ok()?
                        } else {
                            key
                        };
                        let mapper = self.documents[host].controller.mapper(id)?;
                        Some(CompositeBlock {
                            index,
                            id: id.clone(),
                            display_name: record.display_name.clone(),
                            parts: mapper.parts(),
                        })
                    })
                    .collect();
                DocumentComposite {
                    document_id: document.id().to_string(),
                    blocks,
                }
            })
            .collect()
    }

    /// Whether any document's composite changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        let mut dirty = std::mem::take(&mut self.dirty);
        for document in self.documents.values_mut() {
            dirty |= document.controller.take_dirty();
        }
        dirty
    }

    /// Realized geometry of the mapper rendering `id`
    pub fn realized_geometry(&self, id: &str) -> Option<Arc<RealizedGeometry>> {
        let key = self.locate(id)?;
        let route = self.route_in(key, id).ok()?;
        let host = self.host_of(key, &route).ok()?;
        self.documents[host]
            .controller
            .mapper(&route.owner_id)?
            .geometry()
    }

    /// Properties loaded on the mapper rendering `id`
    pub fn loaded_properties(&self, id: &str) -> Vec<String> {
        let Some(key) = self.locate(id) else {
            return Vec::new();
        };
        let Ok(route) = self.route_in(key, id) else {
            return Vec::new();
        };
        self.host_of(key, &route)
            .ok()
            .and_then(|host| self.documents[host].controller.mapper(&route.owner_id))
            .map(|m| m.property_ids())
            .unwrap_or_default()
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Switch worker partitioning. Everything shown is rebuilt from scratch
    /// and re-attached in its previous order.
    pub fn set_config(&mut self, config: ProcessingConfig) -> Result<()> {
        let partition = config.partition()?;
        self.config = config;
        if partition == self.partition {
            return Ok(());
        }
        self.partition = partition;

        let mut requests: Vec<(DocumentKey, Vec<String>)> = Vec::with_capacity(self.order.len());
        for &key in &self.order {
            let document = &self.documents[key];
            let controller = &document.controller;
            let mut ids = Vec::new();
            for owner in controller.attached_ids() {
                ids.push(owner.clone());
                match controller.proxy(owner) {
                    Some(proxy) => ids.extend(proxy.forwarded_properties().iter().cloned()),
                    None => {
                        if let Some(mapper) = controller.mapper(owner) {
                            ids.extend(
                                mapper
                                    .property_ids()
                                    .into_iter()
                                    .chain(mapper.marker_ids())
                                    .filter(|item| document.index.contains(item)),
                            );
                        }
                    }
                }
            }
            requests.push((key, ids));
        }

        for document in self.documents.values_mut() {
            document.controller.reset();
        }

        tracing::info!(
            worker_index = config.worker_index,
            worker_count = config.worker_count,
            "Rebuilding attached geometry for new partition"
        );
        for (key, ids) in requests {
            for id in ids {
                if let Err(e) = self.visualize_in(key, &id) {
                    tracing::warn!(id = %id, error = %e, "Rebuild failed");
                }
            }
        }
        Ok(())
    }
}
