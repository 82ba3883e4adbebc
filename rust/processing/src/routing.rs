// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owning-mapper resolution
//!
//! Every visualize/unvisualize request names one object, but only
//! representations own mappers. Frames, markers and properties are routed to
//! the representation that renders them by walking parent links:
//!
//! | requested object          | owner                                   |
//! |---------------------------|-----------------------------------------|
//! | representation            | itself                                  |
//! | wellbore (marker) frame   | parent trajectory                       |
//! | wellbore marker           | marker frame's trajectory (two hops)    |
//! | property / time series    | parent representation, frames resolved  |
//!
//! A partial reference standing in for a trajectory counts as that
//! trajectory. Routes are recomputed on every call from the current records.

use resqml_lite_core::{ObjectKind, ObjectTreeIndex};

/// What the request does to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// The owner's own geometry
    Geometry,
    /// A frame rendered through its trajectory
    Frame(String),
    /// A property array; `on_frame` when declared on a wellbore frame
    Property { id: String, on_frame: bool },
    Marker(String),
}

/// Resolved owner of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub owner_id: String,
    /// Kind of the owner's record; `PartialReference` for proxies
    pub owner_kind: ObjectKind,
    pub target: RouteTarget,
}

impl Route {
    pub fn is_proxy(&self) -> bool {
        self.owner_kind == ObjectKind::PartialReference
    }
}

/// Resolve the mapper owning `id`, `None` for unknown or metadata-only ids
pub fn resolve_owning_mapper(index: &ObjectTreeIndex, id: &str) -> Option<Route> {
    let record = index.get(id)?;
    let target = match record.kind {
        kind if kind.is_property() => {
            let parent = index.get(&record.parent_id)?;
            let on_frame = matches!(
                parent.kind,
                ObjectKind::WellboreFrame | ObjectKind::WellboreMarkerFrame
            );
            let (owner_id, owner_kind) = owning_representation(index, &record.parent_id)?;
            return Some(Route {
                owner_id,
                owner_kind,
                target: RouteTarget::Property {
                    id: id.to_string(),
                    on_frame,
                },
            });
        }
        ObjectKind::WellboreMarker => {
            let frame = index.get(&record.parent_id)?;
            if frame.kind != ObjectKind::WellboreMarkerFrame {
                return None;
            }
            RouteTarget::Marker(id.to_string())
        }
        ObjectKind::WellboreFrame | ObjectKind::WellboreMarkerFrame => {
            RouteTarget::Frame(id.to_string())
        }
        kind if kind.is_representation() => RouteTarget::Geometry,
        _ => return None,
    };

    let start = match &target {
        RouteTarget::Marker(_) => record.parent_id.as_str(),
        _ => id,
    };
    let (owner_id, owner_kind) = owning_representation(index, start)?;
    Some(Route {
        owner_id,
        owner_kind,
        target,
    })
}

/// Representation rendering `id`: frames defer to their trajectory
fn owning_representation(index: &ObjectTreeIndex, id: &str) -> Option<(String, ObjectKind)> {
    let record = index.get(id)?;
    match record.kind {
        ObjectKind::WellboreFrame | ObjectKind::WellboreMarkerFrame => {
            let trajectory = index.get(&record.parent_id)?;
            (trajectory.effective_kind() == ObjectKind::WellboreTrajectory)
                .then(|| (trajectory.id.clone(), trajectory.kind))
        }
        kind if kind.is_representation() => Some((record.id.clone(), kind)),
        _ => None,
    }
}
