// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object records - one per RESQML identifier seen during ingestion.

use crate::taxonomy::ObjectKind;

/// Time index sentinel for records that are not linked to a time series
pub const NO_TIME_INDEX: i64 = -1;

/// Timestamp sentinel for records that are not linked to a time series
pub const NO_TIMESTAMP: i64 = 0;

/// One entry of a time series: position in the series and its timestamp
/// (seconds since the Unix epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeStep {
    pub index: i64,
    pub timestamp: i64,
}

/// Classification and tree placement of one RESQML object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRecord {
    /// UUID of the object, unique within its document
    pub id: String,
    pub kind: ObjectKind,
    /// Declared structural parent (interpretation, supporting representation,
    /// owning frame, or the document itself)
    pub parent_id: String,
    /// Kind of `parent_id`, frozen when the record was created
    pub parent_kind: ObjectKind,
    pub display_name: String,
    /// Target kind claimed by a partial reference; `None` for every other kind
    pub referenced_kind: Option<ObjectKind>,
    /// Owning time series, once a property has been promoted
    pub time_series_id: Option<String>,
    pub time_index: i64,
    pub timestamp: i64,
}

impl ObjectRecord {
    /// Create a record with no time-series linkage
    pub fn new(
        id: impl Into<String>,
        kind: ObjectKind,
        parent_id: impl Into<String>,
        parent_kind: ObjectKind,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            parent_id: parent_id.into(),
            parent_kind,
            display_name: display_name.into(),
            referenced_kind: None,
            time_series_id: None,
            time_index: NO_TIME_INDEX,
            timestamp: NO_TIMESTAMP,
        }
    }

    /// Kind a dependent should see when following this record as a parent.
    ///
    /// Partial references resolve to the kind they point at.
    pub fn effective_kind(&self) -> ObjectKind {
        match (self.kind, self.referenced_kind) {
            (ObjectKind::PartialReference, Some(kind)) => kind,
            (kind, _) => kind,
        }
    }

    #[inline]
    pub fn is_time_series_linked(&self) -> bool {
        self.kind == ObjectKind::TimeSeriesProperty
    }
}
