// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wellbore trajectory mapper
//!
//! The trajectory is one polyline through its stations. Markers are placed by
//! linear interpolation along the stations at their measured depth and are
//! rendered as a vertex block next to the trajectory.

use super::{BuildContext, GeometryBuilder, GeometryPart};
use crate::cell::{Cell, CellType};
use crate::points::PointBuffer;
use crate::property::{Attachment, PropertyWindow};
use crate::realized::RealizedGeometry;
use crate::source::WellboreMarkerData;
use crate::{Error, Point3, Result};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct TrajectoryBuilder {
    measured_depths: Vec<f64>,
    markers: Vec<(String, Point3<f64>)>,
    marker_part: Option<Arc<RealizedGeometry>>,
}

impl TrajectoryBuilder {
    /// Marker ids and positions, in attach order
    pub fn markers(&self) -> &[(String, Point3<f64>)] {
        &self.markers
    }

    fn rebuild_marker_part(&mut self) {
        self.marker_part = (!self.markers.is_empty()).then(|| {
            let points = self.markers.iter().map(|(_, p)| *p).collect();
            let cells = (0..self.markers.len() as u64)
                .map(|i| Cell::new(CellType::Vertex, [i]))
                .collect();
            Arc::new(RealizedGeometry::new(points, cells))
        });
    }
}

/// Position at `md` along stations with increasing measured depths
pub fn interpolate_station(
    measured_depths: &[f64],
    stations: &[Point3<f64>],
    md: f64,
) -> Option<Point3<f64>> {
    let first = *measured_depths.first()?;
    let last = *measured_depths.last()?;
    if !(first..=last).contains(&md) {
        return None;
    }
    let segment = measured_depths
        .windows(2)
        .position(|w| md <= w[1])
        .unwrap_or(0);
    let (md0, md1) = match measured_depths.get(segment + 1) {
        Some(&md1) => (measured_depths[segment], md1),
        None => return stations.first().copied(),
    };
    let (p0, p1) = (stations.get(segment)?, stations.get(segment + 1)?);
    let t = if md1 > md0 { (md - md0) / (md1 - md0) } else { 0.0 };
    Some(p0 + (p1 - p0) * t)
}

impl GeometryBuilder for TrajectoryBuilder {
    fn build(&mut self, id: &str, ctx: &BuildContext<'_>) -> Result<RealizedGeometry> {
        let data = ctx.source.wellbore_trajectory(id)?;
        if data.measured_depths.len() != data.points.len() {
            return Err(Error::MissingData(format!(
                "trajectory {id} has {} stations but {} measured depths",
                data.points.len(),
                data.measured_depths.len()
            )));
        }
        let points = PointBuffer::load(data.points)?.into_points();
        let line = Cell::new(CellType::PolyLine, 0..points.len() as u64);
        self.measured_depths = data.measured_depths;
        Ok(RealizedGeometry::new(points, vec![line]))
    }

    fn property_window(
        &self,
        property_id: &str,
        geometry: &RealizedGeometry,
        attachment: Attachment,
    ) -> Result<PropertyWindow> {
        match attachment {
            Attachment::Points => Ok(PropertyWindow::contiguous(
                geometry.point_count(),
                0,
                geometry.point_count(),
            )),
            Attachment::Cells => Err(Error::unsupported(
                property_id,
                "trajectories only carry station properties",
            )),
        }
    }

    fn attach_marker(
        &mut self,
        owner_id: &str,
        geometry: &RealizedGeometry,
        marker_id: &str,
        marker: &WellboreMarkerData,
    ) -> Result<()> {
        let position = interpolate_station(
            &self.measured_depths,
            &geometry.points,
            marker.measured_depth,
        )
        .ok_or_else(|| {
            Error::OutOfRange(format!(
                "marker {marker_id} at MD {} lies outside trajectory {owner_id}",
                marker.measured_depth
            ))
        })?;
        match self.markers.iter_mut().find(|(id, _)| id == marker_id) {
            Some(existing) => existing.1 = position,
            None => self.markers.push((marker_id.to_string(), position)),
        }
        self.rebuild_marker_part();
        Ok(())
    }

    fn detach_marker(&mut self, marker_id: &str) -> bool {
        let before = self.markers.len();
        self.markers.retain(|(id, _)| id != marker_id);
        let removed = before != self.markers.len();
        if removed {
            self.rebuild_marker_part();
        }
        removed
    }

    fn marker_ids(&self) -> Vec<String> {
        self.markers.iter().map(|(id, _)| id.clone()).collect()
    }

    fn extra_parts(&self, display_name: &str) -> Vec<GeometryPart> {
        self.marker_part
            .iter()
            .map(|geometry| GeometryPart {
                name: format!("{display_name} markers"),
                geometry: Arc::clone(geometry),
                properties: Vec::new(),
            })
            .collect()
    }

    fn reset(&mut self) {
        self.measured_depths.clear();
        self.markers.clear();
        self.marker_part = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolate_between_stations() {
        let mds = [0.0, 100.0, 300.0];
        let stations = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -100.0),
            Point3::new(200.0, 0.0, -100.0),
        ];
        let p = interpolate_station(&mds, &stations, 200.0).unwrap();
        assert_relative_eq!(p.x, 100.0);
        assert_relative_eq!(p.z, -100.0);

        let p = interpolate_station(&mds, &stations, 50.0).unwrap();
        assert_relative_eq!(p.z, -50.0);
    }

    #[test]
    fn test_interpolate_at_ends() {
        let mds = [10.0, 20.0];
        let stations = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert_relative_eq!(interpolate_station(&mds, &stations, 10.0).unwrap().x, 0.0);
        assert_relative_eq!(interpolate_station(&mds, &stations, 20.0).unwrap().x, 1.0);
        assert!(interpolate_station(&mds, &stations, 25.0).is_none());
        assert!(interpolate_station(&mds, &stations, 5.0).is_none());
    }
}
