// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end visualization scenarios over in-memory documents.

use resqml_lite_core::{ObjectKind, TimeStep};
use resqml_lite_geometry::{
    IjkGridData, IndexableElement, MemorySource, PropertyData, PropertyKind, PropertyValues,
    RawPoints, SubRepresentationData, TrajectoryData, TriangulatedPatch, UnstructuredGridData,
    WellboreMarkerData,
};
use resqml_lite_processing::{
    DocumentManifest, DocumentSet, Error, ManifestEntry, ProcessingConfig, Severity,
    TimeSeriesLink,
};
use std::sync::Arc;

fn lattice(ni: u64, nj: u64, nk: u64) -> IjkGridData {
    let mut xyz = Vec::new();
    for k in 0..=nk {
        for j in 0..=nj {
            for i in 0..=ni {
                xyz.extend_from_slice(&[i as f64, j as f64, k as f64]);
            }
        }
    }
    IjkGridData {
        ni,
        nj,
        nk,
        points: RawPoints::new(xyz, true),
    }
}

fn cell_property(id: &str, values: Vec<f64>) -> PropertyData {
    PropertyData {
        id: id.into(),
        name: id.into(),
        kind: PropertyKind::Continuous,
        indexable: IndexableElement::Cells,
        values_per_element: 1,
        values: PropertyValues::Real(values),
    }
}

fn entry(id: &str, parent: &str, kind: ObjectKind) -> ManifestEntry {
    ManifestEntry::new(id, parent, id, kind)
}

fn set() -> DocumentSet {
    DocumentSet::new(ProcessingConfig::single()).unwrap()
}

/// One document: horizon interpretation, a 2x2x2 grid with a porosity
/// property and a single-triangle surface
fn grid_document(set: &mut DocumentSet) {
    let mut source = MemorySource::new();
    source
        .insert_ijk_grid("grid", lattice(2, 2, 2))
        .insert_property(cell_property("poro", (0..8).map(f64::from).collect()))
        .insert_triangulated_set(
            "surface",
            vec![TriangulatedPatch {
                points: RawPoints::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], false),
                triangles: vec![[0, 1, 2]],
            }],
        );
    let manifest = DocumentManifest::new("doc", "model.epc")
        .object(entry("horizon", "doc", ObjectKind::Interpretation2d))
        .object(entry("grid", "doc", ObjectKind::IjkGrid))
        .object(entry("poro", "grid", ObjectKind::Property))
        .object(entry("surface", "horizon", ObjectKind::TriangulatedSet));
    let report = set.add_document(&manifest, Arc::new(source));
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn test_grid_with_cell_property() {
    let mut set = set();
    grid_document(&mut set);

    assert_eq!(set.visualize("grid"), "");
    assert_eq!(set.visualize("poro"), "");

    let composite = set.composite();
    assert_eq!(composite[0].block_ids(), vec!["grid"]);
    let block = &composite[0].blocks[0];
    assert_eq!(block.index, 0);
    assert_eq!(block.cell_count(), 8);
    assert_eq!(block.parts[0].properties.len(), 1);
    assert_eq!(block.parts[0].properties[0].values.len(), 8);

    set.unvisualize("grid");
    assert!(set.composite()[0].blocks.is_empty());
    assert!(set.realized_geometry("grid").is_none());
    assert!(set.loaded_properties("grid").is_empty());
}

#[test]
fn test_unvisualize_property_keeps_owner() {
    let mut set = set();
    grid_document(&mut set);

    set.visualize("poro");
    assert!(set.take_dirty());
    set.unvisualize("poro");
    assert!(set.take_dirty());
    assert!(set.loaded_properties("grid").is_empty());
    assert_eq!(set.composite()[0].block_ids(), vec!["grid"]);
    assert!(set.realized_geometry("grid").is_some());
}

#[test]
fn test_property_alone_realizes_its_owner() {
    let mut set = set();
    grid_document(&mut set);

    assert_eq!(set.visualize("poro"), "");
    assert_eq!(set.composite()[0].block_ids(), vec!["grid"]);
    assert_eq!(set.loaded_properties("poro"), vec!["poro".to_string()]);
}

#[test]
fn test_visualize_is_idempotent() {
    let mut set = set();
    grid_document(&mut set);

    set.visualize("grid");
    set.visualize("poro");
    let first = set.realized_geometry("grid").unwrap().instance();
    set.visualize("grid");
    set.visualize("poro");
    assert_eq!(set.realized_geometry("grid").unwrap().instance(), first);
    assert_eq!(set.composite()[0].block_ids(), vec!["grid"]);
    assert_eq!(set.loaded_properties("grid").len(), 1);
}

#[test]
fn test_revisualize_rebuilds_at_end() {
    let mut set = set();
    grid_document(&mut set);

    set.visualize("grid");
    set.visualize("surface");
    assert_eq!(set.composite()[0].block_ids(), vec!["grid", "surface"]);
    let first = set.realized_geometry("grid").unwrap().instance();

    set.unvisualize("grid");
    assert_eq!(set.composite()[0].block_ids(), vec!["surface"]);
    assert_eq!(set.composite()[0].blocks[0].index, 0);

    set.visualize("grid");
    assert_eq!(set.composite()[0].block_ids(), vec!["surface", "grid"]);
    assert_ne!(set.realized_geometry("grid").unwrap().instance(), first);
    // Properties do not survive destruction
    assert!(set.loaded_properties("grid").is_empty());
}

#[test]
fn test_unknown_and_metadata_ids_are_ignored() {
    let mut set = set();
    grid_document(&mut set);

    assert_eq!(set.visualize("no-such-object"), "");
    assert_eq!(set.visualize("horizon"), "");
    assert_eq!(set.visualize("doc"), "");
    set.unvisualize("no-such-object");
    assert!(set.composite()[0].blocks.is_empty());
    assert!(!set.take_dirty());

    let err = set.try_visualize("horizon").unwrap_err();
    assert!(matches!(err, Error::NotVisualizable { kind: ObjectKind::Interpretation2d, .. }));
}

#[test]
fn test_malformed_cell_leaves_nothing_attached() {
    let mut source = MemorySource::new();
    source.insert_unstructured_grid(
        "ugrid",
        UnstructuredGridData {
            points: RawPoints::new((0..18).map(f64::from).collect(), false),
            faces: vec![
                vec![0, 1, 2, 3],
                vec![0, 1, 4, 5],
                vec![1, 2, 4],
                vec![2, 3, 5],
                vec![3, 0, 5],
            ],
            cell_faces: vec![vec![0, 1, 2, 3, 4]],
            cell_face_outward: vec![vec![true; 5]],
        },
    );
    let manifest = DocumentManifest::new("doc", "model.epc")
        .object(entry("ugrid", "doc", ObjectKind::UnstructuredGrid));

    let mut set = set();
    set.add_document(&manifest, Arc::new(source));
    let message = set.visualize("ugrid");
    assert!(message.contains("Malformed cell 0"), "{message}");
    assert!(set.composite()[0].blocks.is_empty());
    assert!(set.realized_geometry("ugrid").is_none());
}

#[test]
fn test_vector_property_is_rejected() {
    let mut source = MemorySource::new();
    source
        .insert_ijk_grid("grid", lattice(1, 1, 1))
        .insert_property(PropertyData {
            values_per_element: 3,
            ..cell_property("velocity", vec![0.0; 3])
        });
    let manifest = DocumentManifest::new("doc", "model.epc")
        .object(entry("grid", "doc", ObjectKind::IjkGrid))
        .object(entry("velocity", "grid", ObjectKind::Property));

    let mut set = set();
    set.add_document(&manifest, Arc::new(source));
    assert!(!set.visualize("velocity").is_empty());
    // The owner was realized and attached before the property failed
    assert_eq!(set.composite()[0].block_ids(), vec!["grid"]);
    assert!(set.loaded_properties("grid").is_empty());
}

/// Document `shared` defines the grid; `local` refers to it and selects two
/// of its cells
fn partial_reference_documents(set: &mut DocumentSet, declared: ObjectKind) -> Vec<Severity> {
    let mut shared = MemorySource::new();
    shared.insert_ijk_grid("G", lattice(2, 2, 2));
    let shared_manifest = DocumentManifest::new("shared", "shared.epc")
        .object(entry("G", "shared", ObjectKind::IjkGrid));
    set.add_document(&shared_manifest, Arc::new(shared));

    let mut local = MemorySource::new();
    local
        .insert_sub_representation(
            "sub",
            SubRepresentationData {
                element: IndexableElement::Cells,
                indices: vec![0, 7],
            },
        )
        .insert_property(cell_property("sub-poro", vec![0.1, 0.7]));
    let local_manifest = DocumentManifest::new("local", "local.epc")
        .object(ManifestEntry::partial_reference("G", "local", "G", declared))
        .object(entry("sub", "G", ObjectKind::SubRepresentation))
        .object(entry("sub-poro", "sub", ObjectKind::Property));
    set.add_document(&local_manifest, Arc::new(local))
        .diagnostics
        .iter()
        .map(|d| d.severity)
        .collect()
}

#[test]
fn test_sub_representation_over_partial_reference() {
    let mut set = set();
    let diagnostics = partial_reference_documents(&mut set, ObjectKind::IjkGrid);
    assert!(diagnostics.is_empty());

    assert_eq!(set.visualize("sub-poro"), "");
    let composite = set.composite();
    assert!(composite[0].blocks.is_empty());
    assert_eq!(composite[1].block_ids(), vec!["sub"]);
    assert_eq!(composite[1].blocks[0].cell_count(), 2);
    assert_eq!(set.loaded_properties("sub"), vec!["sub-poro".to_string()]);

    // The support was built on the side, never registered
    assert!(set.realized_geometry("G").is_none());

    // Once the support is shown it keeps its own, empty property list
    assert_eq!(set.visualize("G"), "");
    assert!(set.loaded_properties("G").is_empty());
    assert_eq!(set.composite()[0].block_ids(), vec!["G"]);
}

#[test]
fn test_partial_reference_kind_mismatch() {
    let mut set = set();
    let diagnostics = partial_reference_documents(&mut set, ObjectKind::UnstructuredGrid);
    assert_eq!(diagnostics, vec![Severity::Warning]);

    let tree = set.enumerate_tree();
    assert!(tree.iter().all(|r| r.id != "sub" && r.id != "sub-poro"));
    assert_eq!(tree.iter().filter(|r| r.id == "G").count(), 1);

    let message = set.visualize("sub");
    assert!(message.contains("Partial reference G"), "{message}");
    assert!(set.composite().iter().all(|c| c.blocks.is_empty()));
}

#[test]
fn test_partial_reference_resolves_when_target_arrives_later() {
    let mut set = set();
    let local_manifest = DocumentManifest::new("local", "local.epc")
        .object(ManifestEntry::partial_reference("G", "local", "G", ObjectKind::IjkGrid))
        .object(entry("sub", "G", ObjectKind::SubRepresentation));
    let mut local = MemorySource::new();
    local.insert_sub_representation(
        "sub",
        SubRepresentationData {
            element: IndexableElement::Cells,
            indices: vec![3],
        },
    );
    let report = set.add_document(&local_manifest, Arc::new(local));
    assert_eq!(report.diagnostics.len(), 1);
    assert!(set.enumerate_tree().iter().all(|r| r.id != "sub"));

    let mut shared = MemorySource::new();
    shared.insert_ijk_grid("G", lattice(2, 2, 2));
    let report = set.add_document(
        &DocumentManifest::new("shared", "shared.epc")
            .object(entry("G", "shared", ObjectKind::IjkGrid)),
        Arc::new(shared),
    );
    assert!(report.is_clean());
    assert!(set.enumerate_tree().iter().any(|r| r.id == "sub"));

    assert_eq!(set.visualize("sub"), "");
    assert_eq!(set.composite()[0].blocks[0].cell_count(), 1);

    // Dropping the target hides the dependents again
    set.take_dirty();
    set.remove_document("shared").unwrap();
    assert!(set.enumerate_tree().iter().all(|r| r.id != "sub"));
    assert!(set.composite()[0].blocks.is_empty());
    assert!(set.realized_geometry("sub").is_none());
    assert!(set.take_dirty());
    assert!(matches!(
        set.remove_document("shared"),
        Err(Error::DocumentNotFound(_))
    ));
}

#[test]
fn test_removing_a_shown_document_marks_the_set_dirty() {
    let mut set = set();
    grid_document(&mut set);
    let mut source = MemorySource::new();
    source.insert_ijk_grid("g2", lattice(1, 1, 1));
    set.add_document(
        &DocumentManifest::new("d2", "second.epc").object(entry("g2", "d2", ObjectKind::IjkGrid)),
        Arc::new(source),
    );

    assert_eq!(set.visualize("g2"), "");
    assert!(set.take_dirty());
    assert!(!set.take_dirty());

    set.remove_document("d2").unwrap();
    assert_eq!(set.composite().len(), 1);
    assert!(set.take_dirty());
    assert!(!set.take_dirty());

    // Nothing was shown, so nothing changed
    let mut source = MemorySource::new();
    source.insert_ijk_grid("g3", lattice(1, 1, 1));
    set.add_document(
        &DocumentManifest::new("d3", "third.epc").object(entry("g3", "d3", ObjectKind::IjkGrid)),
        Arc::new(source),
    );
    set.remove_document("d3").unwrap();
    assert!(!set.take_dirty());
}

fn well_documents(set: &mut DocumentSet) {
    let mut shared = MemorySource::new();
    shared.insert_trajectory(
        "T",
        TrajectoryData {
            points: RawPoints::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 100.0], true),
            measured_depths: vec![0.0, 100.0],
        },
    );
    set.add_document(
        &DocumentManifest::new("shared", "wells.epc")
            .object(entry("well", "shared", ObjectKind::Interpretation1d))
            .object(entry("T", "well", ObjectKind::WellboreTrajectory)),
        Arc::new(shared),
    );

    let mut local = MemorySource::new();
    local.insert_marker("top", WellboreMarkerData { measured_depth: 40.0 });
    set.add_document(
        &DocumentManifest::new("local", "picks.epc")
            .object(ManifestEntry::partial_reference(
                "T",
                "local",
                "T",
                ObjectKind::WellboreTrajectory,
            ))
            .object(entry("picks", "T", ObjectKind::WellboreMarkerFrame))
            .object(entry("top", "picks", ObjectKind::WellboreMarker)),
        Arc::new(local),
    );
}

#[test]
fn test_marker_through_partial_trajectory() {
    let mut set = set();
    well_documents(&mut set);

    assert_eq!(set.visualize("top"), "");
    let composite = set.composite();
    assert!(composite[0].blocks.is_empty());
    assert_eq!(composite[1].block_ids(), vec!["T"]);
    // Trajectory line plus the marker vertices
    assert_eq!(composite[1].blocks[0].parts.len(), 2);

    set.unvisualize("top");
    assert_eq!(set.composite()[1].blocks[0].parts.len(), 1);

    // Destroying the trajectory drops the block everywhere it is shown
    set.visualize("T");
    set.visualize("top");
    assert_eq!(set.composite()[0].block_ids(), vec!["T"]);
    set.unvisualize("T");
    assert!(set.composite().iter().all(|c| c.blocks.is_empty()));
}

#[test]
fn test_frames_attach_their_trajectory() {
    let mut source = MemorySource::new();
    source.insert_trajectory(
        "T",
        TrajectoryData {
            points: RawPoints::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 10.0], true),
            measured_depths: vec![0.0, 10.0],
        },
    );
    let manifest = DocumentManifest::new("doc", "model.epc")
        .object(entry("T", "doc", ObjectKind::WellboreTrajectory))
        .object(entry("frame", "T", ObjectKind::WellboreFrame))
        .object(entry("gr", "frame", ObjectKind::Property));

    let mut set = set();
    set.add_document(&manifest, Arc::new(source));

    let message = set.visualize("gr");
    assert!(message.contains("Unsupported property gr"), "{message}");
    assert!(set.composite()[0].blocks.is_empty());

    assert_eq!(set.visualize("frame"), "");
    assert_eq!(set.composite()[0].block_ids(), vec!["T"]);
    set.unvisualize("frame");
    assert_eq!(set.composite()[0].block_ids(), vec!["T"]);
}

#[test]
fn test_time_series_links() {
    let mut source = MemorySource::new();
    source
        .insert_ijk_grid("grid", lattice(1, 1, 1))
        .insert_property(cell_property("pressure", vec![250.0]))
        .insert_property(cell_property("saturation", vec![0.2]));
    let manifest = DocumentManifest::new("doc", "model.epc")
        .object(entry("grid", "doc", ObjectKind::IjkGrid))
        .object(entry("pressure", "grid", ObjectKind::Property))
        .object(entry("saturation", "grid", ObjectKind::Property))
        .time_series(TimeSeriesLink {
            series_id: "ts".into(),
            property_id: "pressure".into(),
            steps: vec![TimeStep {
                index: 3,
                timestamp: 1_700_000_000,
            }],
        })
        .time_series(TimeSeriesLink {
            series_id: "ts".into(),
            property_id: "saturation".into(),
            steps: vec![
                TimeStep { index: 0, timestamp: 0 },
                TimeStep { index: 1, timestamp: 10 },
            ],
        });

    let mut set = set();
    let report = set.add_document(&manifest, Arc::new(source));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].object_id.as_deref(), Some("saturation"));

    let pressure = set.lookup("pressure").unwrap();
    assert_eq!(pressure.kind, ObjectKind::TimeSeriesProperty);
    assert!(pressure.is_time_series_linked());
    assert_eq!(pressure.time_series_id.as_deref(), Some("ts"));
    assert_eq!(pressure.time_index, 3);
    assert!(!set.lookup("saturation").unwrap().is_time_series_linked());

    assert_eq!(set.visualize("pressure"), "");
    assert_eq!(set.loaded_properties("grid"), vec!["pressure".to_string()]);
}

#[test]
fn test_config_change_rebuilds_attached_blocks() {
    let mut set = set();
    grid_document(&mut set);
    set.visualize("surface");
    set.visualize("poro");
    let before = set.realized_geometry("grid").unwrap().instance();
    assert!(set.take_dirty());

    let err = set
        .set_config(ProcessingConfig {
            worker_index: 2,
            worker_count: 2,
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));

    set.set_config(ProcessingConfig {
        worker_index: 1,
        worker_count: 2,
    })
    .unwrap();
    assert!(set.take_dirty());

    let composite = set.composite();
    assert_eq!(composite[0].block_ids(), vec!["surface", "grid"]);
    let grid = set.realized_geometry("grid").unwrap();
    assert_ne!(grid.instance(), before);
    assert_eq!(grid.cell_count(), 4);
    assert_eq!(grid.cell_window.offset, 4);

    let properties = &composite[0].blocks[1].parts[0].properties;
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].values, PropertyValues::Real(vec![4.0, 5.0, 6.0, 7.0]));
}

#[test]
fn test_classify_and_tree_json() {
    let mut set = set();
    grid_document(&mut set);

    let record = set
        .classify("doc", "fault", "doc", "F1", ObjectKind::Interpretation2d)
        .unwrap();
    assert_eq!(record.parent_kind, ObjectKind::Document);
    assert!(set.classify("nope", "x", "nope", "x", ObjectKind::Grid2d).is_err());

    let json: serde_json::Value = serde_json::from_str(&set.tree_json().unwrap()).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), set.enumerate_tree().len());
    assert_eq!(records[0]["id"], "doc");
    assert!(records.iter().any(|r| r["id"] == "fault"));
}
