// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tests for cell canonicalization.

use super::*;

/// Faces of the unit cube, nodes 0-3 at z=0 and 4-7 at z=1, all wound outward
fn unit_cube() -> (Vec<Vec<u64>>, Vec<bool>) {
    let faces = vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![2, 3, 7, 6],
        vec![3, 0, 4, 7],
    ];
    (faces, vec![true; 6])
}

fn same_cycle(a: &[u64], b: &[u64]) -> bool {
    a.len() == b.len() && (0..a.len()).any(|shift| (0..a.len()).all(|i| a[(i + shift) % a.len()] == b[i]))
}

#[test]
fn test_tetrahedron_reverses_outward_base() {
    let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
    let cell = canonicalize_cell(0, &faces, &[true, true, true, true]).unwrap();
    let CanonicalCell::Tetrahedron(nodes) = &cell else {
        panic!("expected tetrahedron, got {cell:?}");
    };
    assert!(same_cycle(&nodes[..3], &[1, 2, 0]));
    assert_eq!(nodes[3], 3);
}

#[test]
fn test_tetrahedron_keeps_inward_base() {
    let faces = vec![vec![0, 1, 2], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
    let cell = canonicalize_cell(0, &faces, &[false, true, true, true]).unwrap();
    assert_eq!(cell, CanonicalCell::Tetrahedron([0, 1, 2, 3]));
}

#[test]
fn test_pyramid() {
    let faces = vec![
        vec![0, 4, 1],
        vec![0, 3, 2, 1],
        vec![1, 4, 2],
        vec![2, 4, 3],
        vec![3, 4, 0],
    ];
    let cell = canonicalize_cell(7, &faces, &[true; 5]).unwrap();
    assert_eq!(cell, CanonicalCell::Pyramid([1, 2, 3, 0, 4]));
    assert_eq!(cell.cell_type(), CellType::Pyramid);
}

#[test]
fn test_wedge_keeps_outward_base() {
    let faces = vec![
        vec![0, 1, 4, 3],
        vec![0, 2, 1],
        vec![1, 2, 5, 4],
        vec![3, 4, 5],
        vec![2, 0, 3, 5],
    ];
    let cell = canonicalize_cell(0, &faces, &[true; 5]).unwrap();
    assert_eq!(cell, CanonicalCell::Wedge([0, 2, 1, 3, 5, 4]));
}

#[test]
fn test_wedge_reverses_inward_base() {
    let faces = vec![
        vec![0, 1, 2],
        vec![0, 1, 4, 3],
        vec![1, 2, 5, 4],
        vec![3, 4, 5],
        vec![2, 0, 3, 5],
    ];
    let cell = canonicalize_cell(0, &faces, &[false, true, true, true, true]).unwrap();
    assert_eq!(cell, CanonicalCell::Wedge([2, 1, 0, 5, 4, 3]));
}

#[test]
fn test_five_faces_with_two_quads_is_malformed() {
    let faces = vec![
        vec![0, 1, 2, 3],
        vec![0, 1, 4, 5],
        vec![1, 2, 4],
        vec![2, 3, 5],
        vec![3, 0, 5],
    ];
    let err = canonicalize_cell(12, &faces, &[true; 5]).unwrap_err();
    assert!(matches!(err, Error::MalformedCell { cell: 12, .. }));
}

#[test]
fn test_hexahedron_from_unit_cube() {
    let (faces, outward) = unit_cube();
    let cell = canonicalize_cell(0, &faces, &outward).unwrap();
    assert_eq!(cell, CanonicalCell::Hexahedron([1, 2, 3, 0, 5, 6, 7, 4]));
}

#[test]
fn test_hexahedron_with_inward_base_flag() {
    let (mut faces, mut outward) = unit_cube();
    faces[0] = vec![0, 1, 2, 3];
    outward[0] = false;
    let cell = canonicalize_cell(0, &faces, &outward).unwrap();
    assert_eq!(cell, CanonicalCell::Hexahedron([0, 1, 2, 3, 4, 5, 6, 7]));
}

#[test]
fn test_hexahedron_with_broken_adjacency_is_malformed() {
    let (mut faces, outward) = unit_cube();
    // Every side face loses its link to base node 0
    faces[2] = vec![8, 1, 5, 9];
    faces[5] = vec![3, 10, 11, 7];
    let err = canonicalize_cell(3, &faces, &outward).unwrap_err();
    assert!(matches!(err, Error::MalformedCell { cell: 3, .. }));
}

#[test]
fn test_six_faces_with_pentagon_falls_back() {
    let faces = vec![
        vec![0, 1, 2, 3, 8],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![2, 3, 7, 6],
        vec![3, 8, 0, 4, 7],
    ];
    let cell = canonicalize_cell(0, &faces, &[true; 6]).unwrap();
    let CanonicalCell::Polyhedron(out) = &cell else {
        panic!("expected polyhedron, got {cell:?}");
    };
    let out: Vec<Vec<u64>> = out.iter().map(|f| f.to_vec()).collect();
    assert_eq!(out, faces);

    let stream = cell.face_stream().unwrap();
    assert_eq!(&stream[..7], &[6, 5, 0, 1, 2, 3, 8]);
    // face count, one size per face, then 26 node ids
    assert_eq!(stream.len(), 1 + 6 + 26);
}

#[test]
fn test_unsupported_face_counts_fall_back() {
    let faces = vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1]];
    let cell = canonicalize_cell(0, &faces, &[true; 3]).unwrap();
    assert_eq!(cell.cell_type(), CellType::Polyhedron);

    let nine: Vec<Vec<u64>> = (0..9).map(|i| vec![i, i + 1, i + 2]).collect();
    let cell = canonicalize_cell(0, &nine, &[false; 9]).unwrap();
    assert_eq!(cell.cell_type(), CellType::Polyhedron);
}

#[test]
fn test_mismatched_flag_count_is_malformed() {
    let (faces, _) = unit_cube();
    assert!(canonicalize_cell(0, &faces, &[true; 5]).is_err());
}

#[test]
fn test_into_cell() {
    let (faces, outward) = unit_cube();
    let cell = canonicalize_cell(0, &faces, &outward).unwrap().into_cell();
    assert_eq!(cell.cell_type, CellType::Hexahedron);
    assert!(cell.cell_type.is_volumetric());
    assert_eq!(cell.cell_type.fixed_node_count(), Some(cell.nodes.len()));
    assert!(cell.faces.is_empty());
}
