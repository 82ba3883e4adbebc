// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyhedral cell canonicalization
//!
//! Unstructured grids describe every cell as a set of polygonal faces, each
//! with a flag telling whether the right-hand-rule normal of its node order
//! points out of the cell. Renderers want fixed node orderings instead, so
//! each cell is matched against the canonical solid shapes by face count:
//!
//! | faces | shape                                   | precondition            |
//! |-------|-----------------------------------------|-------------------------|
//! | 4     | tetrahedron                             | none                    |
//! | 5     | wedge (3 quads) or pyramid (1 quad)     | mandatory, else error   |
//! | 6     | hexahedron                              | all faces are quads     |
//! | 7     | pentagonal prism                        | 2 pentagons, 5 quads    |
//! | 8     | hexagonal prism                         | 2 hexagons, 6 quads     |
//!
//! Anything else becomes a generic polyhedron carrying the faces verbatim.
//!
//! Base faces are oriented from their own flag. Side and top nodes are found
//! by walking the faces adjacent to the base, so they inherit the base's
//! orientation.

#[cfg(test)]
mod tests;

use crate::cell::{Cell, CellType, FaceNodes};
use crate::{Error, Result};
use smallvec::SmallVec;

/// Faces inspected (base included) before the prism walk may stop early
const MIN_INSPECTED_FACES: usize = 4;

/// The most specific shape a face-based cell matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalCell {
    Tetrahedron([u64; 4]),
    Pyramid([u64; 5]),
    Wedge([u64; 6]),
    Hexahedron([u64; 8]),
    PentagonalPrism([u64; 10]),
    HexagonalPrism([u64; 12]),
    /// Faces in source order, node order untouched
    Polyhedron(Vec<FaceNodes>),
}

impl CanonicalCell {
    pub fn cell_type(&self) -> CellType {
        match self {
            Self::Tetrahedron(_) => CellType::Tetrahedron,
            Self::Pyramid(_) => CellType::Pyramid,
            Self::Wedge(_) => CellType::Wedge,
            Self::Hexahedron(_) => CellType::Hexahedron,
            Self::PentagonalPrism(_) => CellType::PentagonalPrism,
            Self::HexagonalPrism(_) => CellType::HexagonalPrism,
            Self::Polyhedron(_) => CellType::Polyhedron,
        }
    }

    /// Node ordering of fixed shapes; empty for polyhedra
    pub fn nodes(&self) -> &[u64] {
        match self {
            Self::Tetrahedron(n) => n,
            Self::Pyramid(n) => n,
            Self::Wedge(n) => n,
            Self::Hexahedron(n) => n,
            Self::PentagonalPrism(n) => n,
            Self::HexagonalPrism(n) => n,
            Self::Polyhedron(_) => &[],
        }
    }

    /// VTK polyhedron face stream: `[face_count, n0, ids.., n1, ids.., ..]`
    pub fn face_stream(&self) -> Option<Vec<u64>> {
        let Self::Polyhedron(faces) = self else {
            return None;
        };
        let mut stream = Vec::with_capacity(1 + faces.iter().map(|f| f.len() + 1).sum::<usize>());
        stream.push(faces.len() as u64);
        for face in faces {
            stream.push(face.len() as u64);
            stream.extend_from_slice(face);
        }
        Some(stream)
    }

    pub fn into_cell(self) -> Cell {
        match self {
            Self::Polyhedron(faces) => Cell::polyhedron(faces),
            fixed => {
                let cell_type = fixed.cell_type();
                Cell::new(cell_type, fixed.nodes().iter().copied())
            }
        }
    }
}

/// Canonicalize one cell.
///
/// `faces[i]` is the cyclic node list of the cell's i-th face and
/// `outward[i]` tells whether its right-hand-rule normal points out of the
/// cell. `cell` is only used for diagnostics.
pub fn canonicalize_cell<F: AsRef<[u64]>>(
    cell: u64,
    faces: &[F],
    outward: &[bool],
) -> Result<CanonicalCell> {
    if faces.len() != outward.len() {
        return Err(Error::malformed(
            cell,
            format!(
                "{} faces but {} orientation flags",
                faces.len(),
                outward.len()
            ),
        ));
    }

    match faces.len() {
        4 => tetrahedron(cell, faces, outward),
        5 => wedge_or_pyramid(cell, faces, outward),
        6 if count_faces_with(faces, 4) == 6 => {
            let nodes = prism(cell, faces, 0, orient(faces[0].as_ref(), outward[0]))?;
            Ok(CanonicalCell::Hexahedron(to_array(cell, &nodes)?))
        }
        7 if count_faces_with(faces, 5) == 2 && count_faces_with(faces, 4) == 5 => {
            let base = first_face_with(faces, 5).unwrap_or(0);
            let nodes = prism(cell, faces, base, orient(faces[base].as_ref(), outward[base]))?;
            Ok(CanonicalCell::PentagonalPrism(to_array(cell, &nodes)?))
        }
        8 if count_faces_with(faces, 6) == 2 && count_faces_with(faces, 4) == 6 => {
            let base = first_face_with(faces, 6).unwrap_or(0);
            let nodes = prism(cell, faces, base, orient(faces[base].as_ref(), outward[base]))?;
            Ok(CanonicalCell::HexagonalPrism(to_array(cell, &nodes)?))
        }
        _ => Ok(polyhedron(faces)),
    }
}

fn tetrahedron<F: AsRef<[u64]>>(cell: u64, faces: &[F], outward: &[bool]) -> Result<CanonicalCell> {
    let base_face = faces[0].as_ref();
    if base_face.len() != 3 {
        return Err(Error::malformed(
            cell,
            format!("tetrahedron face 0 has {} nodes", base_face.len()),
        ));
    }
    // Node 3 must sit on the side the base normal points to
    let base = orient(base_face, outward[0]);
    let apex = unmatched_node(faces[1].as_ref(), &base)
        .ok_or_else(|| Error::malformed(cell, "tetrahedron faces 0 and 1 share all nodes"))?;
    Ok(CanonicalCell::Tetrahedron([base[0], base[1], base[2], apex]))
}

fn wedge_or_pyramid<F: AsRef<[u64]>>(
    cell: u64,
    faces: &[F],
    outward: &[bool],
) -> Result<CanonicalCell> {
    match count_faces_with(faces, 4) {
        3 => {
            let base = first_face_with(faces, 3)
                .ok_or_else(|| Error::malformed(cell, "wedge without triangular face"))?;
            // Wedge base normal points away from the opposite triangle
            let oriented = orient(faces[base].as_ref(), !outward[base]);
            let nodes = prism(cell, faces, base, oriented)?;
            Ok(CanonicalCell::Wedge(to_array(cell, &nodes)?))
        }
        1 => {
            let base = first_face_with(faces, 4)
                .ok_or_else(|| Error::malformed(cell, "pyramid without quadrilateral face"))?;
            let oriented = orient(faces[base].as_ref(), outward[base]);
            let side = first_face_with(faces, 3)
                .ok_or_else(|| Error::malformed(cell, "pyramid without triangular face"))?;
            let apex = unmatched_node(faces[side].as_ref(), &oriented)
                .ok_or_else(|| Error::malformed(cell, "pyramid apex not found"))?;
            Ok(CanonicalCell::Pyramid([
                oriented[0],
                oriented[1],
                oriented[2],
                oriented[3],
                apex,
            ]))
        }
        quads => Err(Error::malformed(
            cell,
            format!("5-face cell with {quads} quadrilateral faces is neither a wedge nor a pyramid"),
        )),
    }
}

fn polyhedron<F: AsRef<[u64]>>(faces: &[F]) -> CanonicalCell {
    CanonicalCell::Polyhedron(
        faces
            .iter()
            .map(|face| face.as_ref().iter().copied().collect())
            .collect(),
    )
}

/// Node order of a base face whose normal must point into the cell.
///
/// Reversed whenever the face's own normal points outward.
#[inline]
fn orient(face: &[u64], reverse: bool) -> SmallVec<[u64; 6]> {
    if reverse {
        face.iter().rev().copied().collect()
    } else {
        face.iter().copied().collect()
    }
}

/// Base nodes followed by the node across the side faces from each of them.
///
/// For every base node appearing in another face, the cyclic neighbour in
/// that face which is not a base node is its opposite. Each opposite node is
/// assigned once.
fn prism<F: AsRef<[u64]>>(
    cell: u64,
    faces: &[F],
    base_index: usize,
    base: SmallVec<[u64; 6]>,
) -> Result<SmallVec<[u64; 12]>> {
    let n = base.len();
    let mut top: SmallVec<[u64; 6]> = SmallVec::from_elem(0, n);
    let mut resolved: SmallVec<[bool; 6]> = SmallVec::from_elem(false, n);
    let mut inspected = 1;

    for (face_index, face) in faces.iter().enumerate() {
        if face_index == base_index {
            continue;
        }
        inspected += 1;
        let face = face.as_ref();
        let m = face.len();
        for (position, node) in face.iter().enumerate() {
            let Some(slot) = base.iter().position(|b| b == node) else {
                continue;
            };
            if resolved[slot] {
                continue;
            }
            let previous = face[(position + m - 1) % m];
            let next = face[(position + 1) % m];
            let opposite = if !base.contains(&previous) {
                Some(previous)
            } else if !base.contains(&next) {
                Some(next)
            } else {
                None
            };
            if let Some(opposite) = opposite {
                top[slot] = opposite;
                resolved[slot] = true;
            }
        }
        if inspected >= MIN_INSPECTED_FACES && resolved.iter().all(|&r| r) {
            break;
        }
    }

    if let Some(missing) = resolved.iter().position(|&r| !r) {
        return Err(Error::malformed(
            cell,
            format!("no side face links base node {} to the opposite face", base[missing]),
        ));
    }
    for (i, node) in top.iter().enumerate() {
        if top[..i].contains(node) {
            return Err(Error::malformed(
                cell,
                format!("node {node} is opposite to two base nodes"),
            ));
        }
    }

    let mut nodes: SmallVec<[u64; 12]> = SmallVec::with_capacity(2 * n);
    nodes.extend_from_slice(&base);
    nodes.extend_from_slice(&top);
    Ok(nodes)
}

#[inline]
fn unmatched_node(face: &[u64], known: &[u64]) -> Option<u64> {
    face.iter().copied().find(|node| !known.contains(node))
}

#[inline]
fn count_faces_with<F: AsRef<[u64]>>(faces: &[F], node_count: usize) -> usize {
    faces
        .iter()
        .filter(|face| face.as_ref().len() == node_count)
        .count()
}

#[inline]
fn first_face_with<F: AsRef<[u64]>>(faces: &[F], node_count: usize) -> Option<usize> {
    faces
        .iter()
        .position(|face| face.as_ref().len() == node_count)
}

fn to_array<const N: usize>(cell: u64, nodes: &[u64]) -> Result<[u64; N]> {
    nodes.try_into().map_err(|_| {
        Error::malformed(cell, format!("expected {N} nodes, found {}", nodes.len()))
    })
}
