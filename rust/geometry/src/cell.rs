// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cell data structures

use smallvec::SmallVec;

/// Node list of a single cell; hexagonal prisms are the largest fixed shape
pub type CellNodes = SmallVec<[u64; 12]>;

/// Node list of a single polygonal face
pub type FaceNodes = SmallVec<[u64; 8]>;

/// Cell shapes understood by the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Vertex,
    Line,
    PolyLine,
    Triangle,
    Polygon,
    Quad,
    Tetrahedron,
    Hexahedron,
    Wedge,
    Pyramid,
    PentagonalPrism,
    HexagonalPrism,
    Polyhedron,
}

impl CellType {
    /// VTK cell type code
    pub fn vtk_type_id(&self) -> u8 {
        match self {
            Self::Vertex => 1,
            Self::Line => 3,
            Self::PolyLine => 4,
            Self::Triangle => 5,
            Self::Polygon => 7,
            Self::Quad => 9,
            Self::Tetrahedron => 10,
            Self::Hexahedron => 12,
            Self::Wedge => 13,
            Self::Pyramid => 14,
            Self::PentagonalPrism => 15,
            Self::HexagonalPrism => 16,
            Self::Polyhedron => 42,
        }
    }

    /// Number of nodes for fixed-size shapes, `None` for variable ones
    pub fn fixed_node_count(&self) -> Option<usize> {
        match self {
            Self::Vertex => Some(1),
            Self::Line => Some(2),
            Self::Triangle => Some(3),
            Self::Quad | Self::Tetrahedron => Some(4),
            Self::Pyramid => Some(5),
            Self::Wedge => Some(6),
            Self::Hexahedron => Some(8),
            Self::PentagonalPrism => Some(10),
            Self::HexagonalPrism => Some(12),
            Self::PolyLine | Self::Polygon | Self::Polyhedron => None,
        }
    }

    #[inline]
    pub fn is_volumetric(&self) -> bool {
        matches!(
            self,
            Self::Tetrahedron
                | Self::Hexahedron
                | Self::Wedge
                | Self::Pyramid
                | Self::PentagonalPrism
                | Self::HexagonalPrism
                | Self::Polyhedron
        )
    }
}

/// A cell of realized geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub cell_type: CellType,
    /// Point indices in the canonical order of `cell_type`
    pub nodes: CellNodes,
    /// Face list, only populated for polyhedra
    pub faces: Vec<FaceNodes>,
}

impl Cell {
    /// Create a cell with a fixed node ordering
    pub fn new(cell_type: CellType, nodes: impl IntoIterator<Item = u64>) -> Self {
        Self {
            cell_type,
            nodes: nodes.into_iter().collect(),
            faces: Vec::new(),
        }
    }

    /// Create a polyhedron from its faces; nodes are the distinct face nodes
    /// in first-seen order
    pub fn polyhedron(faces: Vec<FaceNodes>) -> Self {
        let mut nodes = CellNodes::new();
        for face in &faces {
            for &node in face {
                if !nodes.contains(&node) {
                    nodes.push(node);
                }
            }
        }
        Self {
            cell_type: CellType::Polyhedron,
            nodes,
            faces,
        }
    }

    /// Rewrite every point index through `map`
    pub fn remap(&self, mut map: impl FnMut(u64) -> u64) -> Self {
        Self {
            cell_type: self.cell_type,
            nodes: self.nodes.iter().map(|&n| map(n)).collect(),
            faces: self
                .faces
                .iter()
                .map(|face| face.iter().map(|&n| map(n)).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_polyhedron_nodes_are_distinct() {
        let faces: Vec<FaceNodes> = vec![smallvec![0, 1, 2], smallvec![0, 2, 3], smallvec![1, 2, 3]];
        let cell = Cell::polyhedron(faces);
        assert_eq!(cell.nodes.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(cell.cell_type.vtk_type_id(), 42);
        assert!(cell.cell_type.is_volumetric());
        assert_eq!(cell.cell_type.fixed_node_count(), None);
    }

    #[test]
    fn test_remap() {
        let cell = Cell::new(CellType::Triangle, [4, 5, 6]);
        let remapped = cell.remap(|n| n - 4);
        assert_eq!(remapped.nodes.as_slice(), &[0, 1, 2]);
        assert!(!remapped.cell_type.is_volumetric());
        assert_eq!(remapped.cell_type.fixed_node_count(), Some(3));
    }
}
