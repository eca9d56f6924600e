// reservoir-core/src/visibility/grid.rs

pub const HEX_NODE_COUNT: usize = 8;
pub const HEX_FACE_NODE_COUNT: usize = 24;

/// Element topology of one grid part.
pub trait ElementGrid: Sync {
    fn element_count(&self) -> usize;

    fn node_count(&self) -> usize;

    /// Structured `[i, j, k]` of an element, `None` for unstructured elements.
    fn ijk_from_element_index(&self, element: usize) -> Option<[usize; 3]>;

    fn element_nodes(&self, element: usize) -> &[usize];
}

/// Structured hexahedral part. Element `(i, j, k)` has index
/// `i + j * ni + k * ni * nj`; K increases downward.
#[derive(Clone, Debug)]
pub struct HexGridPart {
    dimensions: [usize; 3],
    nodes: Vec<[f64; 3]>,
    connectivity: Vec<usize>,
}

impl HexGridPart {
    /// Axis aligned grid starting at `origin` (top, south-west corner).
    pub fn regular(dimensions: [usize; 3], origin: [f64; 3], cell_size: [f64; 3]) -> Self {
        let [ni, nj, nk] = dimensions;
        let mut nodes = Vec::with_capacity((ni + 1) * (nj + 1) * (nk + 1));
        for k in 0..=nk {
            for j in 0..=nj {
                for i in 0..=ni {
                    nodes.push([
                        origin[0] + i as f64 * cell_size[0],
                        origin[1] + j as f64 * cell_size[1],
                        origin[2] - k as f64 * cell_size[2],
                    ]);
                }
            }
        }
        Self::from_nodes(dimensions, nodes)
    }

    /// Grid from corner point nodes laid out `i` fastest, then `j`, then `k`.
    pub fn from_nodes(dimensions: [usize; 3], nodes: Vec<[f64; 3]>) -> Self {
        let [ni, nj, nk] = dimensions;
        let node = |i: usize, j: usize, k: usize| i + j * (ni + 1) + k * (ni + 1) * (nj + 1);
        let mut connectivity = Vec::with_capacity(ni * nj * nk * HEX_NODE_COUNT);
        for k in 0..nk {
            for j in 0..nj {
                for i in 0..ni {
                    connectivity.extend_from_slice(&[
                        node(i, j, k),
                        node(i + 1, j, k),
                        node(i + 1, j + 1, k),
                        node(i, j + 1, k),
                        node(i, j, k + 1),
                        node(i + 1, j, k + 1),
                        node(i + 1, j + 1, k + 1),
                        node(i, j + 1, k + 1),
                    ]);
                }
            }
        }
        Self {
            dimensions,
            nodes,
            connectivity,
        }
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    pub fn element_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [ni, nj, _] = self.dimensions;
        i + j * ni + k * ni * nj
    }

    pub fn node(&self, index: usize) -> [f64; 3] {
        self.nodes[index]
    }
}

impl ElementGrid for HexGridPart {
    fn element_count(&self) -> usize {
        let [ni, nj, nk] = self.dimensions;
        ni * nj * nk
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn ijk_from_element_index(&self, element: usize) -> Option<[usize; 3]> {
        if element >= self.element_count() {
            return None;
        }
        let [ni, nj, _] = self.dimensions;
        Some([element % ni, (element / ni) % nj, element / (ni * nj)])
    }

    fn element_nodes(&self, element: usize) -> &[usize] {
        let start = element * HEX_NODE_COUNT;
        &self.connectivity[start..start + HEX_NODE_COUNT]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let grid = HexGridPart::regular([3, 2, 2], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        assert_eq!(grid.element_count(), 12);
        assert_eq!(grid.node_count(), 4 * 3 * 3);
        for element in 0..grid.element_count() {
            let [i, j, k] = grid.ijk_from_element_index(element).unwrap();
            assert_eq!(grid.element_index(i, j, k), element);
        }
        assert_eq!(grid.ijk_from_element_index(12), None);
    }

    #[test]
    fn test_hex_corner_positions() {
        let grid = HexGridPart::regular([2, 1, 1], [10.0, 20.0, -100.0], [5.0, 5.0, 2.0]);
        let nodes = grid.element_nodes(1);
        assert_eq!(grid.node(nodes[0]), [15.0, 20.0, -100.0]);
        assert_eq!(grid.node(nodes[6]), [20.0, 25.0, -102.0]);
    }
}
