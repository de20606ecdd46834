//! Edge topology of the per-frame interaction graph.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::internal::itertools::{combinations2, permutations2};

/// Whether object pairs are enumerated once or in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    /// Unordered pairs `(i, j)`, `i < j`: `n(n-1)/2` edges.
    #[default]
    Undirected,
    /// Ordered pairs `(i, j)`, `i != j`: `n(n-1)` edges.
    Directed,
}

impl GraphKind {
    /// Number of edges of the complete graph on `num_nodes` nodes.
    pub fn num_edges(self, num_nodes: usize) -> usize {
        let ordered = num_nodes * num_nodes.saturating_sub(1);
        match self {
            GraphKind::Undirected => ordered / 2,
            GraphKind::Directed => ordered,
        }
    }
}

/// Edge index of a complete graph, as a `2 x num_edges` matrix.
///
/// Row 0 holds source indices and row 1 target indices; column `k` is edge `k`
/// in canonical order (lexicographic over `0..num_nodes`). The topology only
/// depends on the node count, never on box contents.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeList {
    index: DMatrix<usize>,
    num_nodes: usize,
    kind: GraphKind,
}

impl EdgeList {
    /// Fully connected edge list over `num_nodes` nodes.
    pub fn complete(num_nodes: usize, kind: GraphKind) -> Self {
        let pairs = match kind {
            GraphKind::Undirected => combinations2(num_nodes),
            GraphKind::Directed => permutations2(num_nodes),
        };

        let index = DMatrix::from_fn(2, pairs.len(), |row, k| {
            if row == 0 { pairs[k].0 } else { pairs[k].1 }
        });

        Self { index, num_nodes, kind }
    }

    /// The `2 x num_edges` index matrix.
    pub fn index(&self) -> &DMatrix<usize> {
        &self.index
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.index.ncols()
    }

    /// Whether the graph has no edges (fewer than two nodes).
    pub fn is_empty(&self) -> bool {
        self.index.ncols() == 0
    }

    /// Number of nodes the edges were enumerated over.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Directed or undirected enumeration.
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Endpoints `(source, target)` of edge `k`.
    pub fn edge(&self, k: usize) -> (usize, usize) {
        (self.index[(0, k)], self.index[(1, k)])
    }

    /// Iterate over `(source, target)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len()).map(move |k| self.edge(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_order() {
        let edges = EdgeList::complete(4, GraphKind::Undirected);
        let pairs: Vec<_> = edges.iter().collect();

        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(edges.index().shape(), (2, 6));
        // Row 0 sources, row 1 targets
        assert_eq!(edges.index()[(0, 3)], 1);
        assert_eq!(edges.index()[(1, 3)], 2);
    }

    #[test]
    fn test_directed_order() {
        let edges = EdgeList::complete(3, GraphKind::Directed);
        let pairs: Vec<_> = edges.iter().collect();

        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)]);
        assert_eq!(edges.len(), GraphKind::Directed.num_edges(3));
    }

    #[test]
    fn test_edge_count_invariant() {
        for k in 0..25 {
            let edges = EdgeList::complete(k, GraphKind::Undirected);
            assert_eq!(edges.len(), k * k.saturating_sub(1) / 2);
            assert!(edges.iter().all(|(i, j)| i < j && j < k));
        }
    }

    #[test]
    fn test_degenerate_node_counts() {
        for n in [0, 1] {
            let edges = EdgeList::complete(n, GraphKind::Undirected);
            assert!(edges.is_empty());
            assert_eq!(edges.index().shape(), (2, 0));
        }
    }
}
