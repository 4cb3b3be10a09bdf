//! Directed device connectivity.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::error::{ConvertError, ConvertResult};

/// Largest device a [`DirectedAdjacency`] is built for.
pub const MAX_ADJACENCY_QUBITS: u32 = 1 << 16;

/// Directed adjacency between physical qubits.
///
/// An edge `(a, b)` means a two-qubit interaction with `a` as control and
/// `b` as target is available.
#[derive(Debug, Clone, Default)]
pub struct DirectedAdjacency {
    graph: DiGraph<u32, (), u32>,
}

/// Serializable form of a [`DirectedAdjacency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacencyListing {
    /// Number of qubits.
    pub num_qubits: u32,
    /// Directed pairs.
    pub edges: Vec<(u32, u32)>,
}

/// Build the directed adjacency for a coupling list.
///
/// The qubit count is one past the highest index named. Repeated pairs are
/// kept once; `(a, b)` and `(b, a)` are distinct. Indices must be below
/// [`MAX_ADJACENCY_QUBITS`].
pub fn build_adjacency(pairs: &[(u32, u32)]) -> ConvertResult<DirectedAdjacency> {
    let mut num_qubits = 0;
    for &(a, b) in pairs {
        let highest = a.max(b);
        if highest >= MAX_ADJACENCY_QUBITS {
            return Err(ConvertError::QubitOutOfRange {
                index: highest,
                limit: MAX_ADJACENCY_QUBITS,
            });
        }
        num_qubits = num_qubits.max(highest + 1);
    }

    let mut graph = DiGraph::with_capacity(num_qubits as usize, pairs.len());
    for q in 0..num_qubits {
        graph.add_node(q);
    }
    for &(a, b) in pairs {
        let (a, b) = (NodeIndex::new(a as usize), NodeIndex::new(b as usize));
        if !graph.contains_edge(a, b) {
            graph.add_edge(a, b, ());
        }
    }
    Ok(DirectedAdjacency { graph })
}

impl DirectedAdjacency {
    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Directed pairs, in the order first given.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (e.source().index() as u32, e.target().index() as u32))
            .collect()
    }

    /// Check if `a -> b` is available.
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        let n = self.num_qubits();
        a < n
            && b < n
            && self
                .graph
                .contains_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize))
    }

    /// Qubits reachable from `q` in one directed step, ascending.
    pub fn successors(&self, q: u32) -> Vec<u32> {
        if q >= self.num_qubits() {
            return vec![];
        }
        let mut out: Vec<u32> = self
            .graph
            .neighbors(NodeIndex::new(q as usize))
            .map(|n| n.index() as u32)
            .collect();
        out.sort_unstable();
        out
    }

    /// Serializable form.
    pub fn to_listing(&self) -> AdjacencyListing {
        AdjacencyListing {
            num_qubits: self.num_qubits(),
            edges: self.edges(),
        }
    }
}
