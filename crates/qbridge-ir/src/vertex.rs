//! Vertex/edge circuit representation.
//!
//! Every operation instance is a vertex with numbered input and output
//! ports. An edge joins one output port to one input port; a qubit line is
//! the path that starts at an `Input` vertex and ends at an `Output` vertex.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::optype::{OpDescriptor, OpKind};

/// Vertex index type.
pub type VertexIndex = PetNodeIndex<u32>;

/// Zero-based port position on a vertex.
pub type Port = usize;

/// Port pair carried by a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortEdge {
    /// Output port on the source vertex.
    pub source_port: Port,
    /// Input port on the target vertex.
    pub target_port: Port,
}

/// A fully resolved edge, with plain vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source vertex index.
    pub source: usize,
    /// Output port on the source.
    pub source_port: Port,
    /// Target vertex index.
    pub target: usize,
    /// Input port on the target.
    pub target_port: Port,
}

/// Serializable form of a vertex circuit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexListing {
    /// Vertices, position = vertex index.
    pub vertices: Vec<OpDescriptor>,
    /// Edges between vertex ports.
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// A circuit as vertices joined port-to-port.
#[derive(Debug, Clone, Default)]
pub struct VertexCircuit {
    graph: DiGraph<OpDescriptor, PortEdge, u32>,
    /// Input vertices in creation order; position = qubit line.
    inputs: Vec<VertexIndex>,
}

impl VertexCircuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a circuit from its listing.
    pub fn from_listing(listing: &VertexListing) -> IrResult<Self> {
        let mut circ = Self::new();
        for op in &listing.vertices {
            circ.add_vertex(op.clone());
        }
        for e in &listing.edges {
            circ.add_edge(
                VertexIndex::new(e.source),
                e.source_port,
                VertexIndex::new(e.target),
                e.target_port,
            )?;
        }
        Ok(circ)
    }

    /// Serializable form of this circuit.
    pub fn to_listing(&self) -> VertexListing {
        VertexListing {
            vertices: self.graph.node_weights().cloned().collect(),
            edges: self.edges().collect(),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, op: OpDescriptor) -> VertexIndex {
        let is_input = op.kind == OpKind::Input;
        let v = self.graph.add_node(op);
        if is_input {
            self.inputs.push(v);
        }
        v
    }

    /// Join output port `source_port` of `source` to input port
    /// `target_port` of `target`.
    ///
    /// Each port takes at most one edge.
    pub fn add_edge(
        &mut self,
        source: VertexIndex,
        source_port: Port,
        target: VertexIndex,
        target_port: Port,
    ) -> IrResult<()> {
        let src_op = self.op(source).ok_or(IrError::InvalidNode(source.index()))?;
        let tgt_op = self.op(target).ok_or(IrError::InvalidNode(target.index()))?;

        if source_port >= src_op.n_outputs {
            return Err(IrError::InvalidPort {
                vertex: source.index(),
                port: source_port,
                reason: format!("{} has {} output ports", src_op.kind, src_op.n_outputs),
            });
        }
        if target_port >= tgt_op.n_inputs {
            return Err(IrError::InvalidPort {
                vertex: target.index(),
                port: target_port,
                reason: format!("{} has {} input ports", tgt_op.kind, tgt_op.n_inputs),
            });
        }
        if self.out_edge(source, source_port).is_some() {
            return Err(IrError::InvalidPort {
                vertex: source.index(),
                port: source_port,
                reason: "output port already wired".into(),
            });
        }
        if self.in_edge(target, target_port).is_some() {
            return Err(IrError::InvalidPort {
                vertex: target.index(),
                port: target_port,
                reason: "input port already wired".into(),
            });
        }

        self.graph.add_edge(
            source,
            target,
            PortEdge {
                source_port,
                target_port,
            },
        );
        Ok(())
    }

    /// The operation at a vertex.
    #[inline]
    pub fn op(&self, v: VertexIndex) -> Option<&OpDescriptor> {
        self.graph.node_weight(v)
    }

    /// Where output port `port` of `v` leads, as `(target, target_port)`.
    pub fn out_edge(&self, v: VertexIndex, port: Port) -> Option<(VertexIndex, Port)> {
        self.graph
            .edges_directed(v, Direction::Outgoing)
            .find(|e| e.weight().source_port == port)
            .map(|e| (e.target(), e.weight().target_port))
    }

    /// Where input port `port` of `v` comes from, as `(source, source_port)`.
    pub fn in_edge(&self, v: VertexIndex, port: Port) -> Option<(VertexIndex, Port)> {
        self.graph
            .edges_directed(v, Direction::Incoming)
            .find(|e| e.weight().target_port == port)
            .map(|e| (e.source(), e.weight().source_port))
    }

    /// Iterate over vertices in index order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexIndex, &OpDescriptor)> + '_ {
        self.graph
            .node_indices()
            .map(move |v| (v, &self.graph[v]))
    }

    /// Iterate over edges.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        self.graph.edge_references().map(|e| EdgeRecord {
            source: e.source().index(),
            source_port: e.weight().source_port,
            target: e.target().index(),
            target_port: e.weight().target_port,
        })
    }

    /// Input vertices; position is the qubit line number.
    pub fn inputs(&self) -> &[VertexIndex] {
        &self.inputs
    }

    /// Number of qubits, i.e. of `Input` vertices.
    #[inline]
    pub fn n_qubits(&self) -> usize {
        self.inputs.len()
    }

    /// Number of vertices.
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.graph.edge_count()
    }
}
