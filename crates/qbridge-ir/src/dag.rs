//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bit::{Clbit, Qubit, Register};
use crate::error::{IrError, IrResult};
use crate::operation::{BasisElement, Operation};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node.
    Op(Operation),
}

impl DagNode {
    /// Check if this is an input node.
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, DagNode::In(_))
    }

    /// Check if this is an output node.
    #[inline]
    pub fn is_output(&self) -> bool {
        matches!(self, DagNode::Out(_))
    }

    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the operation if this is an operation node.
    #[inline]
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            DagNode::Op(op) => Some(op),
            _ => None,
        }
    }

    /// Get the wire if this is an input or output node.
    #[inline]
    pub fn wire(&self) -> Option<&WireId> {
        match self {
            DagNode::In(w) | DagNode::Out(w) => Some(w),
            DagNode::Op(_) => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(Qubit),
    /// A classical wire.
    Clbit(Clbit),
}

impl WireId {
    /// The qubit carried by this wire, if it is quantum.
    pub fn as_qubit(&self) -> Option<&Qubit> {
        match self {
            WireId::Qubit(q) => Some(q),
            WireId::Clbit(_) => None,
        }
    }
}

impl From<Qubit> for WireId {
    fn from(q: Qubit) -> Self {
        WireId::Qubit(q)
    }
}

impl From<Clbit> for WireId {
    fn from(c: Clbit) -> Self {
        WireId::Clbit(c)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Qubit(q) => write!(f, "{q}"),
            WireId::Clbit(c) => write!(f, "{c}"),
        }
    }
}

/// An edge in the circuit DAG representing a wire segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge carries.
    pub wire: WireId,
}

/// Serializable form of a DAG: registers plus operations in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DagListing {
    /// Quantum registers, in declaration order.
    pub qregs: Vec<Register>,
    /// Classical registers, in declaration order.
    #[serde(default)]
    pub cregs: Vec<Register>,
    /// Operations in application order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// DAG-based circuit representation.
///
/// The circuit is represented as a directed acyclic graph where:
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Edges represent wires (quantum or classical)
/// - Each wire has exactly one input and one output node
/// - Operations are connected to wires in topological order
///
/// Registers are kept in declaration order, so [`DagCircuit::qubits`]
/// enumerates qubits register by register. Every operation name must be
/// declared in the circuit's basis before it is applied.
#[derive(Debug, Clone, Default)]
pub struct DagCircuit {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Quantum registers, in declaration order.
    qregs: Vec<Register>,
    /// Classical registers, in declaration order.
    cregs: Vec<Register>,
    /// Map from wire to its input node.
    inputs: FxHashMap<WireId, NodeIndex>,
    /// Map from wire to its output node.
    outputs: FxHashMap<WireId, NodeIndex>,
    /// Wire front: maps each wire to the node just before the output node.
    wire_front: FxHashMap<WireId, NodeIndex>,
    /// Declared operation signatures.
    basis: FxHashMap<String, BasisElement>,
}

impl DagCircuit {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a DAG from its listing, declaring every operation in the basis.
    pub fn from_listing(listing: &DagListing) -> IrResult<Self> {
        let mut dag = Self::new();
        for reg in &listing.qregs {
            dag.add_qreg(reg.clone())?;
        }
        for reg in &listing.cregs {
            dag.add_creg(reg.clone())?;
        }
        for op in &listing.operations {
            dag.add_basis_element(op.basis_element())?;
            dag.apply_operation_back(op.clone())?;
        }
        Ok(dag)
    }

    /// Registers and operations of this DAG, operations in topological order.
    pub fn to_listing(&self) -> IrResult<DagListing> {
        Ok(DagListing {
            qregs: self.qregs.clone(),
            cregs: self.cregs.clone(),
            operations: self
                .topological_ops()?
                .into_iter()
                .map(|(_, op)| op.clone())
                .collect(),
        })
    }

    /// Add a quantum register, creating one wire per qubit.
    pub fn add_qreg(&mut self, reg: Register) -> IrResult<()> {
        if self.qreg(&reg.name).is_some() {
            return Err(IrError::DuplicateRegister(reg.name));
        }
        for qubit in reg.qubits() {
            self.add_wire(WireId::Qubit(qubit));
        }
        self.qregs.push(reg);
        Ok(())
    }

    /// Add a classical register, creating one wire per bit.
    pub fn add_creg(&mut self, reg: Register) -> IrResult<()> {
        if self.creg(&reg.name).is_some() {
            return Err(IrError::DuplicateRegister(reg.name));
        }
        for clbit in reg.clbits() {
            self.add_wire(WireId::Clbit(clbit));
        }
        self.cregs.push(reg);
        Ok(())
    }

    /// Grow a classical register to `size` bits, adding the new wires.
    ///
    /// Registers never shrink; a smaller `size` is a no-op.
    pub fn grow_creg(&mut self, name: &str, size: u32) -> IrResult<()> {
        let pos = self
            .cregs
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))?;
        let old_size = self.cregs[pos].size;
        for index in old_size..size {
            self.add_wire(WireId::Clbit(Clbit::new(name, index)));
        }
        self.cregs[pos].size = old_size.max(size);
        Ok(())
    }

    fn add_wire(&mut self, wire: WireId) {
        let in_node = self.graph.add_node(DagNode::In(wire.clone()));
        let out_node = self.graph.add_node(DagNode::Out(wire.clone()));
        self.graph.add_edge(in_node, out_node, DagEdge { wire: wire.clone() });
        self.inputs.insert(wire.clone(), in_node);
        self.outputs.insert(wire.clone(), out_node);
        // Initially the input node is the predecessor of the output.
        self.wire_front.insert(wire, in_node);
    }

    /// Declare an operation signature.
    ///
    /// Re-declaring a name with the same signature is a no-op.
    pub fn add_basis_element(&mut self, element: BasisElement) -> IrResult<()> {
        match self.basis.get(&element.name) {
            Some(existing) if *existing != element => Err(IrError::BasisMismatch {
                name: element.name.clone(),
                expected: existing.to_string(),
                got: element.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.basis.insert(element.name.clone(), element);
                Ok(())
            }
        }
    }

    /// Look up the declared signature of an operation name.
    pub fn basis_element(&self, name: &str) -> Option<&BasisElement> {
        self.basis.get(name)
    }

    /// Append an operation at the end of its wires.
    pub fn apply_operation_back(&mut self, op: Operation) -> IrResult<NodeIndex> {
        let declared = self
            .basis
            .get(&op.name)
            .ok_or_else(|| IrError::UndeclaredOperation(op.name.clone()))?;
        let used = op.basis_element();
        if *declared != used {
            return Err(IrError::BasisMismatch {
                name: op.name.clone(),
                expected: declared.to_string(),
                got: used.to_string(),
            });
        }

        for qubit in &op.qargs {
            if !self.has_qubit(qubit) {
                return Err(IrError::QubitNotFound {
                    qubit: qubit.clone(),
                    op_name: Some(op.name.clone()),
                });
            }
        }
        for clbit in &op.cargs {
            if !self.has_clbit(clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit: clbit.clone(),
                    op_name: Some(op.name.clone()),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for qubit in &op.qargs {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: qubit.clone(),
                    op_name: Some(op.name.clone()),
                });
            }
        }

        if let Some(cond) = &op.condition {
            if self.creg(&cond.register).is_none() {
                return Err(IrError::RegisterNotFound(cond.register.clone()));
            }
        }

        let wires: Vec<WireId> = op
            .qargs
            .iter()
            .cloned()
            .map(WireId::Qubit)
            .chain(op.cargs.iter().cloned().map(WireId::Clbit))
            .collect();
        let op_node = self.graph.add_node(DagNode::Op(op));

        // O(1) per wire via the wire_front index.
        for wire in wires {
            let out_node = self.outputs[&wire];
            let prev_node = self.wire_front[&wire];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {wire}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph
                .add_edge(prev_node, op_node, DagEdge { wire: wire.clone() });
            self.graph
                .add_edge(op_node, out_node, DagEdge { wire: wire.clone() });
            self.wire_front.insert(wire, op_node);
        }

        Ok(op_node)
    }

    /// Operations in topological order.
    pub fn topological_ops(&self) -> IrResult<Vec<(NodeIndex, &Operation)>> {
        let sorted = petgraph::algo::toposort(&self.graph, None)
            .map_err(|_| IrError::InvalidDag("Graph contains a cycle".into()))?;
        Ok(sorted
            .into_iter()
            .filter_map(|idx| self.graph[idx].operation().map(|op| (idx, op)))
            .collect())
    }

    /// Get a node by index.
    #[inline]
    pub fn node(&self, idx: NodeIndex) -> Option<&DagNode> {
        self.graph.node_weight(idx)
    }

    /// Iterate over all nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &DagNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Iterate over all edges as `(source, target, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &DagEdge)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// One past the largest node index; node indices are dense.
    #[inline]
    pub fn node_bound(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges in the graph.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&Register> {
        self.qregs.iter().find(|r| r.name == name)
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&Register> {
        self.cregs.iter().find(|r| r.name == name)
    }

    /// Iterate over qubits, register by register.
    pub fn qubits(&self) -> impl Iterator<Item = Qubit> + '_ {
        self.qregs.iter().flat_map(Register::qubits)
    }

    /// Iterate over classical bits, register by register.
    pub fn clbits(&self) -> impl Iterator<Item = Clbit> + '_ {
        self.cregs.iter().flat_map(Register::clbits)
    }

    /// Check whether a qubit belongs to one of the quantum registers.
    pub fn has_qubit(&self, qubit: &Qubit) -> bool {
        self.qreg(&qubit.register)
            .is_some_and(|r| qubit.index < r.size)
    }

    /// Check whether a classical bit belongs to one of the classical registers.
    pub fn has_clbit(&self, clbit: &Clbit) -> bool {
        self.creg(&clbit.register)
            .is_some_and(|r| clbit.index < r.size)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(|r| r.size as usize).sum()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(|r| r.size as usize).sum()
    }

    /// Get the number of operations.
    ///
    /// Computed as total nodes minus two nodes per wire.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.inputs.len())
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> IrResult<usize> {
        let order = petgraph::algo::toposort(&self.graph, None)
            .map_err(|_| IrError::InvalidDag("Graph contains a cycle".into()))?;
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(order.len(), Default::default());
        let mut max_depth = 0usize;

        for node in order {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };
            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        Ok(max_depth)
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that:
    /// - The graph is acyclic
    /// - Every wire has exactly one In node and one Out node
    /// - Wire edges form an unbroken path from In to Out for each wire
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        for wire in self.outputs.keys() {
            if !self.inputs.contains_key(wire) {
                return Err(IrError::InvalidDag(format!(
                    "Wire {wire} has an Out node but no In node"
                )));
            }
        }

        for (wire, &in_node) in &self.inputs {
            let out_node = *self.outputs.get(wire).ok_or_else(|| {
                IrError::InvalidDag(format!("Wire {wire} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let mut steps = 0;
            let max_steps = self.graph.node_count();

            while current != out_node {
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == *wire)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire {wire} is broken: no outgoing edge from node {}",
                            current.index()
                        ))
                    })?;

                steps += 1;
                if steps > max_steps {
                    return Err(IrError::InvalidDag(format!(
                        "Wire {wire} has too many steps (possible infinite loop)"
                    )));
                }
            }
        }

        Ok(())
    }
}
