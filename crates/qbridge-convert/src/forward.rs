//! DAG to vertex/edge translation.

use qbridge_ir::{
    ClassicalCondition, DagCircuit, DagNode, IrError, OpDescriptor, OpKind, Operation, Param,
    Qubit, VertexCircuit, VertexIndex,
};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::error::{ConvertError, ConvertResult};
use crate::measure::MeasureDestination;
use crate::normalize::normalize_in;
use crate::policy::TranslationPolicy;
use crate::ports::port_for_edge;

/// A place where the translation lost information, as allowed by policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Degradation {
    /// A classical condition was discarded.
    DroppedCondition {
        /// DAG node index.
        node: usize,
        /// Operation name.
        name: String,
        /// The discarded condition.
        register: String,
        /// Value the register was compared against.
        value: u64,
    },
    /// An unknown operation became an opaque box.
    BoxedOperation {
        /// DAG node index.
        node: usize,
        /// Operation name kept in the box.
        name: String,
    },
    /// A boxed operation's parameters were discarded.
    DroppedBoxParams {
        /// DAG node index.
        node: usize,
        /// Operation name.
        name: String,
        /// How many parameters were lost.
        count: usize,
    },
}

/// Everything a forward translation degraded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationReport {
    /// Events in node order.
    pub events: Vec<Degradation>,
}

impl TranslationReport {
    /// Check if the translation was exact.
    pub fn is_lossless(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of boxed operations.
    pub fn boxed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Degradation::BoxedOperation { .. }))
            .count()
    }

    /// Number of dropped conditions.
    pub fn dropped_conditions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Degradation::DroppedCondition { .. }))
            .count()
    }
}

/// Translate a DAG into a vertex circuit.
pub fn forward_translate(
    dag: &DagCircuit,
    policy: &TranslationPolicy,
) -> ConvertResult<VertexCircuit> {
    forward_translate_with_report(dag, policy).map(|(circ, _)| circ)
}

/// Translate a DAG into a vertex circuit, reporting every degradation.
///
/// Qubit wires become lines from an `Input` to an `Output` vertex; classical
/// wires are dropped, their only trace being measurement destinations.
#[instrument(skip_all, fields(qubits = dag.num_qubits(), ops = dag.num_ops()))]
pub fn forward_translate_with_report(
    dag: &DagCircuit,
    policy: &TranslationPolicy,
) -> ConvertResult<(VertexCircuit, TranslationReport)> {
    let qubits: FxHashSet<Qubit> = dag.qubits().collect();
    let catalog = Catalog::standard();
    let mut circ = VertexCircuit::new();
    let mut report = TranslationReport::default();
    let mut vertex_of: Vec<Option<VertexIndex>> = vec![None; dag.node_bound()];

    for (idx, node) in dag.nodes() {
        let desc = match node {
            DagNode::In(wire) | DagNode::Out(wire) => {
                if !wire.as_qubit().is_some_and(|q| qubits.contains(q)) {
                    continue;
                }
                if node.is_input() {
                    OpDescriptor::input()
                } else {
                    OpDescriptor::output()
                }
            }
            DagNode::Op(op) => {
                convert_operation(dag, idx.index(), op, catalog, policy, &mut report)?
            }
        };
        debug!("node {} -> {}", idx.index(), desc);
        vertex_of[idx.index()] = Some(circ.add_vertex(desc));
    }

    for (src, tgt, edge) in dag.edges() {
        let Some(qubit) = edge.wire.as_qubit() else {
            continue;
        };
        let src_node = dag.node(src).ok_or(IrError::InvalidNode(src.index()))?;
        let tgt_node = dag.node(tgt).ok_or(IrError::InvalidNode(tgt.index()))?;
        let src_port = port_for_edge(src.index(), src_node, qubit)?;
        let tgt_port = port_for_edge(tgt.index(), tgt_node, qubit)?;
        let src_v = vertex_of[src.index()].ok_or(ConvertError::UnmappedNode(src.index()))?;
        let tgt_v = vertex_of[tgt.index()].ok_or(ConvertError::UnmappedNode(tgt.index()))?;
        circ.add_edge(src_v, src_port, tgt_v, tgt_port)?;
    }

    info!(
        "Translated DAG to {} vertices, {} edges ({} degradations)",
        circ.n_vertices(),
        circ.n_edges(),
        report.events.len()
    );
    Ok((circ, report))
}

fn convert_operation(
    dag: &DagCircuit,
    node: usize,
    op: &Operation,
    catalog: &Catalog,
    policy: &TranslationPolicy,
    report: &mut TranslationReport,
) -> ConvertResult<OpDescriptor> {
    let entry = match catalog.by_name(&op.name) {
        Some(entry) => Some(entry),
        None if policy.box_unknown_ops => None,
        None => {
            return Err(ConvertError::UnsupportedOperation {
                node,
                name: op.name.clone(),
            });
        }
    };

    if let Some(cond) = &op.condition {
        drop_condition(node, op, cond, policy, report)?;
    }

    let Some(entry) = entry else {
        return box_operation(node, op, report);
    };
    entry.check_arity(node, op.qargs.len(), op.params.len())?;
    let n = op.qargs.len();

    if entry.kind == OpKind::Measure {
        return measure_operation(dag, node, op);
    }
    if !op.cargs.is_empty() {
        return Err(classical_args(node, op));
    }

    let mut params: Vec<Param> = op.params.iter().map(normalize_in).collect();
    let desc = OpDescriptor::new(entry.kind, n);
    Ok(match params.len() {
        0 => desc,
        1 => desc.with_param(params.remove(0)),
        _ => desc.with_params(params),
    })
}

fn drop_condition(
    node: usize,
    op: &Operation,
    cond: &ClassicalCondition,
    policy: &TranslationPolicy,
    report: &mut TranslationReport,
) -> ConvertResult<()> {
    if !policy.drop_conditions {
        return Err(ConvertError::UnsupportedClassicalUsage {
            node,
            name: op.name.clone(),
            reason: format!("condition {}=={}", cond.register, cond.value),
        });
    }
    warn!(
        "Dropping condition {}=={} from '{}' at node {}",
        cond.register, cond.value, op.name, node
    );
    report.events.push(Degradation::DroppedCondition {
        node,
        name: op.name.clone(),
        register: cond.register.clone(),
        value: cond.value,
    });
    Ok(())
}

fn box_operation(
    node: usize,
    op: &Operation,
    report: &mut TranslationReport,
) -> ConvertResult<OpDescriptor> {
    if op.qargs.is_empty() {
        return Err(ConvertError::ArityMismatch {
            node,
            name: op.name.clone(),
            expected: "at least 1 qubit".into(),
            got: "0 qubits".into(),
        });
    }
    if !op.cargs.is_empty() {
        return Err(classical_args(node, op));
    }

    warn!("Boxing unknown operation '{}' at node {}", op.name, node);
    report.events.push(Degradation::BoxedOperation {
        node,
        name: op.name.clone(),
    });
    if !op.params.is_empty() {
        warn!(
            "Dropping {} parameters of boxed '{}' at node {}",
            op.params.len(),
            op.name,
            node
        );
        report.events.push(Degradation::DroppedBoxParams {
            node,
            name: op.name.clone(),
            count: op.params.len(),
        });
    }

    Ok(OpDescriptor::new(OpKind::Box, op.qargs.len()).with_description(op.name.clone()))
}

fn measure_operation(dag: &DagCircuit, node: usize, op: &Operation) -> ConvertResult<OpDescriptor> {
    if !op.cargs.is_empty() && op.cargs.len() != op.qargs.len() {
        return Err(ConvertError::UnsupportedClassicalUsage {
            node,
            name: op.name.clone(),
            reason: format!(
                "{} qubits measured into {} bits",
                op.qargs.len(),
                op.cargs.len()
            ),
        });
    }
    let dest = MeasureDestination::from_clbits(&op.cargs, dag);
    let text = dest
        .encode()
        .map_err(|source| ConvertError::InvalidMeasureEncoding { vertex: node, source })?;
    Ok(OpDescriptor::new(OpKind::Measure, op.qargs.len()).with_description(text))
}

fn classical_args(node: usize, op: &Operation) -> ConvertError {
    ConvertError::UnsupportedClassicalUsage {
        node,
        name: op.name.clone(),
        reason: format!("{} classical arguments", op.cargs.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{Clbit, DagBuilder, ParameterExpression};
    use std::f64::consts::PI;

    fn q(i: u32) -> Qubit {
        Qubit::new("q", i)
    }

    #[test]
    fn test_inputs_follow_qubit_order() {
        let mut b = DagBuilder::with_size(3, 0).unwrap();
        b.h(q(2)).unwrap();
        let circ = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap();
        assert_eq!(circ.n_qubits(), 3);
        // Each wire contributes its In and Out vertex in turn.
        for (line, v) in circ.inputs().iter().enumerate() {
            assert_eq!(v.index(), 2 * line);
        }
    }

    #[test]
    fn test_classical_wires_dropped() {
        let mut b = DagBuilder::with_size(1, 2).unwrap();
        b.measure(q(0), Clbit::new("c", 1)).unwrap();
        let circ = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap();
        // In, Out, Measure
        assert_eq!(circ.n_vertices(), 3);
        assert_eq!(circ.n_edges(), 2);
    }

    #[test]
    fn test_payload_branches() {
        let mut b = DagBuilder::with_size(1, 0).unwrap();
        b.x(q(0))
            .unwrap()
            .rz(PI / 2.0, q(0))
            .unwrap()
            .u3(PI, 0.0, ParameterExpression::symbol("l"), q(0))
            .unwrap();
        let circ = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap();
        let ops: Vec<&OpDescriptor> = circ
            .vertices()
            .map(|(_, op)| op)
            .filter(|op| !op.kind.is_boundary())
            .collect();

        assert_eq!(ops[0].payload, qbridge_ir::OpPayload::None);
        assert_eq!(ops[1].params(), vec![&Param::Numeric(0.5)]);
        let u3 = ops[2].params();
        assert_eq!(u3.len(), 3);
        assert_eq!(u3[0], &Param::Numeric(1.0));
        assert_eq!(u3[2], &Param::Symbolic(ParameterExpression::symbol("l")));
    }

    #[test]
    fn test_unknown_op_boxed() {
        let mut b = DagBuilder::with_size(2, 0).unwrap();
        b.gate("my_gate", [q(0), q(1)], [ParameterExpression::constant(0.3)])
            .unwrap();
        let (circ, report) =
            forward_translate_with_report(&b.build(), &TranslationPolicy::default()).unwrap();

        let boxed = circ
            .vertices()
            .find(|(_, op)| op.kind == OpKind::Box)
            .map(|(_, op)| op.clone())
            .unwrap();
        assert_eq!(boxed.description(), Some("my_gate"));
        assert_eq!(boxed.n_inputs, 2);
        assert_eq!(report.boxed(), 1);
        assert!(report.events.contains(&Degradation::DroppedBoxParams {
            node: 4,
            name: "my_gate".into(),
            count: 1,
        }));
    }

    #[test]
    fn test_unknown_op_rejected_when_strict() {
        let mut b = DagBuilder::with_size(1, 0).unwrap();
        b.gate("my_gate", [q(0)], []).unwrap();
        let err = forward_translate(&b.build(), &TranslationPolicy::strict()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedOperation { ref name, .. } if name == "my_gate"
        ));
    }

    #[test]
    fn test_condition_policy() {
        let mut b = DagBuilder::with_size(1, 1).unwrap();
        b.conditional("x", [q(0)], "c", 1).unwrap();
        let dag = b.build();

        let err = forward_translate(&dag, &TranslationPolicy::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedClassicalUsage { .. }));

        let policy = TranslationPolicy::default().with_drop_conditions(true);
        let (circ, report) = forward_translate_with_report(&dag, &policy).unwrap();
        assert_eq!(report.dropped_conditions(), 1);
        assert!(circ.vertices().any(|(_, op)| op.kind == OpKind::X));
    }

    #[test]
    fn test_condition_on_boxed_op_follows_policy() {
        let mut b = DagBuilder::with_size(1, 1).unwrap();
        b.conditional("mystery", [q(0)], "c", 0).unwrap();
        let err = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedClassicalUsage { .. }));
    }

    #[test]
    fn test_arity_checked() {
        let mut b = DagBuilder::with_size(2, 0).unwrap();
        b.gate("h", [q(0), q(1)], []).unwrap();
        let err = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap_err();
        assert!(matches!(err, ConvertError::ArityMismatch { .. }));
    }

    #[test]
    fn test_cargs_on_gate_rejected() {
        let mut b = DagBuilder::with_size(1, 1).unwrap();
        b.apply(Operation::new("x", [q(0)]).with_cargs([Clbit::new("c", 0)]))
            .unwrap();
        let err = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedClassicalUsage { .. }));
    }

    #[test]
    fn test_measure_records_destination() {
        let mut b = DagBuilder::with_size(1, 3).unwrap();
        b.measure(q(0), Clbit::new("c", 2)).unwrap();
        let circ = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap();
        let measure = circ
            .vertices()
            .find(|(_, op)| op.kind == OpKind::Measure)
            .map(|(_, op)| op.clone())
            .unwrap();
        let dest = MeasureDestination::decode(measure.description().unwrap(), 1).unwrap();
        assert_eq!(dest.clbits(), vec![Clbit::new("c", 2)]);
        assert_eq!(dest.required_sizes(), vec![("c".to_string(), 3)]);
    }
}
