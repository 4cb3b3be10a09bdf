//! DAG → vertex circuit → DAG tests.
//!
//! Compares circuits wire by wire: the sequence of operations seen along each
//! qubit wire does not depend on how independent operations are ordered.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use proptest::prelude::*;
use qbridge_convert::{
    ConvertError, TranslationContext, TranslationPolicy, forward_translate,
    forward_translate_with_report, reverse_translate, reverse_translate_with,
};
use qbridge_ir::{
    Clbit, DagBuilder, DagCircuit, OpDescriptor, OpKind, OpPayload, Param, ParameterExpression,
    Qubit, Register, VertexCircuit, VertexListing,
};

/// A parameter compared up to floating-point noise.
#[derive(Debug, Clone)]
enum ParamValue {
    Numeric(f64),
    Symbolic(String),
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Numeric(a), ParamValue::Numeric(b)) => {
                (a - b).abs() <= 1e-9 * a.abs().max(1.0)
            }
            (ParamValue::Symbolic(a), ParamValue::Symbolic(b)) => a == b,
            _ => false,
        }
    }
}

/// One operation as seen from a wire: name, qubits, clbits, parameters.
type Step = (String, Vec<Qubit>, Vec<Clbit>, Vec<ParamValue>);

fn wire_sequences(dag: &DagCircuit) -> BTreeMap<Qubit, Vec<Step>> {
    let mut seqs: BTreeMap<Qubit, Vec<Step>> = dag.qubits().map(|q| (q, vec![])).collect();
    for (_, op) in dag.topological_ops().unwrap() {
        let params = op
            .params
            .iter()
            .map(|p| match p.as_f64() {
                Some(v) => ParamValue::Numeric(v),
                None => ParamValue::Symbolic(p.to_string()),
            })
            .collect::<Vec<_>>();
        let step = (op.name.clone(), op.qargs.clone(), op.cargs.clone(), params);
        for q in &op.qargs {
            seqs.get_mut(q).unwrap().push(step.clone());
        }
    }
    seqs
}

fn roundtrip(dag: &DagCircuit) -> DagCircuit {
    let circ = forward_translate(dag, &TranslationPolicy::default()).unwrap();
    reverse_translate(&circ, "q").unwrap()
}

fn q(i: u32) -> Qubit {
    Qubit::new("q", i)
}

#[test]
fn test_bell_roundtrip() {
    let mut b = DagBuilder::with_size(2, 2).unwrap();
    b.h(q(0))
        .unwrap()
        .cx(q(0), q(1))
        .unwrap()
        .measure(q(0), Clbit::new("c", 0))
        .unwrap()
        .measure(q(1), Clbit::new("c", 1))
        .unwrap();
    let dag = b.build();
    let back = roundtrip(&dag);

    assert_eq!(wire_sequences(&back), wire_sequences(&dag));
    assert_eq!(back.cregs(), dag.cregs());
    back.verify_integrity().unwrap();
}

#[test]
fn test_port_follows_declared_order() {
    // cx with q[1] as control: q[1] enters port 0, q[0] enters port 1.
    let mut b = DagBuilder::with_size(2, 0).unwrap();
    b.cx(q(1), q(0)).unwrap();
    let circ = forward_translate(&b.build(), &TranslationPolicy::default()).unwrap();

    let (cx, _) = circ.vertices().find(|(_, op)| op.kind == OpKind::CX).unwrap();
    assert_eq!(circ.in_edge(cx, 0).unwrap().0, circ.inputs()[1]);
    assert_eq!(circ.in_edge(cx, 1).unwrap().0, circ.inputs()[0]);

    let back = reverse_translate(&circ, "q").unwrap();
    let ops = back.topological_ops().unwrap();
    assert_eq!(ops[0].1.qargs, vec![q(1), q(0)]);
}

#[test]
fn test_numeric_and_symbolic_params() {
    let theta = ParameterExpression::symbol("theta") / ParameterExpression::constant(2.0);
    let mut b = DagBuilder::with_size(2, 0).unwrap();
    b.rz(PI / 4.0, q(0))
        .unwrap()
        .rx(theta.clone(), q(1))
        .unwrap()
        .gate(
            "cu3",
            [q(0), q(1)],
            [
                ParameterExpression::constant(0.1),
                ParameterExpression::constant(0.2),
                ParameterExpression::constant(0.3),
            ],
        )
        .unwrap();
    let dag = b.build();
    let back = roundtrip(&dag);

    assert_eq!(wire_sequences(&back), wire_sequences(&dag));
    let rx = back
        .topological_ops()
        .unwrap()
        .into_iter()
        .find(|(_, op)| op.name == "rx")
        .map(|(_, op)| op.clone())
        .unwrap();
    assert_eq!(rx.params, vec![theta]);
}

#[test]
fn test_phase_gadget_roundtrip() {
    let mut b = DagBuilder::with_size(3, 0).unwrap();
    b.gate("phase", [q(2), q(0), q(1)], [ParameterExpression::constant(0.7)])
        .unwrap();
    let dag = b.build();
    assert_eq!(wire_sequences(&roundtrip(&dag)), wire_sequences(&dag));
}

#[test]
fn test_boxed_operation_roundtrip() {
    let mut b = DagBuilder::with_size(2, 0).unwrap();
    b.gate("oracle", [q(1), q(0)], []).unwrap();
    let dag = b.build();
    let (circ, report) = forward_translate_with_report(&dag, &TranslationPolicy::default()).unwrap();
    assert_eq!(report.boxed(), 1);

    let back = reverse_translate(&circ, "q").unwrap();
    assert_eq!(wire_sequences(&back), wire_sequences(&dag));
}

#[test]
fn test_boxing_disabled() {
    let mut b = DagBuilder::with_size(1, 0).unwrap();
    b.gate("oracle", [q(0)], []).unwrap();
    let err = forward_translate(&b.build(), &TranslationPolicy::strict()).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedOperation { .. }));
}

#[test]
fn test_dropped_condition_roundtrip() {
    let mut b = DagBuilder::with_size(1, 1).unwrap();
    b.conditional("x", [q(0)], "c", 1).unwrap();
    let policy = TranslationPolicy::default().with_drop_conditions(true);
    let (circ, report) = forward_translate_with_report(&b.build(), &policy).unwrap();
    assert!(!report.is_lossless());

    let back = reverse_translate(&circ, "q").unwrap();
    let ops = back.topological_ops().unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].1.condition, None);
}

/// Input -> Measure -> Output on each of `n` lines, no destination recorded.
fn bare_measurements(n: usize) -> VertexCircuit {
    let mut circ = VertexCircuit::new();
    for _ in 0..n {
        let i = circ.add_vertex(OpDescriptor::input());
        let m = circ.add_vertex(OpDescriptor::new(OpKind::Measure, 1));
        let o = circ.add_vertex(OpDescriptor::output());
        circ.add_edge(i, 0, m, 0).unwrap();
        circ.add_edge(m, 0, o, 0).unwrap();
    }
    circ
}

#[test]
fn test_register_synthesis() {
    let dag = reverse_translate(&bare_measurements(2), "q").unwrap();
    let names: Vec<&str> = dag.cregs().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["tk_c1", "tk_c2"]);
    assert!(dag.cregs().iter().all(|r| r.size == 1));
}

#[test]
fn test_shared_context_across_calls() {
    let ctx = TranslationContext::new();
    let first = reverse_translate_with(&bare_measurements(1), "q", &ctx).unwrap();
    let second = reverse_translate_with(&bare_measurements(1), "q", &ctx).unwrap();
    assert_eq!(first.cregs()[0].name, "tk_c1");
    assert_eq!(second.cregs()[0].name, "tk_c2");
}

#[test]
fn test_reverse_rejects_swap() {
    let mut circ = VertexCircuit::new();
    let i0 = circ.add_vertex(OpDescriptor::input());
    let i1 = circ.add_vertex(OpDescriptor::input());
    let swap = circ.add_vertex(OpDescriptor::new(OpKind::Swap, 2));
    let o0 = circ.add_vertex(OpDescriptor::output());
    let o1 = circ.add_vertex(OpDescriptor::output());
    circ.add_edge(i0, 0, swap, 0).unwrap();
    circ.add_edge(i1, 0, swap, 1).unwrap();
    circ.add_edge(swap, 0, o0, 0).unwrap();
    circ.add_edge(swap, 1, o1, 0).unwrap();

    let err = reverse_translate(&circ, "q").unwrap_err();
    assert!(matches!(
        err,
        ConvertError::InverseMappingFailure {
            kind: OpKind::Swap,
            ..
        }
    ));
}

#[test]
fn test_reverse_rejects_dangling_port() {
    let mut circ = VertexCircuit::new();
    let i = circ.add_vertex(OpDescriptor::input());
    let h = circ.add_vertex(OpDescriptor::new(OpKind::H, 1));
    circ.add_edge(i, 0, h, 0).unwrap();
    assert!(matches!(
        reverse_translate(&circ, "q"),
        Err(ConvertError::Ir(_))
    ));
}

#[test]
fn test_vertex_listing_survives_json() {
    let mut b = DagBuilder::with_size(2, 2).unwrap();
    b.h(q(0))
        .unwrap()
        .cx(q(0), q(1))
        .unwrap()
        .measure(q(1), Clbit::new("c", 0))
        .unwrap();
    let dag = b.build();
    let circ = forward_translate(&dag, &TranslationPolicy::default()).unwrap();

    let json = serde_json::to_string(&circ.to_listing()).unwrap();
    let listing: VertexListing = serde_json::from_str(&json).unwrap();
    let rebuilt = VertexCircuit::from_listing(&listing).unwrap();
    let back = reverse_translate(&rebuilt, "q").unwrap();
    assert_eq!(wire_sequences(&back), wire_sequences(&dag));
}

#[test]
fn test_symbolic_rz_keeps_expression() {
    let alpha = ParameterExpression::symbol("alpha") * ParameterExpression::pi();
    let mut b = DagBuilder::with_size(2, 0).unwrap();
    b.gate("symrz", [q(0)], [alpha.clone()])
        .unwrap()
        .gate("symrz", [q(1)], [ParameterExpression::constant(PI / 4.0)])
        .unwrap();
    let dag = b.build();
    let circ = forward_translate(&dag, &TranslationPolicy::default()).unwrap();

    let payloads: Vec<&OpPayload> = circ
        .vertices()
        .filter(|(_, op)| op.kind == OpKind::SymbolicRz)
        .map(|(_, op)| &op.payload)
        .collect();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], &OpPayload::Single(Param::Symbolic(alpha.clone())));
    match payloads[1] {
        OpPayload::Single(Param::Numeric(v)) => assert!((v - 0.25).abs() < 1e-12),
        other => panic!("expected a single numeric angle, got {other:?}"),
    }

    let back = roundtrip(&dag);
    assert_eq!(wire_sequences(&back), wire_sequences(&dag));
    let ops = back.topological_ops().unwrap();
    let symbolic = ops.iter().find(|(_, op)| op.qargs == vec![q(0)]).unwrap();
    assert_eq!(symbolic.1.name, "symrz");
    assert_eq!(symbolic.1.params, vec![alpha]);
}

#[test]
fn test_multiple_registers_become_lines_in_order() {
    let anc = Qubit::new("anc", 0);
    let mut b = DagBuilder::new();
    b.qreg("q", 2).unwrap().qreg("anc", 1).unwrap();
    b.cx(q(1), anc.clone()).unwrap().h(q(0)).unwrap();
    let dag = b.build();

    let circ = forward_translate(&dag, &TranslationPolicy::default()).unwrap();
    assert_eq!(circ.n_qubits(), 3);
    let (cx, _) = circ.vertices().find(|(_, op)| op.kind == OpKind::CX).unwrap();
    assert_eq!(circ.in_edge(cx, 0).unwrap().0, circ.inputs()[1]);
    assert_eq!(circ.in_edge(cx, 1).unwrap().0, circ.inputs()[2]);

    let back = reverse_translate(&circ, "q").unwrap();
    assert_eq!(back.qregs(), &[Register::new("q", 3)]);
    let ops = back.topological_ops().unwrap();
    let cx_op = ops.iter().find(|(_, op)| op.name == "cx").unwrap();
    assert_eq!(cx_op.1.qargs, vec![q(1), q(2)]);
    let h_op = ops.iter().find(|(_, op)| op.name == "h").unwrap();
    assert_eq!(h_op.1.qargs, vec![q(0)]);
    back.verify_integrity().unwrap();
}

/// Operations the generator may place.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    T(u32),
    Rz(f64, u32),
    U3(f64, f64, f64, u32),
    CX(u32, u32),
    Cu1(f64, u32, u32),
    Measure(u32),
}

impl GateOp {
    fn apply(self, b: &mut DagBuilder) {
        // Invalid operand combinations are skipped.
        let _ = match self {
            GateOp::H(a) => b.h(q(a)),
            GateOp::X(a) => b.x(q(a)),
            GateOp::T(a) => b.t(q(a)),
            GateOp::Rz(theta, a) => b.rz(theta, q(a)),
            GateOp::U3(t, p, l, a) => b.u3(t, p, l, q(a)),
            GateOp::CX(a, c) => b.cx(q(a), q(c)),
            GateOp::Cu1(theta, a, c) => {
                b.gate("cu1", [q(a), q(c)], [ParameterExpression::constant(theta)])
            }
            GateOp::Measure(a) => b.measure(q(a), Clbit::new("c", a)),
        };
    }
}

fn arb_angle() -> impl Strategy<Value = f64> {
    -2.0 * PI..2.0 * PI
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let qubit = 0..num_qubits;
    prop_oneof![
        qubit.clone().prop_map(GateOp::H),
        qubit.clone().prop_map(GateOp::X),
        qubit.clone().prop_map(GateOp::T),
        (arb_angle(), qubit.clone()).prop_map(|(t, a)| GateOp::Rz(t, a)),
        (arb_angle(), arb_angle(), arb_angle(), qubit.clone())
            .prop_map(|(t, p, l, a)| GateOp::U3(t, p, l, a)),
        (qubit.clone(), qubit.clone()).prop_map(|(a, c)| GateOp::CX(a, c)),
        (arb_angle(), qubit.clone(), qubit.clone()).prop_map(|(t, a, c)| GateOp::Cu1(t, a, c)),
        qubit.prop_map(GateOp::Measure),
    ]
}

/// Random circuits over the supported subset, 1-5 qubits, 0-20 operations.
fn arb_dag() -> impl Strategy<Value = DagCircuit> {
    (1_u32..=5).prop_flat_map(|n| {
        prop::collection::vec(arb_gate_op(n), 0..=20).prop_map(move |ops| {
            let mut b = DagBuilder::with_size(n, n).unwrap();
            for op in ops {
                op.apply(&mut b);
            }
            b.build()
        })
    })
}

proptest! {
    #[test]
    fn prop_roundtrip_preserves_wires(dag in arb_dag()) {
        let back = roundtrip(&dag);
        prop_assert_eq!(wire_sequences(&back), wire_sequences(&dag));
        prop_assert_eq!(back.num_ops(), dag.num_ops());
        prop_assert!(back.verify_integrity().is_ok());
    }

    #[test]
    fn prop_forward_lines_match_qubits(dag in arb_dag()) {
        let circ = forward_translate(&dag, &TranslationPolicy::default()).unwrap();
        prop_assert_eq!(circ.n_qubits(), dag.num_qubits());
        // One edge per qubit wire segment: ops' qubit arity plus one per line.
        let segments: usize = dag
            .topological_ops()
            .unwrap()
            .iter()
            .map(|(_, op)| op.qargs.len())
            .sum::<usize>()
            + dag.num_qubits();
        prop_assert_eq!(circ.n_edges(), segments);
    }
}
