//! Benchmarks for DAG/vertex translation
//!
//! Run with: cargo bench -p qbridge-convert

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qbridge_convert::{TranslationPolicy, forward_translate, reverse_translate};
use qbridge_ir::{Clbit, DagBuilder, DagCircuit, Qubit, RoutingGrid};
use std::f64::consts::PI;

/// Layered circuit: H and Rz on every qubit, a CX ladder, then measurement.
fn layered_dag(num_qubits: u32, layers: u32) -> DagCircuit {
    let mut b = DagBuilder::with_size(num_qubits, num_qubits).unwrap();
    for layer in 0..layers {
        for i in 0..num_qubits {
            b.h(Qubit::new("q", i)).unwrap();
            b.rz(PI / f64::from(layer + 2), Qubit::new("q", i)).unwrap();
        }
        for i in 0..num_qubits.saturating_sub(1) {
            b.cx(Qubit::new("q", i), Qubit::new("q", i + 1)).unwrap();
        }
    }
    for i in 0..num_qubits {
        b.measure(Qubit::new("q", i), Clbit::new("c", i)).unwrap();
    }
    b.build()
}

/// Benchmark DAG to vertex circuit
fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_translate");
    let policy = TranslationPolicy::default();

    for num_qubits in &[2, 5, 10, 20, 50] {
        let dag = layered_dag(*num_qubits, 10);
        group.bench_with_input(BenchmarkId::new("layers_10", num_qubits), &dag, |b, dag| {
            b.iter(|| forward_translate(black_box(dag), &policy).unwrap());
        });
    }

    group.finish();
}

/// Benchmark routing grid construction
fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing_grid");
    let policy = TranslationPolicy::default();

    for num_qubits in &[2, 5, 10, 20, 50] {
        let circ = forward_translate(&layered_dag(*num_qubits, 10), &policy).unwrap();
        group.bench_with_input(BenchmarkId::new("layers_10", num_qubits), &circ, |b, circ| {
            b.iter(|| RoutingGrid::build(black_box(circ)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark vertex circuit to DAG
fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_translate");
    let policy = TranslationPolicy::default();

    for num_qubits in &[2, 5, 10, 20, 50] {
        let circ = forward_translate(&layered_dag(*num_qubits, 10), &policy).unwrap();
        group.bench_with_input(BenchmarkId::new("layers_10", num_qubits), &circ, |b, circ| {
            b.iter(|| reverse_translate(black_box(circ), "q").unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forward, bench_grid, bench_reverse);
criterion_main!(benches);
