//! Vertex/edge to DAG translation.

use qbridge_ir::{
    Clbit, DagCircuit, IrError, OpDescriptor, OpKind, Operation, ParameterExpression, Qubit,
    Register, RoutingGrid, VertexCircuit, VertexIndex,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::context::TranslationContext;
use crate::error::{ConvertError, ConvertResult};
use crate::measure::MeasureDestination;
use crate::normalize::normalize_out;

/// Translate a vertex circuit into a DAG with one quantum register.
///
/// Uses a fresh [`TranslationContext`], so synthesized classical registers
/// start at `tk_c1`.
pub fn reverse_translate(circ: &VertexCircuit, qreg_name: &str) -> ConvertResult<DagCircuit> {
    reverse_translate_with(circ, qreg_name, &TranslationContext::new())
}

/// Translate a vertex circuit into a DAG, naming synthesized classical
/// registers from `ctx`.
///
/// Qubit `j` of register `qreg_name` is line `j` of the routing grid.
/// Operations are appended slice by slice.
#[instrument(skip_all, fields(qubits = circ.n_qubits(), vertices = circ.n_vertices()))]
pub fn reverse_translate_with(
    circ: &VertexCircuit,
    qreg_name: &str,
    ctx: &TranslationContext,
) -> ConvertResult<DagCircuit> {
    let mut dag = DagCircuit::new();
    let n_qubits = u32::try_from(circ.n_qubits())
        .map_err(|_| IrError::InvalidVertexCircuit("too many qubit lines".into()))?;
    dag.add_qreg(Register::new(qreg_name, n_qubits))?;

    let grid = RoutingGrid::build(circ)?;
    let lines = grid.port_lookup();
    let catalog = Catalog::standard();
    let destinations = decode_destinations(circ)?;
    // Registers named by recorded destinations are off limits for synthesis.
    let reserved: FxHashSet<&str> = destinations
        .values()
        .flat_map(|d| d.bits.iter().map(|b| b.register.as_str()))
        .collect();

    for slice in grid.slices() {
        for v in slice.vertices {
            let desc = circ.op(v).ok_or(IrError::InvalidNode(v.index()))?;
            if desc.kind.is_boundary() {
                continue;
            }

            let qargs = (0..desc.n_inputs)
                .map(|port| {
                    lines
                        .get(&(v, port))
                        .map(|&line| Qubit::new(qreg_name, line as u32))
                        .ok_or(ConvertError::UnroutedPort {
                            vertex: v.index(),
                            port,
                        })
                })
                .collect::<ConvertResult<Vec<_>>>()?;

            let name = operation_name(catalog, v, desc)?;
            let cargs = match destinations.get(&v) {
                Some(dest) => measure_cargs(&mut dag, v, desc, dest, &reserved, ctx)?,
                None => vec![],
            };
            let params: Vec<ParameterExpression> =
                desc.params().into_iter().map(normalize_out).collect();

            let op = Operation::new(name, qargs)
                .with_cargs(cargs)
                .with_params(params);
            debug!("vertex {} -> {}", v.index(), op.name);
            dag.add_basis_element(op.basis_element())?;
            dag.apply_operation_back(op)?;
        }
    }

    info!(
        "Translated {} vertices to DAG with {} ops, {} classical registers",
        circ.n_vertices(),
        dag.num_ops(),
        dag.cregs().len()
    );
    Ok(dag)
}

fn operation_name(catalog: &Catalog, v: VertexIndex, desc: &OpDescriptor) -> ConvertResult<String> {
    let unmapped = || ConvertError::InverseMappingFailure {
        vertex: v.index(),
        kind: desc.kind,
    };
    if desc.kind == OpKind::Box {
        return desc.description().map(str::to_string).ok_or_else(unmapped);
    }
    catalog
        .by_kind(desc.kind)
        .map(|entry| entry.name.clone())
        .ok_or_else(unmapped)
}

/// Decoded destination of every measurement vertex.
fn decode_destinations(
    circ: &VertexCircuit,
) -> ConvertResult<FxHashMap<VertexIndex, MeasureDestination>> {
    circ.vertices()
        .filter(|(_, desc)| desc.kind == OpKind::Measure)
        .map(|(v, desc)| {
            MeasureDestination::decode(desc.description().unwrap_or(""), desc.n_outputs)
                .map(|dest| (v, dest))
                .map_err(|source| ConvertError::InvalidMeasureEncoding {
                    vertex: v.index(),
                    source,
                })
        })
        .collect()
}

/// Classical bits written by a measurement vertex, creating or growing the
/// registers they belong to.
fn measure_cargs(
    dag: &mut DagCircuit,
    v: VertexIndex,
    desc: &OpDescriptor,
    dest: &MeasureDestination,
    reserved: &FxHashSet<&str>,
    ctx: &TranslationContext,
) -> ConvertResult<Vec<Clbit>> {
    if dest.is_empty() {
        let name = ctx.fresh_register_name(|n| {
            reserved.contains(n) || dag.creg(n).is_some() || dag.qreg(n).is_some()
        });
        let size = u32::try_from(desc.n_outputs)
            .map_err(|_| IrError::InvalidVertexCircuit("measurement too wide".into()))?;
        debug!("synthesized register {name}[{size}] for vertex {}", v.index());
        dag.add_creg(Register::new(name.clone(), size))?;
        return Ok((0..size).map(|i| Clbit::new(name.clone(), i)).collect());
    }

    for (name, size) in dest.required_sizes() {
        if dag.creg(&name).is_some() {
            dag.grow_creg(&name, size)?;
        } else {
            dag.add_creg(Register::new(name, size))?;
        }
    }
    Ok(dest.clbits())
}
