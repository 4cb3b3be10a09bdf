//! Port resolution for DAG wire endpoints.

use qbridge_ir::{DagNode, Port, Qubit};

use crate::error::{ConvertError, ConvertResult};

/// The vertex port through which `qubit`'s wire enters or leaves `node`.
///
/// Line sentinels and single-qubit operations have only port 0. For a
/// multi-qubit operation the port is the qubit's position in its declared
/// argument list.
pub fn port_for_edge(index: usize, node: &DagNode, qubit: &Qubit) -> ConvertResult<Port> {
    let op = match node {
        DagNode::In(_) | DagNode::Out(_) => return Ok(0),
        DagNode::Op(op) => op,
    };
    if op.qargs.len() <= 1 {
        return Ok(0);
    }
    op.qargs
        .iter()
        .position(|q| q == qubit)
        .ok_or_else(|| ConvertError::PortResolutionFailure {
            node: index,
            name: op.name.clone(),
            qubit: qubit.clone(),
        })
}
