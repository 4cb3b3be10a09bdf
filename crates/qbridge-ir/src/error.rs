//! Error types for the IR crate.

use crate::bit::{Clbit, Qubit};
use thiserror::Error;

/// Errors that can occur while building or inspecting either IR.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_op_context(.op_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: Qubit,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit} not found in circuit{}", format_op_context(.op_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: Clbit,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_op_context(.op_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: Qubit,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// A register with this name already exists.
    #[error("Register '{0}' already exists")]
    DuplicateRegister(String),

    /// Register lookup failed.
    #[error("Register '{0}' not found")]
    RegisterNotFound(String),

    /// Operation does not match the signature declared for its name.
    #[error(
        "Operation '{name}' declared with {expected} but used with {got}"
    )]
    BasisMismatch {
        /// Operation name.
        name: String,
        /// Declared signature, formatted.
        expected: String,
        /// Offending signature, formatted.
        got: String,
    },

    /// Operation name was never declared in the DAG's basis.
    #[error("Operation '{0}' is not declared in the circuit basis")]
    UndeclaredOperation(String),

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    /// Invalid vertex/edge circuit structure.
    #[error("Invalid vertex circuit: {0}")]
    InvalidVertexCircuit(String),

    /// Port index outside a vertex's arity, or already wired.
    #[error("Invalid port {port} on vertex {vertex}: {reason}")]
    InvalidPort {
        /// Vertex index.
        vertex: usize,
        /// Port index.
        port: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid node or vertex index.
    #[error("Invalid node index {0}")]
    InvalidNode(usize),
}

/// Helper function to format optional operation context.
#[allow(clippy::ref_option)]
fn format_op_context(op_name: &Option<String>) -> String {
    match op_name {
        Some(name) => format!(" (operation: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
