//! Error types for translation.

use qbridge_ir::{IrError, OpKind, Qubit};
use thiserror::Error;

use crate::measure::CodecError;

/// Errors that can occur while translating between the two IRs.
///
/// No partially built circuit is ever returned alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Operation name is not in the catalog and boxing is disabled.
    #[error("Unsupported operation '{name}' at node {node}")]
    UnsupportedOperation {
        /// DAG node index.
        node: usize,
        /// Operation name.
        name: String,
    },

    /// Classical condition or classical argument that cannot be carried.
    #[error("Unsupported classical usage in '{name}' at node {node}: {reason}")]
    UnsupportedClassicalUsage {
        /// DAG node index.
        node: usize,
        /// Operation name.
        name: String,
        /// What was found.
        reason: String,
    },

    /// A wire's qubit is not among the operation's qubit arguments.
    #[error("Qubit {qubit} is not an argument of '{name}' at node {node}")]
    PortResolutionFailure {
        /// DAG node index.
        node: usize,
        /// Operation name.
        name: String,
        /// The qubit carried by the wire.
        qubit: Qubit,
    },

    /// Vertex kind has no DAG operation name.
    #[error("Vertex {vertex} of kind {kind} has no DAG counterpart")]
    InverseMappingFailure {
        /// Vertex index.
        vertex: usize,
        /// Offending kind.
        kind: OpKind,
    },

    /// Operation used with a qubit or parameter count the catalog forbids.
    #[error("Operation '{name}' at node {node} expects {expected}, got {got}")]
    ArityMismatch {
        /// DAG node index.
        node: usize,
        /// Operation name.
        name: String,
        /// Allowed arity, formatted.
        expected: String,
        /// Actual arity, formatted.
        got: String,
    },

    /// Measurement destination could not be decoded.
    #[error("Invalid measurement destination at vertex {vertex}: {source}")]
    InvalidMeasureEncoding {
        /// Vertex index.
        vertex: usize,
        /// Decoding failure.
        #[source]
        source: CodecError,
    },

    /// DAG node that carries a qubit wire has no vertex.
    #[error("DAG node {0} has no vertex")]
    UnmappedNode(usize),

    /// Vertex port that no qubit line passes through.
    #[error("Port {port} of vertex {vertex} is not on any qubit line")]
    UnroutedPort {
        /// Vertex index.
        vertex: usize,
        /// Port index.
        port: usize,
    },

    /// Coupling pair names a qubit beyond the supported device size.
    #[error("Qubit {index} exceeds the adjacency limit of {limit} qubits")]
    QubitOutOfRange {
        /// Offending qubit index.
        index: u32,
        /// Maximum number of qubits.
        limit: u32,
    },

    /// Catalog table maps a name or kind twice.
    #[error("Duplicate catalog entry: {0}")]
    DuplicateCatalogEntry(String),

    /// Error raised by either IR.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for translation.
pub type ConvertResult<T> = Result<T, ConvertError>;
