//! Operation descriptors for the vertex/edge representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parameter::ParameterExpression;

/// Kind of operation carried by a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpKind {
    /// Start of a qubit line.
    Input,
    /// End of a qubit line.
    Output,
    /// Identity.
    Noop,
    X,
    Y,
    Z,
    S,
    Sdg,
    T,
    Tdg,
    /// sqrt(X).
    V,
    /// sqrt(X)-dagger.
    Vdg,
    H,
    Rx,
    Ry,
    Rz,
    U1,
    U2,
    U3,
    CX,
    CY,
    CZ,
    CH,
    /// Toffoli.
    CCX,
    CRz,
    CU1,
    CU3,
    /// Z-rotation on the parity of any number of qubits.
    PhaseGadget,
    /// Z-rotation whose angle is kept as an expression.
    SymbolicRz,
    Measure,
    /// Opaque placeholder; the description holds the original operation name.
    Box,
    Swap,
    Reset,
    Barrier,
    ZZPhase,
}

impl OpKind {
    /// Check if this kind is a line sentinel.
    #[inline]
    pub fn is_boundary(self) -> bool {
        matches!(self, OpKind::Input | OpKind::Output)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An angle on a vertex.
///
/// Numeric angles are stored in half-turns: `0.5` is a quarter rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// A numeric angle in half-turns.
    Numeric(f64),
    /// An expression that could not be evaluated to a number.
    Symbolic(ParameterExpression),
}

impl Param {
    /// The numeric value in half-turns, if any.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Param::Numeric(v) => Some(*v),
            Param::Symbolic(_) => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Numeric(v) => write!(f, "{v}"),
            Param::Symbolic(e) => write!(f, "{e}"),
        }
    }
}

/// Extra data attached to a vertex's operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpPayload {
    /// No payload.
    #[default]
    None,
    /// One angle.
    Single(Param),
    /// Several angles.
    Multi(Vec<Param>),
    /// Opaque text: the name of a boxed operation, or a measurement's
    /// classical destination.
    Description(String),
}

/// A vertex's operation: kind, arity and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpDescriptor {
    /// Operation kind.
    pub kind: OpKind,
    /// Number of input ports.
    pub n_inputs: usize,
    /// Number of output ports.
    pub n_outputs: usize,
    /// Attached payload.
    #[serde(default)]
    pub payload: OpPayload,
}

impl OpDescriptor {
    /// Create an operation acting on `n` qubits, with no payload.
    pub fn new(kind: OpKind, n: usize) -> Self {
        Self {
            kind,
            n_inputs: n,
            n_outputs: n,
            payload: OpPayload::None,
        }
    }

    /// The start of a qubit line.
    pub fn input() -> Self {
        Self {
            kind: OpKind::Input,
            n_inputs: 0,
            n_outputs: 1,
            payload: OpPayload::None,
        }
    }

    /// The end of a qubit line.
    pub fn output() -> Self {
        Self {
            kind: OpKind::Output,
            n_inputs: 1,
            n_outputs: 0,
            payload: OpPayload::None,
        }
    }

    /// Attach a single angle.
    #[must_use]
    pub fn with_param(mut self, param: Param) -> Self {
        self.payload = OpPayload::Single(param);
        self
    }

    /// Attach several angles.
    #[must_use]
    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.payload = OpPayload::Multi(params);
        self
    }

    /// Attach an opaque description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.payload = OpPayload::Description(desc.into());
        self
    }

    /// All angles, in order. Empty unless the payload carries angles.
    pub fn params(&self) -> Vec<&Param> {
        match &self.payload {
            OpPayload::Single(p) => vec![p],
            OpPayload::Multi(ps) => ps.iter().collect(),
            OpPayload::None | OpPayload::Description(_) => vec![],
        }
    }

    /// The opaque description, if any.
    pub fn description(&self) -> Option<&str> {
        match &self.payload {
            OpPayload::Description(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for OpDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match &self.payload {
            OpPayload::None => Ok(()),
            OpPayload::Single(p) => write!(f, "({p})"),
            OpPayload::Multi(ps) => {
                let parts: Vec<_> = ps.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
            OpPayload::Description(d) => write!(f, "[{d}]"),
        }
    }
}
