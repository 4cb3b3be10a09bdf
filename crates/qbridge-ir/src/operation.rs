//! Operations placed on DAG nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bit::{Clbit, Qubit};
use crate::parameter::ParameterExpression;

/// Name of the measurement operation.
pub const MEASURE: &str = "measure";

/// Classical condition guarding an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalCondition {
    /// The name of the classical register.
    pub register: String,
    /// The value the register must hold.
    pub value: u64,
}

impl ClassicalCondition {
    /// Create a new classical condition.
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

/// A named operation with its operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation name, e.g. `"cx"` or `"u3"`.
    pub name: String,
    /// Qubit arguments, in declared order.
    pub qargs: Vec<Qubit>,
    /// Classical arguments, in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cargs: Vec<Clbit>,
    /// Angle parameters in radians.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParameterExpression>,
    /// Optional classical condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClassicalCondition>,
}

impl Operation {
    /// Create an operation with no parameters or classical operands.
    pub fn new(name: impl Into<String>, qargs: impl IntoIterator<Item = Qubit>) -> Self {
        Self {
            name: name.into(),
            qargs: qargs.into_iter().collect(),
            cargs: vec![],
            params: vec![],
            condition: None,
        }
    }

    /// Create a measurement writing each qubit into the matching classical bit.
    pub fn measure(
        qargs: impl IntoIterator<Item = Qubit>,
        cargs: impl IntoIterator<Item = Clbit>,
    ) -> Self {
        Self {
            name: MEASURE.to_string(),
            qargs: qargs.into_iter().collect(),
            cargs: cargs.into_iter().collect(),
            params: vec![],
            condition: None,
        }
    }

    /// Attach parameters.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = ParameterExpression>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Attach classical arguments.
    #[must_use]
    pub fn with_cargs(mut self, cargs: impl IntoIterator<Item = Clbit>) -> Self {
        self.cargs = cargs.into_iter().collect();
        self
    }

    /// Attach a classical condition.
    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        self.name == MEASURE
    }

    /// Check if a classical condition is attached.
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Signature used when declaring this operation in a DAG basis.
    pub fn basis_element(&self) -> BasisElement {
        BasisElement {
            name: self.name.clone(),
            num_qubits: self.qargs.len(),
            num_clbits: self.cargs.len(),
            num_params: self.params.len(),
        }
    }
}

/// Declared signature of an operation name within a DAG.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasisElement {
    /// Operation name.
    pub name: String,
    /// Number of qubit arguments.
    pub num_qubits: usize,
    /// Number of classical arguments.
    pub num_clbits: usize,
    /// Number of parameters.
    pub num_params: usize,
}

impl fmt::Display for BasisElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} qubits, {} clbits, {} params",
            self.num_qubits, self.num_clbits, self.num_params
        )
    }
}
