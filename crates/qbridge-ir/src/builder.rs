//! High-level DAG builder API.

use crate::bit::{Clbit, Qubit, Register};
use crate::dag::DagCircuit;
use crate::error::IrResult;
use crate::operation::{ClassicalCondition, Operation};
use crate::parameter::ParameterExpression;

/// Fluent builder for [`DagCircuit`].
///
/// Every operation applied through the builder is declared in the DAG's
/// basis first, so callers never deal with basis elements directly.
#[derive(Debug, Clone, Default)]
pub struct DagBuilder {
    dag: DagCircuit,
}

impl DagBuilder {
    /// Create a builder with no registers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a quantum register `q` and, if `num_clbits`
    /// is non-zero, a classical register `c`.
    pub fn with_size(num_qubits: u32, num_clbits: u32) -> IrResult<Self> {
        let mut builder = Self::new();
        builder.qreg("q", num_qubits)?;
        if num_clbits > 0 {
            builder.creg("c", num_clbits)?;
        }
        Ok(builder)
    }

    /// Add a quantum register.
    pub fn qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<&mut Self> {
        self.dag.add_qreg(Register::new(name, size))?;
        Ok(self)
    }

    /// Add a classical register.
    pub fn creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<&mut Self> {
        self.dag.add_creg(Register::new(name, size))?;
        Ok(self)
    }

    /// Declare and append an arbitrary operation.
    pub fn apply(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.dag.add_basis_element(op.basis_element())?;
        self.dag.apply_operation_back(op)?;
        Ok(self)
    }

    /// Append a named gate with parameters.
    pub fn gate(
        &mut self,
        name: impl Into<String>,
        qargs: impl IntoIterator<Item = Qubit>,
        params: impl IntoIterator<Item = ParameterExpression>,
    ) -> IrResult<&mut Self> {
        self.apply(Operation::new(name, qargs).with_params(params))
    }

    /// Append a named gate guarded by `register == value`.
    pub fn conditional(
        &mut self,
        name: impl Into<String>,
        qargs: impl IntoIterator<Item = Qubit>,
        register: impl Into<String>,
        value: u64,
    ) -> IrResult<&mut Self> {
        self.apply(
            Operation::new(name, qargs).with_condition(ClassicalCondition::new(register, value)),
        )
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.gate("h", [qubit], [])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.gate("x", [qubit], [])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.gate("y", [qubit], [])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.gate("z", [qubit], [])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.gate("s", [qubit], [])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.gate("t", [qubit], [])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: Qubit,
    ) -> IrResult<&mut Self> {
        let theta: ParameterExpression = theta.into();
        self.gate("rx", [qubit], [theta])
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: Qubit,
    ) -> IrResult<&mut Self> {
        let theta: ParameterExpression = theta.into();
        self.gate("ry", [qubit], [theta])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: Qubit,
    ) -> IrResult<&mut Self> {
        let theta: ParameterExpression = theta.into();
        self.gate("rz", [qubit], [theta])
    }

    /// Apply U3 gate.
    pub fn u3(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: Qubit,
    ) -> IrResult<&mut Self> {
        let params: [ParameterExpression; 3] = [theta.into(), phi.into(), lambda.into()];
        self.gate("u3", [qubit], params)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.gate("cx", [control, target], [])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.gate("cz", [control, target], [])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: Qubit, c2: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.gate("ccx", [c1, c2, target], [])
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: Qubit, clbit: Clbit) -> IrResult<&mut Self> {
        self.apply(Operation::measure([qubit], [clbit]))
    }

    /// Borrow the DAG built so far.
    pub fn dag(&self) -> &DagCircuit {
        &self.dag
    }

    /// Finish building.
    pub fn build(self) -> DagCircuit {
        self.dag
    }
}
