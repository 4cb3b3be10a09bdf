//! Qubits, classical bits and the registers that own them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A qubit addressed by its register and position within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qubit {
    /// Name of the quantum register.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

impl Qubit {
    /// Create a new qubit reference.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A classical bit addressed by its register and position within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clbit {
    /// Name of the classical register.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

impl Clbit {
    /// Create a new classical bit reference.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A named, fixed-size register of qubits or classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    /// Register name, unique among registers of the same kind.
    pub name: String,
    /// Number of bits in the register.
    pub size: u32,
}

impl Register {
    /// Create a new register.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Qubits of this register, in index order.
    pub fn qubits(&self) -> impl Iterator<Item = Qubit> + '_ {
        (0..self.size).map(|i| Qubit::new(&self.name, i))
    }

    /// Classical bits of this register, in index order.
    pub fn clbits(&self) -> impl Iterator<Item = Clbit> + '_ {
        (0..self.size).map(|i| Clbit::new(&self.name, i))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}
