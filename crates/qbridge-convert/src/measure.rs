//! Measurement destination codec.
//!
//! The vertex IR has no classical wires, so a measurement vertex records the
//! classical bits it writes as a JSON document in its description:
//!
//! ```json
//! {"bits":[{"register":"c","index":0}],"registers":[{"name":"c","size":2}]}
//! ```
//!
//! An empty `bits` list means no destination was recorded.

use qbridge_ir::{Clbit, DagCircuit};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding a measurement destination.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Not a valid destination document.
    #[error("malformed destination: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Bit count differs from the vertex's output arity.
    #[error("destination lists {got} bits but the measurement has {expected} outputs")]
    BitCount {
        /// Output arity of the vertex.
        expected: usize,
        /// Bits listed.
        got: usize,
    },

    /// Bit index beyond its register's declared size.
    #[error("bit {register}[{index}] is outside register of size {size}")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Offending index.
        index: u32,
        /// Declared size.
        size: u32,
    },

    /// Bit index with no room for a register to hold it.
    #[error("bit {register}[{index}] has no addressable register size")]
    IndexTooLarge {
        /// Register name.
        register: String,
        /// Offending index.
        index: u32,
    },

    /// Register declared more than once.
    #[error("register '{0}' is declared twice")]
    DuplicateRegister(String),

    /// Bit written more than once.
    #[error("bit {0} is written twice")]
    DuplicateBit(Clbit),
}

/// A classical bit named in a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BitRef {
    /// Register name.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

/// Size of a register at the time the measurement was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterSize {
    /// Register name.
    pub name: String,
    /// Number of bits.
    pub size: u32,
}

/// Classical bits written by one measurement vertex.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasureDestination {
    /// Bits in qubit-argument order.
    #[serde(default)]
    pub bits: Vec<BitRef>,
    /// Sizes of the registers the bits belong to.
    #[serde(default)]
    pub registers: Vec<RegisterSize>,
}

impl MeasureDestination {
    /// Record the bits of a DAG measurement, with register sizes from `dag`.
    pub fn from_clbits(cargs: &[Clbit], dag: &DagCircuit) -> Self {
        let bits: Vec<BitRef> = cargs
            .iter()
            .map(|c| BitRef {
                register: c.register.clone(),
                index: c.index,
            })
            .collect();

        let mut registers: Vec<RegisterSize> = Vec::new();
        for bit in &bits {
            if registers.iter().any(|r| r.name == bit.register) {
                continue;
            }
            let size = dag.creg(&bit.register).map_or_else(
                || used_size(&bits, &bit.register),
                |r| r.size,
            );
            registers.push(RegisterSize {
                name: bit.register.clone(),
                size,
            });
        }

        Self { bits, registers }
    }

    /// Serialize to the description string.
    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a description for a vertex with `n_outputs` ports.
    ///
    /// An empty string decodes to an empty destination.
    pub fn decode(text: &str, n_outputs: usize) -> Result<Self, CodecError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let dest: Self = serde_json::from_str(text)?;
        dest.validate(n_outputs)?;
        Ok(dest)
    }

    fn validate(&self, n_outputs: usize) -> Result<(), CodecError> {
        if !self.bits.is_empty() && self.bits.len() != n_outputs {
            return Err(CodecError::BitCount {
                expected: n_outputs,
                got: self.bits.len(),
            });
        }

        let mut names = FxHashSet::default();
        for reg in &self.registers {
            if !names.insert(reg.name.as_str()) {
                return Err(CodecError::DuplicateRegister(reg.name.clone()));
            }
        }

        let mut seen = FxHashSet::default();
        for bit in &self.bits {
            if bit.index == u32::MAX {
                return Err(CodecError::IndexTooLarge {
                    register: bit.register.clone(),
                    index: bit.index,
                });
            }
            if let Some(reg) = self.registers.iter().find(|r| r.name == bit.register) {
                if bit.index >= reg.size {
                    return Err(CodecError::IndexOutOfRange {
                        register: bit.register.clone(),
                        index: bit.index,
                        size: reg.size,
                    });
                }
            }
            if !seen.insert((bit.register.as_str(), bit.index)) {
                return Err(CodecError::DuplicateBit(Clbit::new(
                    bit.register.clone(),
                    bit.index,
                )));
            }
        }
        Ok(())
    }

    /// Check if no destination was recorded.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The destination bits.
    pub fn clbits(&self) -> Vec<Clbit> {
        self.bits
            .iter()
            .map(|b| Clbit::new(b.register.clone(), b.index))
            .collect()
    }

    /// Minimum size of every register the bits touch, in order of first use.
    ///
    /// A recorded size wins if it is larger than the highest index used.
    pub fn required_sizes(&self) -> Vec<(String, u32)> {
        let mut sizes: Vec<(String, u32)> = Vec::new();
        for bit in &self.bits {
            if sizes.iter().any(|(name, _)| *name == bit.register) {
                continue;
            }
            let used = used_size(&self.bits, &bit.register);
            let recorded = self
                .registers
                .iter()
                .find(|r| r.name == bit.register)
                .map_or(0, |r| r.size);
            sizes.push((bit.register.clone(), used.max(recorded)));
        }
        sizes
    }
}

/// One past the highest index used in `register`, saturating at `u32::MAX`.
fn used_size(bits: &[BitRef], register: &str) -> u32 {
    bits.iter()
        .filter(|b| b.register == register)
        .map(|b| b.index.saturating_add(1))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::Register;

    fn dag_with_creg(name: &str, size: u32) -> DagCircuit {
        let mut dag = DagCircuit::new();
        dag.add_creg(Register::new(name, size)).unwrap();
        dag
    }

    #[test]
    fn test_encode_records_register_sizes() {
        let dag = dag_with_creg("c", 4);
        let dest = MeasureDestination::from_clbits(&[Clbit::new("c", 2)], &dag);
        let text = dest.encode().unwrap();
        assert_eq!(
            text,
            r#"{"bits":[{"register":"c","index":2}],"registers":[{"name":"c","size":4}]}"#
        );
        let back = MeasureDestination::decode(&text, 1).unwrap();
        assert_eq!(back, dest);
        assert_eq!(back.required_sizes(), vec![("c".to_string(), 4)]);
    }

    #[test]
    fn test_empty_destination() {
        assert!(MeasureDestination::decode("", 2).unwrap().is_empty());
        let dest = MeasureDestination::decode(r#"{"bits":[]}"#, 2).unwrap();
        assert!(dest.is_empty());
        assert!(dest.required_sizes().is_empty());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            MeasureDestination::decode("[(c, 0)]", 1),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            MeasureDestination::decode(r#"{"bits":[],"extra":1}"#, 1),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_bit_count_mismatch() {
        let text = r#"{"bits":[{"register":"c","index":0}]}"#;
        assert!(matches!(
            MeasureDestination::decode(text, 2),
            Err(CodecError::BitCount { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_rejects_index_out_of_range() {
        let text = r#"{"bits":[{"register":"c","index":3}],"registers":[{"name":"c","size":2}]}"#;
        assert!(matches!(
            MeasureDestination::decode(text, 1),
            Err(CodecError::IndexOutOfRange { index: 3, size: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates() {
        let text = r#"{"bits":[{"register":"c","index":0},{"register":"c","index":0}]}"#;
        assert!(matches!(
            MeasureDestination::decode(text, 2),
            Err(CodecError::DuplicateBit(_))
        ));
        let text = r#"{"bits":[],"registers":[{"name":"c","size":1},{"name":"c","size":2}]}"#;
        assert!(matches!(
            MeasureDestination::decode(text, 1),
            Err(CodecError::DuplicateRegister(_))
        ));
    }

    #[test]
    fn test_rejects_unaddressable_index() {
        let text = r#"{"bits":[{"register":"c","index":4294967295}]}"#;
        assert!(matches!(
            MeasureDestination::decode(text, 1),
            Err(CodecError::IndexTooLarge { index: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_sizes_saturate_on_max_index() {
        let dest = MeasureDestination {
            bits: vec![BitRef {
                register: "c".into(),
                index: u32::MAX,
            }],
            registers: vec![],
        };
        assert_eq!(dest.required_sizes(), vec![("c".to_string(), u32::MAX)]);

        let from_dag = MeasureDestination::from_clbits(&[Clbit::new("c", u32::MAX)], &DagCircuit::new());
        assert_eq!(from_dag.registers[0].size, u32::MAX);
    }

    #[test]
    fn test_required_sizes_without_record() {
        let text = r#"{"bits":[{"register":"a","index":3},{"register":"b","index":0},{"register":"a","index":1}]}"#;
        let dest = MeasureDestination::decode(text, 3).unwrap();
        assert_eq!(
            dest.required_sizes(),
            vec![("a".to_string(), 4), ("b".to_string(), 1)]
        );
        assert_eq!(dest.clbits()[2], Clbit::new("a", 1));
    }
}
