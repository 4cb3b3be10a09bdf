//! The operation catalog: one bijective table between DAG operation names
//! and vertex kinds.

use std::fmt;
use std::sync::LazyLock;

use qbridge_ir::OpKind;
use rustc_hash::FxHashMap;

use crate::error::{ConvertError, ConvertResult};

/// Number of qubits an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QubitArity {
    /// Line start or end; never a DAG operation.
    Sentinel,
    /// Exactly `n` qubits.
    Fixed(usize),
    /// Any positive number of qubits.
    AtLeastOne,
}

impl QubitArity {
    fn accepts(self, n: usize) -> bool {
        match self {
            QubitArity::Sentinel => false,
            QubitArity::Fixed(k) => n == k,
            QubitArity::AtLeastOne => n >= 1,
        }
    }
}

impl fmt::Display for QubitArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitArity::Sentinel => write!(f, "no qubits (line sentinel)"),
            QubitArity::Fixed(1) => write!(f, "1 qubit"),
            QubitArity::Fixed(n) => write!(f, "{n} qubits"),
            QubitArity::AtLeastOne => write!(f, "at least 1 qubit"),
        }
    }
}

/// Number of angle parameters an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamArity {
    /// No parameters.
    None,
    /// A single angle.
    One,
    /// Exactly `n` angles, `n >= 2`.
    Many(usize),
}

impl ParamArity {
    /// Number of parameters expected.
    pub fn count(self) -> usize {
        match self {
            ParamArity::None => 0,
            ParamArity::One => 1,
            ParamArity::Many(n) => n,
        }
    }
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// DAG operation name.
    pub name: String,
    /// Vertex kind.
    pub kind: OpKind,
    /// Accepted qubit count.
    pub qubits: QubitArity,
    /// Accepted parameter count.
    pub params: ParamArity,
}

impl CatalogEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, kind: OpKind, qubits: QubitArity, params: ParamArity) -> Self {
        Self {
            name: name.into(),
            kind,
            qubits,
            params,
        }
    }

    /// Check a DAG operation at `node` against this entry.
    pub fn check_arity(&self, node: usize, num_qubits: usize, num_params: usize) -> ConvertResult<()> {
        if self.qubits.accepts(num_qubits) && self.params.count() == num_params {
            return Ok(());
        }
        Err(ConvertError::ArityMismatch {
            node,
            name: self.name.clone(),
            expected: format!("{} and {} params", self.qubits, self.params.count()),
            got: format!("{num_qubits} qubits and {num_params} params"),
        })
    }
}

/// Bijective name/kind table.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_name: FxHashMap<String, usize>,
    by_kind: FxHashMap<OpKind, usize>,
}

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::new(standard_entries()).expect("standard catalog entries are unique")
});

impl Catalog {
    /// Build a catalog, rejecting any name or kind that appears twice.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> ConvertResult<Self> {
        let entries: Vec<CatalogEntry> = entries.into_iter().collect();
        let mut by_name = FxHashMap::default();
        let mut by_kind = FxHashMap::default();
        for (i, entry) in entries.iter().enumerate() {
            if by_name.insert(entry.name.clone(), i).is_some() {
                return Err(ConvertError::DuplicateCatalogEntry(format!(
                    "name '{}'",
                    entry.name
                )));
            }
            if by_kind.insert(entry.kind, i).is_some() {
                return Err(ConvertError::DuplicateCatalogEntry(format!(
                    "kind {}",
                    entry.kind
                )));
            }
        }
        Ok(Self {
            entries,
            by_name,
            by_kind,
        })
    }

    /// The shared standard catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Look up by DAG operation name.
    pub fn by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Look up by vertex kind.
    pub fn by_kind(&self, kind: OpKind) -> Option<&CatalogEntry> {
        self.by_kind.get(&kind).map(|&i| &self.entries[i])
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

fn standard_entries() -> Vec<CatalogEntry> {
    use OpKind as K;
    use ParamArity as P;
    use QubitArity as Q;

    [
        ("in", K::Input, Q::Sentinel, P::None),
        ("out", K::Output, Q::Sentinel, P::None),
        ("id", K::Noop, Q::Fixed(1), P::None),
        ("x", K::X, Q::Fixed(1), P::None),
        ("y", K::Y, Q::Fixed(1), P::None),
        ("z", K::Z, Q::Fixed(1), P::None),
        ("s", K::S, Q::Fixed(1), P::None),
        ("sdg", K::Sdg, Q::Fixed(1), P::None),
        ("t", K::T, Q::Fixed(1), P::None),
        ("tdg", K::Tdg, Q::Fixed(1), P::None),
        ("v", K::V, Q::Fixed(1), P::None),
        ("vdg", K::Vdg, Q::Fixed(1), P::None),
        ("h", K::H, Q::Fixed(1), P::None),
        ("rx", K::Rx, Q::Fixed(1), P::One),
        ("ry", K::Ry, Q::Fixed(1), P::One),
        ("rz", K::Rz, Q::Fixed(1), P::One),
        ("u1", K::U1, Q::Fixed(1), P::One),
        ("u2", K::U2, Q::Fixed(1), P::Many(2)),
        ("u3", K::U3, Q::Fixed(1), P::Many(3)),
        ("cx", K::CX, Q::Fixed(2), P::None),
        ("cy", K::CY, Q::Fixed(2), P::None),
        ("cz", K::CZ, Q::Fixed(2), P::None),
        ("ch", K::CH, Q::Fixed(2), P::None),
        ("ccx", K::CCX, Q::Fixed(3), P::None),
        ("crz", K::CRz, Q::Fixed(2), P::One),
        ("cu1", K::CU1, Q::Fixed(2), P::One),
        ("cu3", K::CU3, Q::Fixed(2), P::Many(3)),
        ("phase", K::PhaseGadget, Q::AtLeastOne, P::One),
        ("symrz", K::SymbolicRz, Q::Fixed(1), P::One),
        ("measure", K::Measure, Q::AtLeastOne, P::None),
    ]
    .into_iter()
    .map(|(name, kind, qubits, params)| CatalogEntry::new(name, kind, qubits, params))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_bijective() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 30);
        for entry in catalog.iter() {
            assert_eq!(catalog.by_name(&entry.name), Some(entry));
            assert_eq!(catalog.by_kind(entry.kind), Some(entry));
        }
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.by_name("id").unwrap().kind, OpKind::Noop);
        assert_eq!(catalog.by_name("phase").unwrap().kind, OpKind::PhaseGadget);
        assert_eq!(catalog.by_kind(OpKind::CU3).unwrap().name, "cu3");
        assert!(catalog.by_name("swap").is_none());
        assert!(catalog.by_kind(OpKind::Swap).is_none());
        assert!(catalog.by_kind(OpKind::Box).is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Catalog::new([
            CatalogEntry::new("x", OpKind::X, QubitArity::Fixed(1), ParamArity::None),
            CatalogEntry::new("x", OpKind::Y, QubitArity::Fixed(1), ParamArity::None),
        ]);
        assert!(matches!(result, Err(ConvertError::DuplicateCatalogEntry(_))));
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let result = Catalog::new([
            CatalogEntry::new("x", OpKind::X, QubitArity::Fixed(1), ParamArity::None),
            CatalogEntry::new("not", OpKind::X, QubitArity::Fixed(1), ParamArity::None),
        ]);
        assert!(matches!(result, Err(ConvertError::DuplicateCatalogEntry(_))));
    }

    #[test]
    fn test_check_arity() {
        let catalog = Catalog::standard();
        let u3 = catalog.by_name("u3").unwrap();
        assert!(u3.check_arity(0, 1, 3).is_ok());
        assert!(matches!(
            u3.check_arity(4, 1, 2),
            Err(ConvertError::ArityMismatch { node: 4, .. })
        ));

        let phase = catalog.by_name("phase").unwrap();
        assert!(phase.check_arity(0, 4, 1).is_ok());
        assert!(phase.check_arity(0, 0, 1).is_err());

        let cx = catalog.by_name("cx").unwrap();
        assert!(cx.check_arity(0, 3, 0).is_err());

        let input = catalog.by_name("in").unwrap();
        assert!(input.check_arity(0, 0, 0).is_err());
    }
}
