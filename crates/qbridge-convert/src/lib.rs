//! qbridge Circuit Translation
//!
//! This crate translates circuits between the DAG representation and the
//! vertex/edge representation of [`qbridge_ir`], in both directions.
//!
//! # Overview
//!
//! ```text
//! DagCircuit ──forward_translate──► VertexCircuit
//!      ▲                                  │
//!      │                            RoutingGrid
//!      │                                  │
//!      └────────reverse_translate─────────┘
//! ```
//!
//! - The [`Catalog`] maps DAG operation names to vertex kinds and back.
//! - Angles cross as radians on the DAG side and half-turns on the vertex
//!   side ([`normalize_in`], [`normalize_out`]).
//! - Classical wires do not exist on the vertex side. A measurement records
//!   its destination bits in its description ([`MeasureDestination`]); other
//!   classical usage fails, or is dropped when [`TranslationPolicy`] allows.
//! - Unknown operations become opaque boxes unless the policy forbids it.
//!
//! The two directions are inverse on the supported subset, up to the names
//! of classical registers that had to be synthesized.
//!
//! # Example
//!
//! ```rust
//! use qbridge_convert::{TranslationPolicy, forward_translate, reverse_translate};
//! use qbridge_ir::{Clbit, DagBuilder, Qubit};
//!
//! let mut builder = DagBuilder::with_size(2, 2).unwrap();
//! builder
//!     .h(Qubit::new("q", 0)).unwrap()
//!     .cx(Qubit::new("q", 0), Qubit::new("q", 1)).unwrap()
//!     .measure(Qubit::new("q", 1), Clbit::new("c", 1)).unwrap();
//! let dag = builder.build();
//!
//! let circ = forward_translate(&dag, &TranslationPolicy::default()).unwrap();
//! assert_eq!(circ.n_qubits(), 2);
//!
//! let back = reverse_translate(&circ, "q").unwrap();
//! assert_eq!(back.num_ops(), 3);
//! assert_eq!(back.cregs()[0].size, 2);
//! ```

pub mod architecture;
pub mod catalog;
pub mod context;
pub mod error;
pub mod forward;
pub mod measure;
pub mod normalize;
pub mod policy;
pub mod ports;
pub mod reverse;

pub use architecture::{AdjacencyListing, DirectedAdjacency, MAX_ADJACENCY_QUBITS, build_adjacency};
pub use catalog::{Catalog, CatalogEntry, ParamArity, QubitArity};
pub use context::{RegisterNamer, TranslationContext};
pub use error::{ConvertError, ConvertResult};
pub use forward::{Degradation, TranslationReport, forward_translate, forward_translate_with_report};
pub use measure::{CodecError, MeasureDestination};
pub use normalize::{HALF_TURN, normalize_in, normalize_out};
pub use policy::{ConfigError, TranslationPolicy};
pub use ports::port_for_edge;
pub use reverse::{reverse_translate, reverse_translate_with};
