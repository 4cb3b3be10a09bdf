//! qbridge Circuit Intermediate Representations
//!
//! This crate provides the two circuit representations that qbridge
//! translates between, plus the routing grid used to read a vertex circuit
//! back in time order.
//!
//! # Core Components
//!
//! - **Bits and registers**: [`Qubit`], [`Clbit`], [`Register`]
//! - **Parameters**: [`ParameterExpression`] for angles that may stay symbolic
//! - **DAG IR**: [`DagCircuit`] of [`Operation`]s joined by per-bit wires,
//!   with a declared basis of [`BasisElement`]s, built fluently via
//!   [`DagBuilder`]
//! - **Vertex/edge IR**: [`VertexCircuit`] of [`OpDescriptor`]s joined
//!   port-to-port
//! - **Routing grid**: [`RoutingGrid`], the vertex IR as qubit lines by
//!   time step
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qbridge_ir::{Clbit, DagBuilder, Qubit};
//!
//! let mut builder = DagBuilder::with_size(2, 2).unwrap();
//! builder
//!     .h(Qubit::new("q", 0)).unwrap()
//!     .cx(Qubit::new("q", 0), Qubit::new("q", 1)).unwrap()
//!     .measure(Qubit::new("q", 0), Clbit::new("c", 0)).unwrap();
//! let dag = builder.build();
//!
//! assert_eq!(dag.num_qubits(), 2);
//! assert_eq!(dag.num_ops(), 3);
//! ```
//!
//! # Example: A Vertex Circuit on the Grid
//!
//! ```rust
//! use qbridge_ir::{OpDescriptor, OpKind, RoutingGrid, VertexCircuit};
//!
//! let mut circ = VertexCircuit::new();
//! let i = circ.add_vertex(OpDescriptor::input());
//! let h = circ.add_vertex(OpDescriptor::new(OpKind::H, 1));
//! let o = circ.add_vertex(OpDescriptor::output());
//! circ.add_edge(i, 0, h, 0).unwrap();
//! circ.add_edge(h, 0, o, 0).unwrap();
//!
//! let grid = RoutingGrid::build(&circ).unwrap();
//! assert_eq!(grid.n_steps(), 3);
//! ```

pub mod bit;
pub mod builder;
pub mod dag;
pub mod error;
pub mod grid;
pub mod operation;
pub mod optype;
pub mod parameter;
pub mod vertex;

pub use bit::{Clbit, Qubit, Register};
pub use builder::DagBuilder;
pub use dag::{DagCircuit, DagEdge, DagListing, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use grid::{GridCell, RoutingGrid, Slice};
pub use operation::{BasisElement, ClassicalCondition, MEASURE, Operation};
pub use optype::{OpDescriptor, OpKind, OpPayload, Param};
pub use parameter::ParameterExpression;
pub use vertex::{EdgeRecord, Port, PortEdge, VertexCircuit, VertexIndex, VertexListing};
