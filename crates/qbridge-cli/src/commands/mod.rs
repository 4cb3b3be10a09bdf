//! CLI command implementations.

pub mod adjacency;
pub mod common;
pub mod forward;
pub mod grid;
pub mod reverse;
pub mod roundtrip;
