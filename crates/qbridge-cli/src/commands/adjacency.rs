//! Adjacency command implementation.

use anyhow::{Context, Result};

use qbridge_convert::build_adjacency;

use super::common::parse_pairs;

/// Execute the adjacency command.
pub fn execute(pairs: &str) -> Result<()> {
    let pairs = parse_pairs(pairs)?;
    let adjacency = build_adjacency(&pairs).context("Invalid coupling list")?;
    let text = serde_json::to_string_pretty(&adjacency.to_listing())
        .context("Failed to serialize adjacency")?;
    println!("{text}");
    Ok(())
}
