//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use qbridge_convert::{MAX_ADJACENCY_QUBITS, TranslationPolicy};
use qbridge_ir::{DagCircuit, DagListing, VertexCircuit, VertexListing};

/// Load the translation policy, then apply command-line flags on top.
///
/// Flags win over environment variables, which win over the file.
pub fn load_policy(
    config: Option<&Path>,
    no_box_unknown: bool,
    drop_conditions: bool,
) -> Result<TranslationPolicy> {
    let mut policy = TranslationPolicy::load(config).with_context(|| match config {
        Some(path) => format!("Failed to load policy from {}", path.display()),
        None => "Failed to load policy from environment".to_string(),
    })?;
    if no_box_unknown {
        policy.box_unknown_ops = false;
    }
    if drop_conditions {
        policy.drop_conditions = true;
    }
    Ok(policy)
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    serde_json::from_str(&source).with_context(|| format!("Failed to parse JSON: {path}"))
}

/// Write `value` as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &str) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    fs::write(path, text).with_context(|| format!("Failed to write file: {path}"))
}

/// Load a DAG from its JSON listing.
pub fn load_dag(path: &str) -> Result<DagCircuit> {
    let listing: DagListing = read_json(path)?;
    DagCircuit::from_listing(&listing).with_context(|| format!("Invalid DAG listing: {path}"))
}

/// Load a vertex circuit from its JSON listing.
pub fn load_vertex_circuit(path: &str) -> Result<VertexCircuit> {
    let listing: VertexListing = read_json(path)?;
    VertexCircuit::from_listing(&listing)
        .with_context(|| format!("Invalid vertex listing: {path}"))
}

/// `dir/name.json` becomes `dir/name_<suffix>.json`.
pub fn default_output(input: &str, suffix: &str) -> String {
    let p = Path::new(input);
    let stem = p.file_stem().unwrap_or_default().to_string_lossy();
    let file = format!("{stem}_{suffix}.json");
    match p.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file).to_string_lossy().into_owned(),
        _ => file,
    }
}

/// Parse `"0-1,1-2"` into directed pairs.
///
/// Indices must be below [`MAX_ADJACENCY_QUBITS`].
pub fn parse_pairs(list: &str) -> Result<Vec<(u32, u32)>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (a, b) = pair
                .split_once('-')
                .with_context(|| format!("Invalid pair '{pair}', expected A-B"))?;
            Ok((parse_qubit(a, pair)?, parse_qubit(b, pair)?))
        })
        .collect()
}

fn parse_qubit(text: &str, pair: &str) -> Result<u32> {
    let index: u32 = text
        .trim()
        .parse()
        .with_context(|| format!("Invalid qubit index in '{pair}'"))?;
    if index >= MAX_ADJACENCY_QUBITS {
        anyhow::bail!("Qubit {index} in '{pair}' exceeds the limit of {MAX_ADJACENCY_QUBITS} qubits");
    }
    Ok(index)
}
