//! Reverse command implementation.

use anyhow::{Context, Result};
use console::style;

use qbridge_convert::reverse_translate;

use super::common::{default_output, load_vertex_circuit, write_json};

/// Execute the reverse command.
pub fn execute(input: &str, output: Option<&str>, qreg: &str) -> Result<()> {
    println!(
        "{} Translating {} to DAG form",
        style("→").cyan().bold(),
        style(input).green()
    );

    let circ = load_vertex_circuit(input)?;
    println!(
        "  Loaded: {} lines, {} vertices",
        circ.n_qubits(),
        circ.n_vertices()
    );

    let dag = reverse_translate(&circ, qreg)
        .with_context(|| format!("Reverse translation failed: {input}"))?;

    println!("{} Translation complete", style("✓").green().bold());
    println!(
        "  Result: {} qubits, {} clbits, {} ops, depth {}",
        dag.num_qubits(),
        dag.num_clbits(),
        dag.num_ops(),
        dag.depth()?
    );
    for reg in dag.cregs() {
        println!("  creg {}[{}]", style(&reg.name).yellow(), reg.size);
    }

    let output_path = output.map_or_else(|| default_output(input, "dag"), str::to_string);
    write_json(&dag.to_listing()?, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}
