//! Forward command implementation.

use anyhow::{Context, Result};
use console::style;

use qbridge_convert::{Degradation, TranslationPolicy, forward_translate_with_report};

use super::common::{default_output, load_dag, write_json};

/// Execute the forward command.
pub fn execute(input: &str, output: Option<&str>, policy: &TranslationPolicy) -> Result<()> {
    println!(
        "{} Translating {} to vertex form",
        style("→").cyan().bold(),
        style(input).green()
    );

    let dag = load_dag(input)?;
    println!(
        "  Loaded: {} qubits, {} clbits, {} ops",
        dag.num_qubits(),
        dag.num_clbits(),
        dag.num_ops()
    );

    let (circ, report) = forward_translate_with_report(&dag, policy)
        .with_context(|| format!("Forward translation failed: {input}"))?;

    println!("{} Translation complete", style("✓").green().bold());
    println!(
        "  Result: {} vertices, {} edges",
        circ.n_vertices(),
        circ.n_edges()
    );
    print_report(&report.events);

    let output_path = output.map_or_else(|| default_output(input, "vertex"), str::to_string);
    write_json(&circ.to_listing(), &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}

/// Print every degradation the forward translation recorded.
pub fn print_report(events: &[Degradation]) {
    for event in events {
        let line = match event {
            Degradation::DroppedCondition {
                node,
                name,
                register,
                value,
            } => format!("node {node}: dropped condition {register}=={value} on '{name}'"),
            Degradation::BoxedOperation { node, name } => {
                format!("node {node}: '{name}' boxed as an opaque operation")
            }
            Degradation::DroppedBoxParams { node, name, count } => {
                format!("node {node}: {count} parameter(s) of boxed '{name}' dropped")
            }
        };
        println!("  {} {line}", style("!").yellow().bold());
    }
}
