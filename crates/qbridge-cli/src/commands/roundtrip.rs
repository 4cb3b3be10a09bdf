//! Roundtrip command implementation.

use anyhow::{Context, Result};
use console::style;

use qbridge_convert::{TranslationPolicy, forward_translate_with_report, reverse_translate};
use qbridge_ir::DagCircuit;

use super::common::load_dag;
use super::forward::print_report;

/// Execute the roundtrip command.
pub fn execute(input: &str, policy: &TranslationPolicy) -> Result<()> {
    println!(
        "{} Round-tripping {}",
        style("→").cyan().bold(),
        style(input).green()
    );

    let dag = load_dag(input)?;
    let (circ, report) = forward_translate_with_report(&dag, policy)
        .with_context(|| format!("Forward translation failed: {input}"))?;
    print_report(&report.events);

    let qreg = dag
        .qregs()
        .first()
        .map_or("q", |r| r.name.as_str())
        .to_string();
    let back = reverse_translate(&circ, &qreg)
        .context("Reverse translation failed")?;

    println!("  {:<10} {:>8} {:>8} {:>8}", "", "qubits", "ops", "depth");
    summary("original", &dag)?;
    println!(
        "  {:<10} {:>8} {:>8} {:>8}",
        "vertex",
        circ.n_qubits(),
        circ.n_vertices(),
        "-"
    );
    summary("restored", &back)?;

    let same_shape = dag.num_qubits() == back.num_qubits()
        && dag.num_ops() == back.num_ops()
        && dag.depth()? == back.depth()?;
    if same_shape && report.is_lossless() {
        println!("{} Round trip preserved the circuit", style("✓").green().bold());
    } else {
        println!(
            "{} Round trip changed the circuit ({} boxed, {} conditions dropped)",
            style("!").yellow().bold(),
            report.boxed(),
            report.dropped_conditions()
        );
    }

    Ok(())
}

fn summary(label: &str, dag: &DagCircuit) -> Result<()> {
    println!(
        "  {:<10} {:>8} {:>8} {:>8}",
        label,
        dag.num_qubits(),
        dag.num_ops(),
        dag.depth()?
    );
    Ok(())
}
