//! Grid command implementation.

use anyhow::{Context, Result};
use console::style;

use qbridge_ir::{RoutingGrid, VertexCircuit};

use super::common::load_vertex_circuit;

/// Execute the grid command.
pub fn execute(input: &str) -> Result<()> {
    let circ = load_vertex_circuit(input)?;
    let grid =
        RoutingGrid::build(&circ).with_context(|| format!("Cannot lay out circuit: {input}"))?;

    println!(
        "{} {} lines x {} steps",
        style("Grid:").cyan().bold(),
        grid.n_lines(),
        grid.n_steps()
    );
    for line in render(&circ, &grid) {
        println!("  {line}");
    }
    Ok(())
}

/// One text row per line; each cell shows `vertex:port kind`.
pub fn render(circ: &VertexCircuit, grid: &RoutingGrid) -> Vec<String> {
    (0..grid.n_lines())
        .map(|line| {
            let cells: Vec<String> = (0..grid.n_steps())
                .map(|step| match grid.cell(line, step) {
                    Some(cell) => {
                        let kind = circ
                            .op(cell.vertex)
                            .map_or_else(|| "?".to_string(), |op| op.kind.to_string());
                        format!("{}:{} {kind}", cell.vertex.index(), cell.port)
                    }
                    None => "-".to_string(),
                })
                .collect();
            format!("{line:>3} | {}", cells.join(" | "))
        })
        .collect()
}
