//! Routing grid: a vertex circuit laid out as qubit lines by time step.
//!
//! Step 0 holds every `Input` vertex. Each later step holds every vertex
//! whose input ports are all fed by the current front of their lines, so
//! the layering is as-soon-as-possible. A line ends at its `Output` vertex.

use rustc_hash::FxHashMap;

use crate::error::{IrError, IrResult};
use crate::optype::OpKind;
use crate::vertex::{Port, VertexCircuit, VertexIndex};

/// A vertex seen from one qubit line: which vertex, and through which port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// The vertex occupying the cell.
    pub vertex: VertexIndex,
    /// The port of that vertex the line passes through.
    pub port: Port,
}

/// The distinct vertices occupying one time step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    /// Time step.
    pub step: usize,
    /// Vertices, ordered by the first line they occupy.
    pub vertices: Vec<VertexIndex>,
}

/// A vertex circuit as a `lines x steps` table.
///
/// `None` marks a cell where nothing happens on that line.
#[derive(Debug, Clone, Default)]
pub struct RoutingGrid {
    cells: Vec<Vec<Option<GridCell>>>,
    n_steps: usize,
}

impl RoutingGrid {
    /// Lay out `circ` on its qubit lines.
    ///
    /// Fails with [`IrError::InvalidVertexCircuit`] if a port is left
    /// unwired, a vertex has differing input and output arity, a vertex
    /// cannot be reached from any line, or the layering stalls.
    pub fn build(circ: &VertexCircuit) -> IrResult<Self> {
        let n_lines = circ.n_qubits();
        // Position of each line: the last vertex placed and its output port.
        let mut front: Vec<(VertexIndex, Port)> =
            circ.inputs().iter().map(|&v| (v, 0)).collect();
        let mut finished = vec![false; n_lines];
        let mut cells: Vec<Vec<Option<GridCell>>> = circ
            .inputs()
            .iter()
            .map(|&v| vec![Some(GridCell { vertex: v, port: 0 })])
            .collect();
        let mut placed = n_lines;
        let mut n_steps = usize::from(n_lines > 0);

        while finished.iter().any(|done| !done) {
            // Vertex -> (input port, line) for every line waiting on it.
            let mut waiting: FxHashMap<VertexIndex, Vec<(Port, usize)>> = FxHashMap::default();
            for (line, &(v, port)) in front.iter().enumerate() {
                if finished[line] {
                    continue;
                }
                let (next, next_port) = circ.out_edge(v, port).ok_or_else(|| {
                    IrError::InvalidVertexCircuit(format!(
                        "output port {port} of vertex {} on line {line} is not wired",
                        v.index()
                    ))
                })?;
                waiting.entry(next).or_default().push((next_port, line));
            }

            let mut step: Vec<Option<GridCell>> = vec![None; n_lines];
            let mut any_ready = false;
            for (&v, arrivals) in &waiting {
                let op = circ.op(v).ok_or(IrError::InvalidNode(v.index()))?;
                if arrivals.len() < op.n_inputs {
                    continue;
                }
                if op.kind != OpKind::Output && op.n_inputs != op.n_outputs {
                    return Err(IrError::InvalidVertexCircuit(format!(
                        "vertex {} ({}) has {} inputs but {} outputs",
                        v.index(),
                        op.kind,
                        op.n_inputs,
                        op.n_outputs
                    )));
                }
                any_ready = true;
                placed += 1;
                for &(port, line) in arrivals {
                    step[line] = Some(GridCell { vertex: v, port });
                    if op.kind == OpKind::Output {
                        finished[line] = true;
                    } else {
                        front[line] = (v, port);
                    }
                }
            }

            if !any_ready {
                return Err(IrError::InvalidVertexCircuit(format!(
                    "no vertex ready at step {n_steps}; circuit is not layerable"
                )));
            }
            for (line, cell) in step.into_iter().enumerate() {
                cells[line].push(cell);
            }
            n_steps += 1;
        }

        if placed != circ.n_vertices() {
            return Err(IrError::InvalidVertexCircuit(format!(
                "{} of {} vertices are not reachable from any input",
                circ.n_vertices() - placed,
                circ.n_vertices()
            )));
        }

        Ok(Self { cells, n_steps })
    }

    /// Number of qubit lines.
    #[inline]
    pub fn n_lines(&self) -> usize {
        self.cells.len()
    }

    /// Number of time steps.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// The cell at `(line, step)`, or `None` if empty or out of range.
    pub fn cell(&self, line: usize, step: usize) -> Option<GridCell> {
        self.cells.get(line).and_then(|l| l.get(step).copied().flatten())
    }

    /// All cells of one line.
    pub fn line(&self, line: usize) -> Option<&[Option<GridCell>]> {
        self.cells.get(line).map(Vec::as_slice)
    }

    /// The slice sequence, one entry per time step.
    pub fn slices(&self) -> Vec<Slice> {
        (0..self.n_steps)
            .map(|step| {
                let mut vertices: Vec<VertexIndex> = Vec::new();
                for line in 0..self.n_lines() {
                    if let Some(cell) = self.cell(line, step) {
                        if !vertices.contains(&cell.vertex) {
                            vertices.push(cell.vertex);
                        }
                    }
                }
                Slice { step, vertices }
            })
            .collect()
    }

    /// Map from `(vertex, port)` to the line passing through that port.
    pub fn port_lookup(&self) -> FxHashMap<(VertexIndex, Port), usize> {
        let mut lookup = FxHashMap::default();
        for (line, cells) in self.cells.iter().enumerate() {
            for cell in cells.iter().flatten() {
                lookup.insert((cell.vertex, cell.port), line);
            }
        }
        lookup
    }
}
