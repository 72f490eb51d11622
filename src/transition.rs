//! The stochastic per-cell update rule.
//!
//! One call to [`step`] advances the lattice by a single generation. Every
//! interior site is visited row-major and reads only the pre-step grid;
//! all writes, including cells created by mitosis, go to a fresh output grid.
//! Random draws happen in a fixed order so a seeded generator replays a run
//! exactly:
//!
//! - Cancerous: `u1 < p_mitosis` divides; otherwise `u2 < k2` turns it Edge.
//! - Edge: `u3 < k3` turns it Dead.
//! - Dead: `u4 < k4` turns it Normal.
//! - Normal: no draw.

use log::{debug, trace};
use rand::Rng;
use tumor_common::{CellState, Coord, HistoryRecord, Result, SimParams};

use crate::grid::Grid;
use crate::history::History;
use crate::stats::count_cells;

/// Region of the lattice relative to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Upper right: `row <= r0`, `col > c0`.
    I,
    /// Upper left: `row <= r0`, `col <= c0`.
    II,
    /// Lower left: `row > r0`, `col <= c0`.
    III,
    /// Lower right: `row > r0`, `col > c0`.
    IV,
}

impl Quadrant {
    pub fn of((row, col): Coord, (r0, c0): Coord) -> Self {
        match (row <= r0, col > c0) {
            (true, true) => Quadrant::I,
            (true, false) => Quadrant::II,
            (false, false) => Quadrant::III,
            (false, true) => Quadrant::IV,
        }
    }
}

/// One of the four von Neumann neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Neighbouring coordinate, or `None` when it would fall off the lattice.
    pub fn apply(self, (row, col): Coord, grid: &Grid) -> Option<Coord> {
        let target = match self {
            Direction::Up => (row.checked_sub(1)?, col),
            Direction::Right => (row, col + 1),
            Direction::Down => (row + 1, col),
            Direction::Left => (row, col.checked_sub(1)?),
        };
        grid.contains(target).then_some(target)
    }
}

/// Ordered daughter-cell directions for a dividing cell.
///
/// A dense tumour pushes outward along the quadrant's boundary; a sparse one
/// fills back toward the origin.
pub fn preferred_directions(quadrant: Quadrant, dense: bool) -> [Direction; 2] {
    use Direction::*;
    match (quadrant, dense) {
        (Quadrant::I, true) => [Up, Right],
        (Quadrant::II, true) => [Left, Up],
        (Quadrant::III, true) => [Down, Left],
        (Quadrant::IV, true) => [Right, Down],
        (Quadrant::I, false) => [Down, Left],
        (Quadrant::II, false) => [Right, Down],
        (Quadrant::III, false) => [Up, Right],
        (Quadrant::IV, false) => [Left, Up],
    }
}

/// `k1 * (1 - n / phi)`, with `n` taken from the delayed record when one
/// exists and from the live count otherwise.
pub fn mitosis_probability(
    k1: f64,
    phi: f64,
    live_cancer_count: usize,
    delayed: Option<&HistoryRecord>,
) -> f64 {
    let n = delayed.map_or(live_cancer_count, |record| record.cancer_count);
    k1 * (1.0 - n as f64 / phi)
}

/// Places one daughter cell next to `pos`.
///
/// Candidates are tried in preference order; the first whose pre-step state
/// is neither Edge nor Dead, and which is not a border site, becomes
/// Cancerous in `next`. Returns the converted site, if any.
pub fn mitosis(
    current: &Grid,
    next: &mut Grid,
    pos: Coord,
    origin: Coord,
    dense: bool,
) -> Option<Coord> {
    let quadrant = Quadrant::of(pos, origin);
    let target = preferred_directions(quadrant, dense)
        .into_iter()
        .filter_map(|direction| direction.apply(pos, current))
        .find(|&target| {
            !current.is_border(target)
                && !matches!(current[target], CellState::Edge | CellState::Dead)
        })?;
    next[target] = CellState::Cancerous;
    Some(target)
}

/// Feedback values in force for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFeedback {
    pub mitosis_probability: f64,
    pub dense: bool,
}

impl StepFeedback {
    /// Resolves the delayed feedback for `generation`. The current record must
    /// already be stored in `history`.
    fn resolve(
        grid: &Grid,
        generation: u32,
        history: &History,
        current: &HistoryRecord,
        params: &SimParams,
    ) -> Self {
        let delayed = history.lookup_delayed(generation, params.time_delay);
        let live = count_cells(grid, CellState::Cancerous);
        Self {
            mitosis_probability: mitosis_probability(params.k1, params.phi, live, delayed),
            dense: delayed.map_or(current.is_dense, |record| record.is_dense),
        }
    }
}

/// Advances `grid` by one generation.
///
/// Records the pre-step statistics of `grid` in `history` under `generation`
/// and returns the next grid; `grid` itself is left untouched. Border sites
/// are never written.
pub fn step<R: Rng + ?Sized>(
    grid: &Grid,
    generation: u32,
    history: &mut History,
    params: &SimParams,
    rng: &mut R,
) -> Result<Grid> {
    let current = history
        .record(generation, grid, params.origin, params.rho)?
        .clone();
    let feedback = StepFeedback::resolve(grid, generation, history, &current, params);
    debug!(
        "Generation {}: p_mitosis={:.4}, dense={}",
        generation, feedback.mitosis_probability, feedback.dense
    );

    let mut next = grid.clone();
    let mut divisions = 0usize;

    for row in 1..grid.rows().saturating_sub(1) {
        for col in 1..grid.cols().saturating_sub(1) {
            let pos = (row, col);
            match grid[pos] {
                CellState::Cancerous => {
                    if rng.random::<f64>() < feedback.mitosis_probability {
                        if mitosis(grid, &mut next, pos, params.origin, feedback.dense).is_some() {
                            divisions += 1;
                        }
                    } else if rng.random::<f64>() < params.k2 {
                        next[pos] = CellState::Edge;
                    }
                }
                CellState::Edge => {
                    if rng.random::<f64>() < params.k3 {
                        next[pos] = CellState::Dead;
                    }
                }
                CellState::Dead => {
                    if rng.random::<f64>() < params.k4 {
                        next[pos] = CellState::Normal;
                    }
                }
                CellState::Normal => {}
            }
        }
    }

    trace!("Generation {}: {} daughter cells placed", generation, divisions);
    Ok(next)
}
