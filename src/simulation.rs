use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tumor_common::{CaError, CellState, Coord, Result, SimParams};

use crate::cluster::MetastasisTracker;
use crate::grid::Grid;
use crate::history::History;
use crate::stats::count_cells;
use crate::transition;

/// Every grid of a run together with its history.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Seeded grid before generation 0.
    pub initial: Grid,
    /// `grids[g]` is the grid produced by the step of generation `g`.
    pub grids: Vec<Grid>,
    pub history: History,
}

/// History plus per-generation cluster counts; grids are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterTrace {
    pub history: History,
    /// `cluster_counts[g]` counts clusters in the grid produced at generation `g`.
    pub cluster_counts: Vec<usize>,
    /// First generation whose cluster count exceeded the threshold (`Tm`).
    pub metastasis_generation: Option<u32>,
}

/// Owns the state of one automaton run and advances it a generation at a time.
pub struct TumorSimulation<R: Rng> {
    params: SimParams,
    grid: Grid,
    history: History,
    /// Source of every random draw in this run.
    rng: R,
    generation: u32,
}

impl TumorSimulation<StdRng> {
    /// Creates a run driven by a `StdRng` seeded with `seed`.
    pub fn seeded(params: SimParams, initial_positions: &[Coord], seed: u64) -> Result<Self> {
        Self::new(params, initial_positions, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TumorSimulation<R> {
    /// Seeds an all-Normal lattice with Cancerous cells at `initial_positions`.
    pub fn new(params: SimParams, initial_positions: &[Coord], rng: R) -> Result<Self> {
        let grid = Grid::with_cancer(params.rows, params.cols, initial_positions)?;
        debug!(
            "Seeded {}x{} grid with {} cancer cells (origin {:?})",
            params.rows,
            params.cols,
            count_cells(&grid, CellState::Cancerous),
            params.origin
        );
        Ok(Self {
            params,
            grid,
            history: History::new(),
            rng,
            generation: 0,
        })
    }

    /// Applies one transition step and returns the new grid.
    pub fn step(&mut self) -> Result<&Grid> {
        let next = transition::step(
            &self.grid,
            self.generation,
            &mut self.history,
            &self.params,
            &mut self.rng,
        )?;
        self.grid = next;
        self.generation += 1;
        Ok(&self.grid)
    }

    /// Next generation to be simulated.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Provides access to the run parameters.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn into_history(self) -> History {
        self.history
    }
}

/// Runs `generations` steps and keeps only the history.
pub fn run<R: Rng + ?Sized>(
    params: &SimParams,
    generations: u32,
    initial_positions: &[Coord],
    rng: &mut R,
) -> Result<History> {
    let mut sim = start(params, generations, initial_positions, rng)?;
    for _ in 0..generations {
        sim.step()?;
    }
    finish(&sim);
    Ok(sim.into_history())
}

/// Runs `generations` steps keeping every grid.
pub fn run_trajectory<R: Rng + ?Sized>(
    params: &SimParams,
    generations: u32,
    initial_positions: &[Coord],
    rng: &mut R,
) -> Result<Trajectory> {
    let mut sim = start(params, generations, initial_positions, rng)?;
    let initial = sim.grid().clone();
    let mut grids = Vec::with_capacity(generations as usize);
    for _ in 0..generations {
        grids.push(sim.step()?.clone());
    }
    finish(&sim);
    Ok(Trajectory {
        initial,
        grids,
        history: sim.into_history(),
    })
}

/// Runs `generations` steps keeping the history and cluster counts, and
/// detects the first generation with more than `threshold` clusters.
pub fn run_cluster_trace<R: Rng + ?Sized>(
    params: &SimParams,
    generations: u32,
    initial_positions: &[Coord],
    threshold: usize,
    rng: &mut R,
) -> Result<ClusterTrace> {
    let mut sim = start(params, generations, initial_positions, rng)?;
    let mut tracker = MetastasisTracker::new(threshold);
    for _ in 0..generations {
        let generation = sim.generation();
        let grid = sim.step()?;
        tracker.observe(generation, grid);
    }
    finish(&sim);
    match tracker.onset() {
        Some(tm) => info!("Metastasis generation Tm = {}", tm),
        None => info!(
            "Cluster count never exceeded {} within {} generations",
            tracker.threshold(),
            generations
        ),
    }
    let (cluster_counts, metastasis_generation) = tracker.into_parts();
    Ok(ClusterTrace {
        history: sim.into_history(),
        cluster_counts,
        metastasis_generation,
    })
}

fn start<'r, R: Rng + ?Sized>(
    params: &SimParams,
    generations: u32,
    initial_positions: &[Coord],
    rng: &'r mut R,
) -> Result<TumorSimulation<&'r mut R>> {
    if generations == 0 {
        return Err(CaError::NoGenerations);
    }
    info!(
        "Running {} generations on {}x{} (time delay {})",
        generations, params.rows, params.cols, params.time_delay
    );
    TumorSimulation::new(params.clone(), initial_positions, rng)
}

fn finish<R: Rng>(sim: &TumorSimulation<R>) {
    let grid = sim.grid();
    let params = sim.params();
    info!(
        "Finished at generation {} on {}x{}: cancer={} edge={} dead={}",
        sim.generation(),
        params.rows,
        params.cols,
        count_cells(grid, CellState::Cancerous),
        count_cells(grid, CellState::Edge),
        count_cells(grid, CellState::Dead)
    );
    if let Some((generation, record)) = sim.history().iter().last() {
        debug!(
            "Last recorded generation {}: {} affected, mean radius {:.3}",
            generation,
            record.affected(),
            record.mean_radius
        );
    }
}
