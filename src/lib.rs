//! Stochastic cellular automaton of tumour growth with delayed population
//! feedback, plus cluster and delay-embedding analysis of its output.
//!
//! ```no_run
//! use rand::{rngs::StdRng, SeedableRng};
//! use tumor_ca::{run_trajectory, find_clusters, SimParams};
//!
//! let params = SimParams::with_dimensions(101, 101);
//! let seed = params.default_seed_positions();
//! let mut rng = StdRng::seed_from_u64(42);
//! let trajectory = run_trajectory(&params, 100, &seed, &mut rng)?;
//! let last = trajectory.grids.last().unwrap();
//! println!("{} clusters", find_clusters(last).len());
//! # Ok::<(), tumor_ca::CaError>(())
//! ```

pub mod cluster;
pub mod embedding;
pub mod grid;
pub mod history;
pub mod simulation;
pub mod stats;
pub mod sweep;
pub mod transition;

pub use cluster::{
    cluster_counts, find_clusters, metastasis_generation, Cluster, MetastasisTracker,
    DEFAULT_METASTASIS_THRESHOLD,
};
pub use embedding::reconstruct;
pub use grid::Grid;
pub use history::History;
pub use simulation::{
    run, run_cluster_trace, run_trajectory, ClusterTrace, Trajectory, TumorSimulation,
};
pub use stats::{
    count_cells, density_metric, mean_distance_from_origin, mean_field_fraction, total_affected,
};
pub use sweep::{sweep_time_delays, SweepResult};
pub use transition::step;

pub use tumor_common::{CaError, CellState, Coord, HistoryRecord, SimParams, SimulationConfig};
