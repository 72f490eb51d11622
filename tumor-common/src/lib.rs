pub mod cell;
pub mod config;
pub mod error;
pub mod record;
pub mod sim_params;

// Re-export key types for easier use by dependent crates
pub use cell::{CellState, Coord};
pub use config::{SimulationConfig, GridConfig, RatesConfig, FeedbackConfig, TimingConfig, InitialConditions, AnalysisConfig, OutputConfig, OutputMode};
pub use error::{CaError, Result};
pub use record::HistoryRecord;
pub use sim_params::SimParams;
