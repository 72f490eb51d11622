use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::cell::Coord;
use crate::sim_params::SimParams;
use std::path::Path;

// Lattice extent and reference point
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Reference point for quadrants and radius. Defaults to the centre cell.
    #[serde(default)]
    pub origin: Option<Coord>,
}

// Transition rates and feedback constants
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RatesConfig {
    pub phi: f64,
    #[serde(default = "default_rho")]
    pub rho: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub time_delay: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub generations: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct InitialConditions {
    /// Seed coordinates. Defaults to a plus shape around the origin.
    #[serde(default)]
    pub cancer_positions: Option<Vec<Coord>>,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_metastasis_threshold")]
    pub metastasis_cluster_threshold: usize,
    #[serde(default = "default_embedding_tau")]
    pub embedding_tau: usize,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
    /// Time delays to run side by side after the main run.
    #[serde(default)]
    pub sweep_time_delays: Vec<u32>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Keep only the history records.
    #[default]
    History,
    /// Keep the history and every generation's grid.
    Trajectory,
    /// Keep the history and the per-generation cluster counts.
    Clusters,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub rates: RatesConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            metastasis_cluster_threshold: default_metastasis_threshold(),
            embedding_tau: default_embedding_tau(),
            embedding_dimension: default_embedding_dimension(),
            sweep_time_delays: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let GridConfig { rows, cols, .. } = self.grid;
        if rows == 0 || cols == 0 {
            anyhow::bail!("grid dimensions must be positive, got {}x{}.", rows, cols);
        }
        if self.timing.generations == 0 {
            anyhow::bail!("generations must be greater than 0.");
        }
        if !(self.rates.phi > 0.0) {
            anyhow::bail!("phi must be positive.");
        }
        for (name, value) in [
            ("k1", self.rates.k1),
            ("k2", self.rates.k2),
            ("k3", self.rates.k3),
            ("k4", self.rates.k4),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must lie in [0, 1], got {}.", name, value);
            }
        }
        let (r0, c0) = self.origin();
        if r0 >= rows || c0 >= cols {
            anyhow::bail!("origin ({}, {}) lies outside the {}x{} grid.", r0, c0, rows, cols);
        }
        if let Some(positions) = &self.initial_conditions.cancer_positions {
            if let Some(&(r, c)) = positions.iter().find(|&&(r, c)| r >= rows || c >= cols) {
                anyhow::bail!("initial cancer position ({}, {}) lies outside the {}x{} grid.", r, c, rows, cols);
            }
        }
        if self.analysis.embedding_dimension == 0 {
            anyhow::bail!("embedding_dimension must be at least 1.");
        }
        Ok(())
    }

    /// Origin from config, or the centre cell.
    pub fn origin(&self) -> Coord {
        self.grid
            .origin
            .unwrap_or((self.grid.rows / 2, self.grid.cols / 2))
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            rows: self.grid.rows,
            cols: self.grid.cols,
            origin: self.origin(),
            time_delay: self.feedback.time_delay,
            phi: self.rates.phi,
            rho: self.rates.rho,
            k1: self.rates.k1,
            k2: self.rates.k2,
            k3: self.rates.k3,
            k4: self.rates.k4,
        }
    }

    /// Configured seed positions, or the plus-shaped default.
    pub fn initial_positions(&self) -> Vec<Coord> {
        match &self.initial_conditions.cancer_positions {
            Some(positions) => positions.clone(),
            None => self.get_sim_params().default_seed_positions(),
        }
    }
}

fn default_rho() -> f64 {
    3.85
}

fn default_metastasis_threshold() -> usize {
    50
}

fn default_embedding_tau() -> usize {
    1
}

fn default_embedding_dimension() -> usize {
    3
}
