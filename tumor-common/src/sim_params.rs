use serde::{Deserialize, Serialize};

use crate::cell::Coord;

/// Runtime parameters of one automaton run, derived from the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    // Lattice
    pub rows: usize,
    pub cols: usize,
    pub origin: Coord, // Reference point for quadrants and radius

    // Feedback
    pub time_delay: u32, // Lag in generations
    pub phi: f64,        // Carrying capacity
    pub rho: f64,        // Density threshold

    // Rates
    pub k1: f64, // Base mitosis rate
    pub k2: f64, // Cancer -> Edge
    pub k3: f64, // Edge -> Dead
    pub k4: f64, // Dead -> Normal
}

impl SimParams {
    /// Parameters on a `rows x cols` lattice centred on the middle cell,
    /// using the reference rates of the model.
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            origin: (rows / 2, cols / 2),
            time_delay: 0,
            phi: (rows * cols) as f64,
            rho: 3.85,
            k1: 0.7,
            k2: 0.2,
            k3: 0.3,
            k4: 0.3,
        }
    }

    /// Plus-shaped five-cell seed around the origin, clipped to the lattice.
    pub fn default_seed_positions(&self) -> Vec<Coord> {
        let (r0, c0) = self.origin;
        let candidates = [
            Some((r0, c0)),
            Some((r0 + 1, c0)),
            r0.checked_sub(1).map(|r| (r, c0)),
            c0.checked_sub(1).map(|c| (r0, c)),
            Some((r0, c0 + 1)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|&(r, c)| r < self.rows && c < self.cols)
            .collect()
    }
}
