use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};
use tumor_common::{CaError, CellState, Coord, HistoryRecord, Result};

use crate::grid::Grid;
use crate::stats::{count_cells, density_metric, mean_distance_from_origin};

/// Write-once, generation-indexed store of [`HistoryRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: BTreeMap<u32, HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the statistics of `grid` and stores them under `generation`.
    ///
    /// Fails with [`CaError::DuplicateGeneration`] if that generation was
    /// already recorded; the existing record is kept.
    pub fn record(
        &mut self,
        generation: u32,
        grid: &Grid,
        origin: Coord,
        density_threshold: f64,
    ) -> Result<&HistoryRecord> {
        if self.records.contains_key(&generation) {
            return Err(CaError::DuplicateGeneration(generation));
        }
        let record = summarize(grid, origin, density_threshold);
        trace!("Generation {} stats: {:?}", generation, record);
        Ok(&*self.records.entry(generation).or_insert(record))
    }

    /// Record at `current - delay`, or `None` when that generation is not
    /// stored (including when the delay reaches before generation 0).
    pub fn lookup_delayed(&self, current: u32, delay: u32) -> Option<&HistoryRecord> {
        current
            .checked_sub(delay)
            .and_then(|generation| self.records.get(&generation))
    }

    pub fn get(&self, generation: u32) -> Option<&HistoryRecord> {
        self.records.get(&generation)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &HistoryRecord)> + '_ {
        self.records.iter().map(|(&generation, record)| (generation, record))
    }

    /// Cancerous counts in generation order.
    pub fn cancer_series(&self) -> Vec<f64> {
        self.records.values().map(|r| r.cancer_count as f64).collect()
    }

    /// Mean radii in generation order.
    pub fn radius_series(&self) -> Vec<f64> {
        self.records.values().map(|r| r.mean_radius).collect()
    }
}

fn summarize(grid: &Grid, origin: Coord, density_threshold: f64) -> HistoryRecord {
    HistoryRecord {
        cancer_count: count_cells(grid, CellState::Cancerous),
        edge_count: count_cells(grid, CellState::Edge),
        dead_count: count_cells(grid, CellState::Dead),
        mean_radius: mean_distance_from_origin(grid, origin),
        is_dense: density_metric(grid, origin) > density_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross() -> Grid {
        Grid::with_cancer(7, 7, &[(3, 3), (2, 3), (4, 3), (3, 2), (3, 4)]).unwrap()
    }

    #[test]
    fn test_record_computes_statistics() {
        let mut history = History::new();
        let record = history.record(0, &cross(), (3, 3), 3.85).unwrap().clone();
        assert_eq!(record.cancer_count, 5);
        assert_eq!(record.edge_count, 0);
        assert_eq!(record.dead_count, 0);
        // Four cells at distance 1 over n' = 5.
        assert!((record.mean_radius - 0.8).abs() < 1e-12);
        // 5 / 0.64 = 7.8 > 3.85
        assert!(record.is_dense);
        assert_eq!(record.affected(), 5);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_record_is_write_once() {
        let mut history = History::new();
        history.record(4, &cross(), (3, 3), 3.85).unwrap();
        let empty = Grid::new(7, 7).unwrap();
        assert_eq!(
            history.record(4, &empty, (3, 3), 3.85),
            Err(CaError::DuplicateGeneration(4))
        );
        assert_eq!(history.get(4).unwrap().cancer_count, 5);
    }

    #[test]
    fn test_empty_grid_record_is_not_dense() {
        let mut history = History::new();
        let record = history.record(0, &Grid::new(5, 5).unwrap(), (2, 2), 0.0).unwrap();
        assert_eq!(record.mean_radius, 0.0);
        assert!(!record.is_dense);
    }

    #[test]
    fn test_lookup_delayed() {
        let mut history = History::new();
        let grid = cross();
        for generation in 0..3 {
            history.record(generation, &grid, (3, 3), 3.85).unwrap();
        }
        assert!(history.lookup_delayed(2, 2).is_some());
        assert!(history.lookup_delayed(2, 0).is_some());
        assert!(history.lookup_delayed(1, 2).is_none());
        assert!(history.lookup_delayed(10, 1).is_none());
    }

    #[test]
    fn test_series_follow_generation_order() {
        let mut history = History::new();
        history.record(1, &Grid::new(7, 7).unwrap(), (3, 3), 3.85).unwrap();
        history.record(0, &cross(), (3, 3), 3.85).unwrap();
        assert_eq!(history.cancer_series(), vec![5.0, 0.0]);
        assert_eq!(history.radius_series().len(), 2);
        let generations: Vec<u32> = history.iter().map(|(g, _)| g).collect();
        assert_eq!(generations, vec![0, 1]);
    }
}
