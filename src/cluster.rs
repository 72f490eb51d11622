//! Connected-component analysis over Cancerous sites.

use std::collections::BTreeSet;

use log::debug;
use tumor_common::{CellState, Coord};

use crate::grid::Grid;

/// A maximal 4-connected set of Cancerous sites.
pub type Cluster = BTreeSet<Coord>;

/// Cluster count above which the tumour is considered to have metastasised.
pub const DEFAULT_METASTASIS_THRESHOLD: usize = 50;

/// Labels the 4-connected components of Cancerous sites.
///
/// Uses an explicit stack, so large clusters cannot overflow the call stack.
/// Clusters come out in row-major order of their first site; singletons are
/// included.
pub fn find_clusters(grid: &Grid) -> Vec<Cluster> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut visited = vec![false; rows * cols];
    let mut clusters = Vec::new();
    let mut stack: Vec<Coord> = Vec::new();

    for (start, state) in grid.iter() {
        if state != CellState::Cancerous || visited[start.0 * cols + start.1] {
            continue;
        }
        let mut cluster = Cluster::new();
        visited[start.0 * cols + start.1] = true;
        stack.push(start);

        while let Some((r, c)) = stack.pop() {
            cluster.insert((r, c));
            let neighbours = [
                r.checked_sub(1).map(|up| (up, c)),
                (r + 1 < rows).then_some((r + 1, c)),
                c.checked_sub(1).map(|left| (r, left)),
                (c + 1 < cols).then_some((r, c + 1)),
            ];
            for (nr, nc) in neighbours.into_iter().flatten() {
                let idx = nr * cols + nc;
                if !visited[idx] && grid[(nr, nc)] == CellState::Cancerous {
                    visited[idx] = true;
                    stack.push((nr, nc));
                }
            }
        }
        clusters.push(cluster);
    }
    clusters
}

/// Number of clusters in each grid of a trajectory.
pub fn cluster_counts<'a, I>(grids: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Grid>,
{
    grids.into_iter().map(|grid| find_clusters(grid).len()).collect()
}

/// First generation whose cluster count exceeds `threshold`.
pub fn metastasis_generation(counts: &[usize], threshold: usize) -> Option<u32> {
    counts
        .iter()
        .position(|&count| count > threshold)
        .map(|generation| generation as u32)
}

/// Follows cluster counts generation by generation and remembers when the
/// threshold was first crossed.
#[derive(Debug, Clone)]
pub struct MetastasisTracker {
    threshold: usize,
    counts: Vec<usize>,
    onset: Option<u32>,
}

impl MetastasisTracker {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            counts: Vec::new(),
            onset: None,
        }
    }

    /// Counts the clusters of the grid produced at `generation` and returns
    /// that count.
    pub fn observe(&mut self, generation: u32, grid: &Grid) -> usize {
        let count = find_clusters(grid).len();
        self.counts.push(count);
        if self.onset.is_none() && count > self.threshold {
            debug!(
                "Metastasis at generation {}: {} clusters (threshold {})",
                generation, count, self.threshold
            );
            self.onset = Some(generation);
        }
        count
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Generation `Tm` of the first crossing, if any.
    pub fn onset(&self) -> Option<u32> {
        self.onset
    }

    pub fn into_parts(self) -> (Vec<usize>, Option<u32>) {
        (self.counts, self.onset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_l_shaped_cluster() {
        let grid = Grid::from_symbols(&["NCC", "NCN", "NNN"]).unwrap();
        let clusters = find_clusters(&grid);
        let expected: Cluster = [(0, 1), (0, 2), (1, 1)].into_iter().collect();
        assert_eq!(clusters, vec![expected]);
    }

    #[test]
    fn test_diagonal_cells_are_separate() {
        let grid = Grid::from_symbols(&["CNC", "NCN", "CNC"]).unwrap();
        let clusters = find_clusters(&grid);
        assert_eq!(clusters.len(), 5);
        assert!(clusters.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_only_cancerous_cells_connect() {
        let grid = Grid::from_symbols(&["CEC", "DDD", "CCC"]).unwrap();
        let clusters = find_clusters(&grid);
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[2].len(), 3);
    }

    #[test]
    fn test_clusters_partition_cancerous_cells() {
        let grid = Grid::from_symbols(&[
            "CCNCN",
            "NCNCC",
            "ENNNN",
            "CCCNC",
        ])
        .unwrap();
        let clusters = find_clusters(&grid);
        let total: usize = clusters.iter().map(|c| c.len()).sum();
        assert_eq!(total, grid.positions_of(CellState::Cancerous).count());
        let union: BTreeSet<Coord> = clusters.iter().flatten().copied().collect();
        assert_eq!(union.len(), total);
        assert_eq!(clusters.len(), 4);
    }

    #[test]
    fn test_large_cluster_does_not_recurse() {
        let rows: Vec<String> = (0..300).map(|_| "C".repeat(300)).collect();
        let lines: Vec<&str> = rows.iter().map(String::as_str).collect();
        let grid = Grid::from_symbols(&lines).unwrap();
        let clusters = find_clusters(&grid);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 90_000);
    }

    #[test]
    fn test_empty_grid_has_no_clusters() {
        assert!(find_clusters(&Grid::new(4, 4).unwrap()).is_empty());
    }

    #[test]
    fn test_metastasis_generation() {
        assert_eq!(metastasis_generation(&[1, 3, 5, 2, 7], 4), Some(2));
        assert_eq!(metastasis_generation(&[1, 3, 4], 4), None);
    }

    #[test]
    fn test_tracker_records_first_crossing_only() {
        let many = Grid::from_symbols(&["CNC", "NNN", "CNC"]).unwrap();
        let one = Grid::from_symbols(&["CCN", "NNN", "NNN"]).unwrap();
        let mut tracker = MetastasisTracker::new(2);
        assert_eq!(tracker.observe(0, &one), 1);
        assert_eq!(tracker.observe(1, &many), 4);
        assert_eq!(tracker.observe(2, &many), 4);
        assert_eq!(tracker.onset(), Some(1));
        assert_eq!(tracker.counts(), &[1, 4, 4]);
        assert_eq!(cluster_counts([&one, &many]), vec![1, 4]);
    }
}
