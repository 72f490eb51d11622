//! Scalar summaries of a grid snapshot. Everything here is a pure function of
//! the grid; no randomness and no mutation.

use tumor_common::{CellState, Coord};

use crate::grid::Grid;

/// Number of sites in `state`.
pub fn count_cells(grid: &Grid, state: CellState) -> usize {
    grid.cells().iter().filter(|&&cell| cell == state).count()
}

/// Cancerous + Edge + Dead, the `n'` of the model.
pub fn total_affected(grid: &Grid) -> usize {
    grid.cells().iter().filter(|cell| cell.is_affected()).count()
}

/// Summed Euclidean distance of Cancerous sites from `origin`, divided by
/// [`total_affected`]. Returns 0.0 when nothing is affected.
pub fn mean_distance_from_origin(grid: &Grid, origin: Coord) -> f64 {
    let n_prime = total_affected(grid);
    if n_prime == 0 {
        return 0.0;
    }
    let total: f64 = grid
        .positions_of(CellState::Cancerous)
        .map(|pos| distance(pos, origin))
        .sum();
    total / n_prime as f64
}

/// `n' / R^2` with `R` the mean distance; 0.0 when `R` is zero.
pub fn density_metric(grid: &Grid, origin: Coord) -> f64 {
    let radius = mean_distance_from_origin(grid, origin);
    if radius == 0.0 {
        return 0.0;
    }
    total_affected(grid) as f64 / (radius * radius)
}

/// Share of the affected population sitting in `state`; 0.0 when nothing is
/// affected.
pub fn mean_field_fraction(grid: &Grid, state: CellState) -> f64 {
    let n_prime = total_affected(grid);
    if n_prime == 0 {
        return 0.0;
    }
    count_cells(grid, state) as f64 / n_prime as f64
}

#[inline(always)]
fn distance((r, c): Coord, (r0, c0): Coord) -> f64 {
    let dr = r as f64 - r0 as f64;
    let dc = c as f64 - c0 as f64;
    (dr * dr + dc * dc).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        // Origin at (2, 2).
        Grid::from_symbols(&[
            "NNNNN",
            "NNCNN",
            "NECDN",
            "NNNNN",
            "NNNNN",
        ])
        .unwrap()
    }

    #[test]
    fn test_counts_partition_grid() {
        let grid = sample();
        let total: usize = CellState::ALL.iter().map(|&s| count_cells(&grid, s)).sum();
        assert_eq!(total, grid.rows() * grid.cols());
        assert_eq!(count_cells(&grid, CellState::Cancerous), 2);
        assert_eq!(count_cells(&grid, CellState::Edge), 1);
        assert_eq!(count_cells(&grid, CellState::Dead), 1);
        assert_eq!(total_affected(&grid), 4);
    }

    #[test]
    fn test_mean_distance_divides_by_affected() {
        // Cancerous at (1,2) -> 1.0 and (2,2) -> 0.0, over n' = 4.
        let grid = sample();
        let radius = mean_distance_from_origin(&grid, (2, 2));
        assert!((radius - 0.25).abs() < 1e-12);
        assert_eq!(radius, mean_distance_from_origin(&grid, (2, 2)));
    }

    #[test]
    fn test_density_metric() {
        let grid = sample();
        let density = density_metric(&grid, (2, 2));
        assert!((density - 4.0 / 0.0625).abs() < 1e-9);
    }

    #[test]
    fn test_empty_grid_is_degenerate_not_error() {
        let grid = Grid::new(6, 6).unwrap();
        assert_eq!(mean_distance_from_origin(&grid, (3, 3)), 0.0);
        assert_eq!(density_metric(&grid, (3, 3)), 0.0);
        assert_eq!(mean_field_fraction(&grid, CellState::Cancerous), 0.0);
    }

    #[test]
    fn test_single_cancer_at_origin_has_zero_density() {
        let grid = Grid::with_cancer(5, 5, &[(2, 2)]).unwrap();
        assert_eq!(mean_distance_from_origin(&grid, (2, 2)), 0.0);
        assert_eq!(density_metric(&grid, (2, 2)), 0.0);
    }

    #[test]
    fn test_mean_field_fractions_sum_to_one() {
        let grid = sample();
        let sum: f64 = [CellState::Cancerous, CellState::Edge, CellState::Dead]
            .iter()
            .map(|&s| mean_field_fraction(&grid, s))
            .sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((mean_field_fraction(&grid, CellState::Cancerous) - 0.5).abs() < 1e-12);
    }
}
