use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use tumor_common::{CaError, CellState, Coord, Result};

/// Dense `rows x cols` lattice of cell states, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates an all-Normal grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CaError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![CellState::Normal; rows * cols],
        })
    }

    /// Creates an all-Normal grid with the given positions set Cancerous.
    pub fn with_cancer(rows: usize, cols: usize, positions: &[Coord]) -> Result<Self> {
        let mut grid = Self::new(rows, cols)?;
        for &pos in positions {
            grid.set(pos, CellState::Cancerous)?;
        }
        Ok(grid)
    }

    /// Parses rows of `N`/`C`/`E`/`D` symbols. All rows must have equal length.
    pub fn from_symbols(lines: &[&str]) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        let mut grid = Self::new(rows, cols)?;
        for (r, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != cols {
                return Err(CaError::ShapeMismatch {
                    expected: rows * cols,
                    actual: r * cols + width,
                });
            }
            for (c, symbol) in line.chars().enumerate() {
                grid[(r, c)] = CellState::from_symbol(symbol)?;
            }
        }
        Ok(grid)
    }

    /// Rebuilds a grid from row-major integer codes.
    pub fn from_codes(rows: usize, cols: usize, codes: &[u8]) -> Result<Self> {
        let mut grid = Self::new(rows, cols)?;
        if codes.len() != rows * cols {
            return Err(CaError::ShapeMismatch {
                expected: rows * cols,
                actual: codes.len(),
            });
        }
        for (cell, &code) in grid.cells.iter_mut().zip(codes) {
            *cell = CellState::from_code(code)?;
        }
        Ok(grid)
    }

    /// Row-major integer codes (Normal=0, Cancerous=1, Edge=2, Dead=3).
    pub fn to_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.code()).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.rows && col < self.cols
    }

    /// True for sites on the outermost rows or columns.
    pub fn is_border(&self, (row, col): Coord) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows || col + 1 == self.cols
    }

    pub fn get(&self, pos: Coord) -> Option<CellState> {
        if self.contains(pos) {
            Some(self.cells[self.offset(pos)])
        } else {
            None
        }
    }

    pub fn set(&mut self, pos: Coord, state: CellState) -> Result<()> {
        if !self.contains(pos) {
            return Err(CaError::OutOfBounds {
                row: pos.0,
                col: pos.1,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let idx = self.offset(pos);
        self.cells[idx] = state;
        Ok(())
    }

    /// Iterates all sites row-major as `((row, col), state)`.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellState)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &state)| ((idx / cols, idx % cols), state))
    }

    /// Coordinates of every site in `state`, row-major.
    pub fn positions_of(&self, state: CellState) -> impl Iterator<Item = Coord> + '_ {
        self.iter()
            .filter(move |&(_, s)| s == state)
            .map(|(pos, _)| pos)
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    #[inline(always)]
    fn offset(&self, (row, col): Coord) -> usize {
        row * self.cols + col
    }
}

impl Index<Coord> for Grid {
    type Output = CellState;

    fn index(&self, pos: Coord) -> &CellState {
        assert!(self.contains(pos), "grid index {:?} out of bounds", pos);
        &self.cells[self.offset(pos)]
    }
}

impl IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut CellState {
        assert!(self.contains(pos), "grid index {:?} out of bounds", pos);
        let idx = self.offset(pos);
        &mut self.cells[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_normal() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert!(grid.cells().iter().all(|&c| c == CellState::Normal));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(CaError::InvalidDimensions { rows: 0, cols: 5 })
        );
    }

    #[test]
    fn test_with_cancer_out_of_bounds() {
        let err = Grid::with_cancer(5, 5, &[(2, 2), (5, 0)]).unwrap_err();
        assert_eq!(
            err,
            CaError::OutOfBounds { row: 5, col: 0, rows: 5, cols: 5 }
        );
    }

    #[test]
    fn test_from_symbols() {
        let grid = Grid::from_symbols(&["NCE", "DNN"]).unwrap();
        assert_eq!(grid[(0, 1)], CellState::Cancerous);
        assert_eq!(grid[(0, 2)], CellState::Edge);
        assert_eq!(grid[(1, 0)], CellState::Dead);
        assert_eq!(grid.get((2, 0)), None);
    }

    #[test]
    fn test_from_symbols_rejects_ragged_and_unknown() {
        assert!(matches!(
            Grid::from_symbols(&["NN", "N"]),
            Err(CaError::ShapeMismatch { .. })
        ));
        assert_eq!(
            Grid::from_symbols(&["NX"]),
            Err(CaError::UnknownSymbol('X'))
        );
    }

    #[test]
    fn test_codes_are_row_major() {
        let grid = Grid::from_symbols(&["NC", "ED"]).unwrap();
        assert_eq!(grid.to_codes(), vec![0, 1, 2, 3]);
        assert_eq!(Grid::from_codes(2, 2, &[0, 1, 2, 3]).unwrap(), grid);
        assert!(Grid::from_codes(2, 2, &[0, 1, 2]).is_err());
        assert_eq!(
            Grid::from_codes(1, 2, &[0, 9]),
            Err(CaError::UnknownCode(9))
        );
    }

    #[test]
    fn test_border_detection() {
        let grid = Grid::new(4, 5).unwrap();
        assert!(grid.is_border((0, 2)));
        assert!(grid.is_border((3, 2)));
        assert!(grid.is_border((2, 0)));
        assert!(grid.is_border((2, 4)));
        assert!(!grid.is_border((1, 1)));
        assert!(!grid.is_border((2, 3)));
    }

    #[test]
    fn test_positions_of() {
        let grid = Grid::from_symbols(&["CN", "NC"]).unwrap();
        let found: Vec<Coord> = grid.positions_of(CellState::Cancerous).collect();
        assert_eq!(found, vec![(0, 0), (1, 1)]);
    }
}
