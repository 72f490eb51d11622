use serde::{Deserialize, Serialize};

use crate::error::{CaError, Result};

/// A `(row, col)` grid coordinate, 0-based.
pub type Coord = (usize, usize);

/// Discrete state of a single lattice site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    #[default]
    Normal,
    Cancerous,
    /// Cancer cell attacked by the immune response; dies next.
    Edge,
    Dead,
}

impl CellState {
    pub const ALL: [CellState; 4] = [
        CellState::Normal,
        CellState::Cancerous,
        CellState::Edge,
        CellState::Dead,
    ];

    /// Integer code used when grids are flattened for storage.
    pub fn code(self) -> u8 {
        match self {
            CellState::Normal => 0,
            CellState::Cancerous => 1,
            CellState::Edge => 2,
            CellState::Dead => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(CellState::Normal),
            1 => Ok(CellState::Cancerous),
            2 => Ok(CellState::Edge),
            3 => Ok(CellState::Dead),
            other => Err(CaError::UnknownCode(other)),
        }
    }

    /// Single-letter symbol: `N`, `C`, `E` or `D`.
    pub fn symbol(self) -> char {
        match self {
            CellState::Normal => 'N',
            CellState::Cancerous => 'C',
            CellState::Edge => 'E',
            CellState::Dead => 'D',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self> {
        match symbol {
            'N' => Ok(CellState::Normal),
            'C' => Ok(CellState::Cancerous),
            'E' => Ok(CellState::Edge),
            'D' => Ok(CellState::Dead),
            other => Err(CaError::UnknownSymbol(other)),
        }
    }

    /// Cancerous, Edge and Dead sites count towards the affected total.
    pub fn is_affected(self) -> bool {
        self != CellState::Normal
    }
}

impl TryFrom<u8> for CellState {
    type Error = CaError;

    fn try_from(code: u8) -> Result<Self> {
        CellState::from_code(code)
    }
}

impl TryFrom<char> for CellState {
    type Error = CaError;

    fn try_from(symbol: char) -> Result<Self> {
        CellState::from_symbol(symbol)
    }
}
