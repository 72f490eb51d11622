//! Validation errors raised by the automaton core.

use thiserror::Error;

/// Errors returned to callers of the grid, history, driver and embedding APIs.
///
/// Every variant is an input-shape problem; nothing here is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaError {
    /// A run was requested with zero generations.
    #[error("generations must be greater than 0")]
    NoGenerations,

    /// Grid dimensions must both be non-zero.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A coordinate lies outside `[0, rows) x [0, cols)`.
    #[error("position ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Unrecognised cell-state symbol.
    #[error("unknown cell symbol '{0}'")]
    UnknownSymbol(char),

    /// Unrecognised cell-state integer code.
    #[error("unknown cell code {0}")]
    UnknownCode(u8),

    /// Row data does not match the declared grid shape.
    #[error("grid data has {actual} cells, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The history already holds a record for this generation.
    #[error("history already has a record for generation {0}")]
    DuplicateGeneration(u32),

    /// The series is too short for the requested delay embedding.
    #[error("time series of length {len} is too short for tau={tau}, d={dimension}")]
    SeriesTooShort {
        len: usize,
        tau: usize,
        dimension: usize,
    },

    /// Embedding dimension must be at least 1.
    #[error("embedding dimension must be at least 1")]
    ZeroDimension,
}

pub type Result<T> = std::result::Result<T, CaError>;
