//! Errors raised while loading levels and configuration
//!
//! The simulation itself is total: out-of-range lookups resolve to empty
//! tiles or no-ops. Only the loading edges can fail.

use thiserror::Error;

/// Reasons a tile grid cannot be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// Grid has no rows, or only empty rows.
    #[error("tile map must contain at least one non-empty row")]
    Empty,
    /// A row length differs from the first row.
    #[error("tile map row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A level text contained a character with no tile meaning.
    #[error("unknown tile character {ch:?} at line {line}, column {column}")]
    InvalidTile { line: usize, column: usize, ch: char },
}

/// Reasons a physics configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
