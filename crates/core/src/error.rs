//! Error types for the floor-plan engines.

use thiserror::Error;

/// Result type alias using the crate's [`enum@Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating inputs or running a layout engine.
///
/// Infeasible placements are not errors: the engines always return their
/// best partial layout.
#[derive(Debug, Error)]
pub enum Error {
    /// The boundary is degenerate or malformed.
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),

    /// The house program contains invalid rooms.
    #[error("invalid program: {0}")]
    InvalidProgram(String),

    /// An adjacency pair references an unknown room or links a room to itself.
    #[error("invalid adjacency pair ({a}, {b}) for a program of {room_count} rooms")]
    InvalidAdjacency {
        /// First room id (1-based).
        a: usize,
        /// Second room id (1-based).
        b: usize,
        /// Number of rooms in the program.
        room_count: usize,
    },

    /// A solver configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Textual input could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
