//! Error types for the pathfinder.

use crate::grid::Position;
use thiserror::Error;

/// Pathfinder error type.
///
/// Every variant is a caller contract violation. A search that simply finds
/// no route is not an error, see [`crate::algorithms::common::SearchOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("start and end are the same cell {0}")]
    StartEqualsEnd(Position),

    #[error("position {position} is outside the {rows}x{rows} grid")]
    OutOfBounds { position: Position, rows: usize },

    #[error("adjacency is stale: call compute_adjacency after editing barriers")]
    StaleAdjacency,

    #[error("both a start and an end cell must be placed before running")]
    MissingEndpoints,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
