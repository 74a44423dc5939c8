//! Grid pathfinding with an observable A* search.
//!
//! A [`grid::Grid`] of cells is edited by a caller (start, end, barriers),
//! its adjacency is snapshotted with [`grid::Grid::compute_adjacency`], and
//! [`algorithms::a_star::run_search`] then finds a shortest path while
//! reporting every expansion and reconstruction step through a callback.

pub mod algorithms;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod render;
pub mod simulation;
pub mod statistics;

pub use algorithms::a_star::{run_search, AStar};
pub use algorithms::common::{manhattan, SearchAlgorithm, SearchOutcome};
pub use error::{Error, Result};
pub use grid::{CellState, Grid, Node, Position};
