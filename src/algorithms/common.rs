use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::statistics::SearchStatistics;

/// Manhattan distance, admissible and consistent on a 4-connected unit-cost grid.
pub fn manhattan(a: Position, b: Position) -> u32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32
}

/// Terminal result of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `path` runs from the cell after start up to and including end.
    Success { path: Vec<Position> },
    /// The frontier emptied without reaching end.
    Failure,
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }

    pub fn path(&self) -> Option<&[Position]> {
        match self {
            SearchOutcome::Success { path } => Some(path),
            SearchOutcome::Failure => None,
        }
    }
}

pub trait SearchAlgorithm {
    /// Searches from `start` to `end`, marking cells on `grid` as it goes.
    ///
    /// `on_step` is called after every expansion and after every
    /// reconstruction step. It only gets shared access to the grid.
    ///
    /// The start and end cells keep their own classification for the whole
    /// run: neither is marked frontier, settled or path.
    fn run(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_step: &mut dyn FnMut(&Grid),
    ) -> Result<SearchOutcome>;

    fn name(&self) -> &'static str;

    /// Counters from the most recent run.
    fn statistics(&self) -> &SearchStatistics;
}
