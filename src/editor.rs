use crate::algorithms::common::{SearchAlgorithm, SearchOutcome};
use crate::error::{Error, Result};
use crate::grid::{CellState, Grid, Position};
use log::{debug, info};

/// Editing surface for an input collaborator: it owns the grid between runs
/// and keeps at most one start and one end on it.
#[derive(Debug, Clone)]
pub struct Editor {
    grid: Grid,
    start: Option<Position>,
    end: Option<Position>,
}

impl Editor {
    pub fn new(rows: usize, cell_width: usize) -> Self {
        Editor {
            grid: Grid::new(rows, cell_width),
            start: None,
            end: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    /// Primary action on a cell. The first placement sets the start, the next
    /// sets the end, and every later one raises a barrier. Start and end
    /// themselves are never overwritten.
    ///
    /// Returns the state the cell took, or `None` if nothing changed.
    pub fn place(&mut self, pos: Position) -> Result<Option<CellState>> {
        self.grid.check_bounds(pos)?;

        let state = if self.start.is_none() && self.end != Some(pos) {
            self.start = Some(pos);
            CellState::Start
        } else if self.end.is_none() && self.start != Some(pos) {
            self.end = Some(pos);
            CellState::End
        } else if self.start != Some(pos) && self.end != Some(pos) {
            CellState::Barrier
        } else {
            return Ok(None);
        };

        self.grid.set_state(pos, state);
        debug!("placed {:?} at {}", state, pos);
        Ok(Some(state))
    }

    /// Secondary action on a cell: empties it, forgetting start or end if it
    /// was one of them.
    pub fn erase(&mut self, pos: Position) -> Result<()> {
        self.grid.reset(pos)?;
        if self.start == Some(pos) {
            self.start = None;
        } else if self.end == Some(pos) {
            self.end = None;
        }
        Ok(())
    }

    /// Rebuilds an empty grid of the same size.
    pub fn clear(&mut self) {
        self.grid = Grid::new(self.grid.rows(), self.grid.cell_width());
        self.start = None;
        self.end = None;
    }

    /// Refreshes adjacency and runs `algorithm` between the placed endpoints.
    /// Marks left by an earlier run are cleared first.
    pub fn run(
        &mut self,
        algorithm: &mut dyn SearchAlgorithm,
        on_step: &mut dyn FnMut(&Grid),
    ) -> Result<SearchOutcome> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(Error::MissingEndpoints),
        };

        self.grid.clear_search();
        self.grid.compute_adjacency();
        let outcome = algorithm.run(&mut self.grid, start, end, on_step)?;
        info!(
            "{} finished: {}",
            algorithm.name(),
            if outcome.is_success() { "path found" } else { "no path" }
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::a_star::AStar;

    #[test]
    fn placement_order_is_start_end_barrier() {
        let mut editor = Editor::new(5, 10);
        assert_eq!(editor.place(Position::new(0, 0)), Ok(Some(CellState::Start)));
        assert_eq!(editor.place(Position::new(0, 0)), Ok(None));
        assert_eq!(editor.place(Position::new(4, 4)), Ok(Some(CellState::End)));
        assert_eq!(editor.place(Position::new(2, 2)), Ok(Some(CellState::Barrier)));
        assert_eq!(editor.place(Position::new(4, 4)), Ok(None));

        assert_eq!(editor.start(), Some(Position::new(0, 0)));
        assert_eq!(editor.end(), Some(Position::new(4, 4)));
        assert_eq!(editor.grid().positions_in(CellState::Barrier), vec![Position::new(2, 2)]);
    }

    #[test]
    fn erasing_start_frees_the_slot() {
        let mut editor = Editor::new(3, 10);
        editor.place(Position::new(0, 0)).unwrap();
        editor.place(Position::new(2, 2)).unwrap();
        editor.erase(Position::new(0, 0)).unwrap();

        assert_eq!(editor.start(), None);
        assert_eq!(editor.grid().state(Position::new(0, 0)), Some(CellState::Empty));
        // The next placement refills the start rather than adding a barrier.
        assert_eq!(editor.place(Position::new(1, 1)), Ok(Some(CellState::Start)));
    }

    #[test]
    fn end_cannot_become_start() {
        let mut editor = Editor::new(3, 10);
        editor.place(Position::new(0, 0)).unwrap();
        editor.place(Position::new(2, 2)).unwrap();
        editor.erase(Position::new(0, 0)).unwrap();
        assert_eq!(editor.place(Position::new(2, 2)), Ok(None));
        assert_eq!(editor.start(), None);
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let mut editor = Editor::new(3, 10);
        assert!(matches!(
            editor.place(Position::new(3, 0)),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(editor.erase(Position::new(0, 9)).is_err());
        assert_eq!(editor.start(), None);
    }

    #[test]
    fn run_needs_both_endpoints() {
        let mut editor = Editor::new(3, 10);
        editor.place(Position::new(0, 0)).unwrap();
        let mut astar = AStar::new();
        assert_eq!(
            editor.run(&mut astar, &mut |_| {}),
            Err(Error::MissingEndpoints)
        );
    }

    #[test]
    fn run_refreshes_adjacency_and_can_repeat() {
        let mut editor = Editor::new(3, 10);
        editor.place(Position::new(0, 0)).unwrap();
        editor.place(Position::new(0, 2)).unwrap();
        editor.place(Position::new(0, 1)).unwrap();

        let mut astar = AStar::new();
        let first = editor.run(&mut astar, &mut |_| {}).unwrap();
        assert_eq!(first.path().map(|p| p.len()), Some(4));

        editor.erase(Position::new(0, 1)).unwrap();
        let second = editor.run(&mut astar, &mut |_| {}).unwrap();
        assert_eq!(second.path(), Some(&[Position::new(0, 1), Position::new(0, 2)][..]));
        assert_eq!(editor.grid().positions_in(CellState::Path), vec![Position::new(0, 1)]);
        assert!(editor.grid().positions_in(CellState::Settled).is_empty());
    }

    #[test]
    fn clear_yields_an_empty_grid() {
        let mut editor = Editor::new(4, 10);
        editor.place(Position::new(0, 0)).unwrap();
        editor.place(Position::new(3, 3)).unwrap();
        editor.place(Position::new(1, 1)).unwrap();
        let mut astar = AStar::new();
        editor.run(&mut astar, &mut |_| {}).unwrap();

        editor.clear();

        assert!(editor.grid().iter().all(|n| n.state() == CellState::Empty));
        assert_eq!(editor.start(), None);
        assert_eq!(editor.end(), None);
        assert_eq!(editor.grid().rows(), 4);
    }
}
