use crate::error::{Error, Result};
use log::debug;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses `"row,col"`, e.g. `"3,7"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `row,col`, got `{}`", s))?;
        let row = row
            .trim()
            .parse()
            .map_err(|e| format!("invalid row `{}`: {}", row.trim(), e))?;
        let col = col
            .trim()
            .parse()
            .map_err(|e| format!("invalid column `{}`: {}", col.trim(), e))?;
        Ok(Position { row, col })
    }
}

/// Classification of a single cell. Exactly one applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    /// Discovered, waiting in the search frontier.
    Frontier,
    /// Popped from the frontier with its final cost.
    Settled,
    Path,
}

impl CellState {
    /// States written by a search run rather than by the user.
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Frontier | CellState::Settled | CellState::Path)
    }
}

/// One grid cell: its coordinate, classification and cached adjacency.
#[derive(Debug, Clone)]
pub struct Node {
    position: Position,
    state: CellState,
    neighbors: Vec<Position>,
}

impl Node {
    fn new(position: Position) -> Self {
        Node {
            position,
            state: CellState::Empty,
            neighbors: Vec::with_capacity(4),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }

    /// Orthogonal neighbors as of the last [`Grid::compute_adjacency`].
    pub fn neighbors(&self) -> &[Position] {
        &self.neighbors
    }
}

/// A square `rows x rows` grid that owns all of its cells.
///
/// Adjacency is a snapshot: it is only refreshed by [`Grid::compute_adjacency`].
/// Any change into or out of [`CellState::Barrier`] marks the snapshot stale,
/// and a search refuses to run on a stale snapshot.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cell_width: usize,
    cells: Vec<Vec<Node>>,
    adjacency_stale: bool,
}

impl Grid {
    /// Builds an all-empty grid of `rows x rows` cells, each `cell_width`
    /// pixels wide when drawn.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is zero.
    pub fn new(rows: usize, cell_width: usize) -> Self {
        assert!(rows > 0, "a grid needs at least one row");

        let cells: Vec<Vec<Node>> = (0..rows)
            .map(|row| {
                (0..rows)
                    .map(|col| Node::new(Position { row, col }))
                    .collect::<Vec<_>>()
            })
            .collect();

        Grid {
            rows,
            cell_width,
            cells,
            adjacency_stale: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.rows
    }

    /// Returns `Error::OutOfBounds` unless `pos` lies inside the grid.
    pub fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                position: pos,
                rows: self.rows,
            })
        }
    }

    pub fn node(&self, pos: Position) -> Option<&Node> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col))
    }

    pub fn state(&self, pos: Position) -> Option<CellState> {
        self.node(pos).map(Node::state)
    }

    /// Cached neighbors of `pos`; empty for out-of-range positions.
    pub fn neighbors(&self, pos: Position) -> &[Position] {
        self.node(pos).map(Node::neighbors).unwrap_or(&[])
    }

    /// Top-left pixel corner `(x, y)` of the cell, for renderers.
    pub fn origin(&self, pos: Position) -> (usize, usize) {
        (pos.col * self.cell_width, pos.row * self.cell_width)
    }

    /// Sets the classification of one cell.
    ///
    /// The grid does not police the single start / single end rule; that is
    /// left to the caller (see [`crate::editor::Editor`]).
    pub fn classify(&mut self, pos: Position, state: CellState) -> Result<()> {
        self.check_bounds(pos)?;
        self.set_state(pos, state);
        Ok(())
    }

    /// Sets the cell back to [`CellState::Empty`].
    pub fn reset(&mut self, pos: Position) -> Result<()> {
        self.classify(pos, CellState::Empty)
    }

    /// Callers guarantee `pos` is in bounds.
    pub(crate) fn set_state(&mut self, pos: Position, state: CellState) {
        let node = &mut self.cells[pos.row][pos.col];
        if (node.state == CellState::Barrier) != (state == CellState::Barrier) {
            self.adjacency_stale = true;
        }
        node.state = state;
    }

    /// Recomputes every cell's neighbor list from the current barriers.
    ///
    /// Neighbors are listed in the order down, up, right, left; a barrier is
    /// never anyone's neighbor.
    pub fn compute_adjacency(&mut self) {
        let rows = self.rows;
        let mut edges = 0;

        for row in 0..rows {
            for col in 0..rows {
                let mut neighbors = Vec::with_capacity(4);
                let mut push_open = |r: usize, c: usize| {
                    if !self.cells[r][c].is_barrier() {
                        neighbors.push(Position { row: r, col: c });
                    }
                };

                if row + 1 < rows {
                    push_open(row + 1, col);
                }
                if row > 0 {
                    push_open(row - 1, col);
                }
                if col + 1 < rows {
                    push_open(row, col + 1);
                }
                if col > 0 {
                    push_open(row, col - 1);
                }

                edges += neighbors.len();
                self.cells[row][col].neighbors = neighbors;
            }
        }

        self.adjacency_stale = false;
        debug!("computed adjacency for {}x{} grid ({} directed edges)", rows, rows, edges);
    }

    pub fn is_adjacency_stale(&self) -> bool {
        self.adjacency_stale
    }

    /// Clears the frontier, settled and path marks left by a previous run.
    /// Start, end and barriers are kept.
    pub fn clear_search(&mut self) {
        for node in self.cells.iter_mut().flatten() {
            if node.state.is_search_mark() {
                node.state = CellState::Empty;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.cells.iter().flatten()
    }

    /// Positions of every cell currently in `state`, in row-major order.
    pub fn positions_in(&self, state: CellState) -> Vec<Position> {
        self.iter()
            .filter(|node| node.state == state)
            .map(Node::position)
            .collect()
    }

    /// Row-major snapshot of every classification.
    pub fn snapshot(&self) -> Vec<CellState> {
        self.iter().map(Node::state).collect()
    }
}

impl Index<Position> for Grid {
    type Output = Node;

    fn index(&self, pos: Position) -> &Node {
        &self.cells[pos.row][pos.col]
    }
}
