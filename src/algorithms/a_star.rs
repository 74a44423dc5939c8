use crate::algorithms::common::{manhattan, SearchAlgorithm, SearchOutcome};
use crate::error::{Error, Result};
use crate::grid::{CellState, Grid, Position};
use crate::statistics::SearchStatistics;
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// A frontier entry. Ordered by `f`, then by insertion sequence, and reversed
/// so that `BinaryHeap` pops the smallest. The position never takes part in
/// the comparison.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: u32,
    sequence: u64,
    position: Position,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.sequence == other.sequence
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A* over the grid's cached adjacency with unit edge costs.
///
/// Scores and predecessors from the most recent run stay available through
/// the accessors until the next run starts.
#[derive(Debug, Default)]
pub struct AStar {
    g_scores: FxHashMap<Position, u32>,
    f_scores: FxHashMap<Position, u32>,
    came_from: FxHashMap<Position, Position>,
    settled: Vec<(Position, u32)>,
    statistics: SearchStatistics,
}

impl AStar {
    pub fn new() -> Self {
        AStar::default()
    }

    /// Best known cost from start, `None` meaning infinity.
    pub fn g_score(&self, pos: Position) -> Option<u32> {
        self.g_scores.get(&pos).copied()
    }

    pub fn f_score(&self, pos: Position) -> Option<u32> {
        self.f_scores.get(&pos).copied()
    }

    pub fn came_from(&self, pos: Position) -> Option<Position> {
        self.came_from.get(&pos).copied()
    }

    /// Expanded cells in pop order, with their `g` at the moment of expansion.
    pub fn settled(&self) -> &[(Position, u32)] {
        &self.settled
    }

    fn clear(&mut self) {
        self.g_scores.clear();
        self.f_scores.clear();
        self.came_from.clear();
        self.settled.clear();
        self.statistics = SearchStatistics::default();
    }

    fn check_preconditions(grid: &Grid, start: Position, end: Position) -> Result<()> {
        grid.check_bounds(start)?;
        grid.check_bounds(end)?;
        if start == end {
            return Err(Error::StartEqualsEnd(start));
        }
        if grid.is_adjacency_stale() {
            return Err(Error::StaleAdjacency);
        }
        Ok(())
    }

    /// Walks `came_from` back from `end`, marking every predecessor except
    /// start as path and stepping once per edge. Returns the cells after start
    /// through end.
    fn reconstruct_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_step: &mut dyn FnMut(&Grid),
    ) -> Vec<Position> {
        let mut path = vec![end];
        let mut current = end;

        while let Some(&previous) = self.came_from.get(&current) {
            current = previous;
            if current != start {
                grid.set_state(current, CellState::Path);
                path.push(current);
            }
            on_step(grid);
            self.statistics.steps += 1;
        }

        path.reverse();
        path
    }
}

impl SearchAlgorithm for AStar {
    fn run(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_step: &mut dyn FnMut(&Grid),
    ) -> Result<SearchOutcome> {
        Self::check_preconditions(grid, start, end)?;
        self.clear();
        debug!("A* from {} to {} on {}x{} grid", start, end, grid.rows(), grid.rows());

        let started = Instant::now();
        let mut frontier = BinaryHeap::new();
        let mut in_frontier = FxHashSet::default();
        let mut sequence: u64 = 0;
        let mut neighbors = Vec::with_capacity(4);

        let h = manhattan(start, end);
        self.g_scores.insert(start, 0);
        self.f_scores.insert(start, h);
        frontier.push(FrontierEntry {
            f: h,
            sequence,
            position: start,
        });
        sequence += 1;
        in_frontier.insert(start);
        self.statistics.frontier_pushes += 1;

        while let Some(FrontierEntry { position: current, f, .. }) = frontier.pop() {
            in_frontier.remove(&current);

            let current_g = self.g_scores[&current];
            self.settled.push((current, current_g));
            self.statistics.expansions += 1;
            trace!("expand {} g={} f={}", current, current_g, f);

            if current == end {
                let path = self.reconstruct_path(grid, start, end, on_step);
                self.statistics.path_length = Some(path.len());
                self.statistics.elapsed = started.elapsed();
                debug!(
                    "path found: {} steps, {} cells expanded",
                    path.len(),
                    self.statistics.expansions
                );
                return Ok(SearchOutcome::Success { path });
            }

            neighbors.clear();
            neighbors.extend_from_slice(grid.neighbors(current));

            for &neighbor in &neighbors {
                let tentative_g = current_g + 1;
                let known_g = self.g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
                if tentative_g >= known_g {
                    continue;
                }

                let neighbor_f = tentative_g + manhattan(neighbor, end);
                self.came_from.insert(neighbor, current);
                self.g_scores.insert(neighbor, tentative_g);
                self.f_scores.insert(neighbor, neighbor_f);

                // A cell already waiting keeps its original entry and key.
                if in_frontier.insert(neighbor) {
                    frontier.push(FrontierEntry {
                        f: neighbor_f,
                        sequence,
                        position: neighbor,
                    });
                    sequence += 1;
                    self.statistics.frontier_pushes += 1;

                    if neighbor != end {
                        grid.set_state(neighbor, CellState::Frontier);
                    }
                }
            }

            on_step(grid);
            self.statistics.steps += 1;

            if current != start {
                grid.set_state(current, CellState::Settled);
            }
        }

        self.statistics.elapsed = started.elapsed();
        debug!(
            "no path from {} to {} after {} expansions",
            start, end, self.statistics.expansions
        );
        Ok(SearchOutcome::Failure)
    }

    fn name(&self) -> &'static str {
        "A*"
    }

    fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

/// Runs a fresh A* search. This is the usual entry point for callers that do
/// not need the per-run scores afterwards.
pub fn run_search<F>(
    grid: &mut Grid,
    start: Position,
    end: Position,
    mut on_step: F,
) -> Result<SearchOutcome>
where
    F: FnMut(&Grid),
{
    AStar::new().run(grid, start, end, &mut on_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(rows: usize) -> Grid {
        let mut grid = Grid::new(rows, 1);
        grid.compute_adjacency();
        grid
    }

    #[test]
    fn frontier_orders_by_f_then_sequence() {
        let mut heap = BinaryHeap::new();
        let p = Position::new(0, 0);
        heap.push(FrontierEntry { f: 5, sequence: 0, position: p });
        heap.push(FrontierEntry { f: 3, sequence: 2, position: p });
        heap.push(FrontierEntry { f: 3, sequence: 1, position: p });
        heap.push(FrontierEntry { f: 4, sequence: 3, position: p });

        let order: Vec<(u32, u64)> = std::iter::from_fn(|| heap.pop())
            .map(|e| (e.f, e.sequence))
            .collect();
        assert_eq!(order, vec![(3, 1), (3, 2), (4, 3), (5, 0)]);
    }

    #[test]
    fn three_by_three_corner_to_corner() {
        let mut grid = open_grid(3);
        let start = Position::new(0, 0);
        let end = Position::new(2, 2);
        grid.classify(start, CellState::Start).unwrap();
        grid.classify(end, CellState::End).unwrap();

        let mut astar = AStar::new();
        let outcome = astar.run(&mut grid, start, end, &mut |_| {}).unwrap();

        let expected = vec![
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(2, 1),
            Position::new(2, 2),
        ];
        assert_eq!(outcome, SearchOutcome::Success { path: expected });
        assert_eq!(astar.g_score(end), Some(4));
        assert_eq!(astar.came_from(Position::new(1, 0)), Some(start));
        assert!(astar.came_from(start).is_none());

        assert_eq!(grid.state(start), Some(CellState::Start));
        assert_eq!(grid.state(end), Some(CellState::End));
        assert_eq!(
            grid.positions_in(CellState::Path),
            vec![Position::new(1, 0), Position::new(2, 0), Position::new(2, 1)]
        );
    }

    #[test]
    fn steps_once_per_expansion_and_per_edge() {
        let mut grid = open_grid(3);
        let mut calls = 0;
        let mut astar = AStar::new();
        astar
            .run(&mut grid, Position::new(0, 0), Position::new(2, 2), &mut |_| calls += 1)
            .unwrap();

        let stats = astar.statistics();
        // Reaching end is an expansion without a step of its own.
        assert_eq!(calls, stats.expansions - 1 + 4);
        assert_eq!(stats.steps, calls);
        assert_eq!(stats.path_length, Some(4));
    }

    #[test]
    fn popped_cell_is_still_frontier_during_its_step() {
        let mut grid = open_grid(2);
        let start = Position::new(0, 0);
        let end = Position::new(1, 1);
        let mut seen = Vec::new();
        run_search(&mut grid, start, end, |g| seen.push(g.snapshot())).unwrap();

        // First step: start expanded, both neighbors discovered.
        assert_eq!(
            seen[0],
            vec![
                CellState::Empty,
                CellState::Frontier,
                CellState::Frontier,
                CellState::Empty
            ]
        );
        // Second step: (1,0) expanded but not yet settled, end left untouched.
        assert_eq!(
            seen[1],
            vec![
                CellState::Empty,
                CellState::Frontier,
                CellState::Frontier,
                CellState::Empty
            ]
        );
        assert_eq!(grid.state(Position::new(0, 1)), Some(CellState::Settled));
        assert_eq!(grid.state(Position::new(1, 0)), Some(CellState::Path));
        assert_eq!(grid.state(end), Some(CellState::Empty));
    }

    #[test]
    fn end_keeps_its_state_in_every_frame() {
        let mut grid = open_grid(3);
        let start = Position::new(0, 0);
        let end = Position::new(1, 1);
        grid.classify(start, CellState::Start).unwrap();
        grid.classify(end, CellState::End).unwrap();

        let mut frames = Vec::new();
        run_search(&mut grid, start, end, |g| {
            frames.push((g.state(start), g.state(end)))
        })
        .unwrap();

        assert!(!frames.is_empty());
        for frame in frames {
            assert_eq!(frame, (Some(CellState::Start), Some(CellState::End)));
        }
    }

    #[test]
    fn walled_off_end_fails() {
        let mut grid = Grid::new(3, 1);
        grid.classify(Position::new(1, 2), CellState::Barrier).unwrap();
        grid.classify(Position::new(2, 1), CellState::Barrier).unwrap();
        grid.compute_adjacency();

        let mut astar = AStar::new();
        let outcome = astar
            .run(&mut grid, Position::new(0, 0), Position::new(2, 2), &mut |_| {})
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Failure);
        assert!(grid.positions_in(CellState::Path).is_empty());
        assert_eq!(astar.statistics().expansions, 6);
        assert!(astar.statistics().path_length.is_none());
    }

    #[test]
    fn adjacent_end_is_reached_in_one_edge() {
        let mut grid = open_grid(2);
        let outcome =
            run_search(&mut grid, Position::new(0, 0), Position::new(0, 1), |_| {}).unwrap();
        assert_eq!(outcome.path(), Some(&[Position::new(0, 1)][..]));
        assert!(grid.positions_in(CellState::Path).is_empty());
    }

    #[test]
    fn rejects_equal_endpoints() {
        let mut grid = open_grid(3);
        let p = Position::new(1, 1);
        assert_eq!(
            run_search(&mut grid, p, p, |_| {}),
            Err(Error::StartEqualsEnd(p))
        );
    }

    #[test]
    fn rejects_out_of_bounds_endpoints() {
        let mut grid = open_grid(3);
        let err = run_search(&mut grid, Position::new(0, 0), Position::new(3, 0), |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { rows: 3, .. }));
    }

    #[test]
    fn rejects_stale_adjacency() {
        let mut grid = Grid::new(3, 1);
        let start = Position::new(0, 0);
        let end = Position::new(2, 2);
        assert_eq!(
            run_search(&mut grid, start, end, |_| {}),
            Err(Error::StaleAdjacency)
        );

        grid.compute_adjacency();
        grid.classify(Position::new(1, 1), CellState::Barrier).unwrap();
        assert_eq!(
            run_search(&mut grid, start, end, |_| {}),
            Err(Error::StaleAdjacency)
        );
    }

    #[test]
    fn rerun_clears_previous_scores() {
        let mut grid = open_grid(4);
        let mut astar = AStar::new();
        astar
            .run(&mut grid, Position::new(0, 0), Position::new(3, 3), &mut |_| {})
            .unwrap();
        grid.clear_search();
        astar
            .run(&mut grid, Position::new(0, 0), Position::new(0, 1), &mut |_| {})
            .unwrap();

        assert_eq!(astar.statistics().path_length, Some(1));
        assert!(astar.g_score(Position::new(3, 3)).is_none());
        assert_eq!(astar.name(), "A*");
    }
}
