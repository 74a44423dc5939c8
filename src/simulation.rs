use crate::algorithms::a_star::AStar;
use crate::algorithms::common::{SearchAlgorithm, SearchOutcome};
use crate::config::Config;
use crate::editor::Editor;
use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::render;
use crate::statistics::SearchStatistics;
use log::{debug, info, warn};
use pathfinding::prelude::bfs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

/// Start, end and barrier cells for one run, generated up front so a seed
/// reproduces the whole layout.
#[derive(Debug, Clone)]
pub struct Layout {
    pub rows: usize,
    pub start: Position,
    pub end: Position,
    pub barriers: HashSet<Position>,
}

impl Layout {
    /// Picks endpoints (unless the config fixes them) and scatters barriers,
    /// never on an endpoint.
    pub fn generate(config: &Config, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let rows = config.rows;
        let half = rows / 2;

        let mut start = config.start.unwrap_or_else(|| Position {
            row: rng.gen_range(0..half),
            col: rng.gen_range(0..half),
        });
        let mut end = config.end.unwrap_or_else(|| Position {
            row: rng.gen_range(half..rows),
            col: rng.gen_range(half..rows),
        });
        if end == start {
            // Only one endpoint was fixed and the other landed on it; move the free one.
            let moved = mirrored(start, rows);
            if config.end.is_some() {
                start = moved;
            } else {
                end = moved;
            }
        }

        let mut barriers = HashSet::new();
        let mut attempts = 0;
        while barriers.len() < config.num_barriers && attempts < config.num_barriers * 3 {
            let pos = Position {
                row: rng.gen_range(0..rows),
                col: rng.gen_range(0..rows),
            };
            if pos != start && pos != end {
                barriers.insert(pos);
            }
            attempts += 1;
        }

        debug!(
            "generated layout: start {}, end {}, {} barriers",
            start,
            end,
            barriers.len()
        );

        Layout {
            rows,
            start,
            end,
            barriers,
        }
    }

    /// Places the layout through an editor, so start and end go in first.
    pub fn build_editor(&self, cell_width: usize) -> Result<Editor> {
        let mut editor = Editor::new(self.rows, cell_width);
        editor.place(self.start)?;
        editor.place(self.end)?;

        let mut barriers: Vec<Position> = self.barriers.iter().copied().collect();
        barriers.sort();
        for pos in barriers {
            editor.place(pos)?;
        }
        Ok(editor)
    }
}

/// Shortest path length in edges by plain breadth-first search over the
/// grid's adjacency, independent of the A* engine.
pub fn reference_length(grid: &Grid, start: Position, end: Position) -> Option<usize> {
    bfs(&start, |p| grid.neighbors(*p).to_vec(), |p| *p == end).map(|path| path.len() - 1)
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub start: Position,
    pub end: Position,
    pub barriers: usize,
    pub outcome: SearchOutcome,
    pub statistics: SearchStatistics,
    pub reference_length: Option<usize>,
}

impl SimulationReport {
    /// True when A* and breadth-first search agree on reachability and length.
    pub fn is_optimal(&self) -> bool {
        self.outcome.path().map(|p| p.len()) == self.reference_length
    }
}

pub struct Simulation {
    config: Config,
    editor: Editor,
    layout: Layout,
    algorithm: AStar,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let layout = Layout::generate(&config, config.seed);
        let editor = layout.build_editor(config.cell_width())?;

        Ok(Simulation {
            config,
            editor,
            layout,
            algorithm: AStar::new(),
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn run(&mut self) -> Result<SimulationReport> {
        let visualize = !self.config.no_visualization;
        let delay = Duration::from_millis(self.config.delay_ms);
        let color = self.config.color;
        let name = self.algorithm.name();
        let mut step = 0usize;

        let mut on_step = |grid: &Grid| {
            step += 1;
            if visualize {
                clear_screen();
                println!("=== PATHFINDING: {} | Step: {} ===", name, step);
                println!("{}", render::LEGEND);
                print!("{}", render::render(grid, color));
                thread::sleep(delay);
            }
        };

        let outcome = self.editor.run(&mut self.algorithm, &mut on_step)?;

        let grid = self.editor.grid();
        let reference_length = reference_length(grid, self.layout.start, self.layout.end);
        let report = SimulationReport {
            start: self.layout.start,
            end: self.layout.end,
            barriers: self.layout.barriers.len(),
            outcome,
            statistics: self.algorithm.statistics().clone(),
            reference_length,
        };

        if report.is_optimal() {
            info!("A* result matches breadth-first reference ({:?})", reference_length);
        } else {
            warn!(
                "A* path length {:?} differs from breadth-first reference {:?}",
                report.statistics.path_length, reference_length
            );
        }

        Ok(report)
    }
}

/// Point-mirrored cell, or the next cell along the row for the centre cell.
fn mirrored(pos: Position, rows: usize) -> Position {
    let opposite = Position::new(rows - 1 - pos.row, rows - 1 - pos.col);
    if opposite == pos {
        Position::new(pos.row, (pos.col + 1) % rows)
    } else {
        opposite
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}
