//! Text rendering of a grid. Colors and glyphs live here, not in the grid.

use crate::grid::{CellState, Grid, Position};
use std::fmt::Write;

pub const LEGEND: &str =
    "Legend: S=Start, E=End, #=Barrier, o=Frontier, x=Settled, *=Path, .=Empty";

pub fn glyph(state: CellState) -> char {
    match state {
        CellState::Empty => '.',
        CellState::Barrier => '#',
        CellState::Start => 'S',
        CellState::End => 'E',
        CellState::Frontier => 'o',
        CellState::Settled => 'x',
        CellState::Path => '*',
    }
}

/// RGB fill for a cell, matching the classic pathfinding visualizer palette.
pub fn rgb(state: CellState) -> (u8, u8, u8) {
    match state {
        CellState::Empty => (255, 255, 255),
        CellState::Barrier => (0, 0, 0),
        CellState::Start => (255, 165, 0),
        CellState::End => (64, 224, 208),
        CellState::Frontier => (0, 255, 0),
        CellState::Settled => (255, 0, 0),
        CellState::Path => (128, 0, 128),
    }
}

/// Renders the grid with row and column indices. With `color` set, each
/// glyph is drawn on a 24-bit ANSI background.
pub fn render(grid: &Grid, color: bool) -> String {
    let rows = grid.rows();
    let mut out = String::with_capacity((rows + 1) * (rows * 2 + 4));

    out.push_str("   ");
    for col in 0..rows {
        let _ = write!(out, "{:2}", col % 10);
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{:2} ", row);
        for col in 0..rows {
            let state = grid[Position::new(row, col)].state();
            if color {
                let (r, g, b) = rgb(state);
                let _ = write!(out, "\x1B[48;2;{};{};{}m\x1B[30m{} \x1B[0m", r, g, b, glyph(state));
            } else {
                out.push(glyph(state));
                out.push(' ');
            }
        }
        out.push('\n');
    }

    out
}
