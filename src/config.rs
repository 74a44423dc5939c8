use crate::error::{Error, Result};
use crate::grid::Position;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Animated A* search on a square grid", long_about = None)]
pub struct Config {
    /// Cells per side
    #[arg(long, default_value_t = 50)]
    pub rows: usize,

    /// Drawing width in pixels; each cell is width / rows wide
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    #[arg(long, default_value_t = 400)]
    pub num_barriers: usize,

    /// Seed for a reproducible barrier layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start cell as `row,col`; random in the top-left quadrant if omitted
    #[arg(long)]
    pub start: Option<Position>,

    /// End cell as `row,col`; random in the bottom-right quadrant if omitted
    #[arg(long)]
    pub end: Option<Position>,

    #[arg(long, default_value_t = 10)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    /// Draw cells with ANSI colors
    #[arg(long, default_value_t = false)]
    pub color: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 50,
            width: 800,
            num_barriers: 400,
            seed: None,
            start: None,
            end: None,
            delay_ms: 10,
            no_visualization: false,
            color: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn cell_width(&self) -> usize {
        self.width / self.rows.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 {
            return Err(Error::Config(format!(
                "--rows must be at least 2 to hold a start and an end, got {}",
                self.rows
            )));
        }

        for (flag, pos) in [("--start", self.start), ("--end", self.end)] {
            if let Some(pos) = pos {
                if pos.row >= self.rows || pos.col >= self.rows {
                    return Err(Error::Config(format!(
                        "{} {} is outside the {}x{} grid",
                        flag, pos, self.rows, self.rows
                    )));
                }
            }
        }

        if self.start.is_some() && self.start == self.end {
            return Err(Error::Config("--start and --end must differ".to_string()));
        }

        let free_cells = self
            .rows
            .checked_mul(self.rows)
            .map(|cells| cells - 2)
            .ok_or_else(|| Error::Config(format!("--rows {} is too large", self.rows)))?;
        if self.num_barriers > free_cells {
            return Err(Error::Config(format!(
                "--num-barriers {} exceeds the {} cells left after start and end",
                self.num_barriers, free_cells
            )));
        }

        Ok(())
    }
}
