use std::fmt;
use std::time::Duration;

/// Counters collected over a single search run.
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Cells popped from the frontier and expanded.
    pub expansions: usize,
    pub frontier_pushes: usize,
    /// Number of `on_step` invocations, expansion and reconstruction combined.
    pub steps: usize,
    /// Edge count of the reconstructed path, if one was found.
    pub path_length: Option<usize>,
    pub elapsed: Duration,
}

impl SearchStatistics {
    /// Fraction of expanded cells that ended up on the path.
    pub fn path_ratio(&self) -> f64 {
        match self.path_length {
            Some(len) if self.expansions > 0 => len as f64 / self.expansions as f64,
            _ => 0.0,
        }
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path_length {
            Some(len) => writeln!(f, "Path Length: {}", len)?,
            None => writeln!(f, "Path Length: no path")?,
        }
        writeln!(f, "Cells Expanded: {}", self.expansions)?;
        writeln!(f, "Frontier Pushes: {}", self.frontier_pushes)?;
        writeln!(f, "Progress Steps: {}", self.steps)?;
        writeln!(f, "Search Time: {:.2?}", self.elapsed)?;

        if self.path_length.is_some() {
            writeln!(f, "Path/Expanded Ratio: {:.3}", self.path_ratio())?;
        }

        Ok(())
    }
}
