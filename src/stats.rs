use core::fmt;

use crate::engine::StepEvent;

/// Running counters shown next to the grid, folded from the event stream alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub tiles_searched: usize,
    pub tiles_traversed: usize,
    pub tiles_on_path: usize,
    pub goal_found: bool,
    pub no_path: bool,
    /// Reference length of the shortest path, in moves, if known for the grid.
    pub best_path: Option<usize>,
}

impl RunStats {
    pub fn new(best_path: Option<usize>) -> RunStats {
        RunStats {
            best_path,
            ..RunStats::default()
        }
    }
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a StepEvent>) -> RunStats {
        let mut stats = RunStats::default();
        stats.record_all(events);
        stats
    }
    pub fn record(&mut self, event: &StepEvent) {
        match event {
            StepEvent::Searched(_) => self.tiles_searched += 1,
            StepEvent::Traversed(_) => self.tiles_traversed += 1,
            StepEvent::OnPath(_) => self.tiles_on_path += 1,
            StepEvent::GoalFound(_) => self.goal_found = true,
            StepEvent::NoPathFound => self.no_path = true,
            StepEvent::Idle => {}
        }
    }
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a StepEvent>) {
        events.into_iter().for_each(|e| self.record(e));
    }
    /// Moves along the reconstructed path so far; the path includes both endpoints.
    pub fn path_length(&self) -> usize {
        self.tiles_on_path.saturating_sub(1)
    }
    /// Whether the reconstructed path is as short as the reference. `None` when there is no
    /// reference or no path yet.
    pub fn matches_best_path(&self) -> Option<bool> {
        match self.best_path {
            Some(best) if self.tiles_on_path > 0 => Some(self.path_length() == best),
            _ => None,
        }
    }
    /// Zeroes the counters but keeps the reference length.
    pub fn clear(&mut self) {
        *self = RunStats::new(self.best_path);
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "searched: {:>4}  traversed: {:>4}  path: {:>4}",
            self.tiles_searched,
            self.tiles_traversed,
            self.path_length()
        )?;
        if let Some(best) = self.best_path {
            write!(f, "  best: {:>4}", best)?;
        }
        if self.no_path {
            write!(f, "  (no path)")?;
        }
        Ok(())
    }
}
