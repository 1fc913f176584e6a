//! The two most recent pre-step snapshots of an unbroken run.

use crate::grid::Grid;

#[derive(Clone, Debug, Default)]
pub struct History {
    previous: Option<Grid>,
    two_steps_ago: Option<Grid>,
}

impl History {
    /// Shift history before the grid is mutated: the old `previous` moves back one slot
    /// and `previous` becomes an independent copy of `current`.
    pub fn record(&mut self, current: &Grid) {
        self.two_steps_ago = self.previous.replace(current.clone());
    }

    /// Forget both snapshots (edits, clear, randomize break the run)
    pub fn clear(&mut self) {
        self.previous = None;
        self.two_steps_ago = None;
    }

    pub fn previous(&self) -> Option<&Grid> {
        self.previous.as_ref()
    }

    pub fn two_steps_ago(&self) -> Option<&Grid> {
        self.two_steps_ago.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.two_steps_ago.is_none()
    }
}

/// Same dimensions and same state in every cell; an absent snapshot never matches.
pub fn grids_equal(a: Option<&Grid>, b: Option<&Grid>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same_shape(b) && a.cells() == b.cells(),
        _ => false,
    }
}
