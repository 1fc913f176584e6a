//! Post-step end-of-game check. Only fixed points and period-2 cycles are detected.

use crate::grid::Grid;
use crate::history::{grids_equal, History};
use crate::stats::TeamCounts;
use crate::types::{EndReason, GameOutcome};

pub fn detect_end(current: &Grid, history: &History) -> Option<EndReason> {
    if grids_equal(Some(current), history.previous()) {
        Some(EndReason::Static)
    } else if grids_equal(Some(current), history.two_steps_ago()) {
        Some(EndReason::Oscillation)
    } else {
        None
    }
}

pub fn evaluate(current: &Grid, history: &History, counts: &TeamCounts, generation: u64) -> Option<GameOutcome> {
    detect_end(current, history).map(|reason| GameOutcome {
        reason,
        winner: counts.winner(),
        generation,
    })
}
