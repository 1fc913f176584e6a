//! Team zones: the grid is split into four quadrants at the midlines.
//!
//! ```text
//! ┌───────┬───────┐
//! │   1   │   2   │
//! ├───────┼───────┤
//! │   3   │   4   │
//! └───────┴───────┘
//! ```
//!
//! Zones only restrict manual placement. Cells spread by the automaton may
//! end up anywhere.

use crate::grid::Grid;
use crate::patterns::Pattern;
use crate::types::{DEAD, TEAM_COUNT};

/// Owning team of an in-grid cell, `None` outside the grid.
pub fn zone_of(grid: &Grid, x: usize, y: usize) -> Option<u8> {
    if !grid.contains(x, y) {
        return None;
    }
    // x < cols / 2 on real numbers, so odd sizes put the middle column on the right
    let right = 2 * x >= grid.cols();
    let bottom = 2 * y >= grid.rows();
    Some(match (right, bottom) {
        (false, false) => 1,
        (true, false) => 2,
        (false, true) => 3,
        (true, true) => 4,
    })
}

#[inline]
pub fn is_valid_team(team: u8) -> bool {
    team as usize <= TEAM_COUNT
}

/// Erase (team 0) is allowed anywhere in the grid; teams 1-4 only in their own quadrant.
pub fn is_in_zone(grid: &Grid, x: usize, y: usize, team: u8) -> bool {
    if !grid.contains(x, y) {
        return false;
    }
    team == DEAD || zone_of(grid, x, y) == Some(team)
}

/// All-or-nothing: every present cell of the stamp must land in the team's zone.
pub fn can_place_pattern(grid: &Grid, anchor_x: usize, anchor_y: usize, team: u8, pattern: &Pattern) -> bool {
    if team == DEAD || !is_valid_team(team) {
        return false;
    }
    pattern.offsets().all(|(dx, dy)| {
        match (anchor_x.checked_add(dx), anchor_y.checked_add(dy)) {
            (Some(x), Some(y)) => zone_of(grid, x, y) == Some(team),
            _ => false,
        }
    })
}
