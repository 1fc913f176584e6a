//! One generation of the four-team Game of Life.
//!
//! Rules (B3/S23, same for every team):
//! - live cell with 2 or 3 live neighbors survives and keeps its team
//! - dead cell with exactly 3 live neighbors is born to the majority team
//!   among them; ties are broken uniformly at random
//! - everything else is dead next generation
//!
//! Every cell reads the same pre-step grid and writes into a second buffer.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::seed::RandomSource;
use crate::stats::TeamCounts;
use crate::types::{DEAD, TALLY_SLOTS, TEAM_COUNT};

/// (dx, dy) of the 8 Moore neighbors
const NEIGHBOR_DELTAS: [(isize, isize); 8] = [
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
    (-1, 0),  // W
    (1, 0),   // E
    (-1, 1),  // SW
    (0, 1),   // S
    (1, 1),   // SE
];

/// Per-cell outcome, computed without touching the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellFate {
    Survives,
    Birth,
    Death,
    StaysDead,
}

pub fn fate(alive: bool, neighbors: u8) -> CellFate {
    match (alive, neighbors) {
        (true, 2) | (true, 3) => CellFate::Survives,
        (false, 3) => CellFate::Birth,
        (true, _) => CellFate::Death,
        (false, _) => CellFate::StaysDead,
    }
}

/// Live neighbor total plus a per-team breakdown (slot 0 stays 0), toroidally wrapped.
pub fn count_neighbors(grid: &Grid, x: usize, y: usize) -> (u8, [u8; TALLY_SLOTS]) {
    let mut alive = 0u8;
    let mut teams = [0u8; TALLY_SLOTS];
    for &(dx, dy) in &NEIGHBOR_DELTAS {
        let n = grid.get_wrapped(x, y, dx, dy);
        if n != DEAD {
            alive += 1;
            teams[n as usize] += 1;
        }
    }
    (alive, teams)
}

/// Team for a newborn cell: highest neighbor count wins, ties picked uniformly.
/// Returns 0 only when no team has any neighbor.
pub fn choose_majority_team<R: RandomSource + ?Sized>(teams: &[u8; TALLY_SLOTS], rng: &mut R) -> u8 {
    let max = teams[1..].iter().copied().max().unwrap_or(0);
    if max == 0 {
        return DEAD;
    }

    let tied: ArrayVec<u8, TEAM_COUNT> = (1..=TEAM_COUNT as u8)
        .filter(|&t| teams[t as usize] == max)
        .collect();

    match tied.len() {
        1 => tied[0],
        n => tied[rng.below(n)],
    }
}

/// Compute `read`'s successor into `write` and return the tallies of the new generation.
pub fn step_into<R: RandomSource + ?Sized>(read: &Grid, write: &mut Grid, rng: &mut R) -> TeamCounts {
    debug_assert!(read.same_shape(write));
    let mut counts = TeamCounts::default();

    for y in 0..read.rows() {
        for x in 0..read.cols() {
            let current = read.get(x, y);
            let (neighbors, teams) = count_neighbors(read, x, y);

            let next = match fate(current != DEAD, neighbors) {
                CellFate::Survives => current,
                CellFate::Birth => choose_majority_team(&teams, rng),
                CellFate::Death | CellFate::StaysDead => DEAD,
            };

            write.set(x, y, next);
            counts.tally(next);
        }
    }

    counts
}
