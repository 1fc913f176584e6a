//! Per-team live-cell tallies and the derived display numbers.

use crate::grid::Grid;
use crate::types::{Winner, DEAD, TALLY_SLOTS, TEAM_COUNT};

/// Slot 0 is unused (dead cells are not tallied), slots 1-4 hold team counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamCounts {
    counts: [u32; TALLY_SLOTS],
    alive: u32,
}

impl TeamCounts {
    #[inline]
    pub fn tally(&mut self, state: u8) {
        if state != DEAD {
            self.counts[state as usize] += 1;
            self.alive += 1;
        }
    }

    pub fn team(&self, team: u8) -> u32 {
        self.counts.get(team as usize).copied().unwrap_or(0)
    }

    pub fn alive_total(&self) -> u32 {
        self.alive
    }

    /// Counts for teams 1-4, in order
    pub fn per_team(&self) -> [u32; TEAM_COUNT] {
        let mut out = [0u32; TEAM_COUNT];
        out.copy_from_slice(&self.counts[1..]);
        out
    }

    pub fn percentages(&self) -> [f64; TEAM_COUNT] {
        self.per_team().map(|c| percentage(c, self.alive))
    }

    /// Single team with the strictly highest count; zero alive or a shared max is a draw.
    pub fn winner(&self) -> Winner {
        let per_team = self.per_team();
        let max = per_team.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return Winner::Draw;
        }
        let mut leaders = (1..=TEAM_COUNT as u8).filter(|&t| self.team(t) == max);
        match (leaders.next(), leaders.next()) {
            (Some(team), None) => Winner::Team(team),
            _ => Winner::Draw,
        }
    }

    #[cfg(test)]
    pub fn from_teams(teams: [u32; TEAM_COUNT]) -> Self {
        let mut counts = [0u32; TALLY_SLOTS];
        counts[1..].copy_from_slice(&teams);
        Self {
            counts,
            alive: teams.iter().sum(),
        }
    }
}

/// Full rescan, used after edits where there is no incremental tally.
pub fn recompute(grid: &Grid) -> TeamCounts {
    let mut counts = TeamCounts::default();
    for &state in grid.cells() {
        counts.tally(state);
    }
    counts
}

/// Share of the living population in percent, rounded to one decimal.
pub fn percentage(count: u32, alive_total: u32) -> f64 {
    if alive_total == 0 {
        return 0.0;
    }
    let pct = count as f64 / alive_total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recompute_counts_each_team() {
        let mut g = Grid::new(4, 4);
        g.set(0, 0, 1);
        g.set(1, 0, 1);
        g.set(3, 3, 4);
        g.set(2, 1, 2);
        let c = recompute(&g);
        assert_eq!(c.per_team(), [2, 1, 0, 1]);
        assert_eq!(c.alive_total(), 4);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut g = Grid::new(5, 5);
        g.set(2, 2, 3);
        g.set(4, 0, 2);
        assert_eq!(recompute(&g), recompute(&g));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn test_winner_tie_is_draw() {
        assert_eq!(TeamCounts::from_teams([5, 5, 0, 0]).winner(), Winner::Draw);
    }

    #[test]
    fn test_winner_single_max() {
        assert_eq!(TeamCounts::from_teams([7, 3, 0, 0]).winner(), Winner::Team(1));
        assert_eq!(TeamCounts::from_teams([0, 1, 0, 9]).winner(), Winner::Team(4));
    }

    #[test]
    fn test_winner_nobody_alive() {
        assert_eq!(TeamCounts::from_teams([0, 0, 0, 0]).winner(), Winner::Draw);
    }
}
