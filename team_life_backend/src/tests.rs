//! Unit tests for Team Life backend
//!
//! End-to-end rules, team resolution, game-end detection and editing, driven
//! through `Simulation` with a seeded random source.

use super::*;
use crate::engine::{choose_majority_team, step_into};
use crate::grid::Grid;
use crate::stats::{recompute, TeamCounts};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

impl RandomSource for ChaCha8Rng {
    fn next_u64(&mut self) -> u64 {
        rand::RngCore::next_u64(self)
    }
}

fn sim(cols: usize, rows: usize) -> Simulation<SeedRng> {
    Simulation::new(cols, rows, SeedRng::from_u64(2024))
}

fn live_cells(grid: &Grid) -> Vec<(usize, usize, u8)> {
    let mut out = Vec::new();
    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            let s = grid.get(x, y);
            if s != 0 {
                out.push((x, y, s));
            }
        }
    }
    out
}

// ============================================================================
// TRANSITION RULES
// ============================================================================

#[test]
fn test_dead_grid_stays_dead() {
    let mut s = sim(16, 12);
    for _ in 0..5 {
        s.step_once();
        assert!(s.grid().is_empty());
        assert_eq!(s.counts().alive_total(), 0);
    }
}

#[test]
fn test_survivor_keeps_team() {
    // Block of mixed teams: every cell has exactly 3 neighbors and survives
    let mut g = Grid::new(10, 10);
    g.set(4, 4, 1);
    g.set(5, 4, 2);
    g.set(4, 5, 3);
    g.set(5, 5, 4);
    let mut next = Grid::new(10, 10);
    step_into(&g, &mut next, &mut SeedRng::from_u64(1));
    assert_eq!(next, g);
}

#[test]
fn test_wrap_neighbor_across_columns() {
    // Three cells in column 0 give the last column a birth from the left edge
    let mut g = Grid::new(8, 8);
    for y in 2..=4 {
        g.set(0, y, 2);
    }
    let mut next = Grid::new(8, 8);
    step_into(&g, &mut next, &mut SeedRng::from_u64(1));
    assert_eq!(next.get(7, 3), 2);
    assert_eq!(next.get(1, 3), 2);
    assert_eq!(next.get(0, 3), 2);
}

#[test]
fn test_wrap_neighbor_across_rows() {
    let mut g = Grid::new(8, 8);
    for x in 2..=4 {
        g.set(x, 7, 3);
    }
    let mut next = Grid::new(8, 8);
    step_into(&g, &mut next, &mut SeedRng::from_u64(1));
    assert_eq!(next.get(3, 0), 3);
    assert_eq!(next.get(3, 6), 3);
}

#[test]
fn test_birth_unanimous_team() {
    // (1, 1) has three team-2 neighbors and nothing else
    for seed in 0..20 {
        let mut g = Grid::new(8, 8);
        g.set(0, 0, 2);
        g.set(2, 0, 2);
        g.set(0, 2, 2);
        let mut next = Grid::new(8, 8);
        step_into(&g, &mut next, &mut SeedRng::from_u64(seed));
        assert_eq!(next.get(1, 1), 2);
    }
}

#[test]
fn test_birth_two_to_one_majority() {
    let mut g = Grid::new(8, 8);
    g.set(0, 0, 4);
    g.set(2, 0, 4);
    g.set(0, 2, 1);
    let mut next = Grid::new(8, 8);
    step_into(&g, &mut next, &mut SeedRng::from_u64(9));
    assert_eq!(next.get(1, 1), 4);
}

#[test]
fn test_three_way_tie_frequencies() {
    let teams = [0u8, 1, 1, 1, 0];
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut hits = [0u32; 5];
    let trials = 30_000;
    for _ in 0..trials {
        hits[choose_majority_team(&teams, &mut rng) as usize] += 1;
    }
    assert_eq!(hits[0], 0);
    assert_eq!(hits[4], 0);
    for team in 1..=3 {
        let share = hits[team] as f64 / trials as f64;
        assert!((share - 1.0 / 3.0).abs() < 0.02, "team {} share {}", team, share);
    }
}

#[test]
fn test_tie_breaks_reproducible_with_seed() {
    let run = |seed: u64| {
        let mut s = Simulation::new(24, 24, SeedRng::from_u64(seed));
        s.randomize(0.35);
        for _ in 0..10 {
            s.step_once();
        }
        s.grid().clone()
    };
    assert_eq!(run(77), run(77));
}

// ============================================================================
// STATISTICS
// ============================================================================

#[test]
fn test_step_counts_match_rescan() {
    let mut s = sim(30, 20);
    s.randomize(0.3);
    for _ in 0..15 {
        s.step_once();
        assert_eq!(*s.counts(), recompute(s.grid()));
    }
}

#[test]
fn test_recompute_twice_identical() {
    let mut s = sim(30, 20);
    s.randomize(0.2);
    assert_eq!(recompute(s.grid()), recompute(s.grid()));
}

#[test]
fn test_stats_view_percentages() {
    let mut s = sim(20, 20);
    s.place_pattern(0, 0, 1, "block");
    s.place_pattern(12, 0, 2, "glider");
    let stats = s.stats();
    assert_eq!(stats.team_counts, vec![4, 5, 0, 0]);
    assert_eq!(stats.alive_total, 9);
    assert_eq!(stats.percentages, vec![44.4, 55.6, 0.0, 0.0]);
}

#[test]
fn test_winner_examples() {
    assert_eq!(TeamCounts::from_teams([5, 5, 0, 0]).winner(), Winner::Draw);
    assert_eq!(TeamCounts::from_teams([7, 3, 0, 0]).winner(), Winner::Team(1));
}

// ============================================================================
// GAME END
// ============================================================================

#[test]
fn test_block_is_static_win_for_team_1() {
    let mut s = sim(20, 20);
    assert!(s.place_pattern(3, 3, 1, "block"));
    let before = s.grid().clone();

    let report = s.step_once().unwrap();
    assert_eq!(s.grid(), &before);
    assert_eq!(report.generation, 1);
    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.reason, EndReason::Static);
    assert_eq!(outcome.winner, Winner::Team(1));
    assert_eq!(s.last_outcome(), Some(&outcome));
}

#[test]
fn test_blinker_detected_as_oscillation() {
    let mut s = sim(20, 20);
    for x in 3..=5 {
        assert!(s.paint_cell(x, 4, 1));
    }

    let first = s.step_once().unwrap();
    assert!(first.outcome.is_none());
    let second = s.step_once().unwrap();
    let outcome = second.outcome.unwrap();
    assert_eq!(outcome.reason, EndReason::Oscillation);
    assert_eq!(outcome.winner, Winner::Team(1));
    assert_eq!(outcome.generation, 2);
}

#[test]
fn test_extinction_is_static_draw() {
    let mut s = sim(20, 20);
    s.paint_cell(2, 2, 1);
    // lone cell dies on step 1, empty grid repeats on step 2
    assert!(s.step_once().unwrap().outcome.is_none());
    let outcome = s.step_once().unwrap().outcome.unwrap();
    assert_eq!(outcome.reason, EndReason::Static);
    assert_eq!(outcome.winner, Winner::Draw);
}

#[test]
fn test_glider_runs_without_false_end() {
    let mut s = sim(20, 20);
    assert!(s.place_pattern(1, 1, 1, "glider"));
    for _ in 0..40 {
        let report = s.step_once().unwrap();
        assert!(report.outcome.is_none(), "gen {}", report.generation);
    }
    assert_eq!(s.counts().alive_total(), 5);
}

#[test]
fn test_clear_resets_generation_and_history() {
    let mut s = sim(20, 20);
    s.place_pattern(3, 3, 1, "block");
    s.step_once();
    s.step_once();
    s.clear();
    assert_eq!(s.generation(), 0);
    assert!(s.history().is_empty());
    assert!(s.last_outcome().is_none());

    // the only snapshot is the cleared grid itself, a fixed point with nobody alive
    let report = s.step_once().unwrap();
    assert!(s.grid().is_empty());
    assert_eq!(report.generation, 1);
    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.reason, EndReason::Static);
    assert_eq!(outcome.winner, Winner::Draw);
}

#[test]
fn test_clear_drops_oscillation_history() {
    let mut s = sim(20, 20);
    for x in 3..=5 {
        s.paint_cell(x, 4, 1);
    }
    s.step_once();
    s.clear();
    // the vertical phase again: stale history would flag its successor as a cycle
    for y in 3..=5 {
        s.paint_cell(4, y, 1);
    }
    assert!(s.step_once().unwrap().outcome.is_none());
}

#[test]
fn test_running_flag_cleared_on_end() {
    let mut s = sim(20, 20);
    s.place_pattern(3, 3, 1, "block");
    s.toggle_running();
    let report = s.tick().unwrap();
    assert!(report.outcome.is_some());
    assert!(!s.is_running());
}

// ============================================================================
// EDITING
// ============================================================================

#[test]
fn test_glider_rejected_when_one_cell_out_of_zone() {
    let mut s = sim(20, 20);
    s.place_pattern(15, 15, 4, "block");
    let before = s.grid().clone();
    // anchor (7, 8): bottom row lands on y = 10, team 3's quadrant
    assert!(!s.place_pattern(7, 8, 1, "glider"));
    assert_eq!(s.grid(), &before);
}

#[test]
fn test_unknown_pattern_is_noop() {
    let mut s = sim(20, 20);
    assert!(!s.place_pattern(0, 0, 1, "pulsar"));
    assert!(!s.place_pattern(0, 0, 1, "none"));
    assert!(s.grid().is_empty());
}

#[test]
fn test_stamp_over_existing_cells() {
    let mut s = sim(20, 20);
    s.paint_cell(1, 0, 1);
    s.paint_cell(0, 0, 1);
    assert!(s.place_pattern(0, 0, 1, "loaf"));
    // (0, 0) is absent in the loaf mask and stays as painted
    assert_eq!(s.cell(0, 0), Some(1));
    assert_eq!(s.cell(1, 0), Some(1));
    assert_eq!(s.counts().team(1), 8);
}

#[test]
fn test_stamp_overwrites_spread_cells() {
    // team 2 blinker straddling the midline leaks a cell into team 1's quadrant
    let mut s = sim(20, 20);
    for y in 3..=5 {
        assert!(s.paint_cell(10, y, 2));
    }
    s.step_once();
    assert_eq!(s.cell(9, 4), Some(2));
    assert_eq!(s.zone_of(9, 4), Some(1));

    assert!(s.place_pattern(8, 3, 1, "block"));
    assert_eq!(s.cell(9, 4), Some(1));
}

#[test]
fn test_erase_anywhere() {
    let mut s = sim(20, 20);
    s.place_pattern(15, 15, 4, "block");
    assert!(s.paint_cell(15, 15, 0));
    assert_eq!(s.cell(15, 15), Some(0));
    assert_eq!(s.counts().team(4), 3);
}

#[test]
fn test_paint_outside_grid_is_noop() {
    let mut s = sim(20, 20);
    assert!(!s.paint_cell(20, 0, 0));
    assert!(!s.paint_cell(0, 25, 1));
}

#[test]
fn test_brush_outside_grid_is_noop() {
    let mut s = sim(20, 20);
    s.set_brush_team(0);
    assert!(!s.apply_brush(20, 0));
    assert!(!s.drag_brush(0, 20));
    assert!(!s.drag_brush(usize::MAX, usize::MAX));

    s.set_brush_team(4);
    s.set_active_pattern("block");
    assert!(!s.apply_brush(25, 25));
    assert!(!s.apply_brush(usize::MAX, 15));
    assert!(s.grid().is_empty());
    assert_eq!(s.generation(), 0);
}

#[test]
fn test_pattern_anchor_overflow_rejected() {
    let mut s = sim(20, 20);
    s.place_pattern(15, 15, 4, "block");
    let before = s.grid().clone();
    assert!(!s.place_pattern(usize::MAX, 0, 1, "block"));
    assert!(!s.place_pattern(usize::MAX, usize::MAX, 4, "glider"));
    assert!(!s.place_pattern(0, usize::MAX, 3, "lws"));
    assert_eq!(s.grid(), &before);
    assert_eq!(s.counts().team(4), 4);
}

#[test]
fn test_brush_stamp_and_drag() {
    let mut s = sim(20, 20);
    s.set_brush_team(2);
    s.set_active_pattern("lws");
    assert!(s.apply_brush(12, 2));
    assert_eq!(s.counts().team(2), 9);
    // dragging never stamps
    assert!(!s.drag_brush(12, 8));

    s.set_active_pattern("none");
    assert!(s.drag_brush(19, 0));
    assert!(!s.drag_brush(0, 0));
    assert_eq!(s.counts().team(2), 10);
}

#[test]
fn test_randomize_respects_zones() {
    let mut s = sim(40, 30);
    s.randomize(0.5);
    assert_eq!(s.generation(), 0);
    assert!(s.history().is_empty());
    for (x, y, team) in live_cells(s.grid()) {
        assert_eq!(s.zone_of(x, y), Some(team));
    }
}

#[test]
fn test_randomize_density_roughly_twenty_percent() {
    let mut s = sim(80, 60);
    s.randomize(types::DEFAULT_DENSITY);
    let share = s.counts().alive_total() as f64 / (80.0 * 60.0);
    assert!((share - 0.2).abs() < 0.03, "alive share {}", share);
}

#[test]
fn test_build_game_state() {
    let mut s = sim(20, 10);
    s.place_pattern(0, 0, 1, "block");
    s.set_active_pattern("glider");
    let state = build_game_state(&s);
    assert_eq!((state.cols, state.rows), (20, 10));
    assert_eq!(state.cells.len(), 200);
    assert_eq!(state.cells[0], 1);
    assert_eq!(state.cells[21], 1);
    assert_eq!(state.active_pattern, "glider");
    assert!(!state.is_running);
    assert!(state.last_outcome.is_none());
}

// ============================================================================
// CONFIG
// ============================================================================

#[test]
fn test_config_too_small_falls_back_to_defaults() {
    let config = GameConfig { cols: 0, rows: 0, seed: None };
    assert_eq!(config.dimensions(), (80, 60));
    let config = GameConfig { cols: 40, rows: 1, seed: None };
    assert_eq!(config.dimensions(), (80, 60));
}

#[test]
fn test_config_too_large_is_clamped() {
    let config = GameConfig { cols: 4096, rows: 4096, seed: None };
    assert_eq!(config.dimensions(), (512, 512));
    let config = GameConfig { cols: u16::MAX, rows: 30, seed: Some(1) };
    assert_eq!(config.dimensions(), (512, 30));
}

#[test]
fn test_config_in_range_kept() {
    let config = GameConfig { cols: 33, rows: 512, seed: None };
    assert_eq!(config.dimensions(), (33, 512));
}

#[test]
fn test_largest_state_fits_query_reply() {
    let config = GameConfig { cols: u16::MAX, rows: u16::MAX, seed: None };
    let (cols, rows) = config.dimensions();
    let s = Simulation::new(cols, rows, SeedRng::from_u64(1));
    let state = build_game_state(&s);
    // 3 MiB query reply limit
    assert!(state.cells.len() < 3 * 1024 * 1024);
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_live_cells_never_change_team(seed in any::<u64>(), density in 0.05f64..0.6) {
        let mut s = Simulation::new(16, 16, ChaCha8Rng::seed_from_u64(seed));
        s.randomize(density);
        let before = s.grid().clone();
        s.step_once();
        for (x, y, team) in live_cells(s.grid()) {
            let old = before.get(x, y);
            prop_assert!(old == 0 || old == team, "cell ({}, {}) switched {} -> {}", x, y, old, team);
        }
    }

    #[test]
    fn prop_rejected_stamp_leaves_grid_untouched(x in 0usize..20, y in 0usize..20, team in 1u8..=4) {
        let mut s = sim(20, 20);
        s.randomize(0.2);
        let before = s.grid().clone();
        let pattern = patterns::lookup("glider").unwrap();
        let allowed = s.can_place_pattern(x, y, team, pattern);
        let placed = s.place_pattern(x, y, team, "glider");
        prop_assert_eq!(allowed, placed);
        if !placed {
            prop_assert_eq!(s.grid(), &before);
        }
    }

    #[test]
    fn prop_counts_sum_to_alive(seed in any::<u64>()) {
        let mut s = Simulation::new(12, 12, SeedRng::from_u64(seed));
        s.randomize(0.3);
        s.step_once();
        let total: u32 = s.counts().per_team().iter().sum();
        prop_assert_eq!(total, s.counts().alive_total());
    }
}
