//! Simulation controller: owns the grid buffers, history, counters and brush,
//! and exposes the commands the canister endpoints call.
//!
//! All state lives in one `Simulation` value so several games can run side by
//! side (tests do this constantly). Edits are silent no-ops when they are not
//! allowed; callers that want to know can check the returned `bool`.

use crate::detector;
use crate::engine;
use crate::grid::{Grid, GridBuffers};
use crate::history::History;
use crate::patterns::{self, BrushMode, Pattern};
use crate::seed::RandomSource;
use crate::stats::{self, TeamCounts};
use crate::types::{
    GameOutcome, StatsView, StepReport, DEAD, DEFAULT_SPEED, FRAME_RATE, MAX_SPEED, MIN_SPEED,
};
use crate::zone;

// ============================================================================
// SPEED
// ============================================================================

const SLOWEST_FRAMES: u64 = 15;
const FASTEST_FRAMES: u64 = 1;

/// Frames between generations at 60 fps: speed 1..=20 maps linearly onto 15..=1,
/// and the mapped value is truncated (so the drop is rounded up).
pub fn frames_per_step(speed: u8) -> u64 {
    let steps = (speed.clamp(MIN_SPEED, MAX_SPEED) - MIN_SPEED) as u64;
    let span = (MAX_SPEED - MIN_SPEED) as u64;
    let drop = SLOWEST_FRAMES - FASTEST_FRAMES;
    SLOWEST_FRAMES - (steps * drop).div_ceil(span)
}

/// Tick period for the running timer
pub fn tick_interval_ms(speed: u8) -> u64 {
    frames_per_step(speed) * 1000 / FRAME_RATE
}

// ============================================================================
// SIMULATION
// ============================================================================

pub struct Simulation<R: RandomSource> {
    buffers: GridBuffers,
    history: History,
    generation: u64,
    counts: TeamCounts,
    running: bool,
    speed: u8,
    brush_team: u8,
    brush_mode: BrushMode,
    last_outcome: Option<GameOutcome>,
    rng: R,
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(cols: usize, rows: usize, rng: R) -> Self {
        Self {
            buffers: GridBuffers::new(cols, rows),
            history: History::default(),
            generation: 0,
            counts: TeamCounts::default(),
            running: false,
            speed: DEFAULT_SPEED,
            brush_team: 1,
            brush_mode: BrushMode::SingleCell,
            last_outcome: None,
            rng,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        self.buffers.current()
    }

    pub fn cols(&self) -> usize {
        self.grid().cols()
    }

    pub fn rows(&self) -> usize {
        self.grid().rows()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.grid().try_get(x, y)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn counts(&self) -> &TeamCounts {
        &self.counts
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn brush_team(&self) -> u8 {
        self.brush_team
    }

    pub fn brush_mode(&self) -> BrushMode {
        self.brush_mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_outcome(&self) -> Option<&GameOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn stats(&self) -> StatsView {
        StatsView {
            generation: self.generation,
            team_counts: self.counts.per_team().to_vec(),
            alive_total: self.counts.alive_total(),
            percentages: self.counts.percentages().to_vec(),
        }
    }

    pub fn zone_of(&self, x: usize, y: usize) -> Option<u8> {
        zone::zone_of(self.grid(), x, y)
    }

    pub fn is_in_zone(&self, x: usize, y: usize, team: u8) -> bool {
        zone::is_in_zone(self.grid(), x, y, team)
    }

    pub fn can_place_pattern(&self, x: usize, y: usize, team: u8, pattern: &Pattern) -> bool {
        zone::can_place_pattern(self.grid(), x, y, team, pattern)
    }

    // ------------------------------------------------------------------
    // Run control
    // ------------------------------------------------------------------

    /// Flip the running flag and return the new value.
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    pub fn set_speed(&mut self, speed: u8) -> u8 {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.speed
    }

    /// Scheduled step: advances only while running, so a pause lands before the next step.
    pub fn tick(&mut self) -> Option<StepReport> {
        if !self.running {
            return None;
        }
        Some(self.advance())
    }

    /// Manual single step, only while paused.
    pub fn step_once(&mut self) -> Option<StepReport> {
        if self.running {
            return None;
        }
        Some(self.advance())
    }

    fn advance(&mut self) -> StepReport {
        self.history.record(self.buffers.current());

        let counts = {
            let (read, write) = self.buffers.split();
            engine::step_into(read, write, &mut self.rng)
        };
        self.buffers.swap();

        self.counts = counts;
        self.generation += 1;

        let outcome = detector::evaluate(self.buffers.current(), &self.history, &self.counts, self.generation);
        if let Some(ref outcome) = outcome {
            self.running = false;
            self.last_outcome = Some(outcome.clone());
        }

        StepReport {
            generation: self.generation,
            alive_total: self.counts.alive_total(),
            outcome,
        }
    }

    // ------------------------------------------------------------------
    // Whole-grid commands
    // ------------------------------------------------------------------

    /// Each cell independently comes alive with probability `density`, owned by its zone's team.
    pub fn randomize(&mut self, density: f64) {
        let grid = self.buffers.current_mut();
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let team = zone::zone_of(grid, x, y).unwrap_or(DEAD);
                let state = if self.rng.unit() < density { team } else { DEAD };
                grid.set(x, y, state);
            }
        }
        self.reset_run();
    }

    pub fn clear(&mut self) {
        self.buffers.current_mut().fill(DEAD);
        self.reset_run();
    }

    fn reset_run(&mut self) {
        self.generation = 0;
        self.history.clear();
        self.last_outcome = None;
        self.refresh_stats();
    }

    // ------------------------------------------------------------------
    // Editing surface
    // ------------------------------------------------------------------

    /// Team 0 erases anywhere; teams 1-4 only inside their own quadrant.
    pub fn paint_cell(&mut self, x: usize, y: usize, team: u8) -> bool {
        if !self.is_in_zone(x, y, team) {
            return false;
        }
        self.buffers.current_mut().set(x, y, team);
        self.after_edit();
        true
    }

    /// Stamp a catalog pattern with its top-left at the anchor. Unknown names and
    /// stamps with any cell outside the team's zone leave the grid untouched.
    pub fn place_pattern(&mut self, x: usize, y: usize, team: u8, name: &str) -> bool {
        match patterns::lookup(name) {
            Some(pattern) => self.stamp(x, y, team, pattern),
            None => false,
        }
    }

    fn stamp(&mut self, x: usize, y: usize, team: u8, pattern: &Pattern) -> bool {
        if !self.can_place_pattern(x, y, team, pattern) {
            return false;
        }
        // every target cell was checked to be inside the grid
        let grid = self.buffers.current_mut();
        for (dx, dy) in pattern.offsets() {
            grid.set(x + dx, y + dy, team);
        }
        self.after_edit();
        true
    }

    /// An edit breaks the run: snapshots are no longer immediate predecessors.
    fn after_edit(&mut self) {
        self.history.clear();
        self.last_outcome = None;
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.counts = stats::recompute(self.buffers.current());
    }

    // ------------------------------------------------------------------
    // Brush
    // ------------------------------------------------------------------

    pub fn set_brush_team(&mut self, team: u8) -> bool {
        if !zone::is_valid_team(team) {
            return false;
        }
        self.brush_team = team;
        true
    }

    /// Select a pattern by name or "none" for single cells.
    pub fn set_active_pattern(&mut self, name: &str) -> bool {
        match BrushMode::parse(name) {
            Some(mode) => {
                self.brush_mode = mode;
                true
            }
            None => false,
        }
    }

    /// Press at (x, y): paint a cell or stamp the active pattern with the brush team.
    pub fn apply_brush(&mut self, x: usize, y: usize) -> bool {
        if !self.grid().contains(x, y) {
            return false;
        }
        match self.brush_mode {
            BrushMode::SingleCell => self.paint_cell(x, y, self.brush_team),
            BrushMode::Stamp(kind) => self.stamp(x, y, self.brush_team, kind.pattern()),
        }
    }

    /// Drag over (x, y): only single-cell painting follows the pointer.
    pub fn drag_brush(&mut self, x: usize, y: usize) -> bool {
        if self.brush_mode != BrushMode::SingleCell {
            return false;
        }
        self.apply_brush(x, y)
    }
}
