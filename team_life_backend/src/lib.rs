//! Team Life Backend - four-team Game of Life on a toroidal grid
//!
//! Each quadrant belongs to one team. Players paint cells or stamp patterns
//! inside their team's quadrant, then let the automaton run. Births go to the
//! majority team among the three parents. The game ends when the grid stops
//! changing or settles into a period-2 cycle, and the team with the most live
//! cells wins.
//!
//! The frontend polls `get_state` and renders; all mutation goes through the
//! update endpoints below.

use ic_cdk::{init, post_upgrade, query, update};
use ic_cdk_timers::TimerId;
use std::cell::RefCell;
use std::time::Duration;

pub mod detector;
pub mod engine;
pub mod grid;
pub mod history;
pub mod patterns;
pub mod seed;
pub mod simulation;
pub mod stats;
pub mod types;
pub mod zone;

pub use seed::{RandomSource, SeedRng};
pub use simulation::Simulation;
pub use types::{EndReason, GameConfig, GameOutcome, GameStateView, StatsView, StepReport, Winner};

use types::{PatternInfo, SeedInfo, DEFAULT_DENSITY};

// ============================================================================
// STATE
// ============================================================================

thread_local! {
    static SIMULATION: RefCell<Simulation<SeedRng>> = RefCell::new(Simulation::new(
        types::DEFAULT_COLS as usize,
        types::DEFAULT_ROWS as usize,
        SeedRng::from_u64(0),
    ));

    static TIMER_ID: RefCell<Option<TimerId>> = const { RefCell::new(None) };
}

fn with_sim<T>(f: impl FnOnce(&Simulation<SeedRng>) -> T) -> T {
    SIMULATION.with(|s| f(&s.borrow()))
}

fn with_sim_mut<T>(f: impl FnOnce(&mut Simulation<SeedRng>) -> T) -> T {
    SIMULATION.with(|s| f(&mut s.borrow_mut()))
}

// ============================================================================
// CANISTER LIFECYCLE
// ============================================================================

#[init]
fn init(config: Option<GameConfig>) {
    setup(config);
}

/// No state survives an upgrade; the world starts fresh.
#[post_upgrade]
fn post_upgrade(config: Option<GameConfig>) {
    setup(config);
}

fn setup(config: Option<GameConfig>) {
    let supplied = config.is_some();
    let config = config.unwrap_or(GameConfig {
        cols: types::DEFAULT_COLS,
        rows: types::DEFAULT_ROWS,
        seed: None,
    });

    let (cols, rows) = config.dimensions();
    if supplied && (cols, rows) != (config.cols as usize, config.rows as usize) {
        ic_cdk::println!(
            "Config {}x{} out of range, using {}x{}",
            config.cols,
            config.rows,
            cols,
            rows
        );
    }

    let rng = match config.seed {
        Some(seed) => SeedRng::from_u64(seed),
        None => SeedRng::from_bytes(&ic_cdk::api::time().to_be_bytes()),
    };
    SIMULATION.with(|s| *s.borrow_mut() = Simulation::new(cols, rows, rng));

    if config.seed.is_none() {
        // Management canister calls aren't allowed in init; reseed from a one-shot timer
        ic_cdk_timers::set_timer(Duration::ZERO, async {
            reseed_from_raw_rand().await;
        });
    }

    ic_cdk::println!(
        "Team Life Backend Initialized - {}x{} toroidal world, seed: {}",
        cols,
        rows,
        if config.seed.is_some() { "fixed" } else { "time (raw_rand pending)" }
    );
}

async fn reseed_from_raw_rand() {
    match ic_cdk::management_canister::raw_rand().await {
        Ok(bytes) => {
            let rng = SeedRng::from_bytes(&bytes);
            let hash = rng.seed_hash();
            with_sim_mut(|s| *s.rng_mut() = rng);
            ic_cdk::println!("Seed replaced from raw_rand: {}", hash);
        }
        Err(e) => {
            ic_cdk::println!("raw_rand failed, keeping time seed: {:?}", e);
        }
    }
}

// ============================================================================
// TIMER
// ============================================================================

fn start_timer() {
    stop_timer();
    let interval = with_sim(|s| simulation::tick_interval_ms(s.speed()));
    let timer_id = ic_cdk_timers::set_timer_interval(Duration::from_millis(interval), || async { tick() });
    TIMER_ID.with(|t| {
        *t.borrow_mut() = Some(timer_id);
    });
}

fn stop_timer() {
    TIMER_ID.with(|t| {
        if let Some(id) = t.borrow_mut().take() {
            ic_cdk_timers::clear_timer(id);
        }
    });
}

fn is_timer_running() -> bool {
    TIMER_ID.with(|t| t.borrow().is_some())
}

fn tick() {
    match with_sim_mut(|s| s.tick()) {
        Some(report) => {
            if let Some(outcome) = report.outcome {
                log_outcome(&outcome);
                stop_timer();
            }
        }
        // Paused (or ended) since the last tick
        None => stop_timer(),
    }
}

fn log_outcome(outcome: &GameOutcome) {
    let winner = match outcome.winner {
        Winner::Team(team) => format!("team {} wins", team),
        Winner::Draw => "draw".to_string(),
    };
    ic_cdk::println!(
        "Game over at generation {}: {:?}, {}",
        outcome.generation,
        outcome.reason,
        winner
    );
}

// ============================================================================
// RUN CONTROL
// ============================================================================

/// Play/pause. Returns the new running flag.
#[update]
fn toggle_running() -> bool {
    let running = with_sim_mut(|s| s.toggle_running());
    if running {
        start_timer();
    } else {
        stop_timer();
    }
    ic_cdk::println!("Simulation {}", if running { "running" } else { "paused" });
    running
}

/// Advance one generation. `None` while running.
#[update]
fn step_once() -> Option<StepReport> {
    let report = with_sim_mut(|s| s.step_once());
    if let Some(outcome) = report.as_ref().and_then(|r| r.outcome.as_ref()) {
        log_outcome(outcome);
    }
    report
}

/// Speed 1-20 (clamped). Restarts the interval if the simulation is running.
#[update]
fn set_speed(speed: u8) -> u8 {
    let speed = with_sim_mut(|s| s.set_speed(speed));
    if is_timer_running() {
        start_timer();
    }
    speed
}

#[update]
fn randomize(density: Option<f64>) -> StatsView {
    let density = density
        .filter(|d| d.is_finite())
        .unwrap_or(DEFAULT_DENSITY)
        .clamp(0.0, 1.0);
    let stats = with_sim_mut(|s| {
        s.randomize(density);
        s.stats()
    });
    ic_cdk::println!("Randomized at density {}: {} alive", density, stats.alive_total);
    stats
}

#[update]
fn clear() -> StatsView {
    let stats = with_sim_mut(|s| {
        s.clear();
        s.stats()
    });
    ic_cdk::println!("Grid cleared");
    stats
}

// ============================================================================
// EDITING
// ============================================================================

/// Returns false when the edit was not allowed (wrong zone, outside the grid).
#[update]
fn paint_cell(x: u16, y: u16, team: u8) -> bool {
    with_sim_mut(|s| s.paint_cell(x as usize, y as usize, team))
}

/// Returns false for unknown patterns or stamps not fully inside the team's zone.
#[update]
fn place_pattern(x: u16, y: u16, team: u8, pattern: String) -> bool {
    with_sim_mut(|s| s.place_pattern(x as usize, y as usize, team, &pattern))
}

#[update]
fn set_brush_team(team: u8) -> Result<(), String> {
    if with_sim_mut(|s| s.set_brush_team(team)) {
        Ok(())
    } else {
        Err(format!("Invalid team {}: expected 0 (erase) or 1-4", team))
    }
}

#[update]
fn set_active_pattern(pattern: String) -> Result<(), String> {
    if with_sim_mut(|s| s.set_active_pattern(&pattern)) {
        Ok(())
    } else {
        Err(format!("Unknown pattern '{}'", pattern))
    }
}

/// Press with the current brush team and pattern
#[update]
fn apply_brush(x: u16, y: u16) -> bool {
    with_sim_mut(|s| s.apply_brush(x as usize, y as usize))
}

#[update]
fn drag_brush(x: u16, y: u16) -> bool {
    with_sim_mut(|s| s.drag_brush(x as usize, y as usize))
}

// ============================================================================
// QUERY METHODS
// ============================================================================

/// Build full state response
pub fn build_game_state<R: RandomSource>(s: &Simulation<R>) -> GameStateView {
    GameStateView {
        cols: s.cols() as u16,
        rows: s.rows() as u16,
        cells: s.grid().cells().to_vec(),
        generation: s.generation(),
        is_running: s.is_running(),
        speed: s.speed(),
        brush_team: s.brush_team(),
        active_pattern: s.brush_mode().name().to_string(),
        stats: s.stats(),
        last_outcome: s.last_outcome().cloned(),
    }
}

#[query]
fn get_state() -> GameStateView {
    with_sim(|s| build_game_state(s))
}

#[query]
fn get_stats() -> StatsView {
    with_sim(|s| s.stats())
}

#[query]
fn get_cell(x: u16, y: u16) -> Option<u8> {
    with_sim(|s| s.cell(x as usize, y as usize))
}

#[query]
fn get_zone(x: u16, y: u16) -> Option<u8> {
    with_sim(|s| s.zone_of(x as usize, y as usize))
}

#[query]
fn can_place_pattern(x: u16, y: u16, team: u8, pattern: String) -> bool {
    match patterns::lookup(&pattern) {
        Some(p) => with_sim(|s| s.can_place_pattern(x as usize, y as usize, team, p)),
        None => false,
    }
}

#[query]
fn list_patterns() -> Vec<PatternInfo> {
    patterns::catalog()
}

#[query]
fn get_outcome() -> Option<GameOutcome> {
    with_sim(|s| s.last_outcome().cloned())
}

#[query]
fn get_seed_info() -> SeedInfo {
    with_sim(|s| SeedInfo {
        seed_hash: s.rng().seed_hash(),
        draws: s.rng().draws(),
    })
}

/// Simple greeting
#[query]
fn greet(name: String) -> String {
    with_sim(|s| {
        format!(
            "Hello, {}! Welcome to Team Life - four teams on a {}x{} toroidal world.",
            name,
            s.cols(),
            s.rows()
        )
    })
}

// ============================================================================
// TESTS
// ============================================================================

// Tests are in a separate file for cleaner organization
#[cfg(test)]
mod tests;

// Export Candid interface
ic_cdk::export_candid!();
