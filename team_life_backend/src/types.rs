use candid::{CandidType, Deserialize};
use serde::Serialize;

// =============================================================================
// CONSTANTS
// =============================================================================

/// 800x600 canvas at 10px per cell
pub const DEFAULT_COLS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 60;
pub const MIN_DIMENSION: u16 = 2;
/// Keeps both buffers small and the `get_state` reply well under the query limit
pub const MAX_DIMENSION: u16 = 512;

pub const DEAD: u8 = 0;
pub const TEAM_COUNT: usize = 4;
/// Slot 0 is the dead tally, slots 1-4 are teams
pub const TALLY_SLOTS: usize = TEAM_COUNT + 1;

pub const DEFAULT_DENSITY: f64 = 0.2;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 20;
pub const DEFAULT_SPEED: u8 = 10;
pub const FRAME_RATE: u64 = 60;

/// Sentinel for single-cell brush mode
pub const NO_PATTERN: &str = "none";

// =============================================================================
// CONFIG
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default)]
pub struct GameConfig {
    pub cols: u16,
    pub rows: u16,
    /// Fixed seed for reproducible tie-breaks and randomize
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Resolve to usable dimensions: either side too small falls back to the defaults,
    /// sides above `MAX_DIMENSION` are clamped to it.
    pub fn dimensions(&self) -> (usize, usize) {
        if self.cols < MIN_DIMENSION || self.rows < MIN_DIMENSION {
            return (DEFAULT_COLS as usize, DEFAULT_ROWS as usize);
        }
        (
            self.cols.min(MAX_DIMENSION) as usize,
            self.rows.min(MAX_DIMENSION) as usize,
        )
    }
}

// =============================================================================
// GAME END
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// Generation N+1 equals generation N
    Static,
    /// Generation N+2 equals generation N
    Oscillation,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Team(u8),
    Draw,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub reason: EndReason,
    pub winner: Winner,
    pub generation: u64,
}

// =============================================================================
// API RESPONSE TYPES
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct StepReport {
    pub generation: u64,
    pub alive_total: u32,
    pub outcome: Option<GameOutcome>,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StatsView {
    pub generation: u64,
    pub team_counts: Vec<u32>, // 4 values: [T1, T2, T3, T4]
    pub alive_total: u32,
    pub percentages: Vec<f64>, // 4 values, one decimal
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct GameStateView {
    pub cols: u16,
    pub rows: u16,
    /// Row-major, one byte per cell: 0 = dead, 1-4 = team
    pub cells: Vec<u8>,
    pub generation: u64,
    pub is_running: bool,
    pub speed: u8,
    pub brush_team: u8,
    pub active_pattern: String,
    pub stats: StatsView,
    pub last_outcome: Option<GameOutcome>,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct PatternInfo {
    pub name: String,
    pub width: u8,
    pub height: u8,
    pub mask: Vec<Vec<u8>>,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct SeedInfo {
    pub seed_hash: String,
    /// Random draws taken from the current seed
    pub draws: u64,
}
