//! Jerry Dash - A timed tap-the-target arcade game
//!
//! Core modules:
//! - `sim`: Deterministic session engine (grid, scheduler, scoring, outcome)
//! - `tuning`: Data-driven game configuration
//! - `settings`: Player preferences
//! - `platform`: Browser bridge (wasm32 only)

pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use sim::{Difficulty, EventLog, GameEvent, Session, SessionHooks, SessionPhase};
pub use tuning::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Session length in seconds
    pub const SESSION_DURATION_SECS: u32 = 30;
    /// Score needed at the end of the session to win
    pub const WIN_THRESHOLD: u32 = 10;
    /// Points deducted for tapping an obstacle
    pub const PENALTY_AMOUNT: u32 = 2;

    /// Number of grid cells (3x3 layout)
    pub const GRID_CELLS: usize = 9;

    /// Countdown period (one second of game time)
    pub const COUNTDOWN_PERIOD_MS: u64 = 1000;

    /// How long an achievement banner stays up
    pub const ACHIEVEMENT_MS: u32 = 1200;
    /// How long the start banner stays up
    pub const START_MESSAGE_MS: u32 = 1000;
}

/// Percentage of the way from zero to `threshold`, capped at 100
#[inline]
pub fn progress_percent(score: u32, threshold: u32) -> u32 {
    if threshold == 0 {
        return 100;
    }
    let pct = (f64::from(score) / f64::from(threshold) * 100.0).round() as u32;
    pct.min(100)
}
