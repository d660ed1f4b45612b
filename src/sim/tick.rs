//! Timer-driven stepping
//!
//! Hosts feed elapsed time into the session; every timer that falls due in
//! that span fires in deadline order, each callback running to completion
//! before the next one.

use super::difficulty::Difficulty;
use super::events::SessionHooks;
use super::scheduler::TimerKind;
use super::state::Session;

/// Player commands for a single step
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    /// Abandon the current session
    pub reset: bool,
    /// Start a session (ignored while one is running)
    pub start: bool,
    /// Change difficulty
    pub difficulty: Option<Difficulty>,
    /// Tap a grid cell
    pub tap: Option<usize>,
}

impl<H: SessionHooks> Session<H> {
    /// Move virtual time forward by `dt_ms`, firing every due timer
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.scheduler.now_ms().saturating_add(dt_ms);
        while let Some(kind) = self.scheduler.pop_due(until) {
            match kind {
                TimerKind::Countdown => self.tick(),
                TimerKind::Spawn => self.spawn_tick(),
                TimerKind::Expiry { target_id } => self.expire_target(target_id),
            }
        }
        self.scheduler.advance_to(until);
    }

    /// Current virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }
}

/// Turns fractional frame deltas into whole milliseconds without losing time.
///
/// `requestAnimationFrame` reports ~16.667 ms frames; truncating each one
/// would run the game clock slow. The fractional part is carried over.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    carry_ms: f64,
}

/// Slack for float rounding when summing many fractional frames
const CARRY_EPSILON_MS: f64 = 1e-6;

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole milliseconds to advance for a frame of `dt_ms`
    pub fn whole_ms(&mut self, dt_ms: f64) -> u64 {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        self.carry_ms += dt_ms;
        let whole = (self.carry_ms + CARRY_EPSILON_MS).floor();
        self.carry_ms -= whole;
        whole as u64
    }
}

/// Apply one step's commands, then advance the clock
pub fn step<H: SessionHooks>(session: &mut Session<H>, input: &StepInput, dt_ms: u64) {
    if input.reset {
        session.reset();
    }
    if input.start {
        session.start();
    }
    if let Some(difficulty) = input.difficulty {
        session.set_difficulty(difficulty);
    }
    if let Some(cell) = input.tap {
        session.tap(cell);
    }
    session.advance(dt_ms);
}
