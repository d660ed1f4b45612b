//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (hosts feed elapsed milliseconds)
//! - Seeded RNG only
//! - Timers sharing a deadline fire in scheduling order
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod events;
pub mod grid;
pub mod outcome;
pub mod scheduler;
pub mod scoring;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, DifficultyProfile, DifficultyProfiles};
pub use events::{EventLog, GameEvent, SessionHooks};
pub use grid::{Grid, Target, TargetKind};
pub use outcome::{Outcome, resolve};
pub use scheduler::{Scheduler, TimerKind};
pub use scoring::{Milestone, MilestoneTable, TapOutcome, resolve_tap};
pub use state::{Session, SessionPhase};
pub use tick::{FrameClock, StepInput, step};
