//! Session state machine
//!
//! A [`Session`] owns everything a run touches: score, clock, grid, timers and
//! RNG. All mutation goes through its transition methods, which are total:
//! calls that make no sense in the current phase are ignored.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::{Difficulty, DifficultyProfile};
use super::events::SessionHooks;
use super::grid::{Grid, Target, TargetKind};
use super::outcome::{self, Outcome};
use super::scheduler::Scheduler;
use super::scoring::resolve_tap;
use crate::tuning::{ExpiryPolicy, GameConfig};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Not started, or reset
    #[default]
    Idle,
    /// Countdown and spawns are live
    Running,
    /// Time ran out; outcome available
    Ended,
}

/// One timed play-through
#[derive(Debug)]
pub struct Session<H: SessionHooks = ()> {
    config: GameConfig,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    phase: SessionPhase,
    score: u32,
    peak_score: u32,
    remaining_secs: u32,
    shown_milestones: BTreeSet<u32>,
    grid: Grid,
    pub(super) scheduler: Scheduler,
    rng: Pcg32,
    next_target_id: u32,
    last_outcome: Option<Outcome>,
    hooks: H,
}

impl<H: SessionHooks> Session<H> {
    /// Create an idle session. `seed` drives every random choice.
    pub fn new(config: GameConfig, seed: u64, hooks: H) -> Self {
        let config = config.sanitized();
        let difficulty = Difficulty::default();
        Self {
            profile: config.difficulty_profiles.get(difficulty),
            difficulty,
            phase: SessionPhase::Idle,
            score: 0,
            peak_score: 0,
            remaining_secs: config.session_duration_secs,
            shown_milestones: BTreeSet::new(),
            grid: Grid::new(config.grid_cells),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_target_id: 1,
            last_outcome: None,
            hooks,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn peak_score(&self) -> u32 {
        self.peak_score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.profile
    }

    pub fn shown_milestones(&self) -> &BTreeSet<u32> {
        &self.shown_milestones
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Result of the most recent finished session
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// HUD progress toward the win threshold (0-100)
    pub fn progress_percent(&self) -> u32 {
        crate::progress_percent(self.score, self.config.win_threshold)
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Begin a new run from `Idle` or `Ended`
    pub fn start(&mut self) {
        if self.is_running() {
            log::debug!("start() ignored: session already running");
            return;
        }

        self.scheduler.cancel_all();
        self.clear_targets();
        self.score = 0;
        self.peak_score = 0;
        self.remaining_secs = self.config.session_duration_secs;
        self.shown_milestones.clear();
        self.last_outcome = None;
        self.phase = SessionPhase::Running;

        log::info!(
            "Session started: {}s on {}, goal {}",
            self.remaining_secs,
            self.difficulty.as_str(),
            self.config.win_threshold
        );

        self.hooks.on_score_changed(0, 0);
        self.hooks.on_time_changed(self.remaining_secs);
        self.scheduler.arm_countdown();
        self.spawn_tick();
        let start_ms = self.config.start_message_ms;
        self.hooks.on_achievement(&self.config.messages.start, start_ms);
    }

    /// One second of countdown
    pub fn tick(&mut self) {
        if !self.is_running() {
            log::debug!("tick() ignored: session not running");
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.hooks.on_time_changed(self.remaining_secs);
        if self.remaining_secs == 0 {
            self.end();
        }
    }

    /// Pop up a new target and schedule the next spawn
    pub fn spawn_tick(&mut self) {
        if !self.is_running() {
            log::debug!("spawn_tick() ignored: session not running");
            return;
        }

        // Only one target is ever live; a leftover one is retired first
        for stale in self.clear_targets() {
            log::debug!("Target {} replaced before expiry", stale.id);
        }

        if let Some(cell) = self.grid.choose_cell(&mut self.rng) {
            let kind = if self.profile.roll_obstacle(&mut self.rng) {
                TargetKind::Obstacle
            } else {
                TargetKind::Normal
            };
            let id = self.next_target_id;
            self.next_target_id = self.next_target_id.wrapping_add(1);

            self.grid.place(Target {
                id,
                cell,
                kind,
                created_at_ms: self.scheduler.now_ms(),
            });
            self.scheduler
                .schedule_expiry(id, u64::from(self.profile.target_visible_ms));
            log::debug!("Spawned {kind:?} target {id} in cell {cell}");
            self.hooks.on_target_spawned(cell, kind);
        }

        let delay = self.profile.next_spawn_delay(&mut self.rng);
        self.scheduler.arm_spawn(delay);
    }

    /// A target's visibility window ran out
    pub fn expire_target(&mut self, target_id: u32) {
        if !self.is_running() {
            log::debug!("expire_target({target_id}) ignored: session not running");
            return;
        }
        let Some(target) = self.grid.take_by_id(target_id) else {
            log::debug!("expire_target({target_id}) ignored: target already gone");
            return;
        };
        self.hooks.on_target_removed(target.cell);

        if let ExpiryPolicy::TimePenalty { seconds } = self.config.expiry_policy
            && target.kind == TargetKind::Normal
            && seconds > 0
        {
            self.remaining_secs = self.remaining_secs.saturating_sub(seconds);
            log::debug!("Missed target {target_id}: -{seconds}s");
            self.hooks.on_time_changed(self.remaining_secs);
            if self.remaining_secs == 0 {
                self.end();
            }
        }
    }

    /// Player tapped `cell`
    pub fn tap(&mut self, cell: usize) {
        if !self.is_running() {
            log::debug!("tap({cell}) ignored: session not running");
            return;
        }
        // Taking the target out of the grid is what makes a second tap a no-op
        let Some(target) = self.grid.take(cell) else {
            log::debug!("tap({cell}) ignored: no live target");
            return;
        };
        self.scheduler.cancel_expiry(target.id);

        let result = resolve_tap(
            target.kind,
            self.score,
            self.config.penalty_amount,
            &self.config.milestones,
            &self.shown_milestones,
            &self.config.messages,
        );
        self.score = result.apply(self.score);
        self.peak_score = self.peak_score.max(self.score);
        if let Some(threshold) = result.milestone {
            self.shown_milestones.insert(threshold);
            log::info!("Milestone {threshold} reached");
        }
        log::debug!(
            "Tapped {:?} target {} in cell {cell}: score {} ({:+})",
            target.kind,
            target.id,
            self.score,
            result.score_delta
        );

        self.hooks.on_target_removed(cell);
        self.hooks.on_score_changed(self.score, result.score_delta);
        self.hooks
            .on_achievement(&result.message, self.config.achievement_ms);
    }

    /// Switch difficulty. A running session re-times its pending spawn;
    /// the countdown and live target expiries are left alone.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = self.config.difficulty_profiles.get(difficulty);
        log::info!("Difficulty set to {}", difficulty.as_str());

        if self.is_running() {
            let delay = self.profile.next_spawn_delay(&mut self.rng);
            self.scheduler.arm_spawn(delay);
        }
    }

    /// Switch difficulty by name; unknown names select `Normal`
    pub fn set_difficulty_named(&mut self, name: &str) {
        self.set_difficulty(Difficulty::parse_or_default(name));
    }

    /// Finish the running session and report the outcome
    pub fn end(&mut self) {
        if !self.is_running() {
            log::debug!("end() ignored: session not running");
            return;
        }
        self.phase = SessionPhase::Ended;
        self.scheduler.cancel_all();
        self.clear_targets();

        let result = outcome::resolve(
            self.score,
            self.peak_score,
            self.config.win_threshold,
            &self.config.messages,
            &mut self.rng,
        );
        log::info!(
            "Session ended: score {} (peak {}), {}",
            result.final_score,
            result.peak_score,
            result.title()
        );
        self.hooks
            .on_session_ended(result.is_win, &result.message, result.celebrate);
        self.last_outcome = Some(result);
    }

    /// Abandon whatever is happening and go back to `Idle`
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.clear_targets();
        self.score = 0;
        self.peak_score = 0;
        self.remaining_secs = 0;
        self.shown_milestones.clear();
        self.last_outcome = None;
        self.phase = SessionPhase::Idle;
        log::info!("Session reset");

        self.hooks.on_score_changed(0, 0);
        self.hooks.on_time_changed(0);
    }

    /// Remove every live target, cancelling expiries and notifying the renderer
    fn clear_targets(&mut self) -> Vec<Target> {
        let cleared = self.grid.clear();
        for target in &cleared {
            self.scheduler.cancel_expiry(target.id);
            self.hooks.on_target_removed(target.cell);
        }
        cleared
    }
}
