//! Data-driven game configuration
//!
//! Every option has a default, so a config document only needs the fields it
//! changes. Loaded values go through [`GameConfig::sanitized`] before a
//! session uses them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{DifficultyProfiles, MilestoneTable};

/// What happens when a target disappears without being tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Missed targets cost nothing
    #[default]
    None,
    /// Missed normal targets take seconds off the clock
    TimePenalty { seconds: u32 },
}

/// Player-facing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub win: Vec<String>,
    pub lose: Vec<String>,
    /// Shown for an ordinary hit
    pub hit: String,
    /// Name of the obstacle in the penalty notice
    pub penalty_label: String,
    /// Shown when a session starts
    pub start: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            win: vec![
                "You brought clean water to many!".to_string(),
                "Champion — wells of hope!".to_string(),
                "Amazing — communities celebrate!".to_string(),
            ],
            lose: vec![
                "Almost there — try again!".to_string(),
                "Not enough drops — give it another shot!".to_string(),
                "Keep trying — clean water needs you!".to_string(),
            ],
            hit: "+1".to_string(),
            penalty_label: "dirty can".to_string(),
            start: "Game started — tap the yellow cans!".to_string(),
        }
    }
}

impl Messages {
    /// e.g. `-2 (dirty can)`
    pub fn penalty_notice(&self, penalty: u32) -> String {
        format!("-{} ({})", penalty, self.penalty_label)
    }
}

/// All recognized game options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Countdown length in seconds
    pub session_duration_secs: u32,
    /// Final score needed to win
    pub win_threshold: u32,
    /// Points lost for tapping an obstacle
    pub penalty_amount: u32,
    /// Number of grid cells
    pub grid_cells: usize,
    /// How long achievement banners stay up
    pub achievement_ms: u32,
    /// How long the start banner stays up
    pub start_message_ms: u32,
    pub difficulty_profiles: DifficultyProfiles,
    pub milestones: MilestoneTable,
    pub messages: Messages,
    pub expiry_policy: ExpiryPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            session_duration_secs: SESSION_DURATION_SECS,
            win_threshold: WIN_THRESHOLD,
            penalty_amount: PENALTY_AMOUNT,
            grid_cells: GRID_CELLS,
            achievement_ms: ACHIEVEMENT_MS,
            start_message_ms: START_MESSAGE_MS,
            difficulty_profiles: DifficultyProfiles::default(),
            milestones: MilestoneTable::new([
                (5, "Great start — 5 cans!"),
                (10, "Awesome — 10 cans!"),
                (15, "Incredible — 15 cans!"),
            ]),
            messages: Messages::default(),
            expiry_policy: ExpiryPolicy::None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse a JSON config document, falling back to defaults if it is malformed
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid game config ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Repair values the engine cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.session_duration_secs == 0 {
            log::warn!("session_duration_secs must be positive, using {SESSION_DURATION_SECS}");
            self.session_duration_secs = SESSION_DURATION_SECS;
        }
        if self.grid_cells == 0 {
            log::warn!("grid_cells must be positive, using {GRID_CELLS}");
            self.grid_cells = GRID_CELLS;
        }
        // Scores only rise by reaching a value above the previous one, so 0 is never crossed
        if let Some(message) = self.milestones.remove(0) {
            log::warn!("Milestone at score 0 can never be reached, dropping {message:?}");
        }
        self.difficulty_profiles = self.difficulty_profiles.sanitized();
        self
    }
}
