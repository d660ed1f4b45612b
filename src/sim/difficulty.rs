//! Difficulty levels and their timing profiles

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Master,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Master => "master",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "master" | "hard" => Some(Difficulty::Master),
            _ => None,
        }
    }

    /// Parse a difficulty name, falling back to `Normal` for unknown keys
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using {}", s, Difficulty::Normal.as_str());
            Difficulty::Normal
        })
    }
}

/// Timing and probability parameters for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Shortest delay between spawns (ms)
    pub spawn_interval_min_ms: u32,
    /// Longest delay between spawns (ms, inclusive)
    pub spawn_interval_max_ms: u32,
    /// How long a target stays up if nobody taps it (ms).
    ///
    /// The next spawn always retires the live target, so when this exceeds
    /// the spawn interval the target is gone at the next spawn instead.
    pub target_visible_ms: u32,
    /// Probability that a spawned target is an obstacle, in [0, 1)
    pub obstacle_chance: f64,
}

/// Largest obstacle chance a profile may carry
const MAX_OBSTACLE_CHANCE: f64 = 0.99;

impl DifficultyProfile {
    pub const EASY: Self = Self {
        spawn_interval_min_ms: 800,
        spawn_interval_max_ms: 1300,
        target_visible_ms: 1200,
        obstacle_chance: 0.10,
    };

    pub const NORMAL: Self = Self {
        spawn_interval_min_ms: 600,
        spawn_interval_max_ms: 1000,
        target_visible_ms: 900,
        obstacle_chance: 0.18,
    };

    pub const MASTER: Self = Self {
        spawn_interval_min_ms: 350,
        spawn_interval_max_ms: 700,
        target_visible_ms: 700,
        obstacle_chance: 0.28,
    };

    /// Draw the delay until the next spawn, uniform over the inclusive bounds
    pub fn next_spawn_delay<R: Rng>(&self, rng: &mut R) -> u64 {
        u64::from(rng.random_range(self.spawn_interval_min_ms..=self.spawn_interval_max_ms))
    }

    /// Roll whether the next target is an obstacle
    pub fn roll_obstacle<R: Rng>(&self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.obstacle_chance
    }

    /// Repair out-of-range values; `name` labels the warnings
    pub fn sanitized(mut self, name: &str) -> Self {
        if self.spawn_interval_min_ms == 0 {
            log::warn!("{name}: spawn_interval_min_ms must be positive, using 1");
            self.spawn_interval_min_ms = 1;
        }
        if self.spawn_interval_max_ms < self.spawn_interval_min_ms {
            log::warn!(
                "{name}: spawn interval bounds inverted ({} > {}), swapping",
                self.spawn_interval_min_ms,
                self.spawn_interval_max_ms
            );
            std::mem::swap(&mut self.spawn_interval_min_ms, &mut self.spawn_interval_max_ms);
            self.spawn_interval_min_ms = self.spawn_interval_min_ms.max(1);
        }
        if self.target_visible_ms == 0 {
            log::warn!("{name}: target_visible_ms must be positive, using 1");
            self.target_visible_ms = 1;
        }
        if !(0.0..1.0).contains(&self.obstacle_chance) {
            let clamped = if self.obstacle_chance.is_nan() {
                0.0
            } else {
                self.obstacle_chance.clamp(0.0, MAX_OBSTACLE_CHANCE)
            };
            log::warn!(
                "{name}: obstacle_chance {} outside [0, 1), using {clamped}",
                self.obstacle_chance
            );
            self.obstacle_chance = clamped;
        }
        self
    }
}

/// A profile as written in a config file; absent fields keep the built-in value
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct ProfileOverrides {
    spawn_interval_min_ms: Option<u32>,
    spawn_interval_max_ms: Option<u32>,
    target_visible_ms: Option<u32>,
    obstacle_chance: Option<f64>,
}

impl ProfileOverrides {
    fn over(self, base: DifficultyProfile) -> DifficultyProfile {
        DifficultyProfile {
            spawn_interval_min_ms: self.spawn_interval_min_ms.unwrap_or(base.spawn_interval_min_ms),
            spawn_interval_max_ms: self.spawn_interval_max_ms.unwrap_or(base.spawn_interval_max_ms),
            target_visible_ms: self.target_visible_ms.unwrap_or(base.target_visible_ms),
            obstacle_chance: self.obstacle_chance.unwrap_or(base.obstacle_chance),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct ProfilesDoc {
    easy: ProfileOverrides,
    normal: ProfileOverrides,
    master: ProfileOverrides,
}

impl From<ProfilesDoc> for DifficultyProfiles {
    fn from(doc: ProfilesDoc) -> Self {
        Self {
            easy: doc.easy.over(DifficultyProfile::EASY),
            normal: doc.normal.over(DifficultyProfile::NORMAL),
            master: doc.master.over(DifficultyProfile::MASTER),
        }
    }
}

/// Profiles for every difficulty level.
///
/// Deserializes field by field: a config may override a single value of one
/// level and everything else keeps the built-in tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfilesDoc")]
pub struct DifficultyProfiles {
    pub easy: DifficultyProfile,
    pub normal: DifficultyProfile,
    pub master: DifficultyProfile,
}

impl Default for DifficultyProfiles {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::EASY,
            normal: DifficultyProfile::NORMAL,
            master: DifficultyProfile::MASTER,
        }
    }
}

impl DifficultyProfiles {
    pub fn get(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Master => self.master,
        }
    }

    /// Look up a profile by name; unknown names get the `Normal` profile
    pub fn by_name(&self, name: &str) -> DifficultyProfile {
        self.get(Difficulty::parse_or_default(name))
    }

    pub fn sanitized(self) -> Self {
        Self {
            easy: self.easy.sanitized("easy"),
            normal: self.normal.sanitized("normal"),
            master: self.master.sanitized("master"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_parse_names() {
        assert_eq!(Difficulty::from_str("Master"), Some(Difficulty::Master));
        assert_eq!(Difficulty::from_str(" easy "), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::parse_or_default("nightmare"), Difficulty::Normal);
    }

    #[test]
    fn test_unknown_name_gets_normal_profile() {
        let profiles = DifficultyProfiles::default();
        assert_eq!(profiles.by_name("bogus"), DifficultyProfile::NORMAL);
        assert_eq!(profiles.by_name("master"), DifficultyProfile::MASTER);
    }

    #[test]
    fn test_single_field_override_keeps_builtins() {
        let profiles: DifficultyProfiles =
            serde_json::from_str(r#"{ "master": { "obstacle_chance": 0.3 } }"#).unwrap();
        assert_eq!(
            profiles.master,
            DifficultyProfile {
                obstacle_chance: 0.3,
                ..DifficultyProfile::MASTER
            }
        );
        assert_eq!(profiles.easy, DifficultyProfile::EASY);
        assert_eq!(profiles.normal, DifficultyProfile::NORMAL);
    }

    #[test]
    fn test_spawn_delay_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let profile = DifficultyProfile::MASTER;
        for _ in 0..500 {
            let delay = profile.next_spawn_delay(&mut rng);
            assert!((350..=700).contains(&delay), "delay {delay} out of range");
        }
    }

    #[test]
    fn test_sanitized_repairs_profile() {
        let broken = DifficultyProfile {
            spawn_interval_min_ms: 900,
            spawn_interval_max_ms: 300,
            target_visible_ms: 0,
            obstacle_chance: 1.5,
        }
        .sanitized("test");
        assert_eq!(broken.spawn_interval_min_ms, 300);
        assert_eq!(broken.spawn_interval_max_ms, 900);
        assert_eq!(broken.target_visible_ms, 1);
        assert!(broken.obstacle_chance < 1.0);
    }

    #[test]
    fn test_zero_obstacle_chance_never_rolls() {
        let mut rng = Pcg32::seed_from_u64(1);
        let profile = DifficultyProfile {
            obstacle_chance: 0.0,
            ..DifficultyProfile::NORMAL
        };
        assert!((0..200).all(|_| !profile.roll_obstacle(&mut rng)));
    }
}
