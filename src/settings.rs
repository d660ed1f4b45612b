//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web. The engine only reads the preferred
//! difficulty; everything else is handed to the renderer and sound layer.

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, GameEvent};

/// Which branded artwork the page managed to load.
///
/// When a flag is false the renderer draws its built-in fallback shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCapabilities {
    /// Clean can image available
    pub clean_art: bool,
    /// Dirty can image available
    pub obstacle_art: bool,
}

impl Default for AssetCapabilities {
    fn default() -> Self {
        Self {
            clean_art: true,
            obstacle_art: true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty selected on the last visit
    pub difficulty: Difficulty,

    // === Audio ===
    /// Play pop/bad/start/win cues
    pub sound_enabled: bool,
    /// Cue volume (0.0 - 1.0)
    pub volume: f32,

    // === Accessibility ===
    /// Skip confetti and pulse animations
    pub reduced_motion: bool,

    /// Artwork availability, filled in by the page after preloading
    pub assets: AssetCapabilities,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound_enabled: true,
            volume: 0.9,
            reduced_motion: false,
            assets: AssetCapabilities::default(),
        }
    }
}

impl Settings {
    /// Flip sound on/off, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Set cue volume, clamped to 0.0 - 1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Effective cue volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether the win celebration should actually animate
    pub fn effective_celebration(&self, celebrate: bool) -> bool {
        celebrate && !self.reduced_motion
    }

    /// Adjust an engine event for these preferences before the page sees it
    pub fn present(&self, event: GameEvent) -> GameEvent {
        match event {
            GameEvent::SessionEnded {
                is_win,
                message,
                celebrate,
            } => GameEvent::SessionEnded {
                is_win,
                message,
                celebrate: self.effective_celebration(celebrate),
            },
            other => other,
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "jerry_dash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "difficulty": "master", "assets": { "obstacle_art": false } }"#)
                .unwrap();
        assert_eq!(settings.difficulty, Difficulty::Master);
        assert!(settings.sound_enabled);
        assert!(settings.assets.clean_art);
        assert!(!settings.assets.obstacle_art);
    }

    #[test]
    fn test_toggle_sound_mutes() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effective_volume(), 0.0);
        assert!(settings.toggle_sound());
        assert!(settings.effective_volume() > 0.0);
    }

    #[test]
    fn test_set_volume_clamps() {
        let mut settings = Settings::default();
        settings.set_volume(1.7);
        assert_eq!(settings.effective_volume(), 1.0);
        settings.set_volume(-0.2);
        assert_eq!(settings.effective_volume(), 0.0);
        settings.set_volume(f32::NAN);
        assert_eq!(settings.volume, 0.0);
    }

    #[test]
    fn test_present_masks_celebration_under_reduced_motion() {
        let ended = GameEvent::SessionEnded {
            is_win: true,
            message: "win".to_string(),
            celebrate: true,
        };
        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(
            calm.present(ended.clone()),
            GameEvent::SessionEnded {
                is_win: true,
                message: "win".to_string(),
                celebrate: false,
            }
        );
        assert_eq!(Settings::default().present(ended.clone()), ended);
        let tick = GameEvent::TimeChanged { remaining_secs: 4 };
        assert_eq!(calm.present(tick.clone()), tick);
    }

    #[test]
    fn test_reduced_motion_suppresses_celebration() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_celebration(true));
        assert!(Settings::default().effective_celebration(true));
        assert!(!Settings::default().effective_celebration(false));
    }
}
