//! Browser bridge
//!
//! JavaScript creates a `WebSession`, registers an event callback and calls
//! `advance` from its animation loop. Every engine notification is delivered
//! to the callback as a JSON string (see [`GameEvent`](crate::sim::GameEvent)).

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{EventLog, FrameClock, Session};
use crate::tuning::GameConfig;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// A game session owned by the page
#[wasm_bindgen]
pub struct WebSession {
    session: Session<EventLog>,
    settings: Settings,
    clock: FrameClock,
    on_event: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WebSession {
    /// Create an idle session; `config_json` overrides any game options
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WebSession {
        let config = config_json
            .as_deref()
            .map(GameConfig::from_json_or_default)
            .unwrap_or_default();
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let mut session = Session::new(config, seed, EventLog::new());
        session.set_difficulty(settings.difficulty);
        log::info!("Session created with seed: {}", seed);

        WebSession {
            session,
            settings,
            clock: FrameClock::new(),
            on_event: None,
        }
    }

    /// Register the function that receives engine events
    #[wasm_bindgen(js_name = setEventCallback)]
    pub fn set_event_callback(&mut self, callback: js_sys::Function) {
        self.on_event = Some(callback);
    }

    pub fn start(&mut self) {
        self.session.start();
        self.flush();
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.flush();
    }

    pub fn tap(&mut self, cell: usize) {
        self.session.tap(cell);
        self.flush();
    }

    /// Change difficulty by name and remember it for next visit
    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, name: &str) {
        self.session.set_difficulty_named(name);
        self.settings.difficulty = self.session.difficulty();
        self.settings.save();
        self.flush();
    }

    /// Feed elapsed wall-clock time into the session
    pub fn advance(&mut self, dt_ms: f64) {
        let whole = self.clock.whole_ms(dt_ms);
        if whole > 0 {
            self.session.advance(whole);
            self.flush();
        }
    }

    #[wasm_bindgen(js_name = toggleSound)]
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound();
        self.settings.save();
        enabled
    }

    /// Record which artwork the page could preload
    #[wasm_bindgen(js_name = setAssetCapabilities)]
    pub fn set_asset_capabilities(&mut self, clean_art: bool, obstacle_art: bool) {
        self.settings.assets.clean_art = clean_art;
        self.settings.assets.obstacle_art = obstacle_art;
        self.settings.save();
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_volume(volume);
        self.settings.save();
    }

    /// Cue volume the page should play at (0 when muted)
    pub fn volume(&self) -> f32 {
        self.settings.effective_volume()
    }

    /// Suppress the win celebration and other motion
    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.settings.reduced_motion = reduced;
        self.settings.save();
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    #[wasm_bindgen(js_name = peakScore)]
    pub fn peak_score(&self) -> u32 {
        self.session.peak_score()
    }

    #[wasm_bindgen(js_name = remainingSecs)]
    pub fn remaining_secs(&self) -> u32 {
        self.session.remaining_secs()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    #[wasm_bindgen(js_name = progressPercent)]
    pub fn progress_percent(&self) -> u32 {
        self.session.progress_percent()
    }

    pub fn difficulty(&self) -> String {
        self.session.difficulty().as_str().to_string()
    }

    /// Title of the last finished session ("You win!" / "Try again")
    #[wasm_bindgen(js_name = resultTitle)]
    pub fn result_title(&self) -> Option<String> {
        self.session.last_outcome().map(|o| o.title().to_string())
    }

    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_default()
    }

    /// Forward recorded events to the page, in order
    fn flush(&mut self) {
        let events = self.session.hooks_mut().drain();
        let Some(callback) = &self.on_event else {
            return;
        };
        for event in events {
            let event = self.settings.present(event);
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Failed to encode event {:?}: {}", event, e);
                    continue;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::warn!("Event callback threw: {:?}", e);
            }
        }
    }
}
