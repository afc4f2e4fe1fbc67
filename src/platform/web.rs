//! Browser bridge
//!
//! Exposes a `WebGame` to JavaScript. The page owns the canvas, the
//! requestAnimationFrame loop and DOM events; it forwards them here and
//! draws from `snapshot_json`.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{GameMode, Session};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// High scores in LocalStorage, one key per mode
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&self, mode: GameMode) -> u64 {
        let Some(storage) = Self::storage() else {
            return 0;
        };
        match storage.get_item(mode.storage_key()) {
            Ok(Some(raw)) => match raw.trim().parse::<f64>() {
                // Older saves stored the fractional score
                Ok(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
                Ok(_) => 0,
                Err(_) => {
                    log::warn!("Ignoring unreadable high score {:?} for {}", raw, mode.as_str());
                    0
                }
            },
            _ => 0,
        }
    }

    fn save(&mut self, mode: GameMode, score: u64) {
        if let Some(storage) = Self::storage() {
            if storage
                .set_item(mode.storage_key(), &score.to_string())
                .is_err()
            {
                log::warn!("Could not save {} high score", mode.as_str());
            } else {
                log::info!("High score saved ({}: {})", mode.as_str(), score);
            }
        }
    }
}

/// Game handle owned by the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `settings_json` overrides stored tuning when given
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Settings::load(),
        };
        let seed = js_sys::Date::now() as u64;
        Ok(WebGame {
            session: Session::new(seed, settings, LocalStorageStore),
        })
    }

    /// Advance by the time since the previous animation frame
    pub fn tick(&mut self, elapsed_ms: f32) -> bool {
        self.session.tick(elapsed_ms)
    }

    /// Space bar / tap
    pub fn jump(&mut self) {
        self.session.jump();
    }

    /// Click or touch at logical coordinates; true if a button was hit
    pub fn select(&mut self, x: f32, y: f32) -> bool {
        self.session.select(x, y).is_some()
    }

    /// Start a run by mode name ("classic", "marathon", "challenge")
    pub fn select_mode(&mut self, mode: &str) -> bool {
        match mode.parse::<GameMode>() {
            Ok(mode) => {
                self.session.select_mode(mode);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn return_to_menu(&mut self) {
        self.session.return_to_menu();
    }

    /// Current frame for the renderer
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    /// Events since the last call (sound/HUD cues)
    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }
}
