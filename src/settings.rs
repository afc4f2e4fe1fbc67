//! Game balance and tuning
//!
//! Every constant the simulation reads lives here so a run can be re-tuned
//! from JSON without recompiling. Missing fields fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::GameMode;

/// Error returned when tuning data cannot be used
#[derive(Debug)]
pub enum SettingsError {
    /// JSON was malformed or had the wrong shape
    Parse(serde_json::Error),
    /// JSON parsed but describes an unplayable configuration
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(e) => write!(f, "could not parse settings: {}", e),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Difficulty curve parameters for one game mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Scroll speed at score 0 (units per nominal frame)
    pub base_speed: f32,
    /// Speed gained per point of score
    pub speed_per_point: f32,
    /// Speed ceiling
    pub max_speed: f32,
    /// Spawns per second at score 0
    pub base_frequency: f32,
    /// Spawn frequency gained per point of score
    pub frequency_per_point: f32,
    /// Spawn frequency ceiling
    pub max_frequency: f32,
    /// Points needed per difficulty level (None = level never rises)
    pub level_step: Option<f64>,
}

impl CurveParams {
    /// Constant speed, distance-gated curve of the single-mode game
    pub const CLASSIC: Self = Self {
        base_speed: 4.0,
        speed_per_point: 0.0,
        max_speed: 4.0,
        base_frequency: 1.0,
        frequency_per_point: 0.0,
        max_frequency: 1.0,
        level_step: None,
    };

    pub const MARATHON: Self = Self {
        base_speed: 4.0,
        speed_per_point: 0.05,
        max_speed: 8.0,
        base_frequency: 0.8,
        frequency_per_point: 0.01,
        max_frequency: 1.6,
        level_step: Some(15.0),
    };

    pub const CHALLENGE: Self = Self {
        base_speed: 5.0,
        speed_per_point: 0.12,
        max_speed: 12.0,
        base_frequency: 1.0,
        frequency_per_point: 0.03,
        max_frequency: 2.5,
        level_step: Some(8.0),
    };

    fn validate(&self, mode: GameMode) -> Result<(), SettingsError> {
        let name = mode.as_str();
        if self.base_speed <= 0.0 || self.max_speed < self.base_speed {
            return Err(SettingsError::Invalid(format!(
                "{}: speed must be positive with max_speed >= base_speed",
                name
            )));
        }
        if self.base_frequency <= 0.0 || self.max_frequency < self.base_frequency {
            return Err(SettingsError::Invalid(format!(
                "{}: frequency must be positive with max_frequency >= base_frequency",
                name
            )));
        }
        if self.speed_per_point < 0.0 || self.frequency_per_point < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "{}: difficulty can only ramp up",
                name
            )));
        }
        if matches!(self.level_step, Some(step) if step <= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "{}: level_step must be positive",
                name
            )));
        }
        Ok(())
    }
}

/// Full tuning for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Character ===
    pub character_x: f32,
    pub character_width: f32,
    pub character_height: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    /// Fraction of `jump_strength` applied by the double jump
    pub double_jump_factor: f32,

    // === Obstacles ===
    pub min_obstacle_distance: f32,
    /// Classic obstacle heights, drawn uniformly (inclusive)
    pub classic_height_range: (u32, u32),
    /// Below this score only standard obstacles spawn
    pub on_ramp_score: f64,
    /// A kind drawn this many times in a row is excluded from the next draw
    pub max_same_kind_streak: u32,

    // === Loop ===
    /// Ticks shorter than this are folded into the next one (0 = off)
    pub min_frame_ms: f32,
    /// Mode started by the confirm (jump) input on the menu
    pub default_mode: GameMode,

    // === Curves ===
    pub classic: CurveParams,
    pub marathon: CurveParams,
    pub challenge: CurveParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            character_x: CHARACTER_X,
            character_width: CHARACTER_WIDTH,
            character_height: CHARACTER_HEIGHT,
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            double_jump_factor: 1.0,

            min_obstacle_distance: MIN_OBSTACLE_DISTANCE,
            classic_height_range: (CLASSIC_MIN_OBSTACLE_HEIGHT, CLASSIC_MAX_OBSTACLE_HEIGHT),
            on_ramp_score: 5.0,
            max_same_kind_streak: 3,

            min_frame_ms: 0.0,
            default_mode: GameMode::Classic,

            classic: CurveParams::CLASSIC,
            marathon: CurveParams::MARATHON,
            challenge: CurveParams::CHALLENGE,
        }
    }
}

impl Settings {
    /// Parse tuning from JSON and check it is playable
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize tuning to pretty JSON
    pub fn to_json(&self) -> String {
        // Plain data with string keys only; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Curve parameters for a mode
    pub fn curve(&self, mode: GameMode) -> &CurveParams {
        match mode {
            GameMode::Classic => &self.classic,
            GameMode::Marathon => &self.marathon,
            GameMode::Challenge => &self.challenge,
        }
    }

    /// Highest point a single jump reaches above the ground
    pub fn max_jump_height(&self) -> f32 {
        crate::max_jump_height(self.jump_strength, self.gravity)
    }

    /// Reject configurations that cannot produce a playable run
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(SettingsError::Invalid("field must have a positive size".into()));
        }
        if self.character_width <= 0.0
            || self.character_height <= 0.0
            || self.character_height >= self.field_height
        {
            return Err(SettingsError::Invalid(
                "character must be positive and fit in the field".into(),
            ));
        }
        if self.gravity <= 0.0 || self.jump_strength <= 0.0 {
            return Err(SettingsError::Invalid(
                "gravity and jump_strength must be positive".into(),
            ));
        }
        if self.double_jump_factor <= 0.0 || self.double_jump_factor > 1.0 {
            return Err(SettingsError::Invalid(
                "double_jump_factor must be in (0, 1]".into(),
            ));
        }
        let (lo, hi) = self.classic_height_range;
        if lo == 0 || lo > hi {
            return Err(SettingsError::Invalid(
                "classic_height_range must be a non-empty positive range".into(),
            ));
        }
        if self.min_obstacle_distance <= 0.0 {
            return Err(SettingsError::Invalid(
                "min_obstacle_distance must be positive".into(),
            ));
        }
        if self.max_same_kind_streak == 0 {
            return Err(SettingsError::Invalid(
                "max_same_kind_streak must be at least 1".into(),
            ));
        }
        if self.min_frame_ms < 0.0 {
            return Err(SettingsError::Invalid("min_frame_ms cannot be negative".into()));
        }
        for mode in GameMode::ALL {
            self.curve(mode).validate(mode)?;
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hop_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
