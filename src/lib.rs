//! Hop Runner - An endless-runner game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, difficulty, game state)
//! - `highscores`: Per-mode high score table and storage back-ends
//! - `settings`: Data-driven game balance
//! - `platform`: Browser bridge (wasm32 only)

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreStore, HighScores, MemoryStore};
pub use settings::{Settings, SettingsError};
pub use sim::{GameMode, GamePhase, Session, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Nominal frame length every motion is normalized against (60 fps)
    pub const FRAME_MS: f32 = 16.0;

    /// Logical playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Character defaults
    pub const CHARACTER_X: f32 = 50.0;
    pub const CHARACTER_WIDTH: f32 = 30.0;
    pub const CHARACTER_HEIGHT: f32 = 30.0;

    /// Downward acceleration per nominal frame
    pub const GRAVITY: f32 = 0.4;
    /// Upward velocity applied by a jump
    pub const JUMP_STRENGTH: f32 = 10.0;

    /// Horizontal gap the distance gate waits for before the next obstacle
    pub const MIN_OBSTACLE_DISTANCE: f32 = 300.0;
    /// Classic obstacle height range (inclusive)
    pub const CLASSIC_MIN_OBSTACLE_HEIGHT: u32 = 20;
    pub const CLASSIC_MAX_OBSTACLE_HEIGHT: u32 = 60;

    /// Vertical swing of moving obstacles
    pub const MOVING_AMPLITUDE: f32 = 30.0;
    /// Angular frequency of moving obstacles (radians per millisecond)
    pub const MOVING_OMEGA: f32 = 0.004;
}

/// Theoretical apex of a single jump: v² / 2g
#[inline]
pub fn max_jump_height(jump_strength: f32, gravity: f32) -> f32 {
    jump_strength * jump_strength / (2.0 * gravity)
}
