//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through tick arguments
//! - Seeded RNG only
//! - Stable iteration order (obstacles oldest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_hit, overlaps};
pub use difficulty::{DifficultyLevel, DifficultyState, evaluate};
pub use physics::Jump;
pub use session::{Button, ButtonAction, ObstacleView, Session, Snapshot, buttons};
pub use spawn::{DistanceGate, SpawnContext, SpawnGate, TimeGate};
pub use state::{
    Character, GameEvent, GameMode, GamePhase, GameState, JumpState, KindGeometry, Obstacle,
    ObstacleKind, ParseModeError,
};
pub use tick::tick;
