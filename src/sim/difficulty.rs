//! Score-driven difficulty curve
//!
//! `evaluate` is a pure function of (score, mode); `DifficultyState` keeps the
//! latest evaluation plus the spawn history the generator needs.

use serde::Serialize;

use super::state::{GameMode, ObstacleKind};
use crate::settings::{CurveParams, Settings};

/// Obstacle variety unlocked at each difficulty level
const POOLS: [&[ObstacleKind]; 4] = [
    &[ObstacleKind::Standard],
    &[ObstacleKind::Standard, ObstacleKind::Tall],
    &[ObstacleKind::Standard, ObstacleKind::Tall, ObstacleKind::Low],
    &[
        ObstacleKind::Standard,
        ObstacleKind::Tall,
        ObstacleKind::Low,
        ObstacleKind::Moving,
    ],
];

/// Kinds allowed at a level (everything once past the last step)
pub fn pool_for_level(level: u32) -> &'static [ObstacleKind] {
    POOLS[(level as usize).min(POOLS.len() - 1)]
}

/// One evaluation of the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyLevel {
    /// Horizontal obstacle speed per nominal frame
    pub scroll_speed: f32,
    /// Spawns per second
    pub spawn_frequency: f32,
    pub level: u32,
    pub pool: &'static [ObstacleKind],
}

impl DifficultyLevel {
    /// Minimum gap between time-gated spawns
    pub fn spawn_interval_ms(&self) -> f32 {
        1000.0 / self.spawn_frequency
    }
}

/// Map a score onto the curve of `mode`
pub fn evaluate(score: f64, curve: &CurveParams) -> DifficultyLevel {
    let score = score.max(0.0);
    let s = score as f32;

    let scroll_speed = (curve.base_speed + curve.speed_per_point * s).min(curve.max_speed);
    let spawn_frequency =
        (curve.base_frequency + curve.frequency_per_point * s).min(curve.max_frequency);
    let level = match curve.level_step {
        Some(step) => (score / step).floor() as u32,
        None => 0,
    };

    DifficultyLevel {
        scroll_speed,
        spawn_frequency,
        level,
        pool: pool_for_level(level),
    }
}

/// Live difficulty plus spawn history, reset at run start
#[derive(Debug, Clone, Serialize)]
pub struct DifficultyState {
    pub current: DifficultyLevel,
    /// Kind of the most recent spawn
    pub last_kind: Option<ObstacleKind>,
    /// How many times in a row `last_kind` was spawned
    pub streak: u32,
    /// Run clock at the most recent spawn
    pub last_spawn_ms: f64,
}

impl DifficultyState {
    /// Baseline for a fresh run of `mode`
    pub fn new(mode: GameMode, settings: &Settings) -> Self {
        Self {
            current: evaluate(0.0, settings.curve(mode)),
            last_kind: None,
            streak: 0,
            last_spawn_ms: 0.0,
        }
    }

    /// Re-evaluate from the current score; returns the new level on a level-up
    pub fn update(&mut self, score: f64, curve: &CurveParams) -> Option<u32> {
        let next = evaluate(score, curve);
        let leveled = next.level > self.current.level;
        self.current = next;
        leveled.then_some(next.level)
    }

    /// Record a spawn for the anti-repetition rule
    pub fn record_spawn(&mut self, kind: ObstacleKind, now_ms: f64) {
        if self.last_kind == Some(kind) {
            self.streak += 1;
        } else {
            self.last_kind = Some(kind);
            self.streak = 1;
        }
        self.last_spawn_ms = now_ms;
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.current.level
    }
}
