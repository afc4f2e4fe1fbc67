//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; there is no global state.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::DifficultyState;
use crate::consts::MOVING_AMPLITUDE;
use crate::highscores::HighScores;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a mode to be chosen (the START screen)
    Menu,
    /// Active run
    Playing,
    /// Run ended, waiting for retry or menu
    GameOver,
}

/// Difficulty parameterization selected on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    /// Constant speed, distance-gated spawns, random heights
    Classic,
    /// Slow ramp toward a moderate ceiling
    Marathon,
    /// Fast ramp toward a high ceiling
    Challenge,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Classic, GameMode::Marathon, GameMode::Challenge];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Marathon => "marathon",
            GameMode::Challenge => "challenge",
        }
    }

    /// Persistence key; the single-mode game used one unkeyed slot
    pub fn storage_key(&self) -> &'static str {
        match self {
            GameMode::Classic => "highScore",
            GameMode::Marathon => "marathon",
            GameMode::Challenge => "challenge",
        }
    }

    /// Whether spawns wait on distance travelled rather than elapsed time
    pub fn distance_gated(&self) -> bool {
        matches!(self, GameMode::Classic)
    }
}

/// Error for a mode name that is not one of [`GameMode::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode {:?}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "marathon" => Ok(GameMode::Marathon),
            "challenge" => Ok(GameMode::Challenge),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Vertical movement state of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    /// Resting on the ground line
    Grounded,
    /// In the air; `double_jump` is true while the second jump is unused
    Airborne { double_jump: bool },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner (x never changes)
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity, negative is upward
    pub vel_y: f32,
    pub jump_state: JumpState,
    /// y of the top edge when standing on the ground
    pub rest_y: f32,
}

impl Character {
    pub fn new(settings: &Settings) -> Self {
        let rest_y = settings.field_height - settings.character_height;
        Self {
            pos: Vec2::new(settings.character_x, rest_y),
            size: Vec2::new(settings.character_width, settings.character_height),
            vel_y: 0.0,
            jump_state: JumpState::Grounded,
            rest_y,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_grounded(&self) -> bool {
        self.jump_state == JumpState::Grounded
    }
}

/// Obstacle types (closed set, each with its own geometry rule)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Ordinary block
    Standard,
    /// Narrow block that needs most of a full jump
    Tall,
    /// Short wide block that punishes early or late jumps
    Low,
    /// Floating block that bobs up and down
    Moving,
}

/// Spawn-time dimensions of an obstacle kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindGeometry {
    pub width: f32,
    pub height: f32,
    /// Gap between the obstacle's resting bottom edge and the ground
    pub lift: f32,
}

impl ObstacleKind {
    /// Dimensions as fractions of the highest point a single jump reaches.
    /// Every kind stays below that apex so one jump always clears it.
    pub fn geometry(&self, max_jump_height: f32) -> KindGeometry {
        match self {
            ObstacleKind::Standard => KindGeometry {
                width: 20.0,
                height: max_jump_height * 0.3,
                lift: 0.0,
            },
            ObstacleKind::Tall => KindGeometry {
                width: 20.0,
                height: max_jump_height * 0.6,
                lift: 0.0,
            },
            ObstacleKind::Low => KindGeometry {
                width: 70.0,
                height: max_jump_height * 0.15,
                lift: 0.0,
            },
            ObstacleKind::Moving => KindGeometry {
                width: 25.0,
                height: max_jump_height * 0.25,
                lift: MOVING_AMPLITUDE,
            },
        }
    }
}

/// An obstacle scrolling toward the character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Resting y; moving obstacles swing around it
    pub base_y: f32,
    /// x at which the obstacle entered the field
    pub spawn_x: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Things that happened during a call, drained by the host for sound/HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { mode: GameMode, seed: u64 },
    Jumped { double: bool },
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    LevelUp { level: u32 },
    GameOver { score: u64, new_high_score: bool },
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed; each run derives its own stream from it
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Mode of the current (or last) run, None on the menu
    pub mode: Option<GameMode>,
    /// Run score, one point per second of play
    pub score: f64,
    /// Run clock in milliseconds
    pub time_ms: f64,
    /// Player character
    pub character: Character,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Score-derived difficulty and spawn history
    pub difficulty: DifficultyState,
    /// Cached per-mode high scores
    pub high_scores: HighScores,
    /// Pending events for the host
    pub events: Vec<GameEvent>,
    /// Runs started this session
    pub runs: u32,
    /// Obstacle RNG for the current run
    pub(crate) rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a session state sitting on the menu
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            mode: None,
            score: 0.0,
            time_ms: 0.0,
            character: Character::new(settings),
            obstacles: Vec::new(),
            difficulty: DifficultyState::new(settings.default_mode, settings),
            high_scores: HighScores::new(),
            events: Vec::new(),
            runs: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Obstacles spawned so far this run
    pub fn spawned_count(&self) -> u32 {
        self.next_id - 1
    }

    /// Seed for the next run (deterministic per session seed)
    pub fn run_seed(&self) -> u64 {
        (self.runs as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.seed)
    }

    /// Clear everything run-scoped and start a run in `mode`
    pub fn reset_run(&mut self, mode: GameMode, settings: &Settings) {
        let run_seed = self.run_seed();
        self.runs += 1;
        self.mode = Some(mode);
        self.score = 0.0;
        self.time_ms = 0.0;
        self.character = Character::new(settings);
        self.obstacles.clear();
        self.difficulty = DifficultyState::new(mode, settings);
        self.rng = Pcg32::seed_from_u64(run_seed);
        self.next_id = 1;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RunStarted {
            mode,
            seed: run_seed,
        });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
