//! Owned game session: the state machine the host talks to
//!
//! A `Session` bundles the simulation state, its tuning and a high score
//! store. Hosts feed it clock ticks and input events and read back snapshots.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use super::physics::Jump;
use super::state::{GameEvent, GameMode, GamePhase, GameState, ObstacleKind};
use super::tick;
use crate::highscores::{HighScoreStore, HighScores};
use crate::settings::Settings;

/// What an on-screen button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonAction {
    /// Start a run in this mode (menu)
    Start(GameMode),
    /// Replay the last mode (game over)
    Retry,
    /// Back to mode selection (game over)
    Menu,
}

/// A clickable region in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Button {
    pub action: ButtonAction,
    pub rect: Rect,
}

const BUTTON_SIZE: Vec2 = Vec2::new(180.0, 50.0);
const BUTTON_GAP: f32 = 20.0;

/// Buttons shown in `phase`, laid out centered in the field
pub fn buttons(phase: GamePhase, settings: &Settings) -> Vec<Button> {
    let actions: Vec<ButtonAction> = match phase {
        GamePhase::Menu => GameMode::ALL.iter().map(|m| ButtonAction::Start(*m)).collect(),
        GamePhase::GameOver => vec![ButtonAction::Retry, ButtonAction::Menu],
        GamePhase::Playing => return Vec::new(),
    };

    let count = actions.len() as f32;
    let row_width = count * BUTTON_SIZE.x + (count - 1.0) * BUTTON_GAP;
    let left = (settings.field_width - row_width) / 2.0;
    let top = match phase {
        GamePhase::GameOver => settings.field_height / 2.0 + 40.0,
        _ => (settings.field_height - BUTTON_SIZE.y) / 2.0,
    };

    actions
        .into_iter()
        .enumerate()
        .map(|(i, action)| Button {
            action,
            rect: Rect::new(
                Vec2::new(left + i as f32 * (BUTTON_SIZE.x + BUTTON_GAP), top),
                BUTTON_SIZE,
            ),
        })
        .collect()
}

/// An obstacle as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub mode: Option<GameMode>,
    pub score: f64,
    /// Score as displayed (whole points)
    pub display_score: u64,
    pub level: u32,
    pub high_scores: HighScores,
    pub character: Rect,
    pub grounded: bool,
    pub obstacles: Vec<ObstacleView>,
    pub buttons: Vec<Button>,
}

/// One player's game, from menu through any number of runs
pub struct Session<S: HighScoreStore> {
    state: GameState,
    settings: Settings,
    store: S,
    /// Time from throttled ticks waiting to be applied
    pending_ms: f32,
}

impl<S: HighScoreStore> Session<S> {
    /// Create a session on the menu with stored high scores loaded
    pub fn new(seed: u64, settings: Settings, store: S) -> Self {
        let mut state = GameState::new(seed, &settings);
        for mode in GameMode::ALL {
            state.high_scores.set(mode, store.load(mode));
        }
        log::info!("Session created with seed {}", seed);
        Self {
            state,
            settings,
            store,
            pending_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down the session, handing back its store
    pub fn into_store(self) -> S {
        self.store
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Choose a mode on the menu and start playing
    pub fn select_mode(&mut self, mode: GameMode) {
        if self.state.phase != GamePhase::Menu {
            return;
        }
        self.begin(mode);
    }

    /// Jump input: jump while playing, confirm on the menu, restart after game over
    pub fn jump(&mut self) -> Option<Jump> {
        match self.state.phase {
            GamePhase::Playing => tick::jump(&mut self.state, &self.settings),
            GamePhase::Menu => {
                self.begin(self.settings.default_mode);
                None
            }
            GamePhase::GameOver => {
                let mode = self.state.mode.unwrap_or(self.settings.default_mode);
                self.begin(mode);
                None
            }
        }
    }

    /// Pointer/touch input at a logical position; returns the button hit
    pub fn select(&mut self, x: f32, y: f32) -> Option<ButtonAction> {
        let point = Vec2::new(x, y);
        let action = buttons(self.state.phase, &self.settings)
            .into_iter()
            .find(|b| b.rect.contains(point))
            .map(|b| b.action)?;

        match action {
            ButtonAction::Start(mode) => self.select_mode(mode),
            ButtonAction::Retry => {
                let mode = self.state.mode.unwrap_or(self.settings.default_mode);
                self.begin(mode);
            }
            ButtonAction::Menu => self.return_to_menu(),
        }
        Some(action)
    }

    /// Back to the menu from game over
    pub fn return_to_menu(&mut self) {
        tick::return_to_menu(&mut self.state);
    }

    /// Feed one clock tick of `elapsed_ms`.
    ///
    /// With a frame cap configured, ticks shorter than the cap are folded
    /// into the next accepted one. Returns whether the simulation advanced.
    pub fn tick(&mut self, elapsed_ms: f32) -> bool {
        if self.state.phase != GamePhase::Playing {
            self.pending_ms = 0.0;
            return false;
        }
        if !(elapsed_ms > 0.0) {
            return false;
        }

        self.pending_ms += elapsed_ms;
        if self.pending_ms < self.settings.min_frame_ms {
            return false;
        }
        let elapsed = std::mem::take(&mut self.pending_ms);
        tick::tick(&mut self.state, &self.settings, &mut self.store, elapsed);
        true
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Render view of the current frame
    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            phase: state.phase,
            mode: state.mode,
            score: state.score,
            display_score: state.score.floor() as u64,
            level: state.difficulty.level(),
            high_scores: state.high_scores.clone(),
            character: state.character.rect(),
            grounded: state.character.is_grounded(),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    kind: o.kind,
                    rect: o.rect(),
                })
                .collect(),
            buttons: buttons(state.phase, &self.settings),
        }
    }

    fn begin(&mut self, mode: GameMode) {
        self.pending_ms = 0.0;
        tick::start_run(&mut self.state, &self.settings, &self.store, mode);
    }
}
