//! Variable timestep simulation tick
//!
//! Core game loop: advances one Playing frame and ends the run on collision.

use super::collision::first_hit;
use super::physics::Jump;
use super::spawn::{advance_obstacles, maybe_spawn};
use super::state::{GameEvent, GameMode, GamePhase, GameState};
use crate::highscores::HighScoreStore;
use crate::settings::Settings;

/// Advance the run by `elapsed_ms` of wall time.
///
/// No-op outside Playing. Order within a tick: score, difficulty, character,
/// obstacles (move, cull, spawn), collision.
pub fn tick(
    state: &mut GameState,
    settings: &Settings,
    store: &mut dyn HighScoreStore,
    elapsed_ms: f32,
) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(mode) = state.mode else {
        return;
    };
    // Zero/negative/NaN frames carry no time
    if !(elapsed_ms > 0.0) {
        return;
    }

    state.time_ms += elapsed_ms as f64;
    state.score += elapsed_ms as f64 / 1000.0;

    if let Some(level) = state.difficulty.update(state.score, settings.curve(mode)) {
        log::debug!(
            "Level {} at score {:.1}: speed={:.2}, freq={:.2}/s, pool={:?}",
            level,
            state.score,
            state.difficulty.current.scroll_speed,
            state.difficulty.current.spawn_frequency,
            state.difficulty.current.pool
        );
        state.events.push(GameEvent::LevelUp { level });
    }

    state.character.advance(elapsed_ms, settings.gravity);

    advance_obstacles(
        &mut state.obstacles,
        state.difficulty.current.scroll_speed,
        elapsed_ms,
        state.time_ms,
    );
    maybe_spawn(state, settings);

    if let Some(id) = first_hit(&state.character.rect(), &state.obstacles) {
        log::debug!("Hit obstacle #{} at score {:.2}", id, state.score);
        game_over(state, store);
    }
}

/// Jump input while Playing
pub fn jump(state: &mut GameState, settings: &Settings) -> Option<Jump> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    let jump = state
        .character
        .jump(settings.jump_strength, settings.double_jump_factor)?;
    state.events.push(GameEvent::Jumped {
        double: jump == Jump::Double,
    });
    Some(jump)
}

/// Start a run in `mode` (from the menu or as a retry after game over)
pub fn start_run(
    state: &mut GameState,
    settings: &Settings,
    store: &dyn HighScoreStore,
    mode: GameMode,
) {
    if state.phase == GamePhase::Playing {
        return;
    }
    let stored = store.load(mode);
    state.high_scores.set(mode, stored);
    state.reset_run(mode, settings);
    log::info!(
        "Run {} started: mode={}, high score={}",
        state.runs,
        mode.as_str(),
        stored
    );
}

/// End the run and commit the high score.
///
/// Idempotent: only the first call of a run changes anything, so several
/// overlapping obstacles cannot trigger it twice.
pub fn game_over(state: &mut GameState, store: &mut dyn HighScoreStore) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::GameOver;
    let Some(mode) = state.mode else {
        return;
    };

    let final_score = state.score.floor() as u64;
    let stored = state.high_scores.get(mode);
    // Compare whole points so a floored legacy value is never rewritten lower
    let new_high_score = state.high_scores.submit(mode, final_score);
    if new_high_score {
        store.save(mode, final_score);
        log::info!(
            "New {} high score: {} (was {})",
            mode.as_str(),
            final_score,
            stored
        );
    }

    log::info!(
        "Game over: mode={}, score={:.2}, obstacles spawned={}",
        mode.as_str(),
        state.score,
        state.spawned_count()
    );
    state.events.push(GameEvent::GameOver {
        score: final_score,
        new_high_score,
    });
}

/// Leave game over for the menu
pub fn return_to_menu(state: &mut GameState) {
    if state.phase != GamePhase::GameOver {
        return;
    }
    state.mode = None;
    state.phase = GamePhase::Menu;
}
