//! Look-ahead autopilot for demo and soak runs
//!
//! Jumps when the nearest obstacle ahead enters a trigger window sized by
//! the current scroll speed, and spends the double jump when the first one
//! is about to come down on an obstacle.

use super::state::{GamePhase, GameState, JumpState, Obstacle};

/// Frames of warning before an obstacle reaches the character's front edge
const LEAD_FRAMES: f32 = 9.0;

/// Nearest obstacle whose right edge is still ahead of the character's left edge
fn next_obstacle(state: &GameState) -> Option<&Obstacle> {
    let left = state.character.pos.x;
    state
        .obstacles
        .iter()
        .filter(|o| o.pos.x + o.size.x > left)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
}

/// Whether the autopilot wants to jump this frame
pub fn should_jump(state: &GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    let Some(obstacle) = next_obstacle(state) else {
        return false;
    };

    let character = &state.character;
    let front = character.pos.x + character.size.x;
    let gap = obstacle.pos.x - front;
    let speed = state.difficulty.current.scroll_speed.max(0.1);

    match character.jump_state {
        JumpState::Grounded => gap > 0.0 && gap <= speed * LEAD_FRAMES,
        JumpState::Airborne { double_jump: true } => {
            // Falling with the obstacle under us and our feet below its top
            let feet = character.pos.y + character.size.y;
            let over = gap < 0.0;
            character.vel_y > 0.0 && over && feet + character.vel_y > obstacle.pos.y
        }
        JumpState::Airborne { double_jump: false } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::settings::Settings;
    use crate::sim::state::{GameMode, ObstacleKind};
    use crate::sim::tick;
    use glam::Vec2;

    fn running() -> (GameState, Settings) {
        let settings = Settings::default();
        let mut state = GameState::new(77, &settings);
        tick::start_run(&mut state, &settings, &MemoryStore::new(), GameMode::Classic);
        (state, settings)
    }

    fn place(state: &mut GameState, x: f32) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Standard,
            pos: Vec2::new(x, 360.0),
            size: Vec2::new(20.0, 40.0),
            base_y: 360.0,
            spawn_x: 800.0,
        });
    }

    #[test]
    fn test_no_jump_without_obstacles() {
        let (state, _) = running();
        assert!(!should_jump(&state));
    }

    #[test]
    fn test_waits_until_obstacle_is_close() {
        let (mut state, _) = running();
        place(&mut state, 500.0);
        assert!(!should_jump(&state));
        state.obstacles[0].pos.x = 100.0;
        assert!(should_jump(&state));
    }

    #[test]
    fn test_ignores_obstacles_behind() {
        let (mut state, _) = running();
        place(&mut state, 0.0);
        assert!(!should_jump(&state));
    }

    #[test]
    fn test_clears_classic_obstacles() {
        let (mut state, settings) = running();
        let mut store = MemoryStore::new();
        // Twenty seconds of play at 60 fps
        for _ in 0..1250 {
            if should_jump(&state) {
                tick::jump(&mut state, &settings);
            }
            tick::tick(&mut state, &settings, &mut store, 16.0);
        }
        assert_eq!(state.phase, GamePhase::Playing, "score {:.1}", state.score);
        assert!(state.spawned_count() > 3);
    }
}
