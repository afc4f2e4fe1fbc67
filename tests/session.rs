// Integration tests driving a full `Session` through its public API with a
// recording high score store.

use std::collections::HashMap;

use glam::Vec2;
use proptest::prelude::*;

use hop_runner::sim::{
    GameEvent, GameMode, GamePhase, Jump, JumpState, Obstacle, ObstacleKind, Session, autopilot,
};
use hop_runner::{HighScoreStore, Settings};

/// Store that remembers every save call
#[derive(Debug, Default)]
struct RecordingStore {
    values: HashMap<GameMode, u64>,
    saves: Vec<(GameMode, u64)>,
}

impl RecordingStore {
    fn with(mode: GameMode, score: u64) -> Self {
        let mut store = Self::default();
        store.values.insert(mode, score);
        store
    }
}

impl HighScoreStore for RecordingStore {
    fn load(&self, mode: GameMode) -> u64 {
        self.values.get(&mode).copied().unwrap_or(0)
    }

    fn save(&mut self, mode: GameMode, score: u64) {
        self.saves.push((mode, score));
        self.values.insert(mode, score);
    }
}

fn session_with(store: RecordingStore) -> Session<RecordingStore> {
    Session::new(2024, Settings::default(), store)
}

fn drop_obstacle_on_character(session: &mut Session<RecordingStore>) {
    let state = session.state_mut();
    let id = state.next_entity_id();
    let body = state.character.rect();
    state.obstacles.push(Obstacle {
        id,
        kind: ObstacleKind::Standard,
        pos: body.min + Vec2::new(5.0, 0.0),
        size: Vec2::new(20.0, 40.0),
        base_y: body.min.y,
        spawn_x: 800.0,
    });
}

#[test]
fn one_second_of_marathon_scores_one_point() {
    let mut session = session_with(RecordingStore::default());
    session.select_mode(GameMode::Marathon);
    assert!(session.tick(1000.0));
    assert!((session.state().score - 1.0).abs() < 1e-9);
    assert_eq!(session.phase(), GamePhase::Playing);
}

#[test]
fn jump_double_jump_third_is_ignored() {
    let settings = Settings {
        jump_strength: 14.0,
        gravity: 0.6,
        double_jump_factor: 0.9,
        ..Settings::default()
    };
    let mut session = Session::new(1, settings, RecordingStore::default());
    session.select_mode(GameMode::Classic);

    assert_eq!(session.jump(), Some(Jump::Single));
    assert_eq!(session.state().character.vel_y, -14.0);
    assert_eq!(
        session.state().character.jump_state,
        JumpState::Airborne { double_jump: true }
    );

    session.tick(16.0);
    assert_eq!(session.jump(), Some(Jump::Double));
    assert!((session.state().character.vel_y + 12.6).abs() < 1e-4);
    assert_eq!(
        session.state().character.jump_state,
        JumpState::Airborne { double_jump: false }
    );

    let vel = session.state().character.vel_y;
    assert_eq!(session.jump(), None);
    assert_eq!(session.state().character.vel_y, vel);
}

#[test]
fn collision_commits_floor_of_score_once() {
    let mut session = session_with(RecordingStore::with(GameMode::Challenge, 10));
    session.select_mode(GameMode::Challenge);
    session.state_mut().score = 12.3;
    drop_obstacle_on_character(&mut session);
    drop_obstacle_on_character(&mut session);

    session.tick(16.0);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.store().saves, vec![(GameMode::Challenge, 12)]);

    let game_overs: Vec<_> = session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .collect();
    assert_eq!(
        game_overs,
        vec![GameEvent::GameOver {
            score: 12,
            new_high_score: true
        }]
    );

    // Still overlapping, but the run is over
    session.tick(16.0);
    session.tick(16.0);
    assert_eq!(session.store().saves.len(), 1);
}

#[test]
fn losing_run_does_not_save() {
    let mut session = session_with(RecordingStore::with(GameMode::Marathon, 100));
    session.select_mode(GameMode::Marathon);
    session.tick(3000.0);
    drop_obstacle_on_character(&mut session);
    session.tick(16.0);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert!(session.store().saves.is_empty());
    assert_eq!(session.snapshot().high_scores.get(GameMode::Marathon), 100);
}

#[test]
fn input_in_wrong_state_is_ignored() {
    let mut session = session_with(RecordingStore::default());
    session.return_to_menu();
    assert_eq!(session.phase(), GamePhase::Menu);
    assert!(!session.tick(500.0));
    assert_eq!(session.state().score, 0.0);

    session.select_mode(GameMode::Marathon);
    session.return_to_menu();
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.select(400.0, 200.0), None);
}

#[test]
fn restart_resets_run_state() {
    let mut session = session_with(RecordingStore::default());
    session.select_mode(GameMode::Challenge);
    for _ in 0..200 {
        session.tick(16.0);
        if session.phase() != GamePhase::Playing {
            break;
        }
    }
    drop_obstacle_on_character(&mut session);
    session.tick(16.0);
    assert_eq!(session.phase(), GamePhase::GameOver);

    // Space restarts in the same mode
    session.jump();
    let state = session.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.mode, Some(GameMode::Challenge));
    assert_eq!(state.score, 0.0);
    assert!(state.obstacles.is_empty());
    assert!(state.character.is_grounded());
    assert_eq!(state.difficulty.level(), 0);
}

#[test]
fn obstacles_scroll_and_leave_exactly_past_the_edge() {
    let mut session = session_with(RecordingStore::default());
    session.select_mode(GameMode::Classic);
    let mut last: HashMap<u32, f32> = HashMap::new();
    for _ in 0..600 {
        if autopilot::should_jump(session.state()) {
            session.jump();
        }
        session.tick(16.0);
        assert_eq!(session.phase(), GamePhase::Playing);

        let state = session.state();
        for o in &state.obstacles {
            assert!(o.pos.x + o.size.x >= 0.0);
            if let Some(prev) = last.get(&o.id) {
                assert!(o.pos.x < *prev);
            }
        }
        last = state.obstacles.iter().map(|o| (o.id, o.pos.x)).collect();
    }
}

#[test]
fn same_seed_same_obstacles() {
    let play = || {
        let mut session = session_with(RecordingStore::default());
        session.select_mode(GameMode::Challenge);
        let mut kinds = Vec::new();
        for _ in 0..3000 {
            if autopilot::should_jump(session.state()) {
                session.jump();
            }
            session.tick(16.0);
            for event in session.drain_events() {
                if let GameEvent::ObstacleSpawned { kind, .. } = event {
                    kinds.push(kind);
                }
            }
            if session.phase() != GamePhase::Playing {
                break;
            }
        }
        (kinds, session.state().score)
    };
    let (kinds_a, score_a) = play();
    let (kinds_b, score_b) = play();
    assert_eq!(kinds_a, kinds_b);
    assert_eq!(score_a, score_b);
}

#[test]
fn spawned_kinds_never_repeat_four_times() {
    let mut session = session_with(RecordingStore::default());
    session.select_mode(GameMode::Challenge);
    // Skip the on-ramp and unlock the full pool
    session.state_mut().score = 40.0;
    let mut kinds = Vec::new();
    for _ in 0..4000 {
        session.tick(16.0);
        // Keep the run alive: the test is about the draw, not the dodge
        session.state_mut().obstacles.retain(|o| o.pos.x > 200.0);
        for event in session.drain_events() {
            if let GameEvent::ObstacleSpawned { kind, .. } = event {
                kinds.push(kind);
            }
        }
    }
    assert_eq!(session.phase(), GamePhase::Playing);
    assert!(kinds.len() > 20);
    for window in kinds.windows(4) {
        assert!(!window.iter().all(|k| *k == window[0]), "{:?}", window);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn character_never_sinks_below_ground(
        jumps in proptest::collection::vec(any::<bool>(), 1..300),
        frame in 4.0f32..40.0,
    ) {
        let mut session = session_with(RecordingStore::default());
        session.select_mode(GameMode::Marathon);
        for jump in jumps {
            if jump {
                session.jump();
            }
            session.tick(frame);
            session.state_mut().obstacles.clear();
            let c = &session.state().character;
            prop_assert!(c.pos.y <= c.rest_y);
            prop_assert_eq!(c.pos.y == c.rest_y, c.is_grounded());
        }
    }

    #[test]
    fn saved_high_scores_only_grow(seed in any::<u64>(), runs in 1usize..5) {
        let mut session = Session::new(seed, Settings::default(), RecordingStore::default());
        for run in 0..runs {
            session.select_mode(GameMode::Classic);
            // Stop dodging after a few obstacles so runs end at different scores
            let give_up = (seed % 5) as u32 + 2 * run as u32 + 1;
            for _ in 0..2000 {
                if session.phase() != GamePhase::Playing {
                    break;
                }
                if autopilot::should_jump(session.state()) && session.state().spawned_count() < give_up {
                    session.jump();
                }
                session.tick(16.0);
            }
            if session.phase() == GamePhase::Playing {
                drop_obstacle_on_character(&mut session);
                session.tick(16.0);
            }
            session.return_to_menu();
        }
        let saves = &session.store().saves;
        for pair in saves.windows(2) {
            prop_assert!(pair[1].1 >= pair[0].1);
        }
    }
}
