//! Obstacle generation: when to spawn, what to spawn, and scrolling
//!
//! Gating is a strategy picked by mode. Time-gated modes wait for the spawn
//! interval of the current difficulty; the distance-gated mode waits for the
//! newest obstacle to scroll a minimum distance away from the right edge.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameMode, GameState, Obstacle, ObstacleKind};
use crate::consts::{MOVING_AMPLITUDE, MOVING_OMEGA};
use crate::settings::Settings;

/// Everything a gate may look at
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    /// Run clock
    pub now_ms: f64,
    /// Run clock at the previous spawn
    pub last_spawn_ms: f64,
    /// Minimum time between spawns at the current difficulty
    pub spawn_interval_ms: f32,
    /// Most recently spawned live obstacle
    pub newest: Option<&'a Obstacle>,
    /// Gap the distance gate waits for
    pub min_distance: f32,
}

/// Decides whether an obstacle may spawn this tick
pub trait SpawnGate {
    fn should_spawn(&self, ctx: &SpawnContext<'_>) -> bool;
}

/// Spawn once the difficulty's interval has elapsed
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeGate;

impl SpawnGate for TimeGate {
    fn should_spawn(&self, ctx: &SpawnContext<'_>) -> bool {
        ctx.now_ms - ctx.last_spawn_ms > ctx.spawn_interval_ms as f64
    }
}

/// Spawn when the field is empty or the newest obstacle has moved far enough
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceGate;

impl SpawnGate for DistanceGate {
    fn should_spawn(&self, ctx: &SpawnContext<'_>) -> bool {
        match ctx.newest {
            None => true,
            Some(o) => o.spawn_x - o.pos.x >= ctx.min_distance,
        }
    }
}

/// Gate used by a mode
pub fn gate_for(mode: GameMode) -> &'static dyn SpawnGate {
    if mode.distance_gated() {
        &DistanceGate
    } else {
        &TimeGate
    }
}

/// Draw the next kind from `pool`.
///
/// A kind already drawn `max_streak` times in a row is left out of the draw
/// when the pool has an alternative. Below the on-ramp score the result is
/// always `Standard`.
pub fn choose_kind<R: Rng>(
    rng: &mut R,
    pool: &[ObstacleKind],
    last_kind: Option<ObstacleKind>,
    streak: u32,
    max_streak: u32,
    on_ramp: bool,
) -> ObstacleKind {
    if on_ramp || pool.is_empty() {
        return ObstacleKind::Standard;
    }

    let excluded = match last_kind {
        Some(kind) if streak >= max_streak && pool.len() > 1 => Some(kind),
        _ => None,
    };

    let candidates: Vec<ObstacleKind> = pool
        .iter()
        .copied()
        .filter(|k| Some(*k) != excluded)
        .collect();

    // `excluded` only applies with an alternative, so candidates is non-empty
    candidates[rng.random_range(0..candidates.len())]
}

/// y of a moving obstacle at `now_ms`
#[inline]
fn bob(base_y: f32, now_ms: f64) -> f32 {
    base_y + MOVING_AMPLITUDE * (MOVING_OMEGA * now_ms as f32).sin()
}

/// Build an obstacle of `kind` at the right edge of the field
fn build_obstacle<R: Rng>(
    rng: &mut R,
    id: u32,
    kind: ObstacleKind,
    mode: GameMode,
    now_ms: f64,
    settings: &Settings,
) -> Obstacle {
    let geometry = kind.geometry(settings.max_jump_height());
    let height = if mode == GameMode::Classic && kind == ObstacleKind::Standard {
        let (a, b) = settings.classic_height_range;
        rng.random_range(a.min(b)..=a.max(b)) as f32
    } else {
        geometry.height
    };

    let base_y = settings.field_height - height - geometry.lift;
    let y = match kind {
        ObstacleKind::Moving => bob(base_y, now_ms),
        _ => base_y,
    };

    Obstacle {
        id,
        kind,
        pos: Vec2::new(settings.field_width, y),
        size: Vec2::new(geometry.width, height),
        base_y,
        spawn_x: settings.field_width,
    }
}

/// Spawn one obstacle if the mode's gate allows it
pub fn maybe_spawn(state: &mut GameState, settings: &Settings) -> Option<ObstacleKind> {
    let mode = state.mode?;

    let ctx = SpawnContext {
        now_ms: state.time_ms,
        last_spawn_ms: state.difficulty.last_spawn_ms,
        spawn_interval_ms: state.difficulty.current.spawn_interval_ms(),
        newest: state.obstacles.last(),
        min_distance: settings.min_obstacle_distance,
    };
    if !gate_for(mode).should_spawn(&ctx) {
        return None;
    }

    let kind = choose_kind(
        &mut state.rng,
        state.difficulty.current.pool,
        state.difficulty.last_kind,
        state.difficulty.streak,
        settings.max_same_kind_streak,
        state.score < settings.on_ramp_score,
    );

    let id = state.next_entity_id();
    let obstacle = build_obstacle(&mut state.rng, id, kind, mode, state.time_ms, settings);
    log::debug!(
        "Spawned {:?} #{} ({}x{}) at t={:.0}ms",
        kind,
        id,
        obstacle.size.x,
        obstacle.size.y,
        state.time_ms
    );
    state.obstacles.push(obstacle);
    state.difficulty.record_spawn(kind, state.time_ms);
    state.events.push(GameEvent::ObstacleSpawned { id, kind });
    Some(kind)
}

/// Scroll obstacles left, bob the moving ones, and drop those past the edge
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, scroll_speed: f32, elapsed_ms: f32, now_ms: f64) {
    let dx = scroll_speed * (elapsed_ms / crate::consts::FRAME_MS);
    for obstacle in obstacles.iter_mut() {
        obstacle.pos.x -= dx;
        if obstacle.kind == ObstacleKind::Moving {
            obstacle.pos.y = bob(obstacle.base_y, now_ms);
        }
    }
    obstacles.retain(|o| !o.is_off_screen());
}
