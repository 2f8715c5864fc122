//! Procedural obstacle/item spawning and background generation

use glam::Vec2;
use rand::Rng;

use super::state::{
    BackgroundElement, BackgroundKind, GameState, MAX_PARTICLES, Obstacle, ObstacleKind,
    PARTICLE_LIFE, Particle,
};

/// Number of skyline buildings
pub const BUILDING_COUNT: usize = 12;
/// Horizontal spacing between buildings at generation time
pub const BUILDING_SPACING: f32 = 120.0;
/// Number of neon dots
pub const NEON_COUNT: usize = 15;
/// Neon palette size (colors live in the renderer)
pub const NEON_COLORS: u8 = 4;
/// Per-tick chance of emitting a thruster particle
pub const PARTICLE_CHANCE: f32 = 0.3;

/// Whether the spawner is allowed to place something this tick
///
/// Density cap first, then spacing: the newest entity must have moved at
/// least `min_gap` plus a random jitter away from the right edge.
fn spawn_slot_open(state: &mut GameState) -> bool {
    let spawn = &state.tuning.spawn;
    if state.obstacles.len() >= spawn.max_active {
        return false;
    }
    let Some(last) = state.obstacles.last() else {
        return true;
    };
    let (min_gap, jitter, last_x) = (spawn.min_gap, spawn.gap_jitter, last.pos.x);
    let threshold = state.viewport.width - min_gap - state.rng.random::<f32>() * jitter;
    last_x < threshold
}

/// Maybe append one new obstacle or collectible at the right edge
///
/// Returns the kind spawned, if any.
pub fn maybe_spawn(state: &mut GameState) -> Option<ObstacleKind> {
    if !spawn_slot_open(state) {
        return None;
    }

    let cfg = state.tuning.stage(state.stage);
    let (obstacle_chance, item_chance) = (cfg.obstacle_chance, cfg.item_chance);
    let unlocked = state.tuning.unlocked_kinds(state.stage);

    let roll: f32 = state.rng.random();
    let kind = if roll < obstacle_chance {
        let idx = state.rng.random_range(0..ObstacleKind::HAZARDS.len());
        ObstacleKind::HAZARDS[idx]
    } else if roll < obstacle_chance + item_chance && !unlocked.is_empty() {
        let idx = state.rng.random_range(0..unlocked.len());
        ObstacleKind::Collectible(unlocked[idx])
    } else {
        return None;
    };

    let obstacle = build_obstacle(state, kind);
    log::debug!(
        "spawn {:?} #{} at ({:.0}, {:.0})",
        obstacle.kind,
        obstacle.id,
        obstacle.pos.x,
        obstacle.pos.y
    );
    state.obstacles.push(obstacle);
    Some(kind)
}

/// Construct an entity of `kind` at the right edge of the viewport
pub fn build_obstacle(state: &mut GameState, kind: ObstacleKind) -> Obstacle {
    let x = state.viewport.width;
    let bottom = state.viewport.height;
    let id = state.next_entity_id();

    match kind {
        ObstacleKind::Collectible(item) => {
            let spawn = &state.tuning.spawn;
            let (base, band) = (spawn.item_base_offset, spawn.item_height_band);
            let y = bottom - base - state.rng.random::<f32>() * band;
            let size = item.size();
            Obstacle {
                id,
                kind,
                pos: Vec2::new(x, y),
                width: size,
                height: size,
                value: item.value(),
                glow: 15.0,
            }
        }
        hazard => {
            let (offset, width, height) = hazard.hazard_geometry().unwrap_or((60.0, 40.0, 40.0));
            let glow = match hazard {
                ObstacleKind::Laser => state.rng.random::<f32>() * 20.0 + 10.0,
                ObstacleKind::FloatingBlock => 15.0,
                ObstacleKind::WideBlock => 20.0,
                _ => 15.0,
            };
            Obstacle {
                id,
                kind: hazard,
                pos: Vec2::new(x, bottom - offset),
                width,
                height,
                value: 0,
                glow,
            }
        }
    }
}

/// Regenerate the parallax skyline for the current viewport
pub fn generate_background(state: &mut GameState) {
    let (w, h) = (state.viewport.width, state.viewport.height);
    let rng = &mut state.rng;
    let mut background = Vec::with_capacity(BUILDING_COUNT + NEON_COUNT);

    for i in 0..BUILDING_COUNT {
        let y = rng.random::<f32>() * (h * 0.5) + h * 0.1;
        background.push(BackgroundElement {
            kind: BackgroundKind::Building {
                width: 60.0 + rng.random::<f32>() * 40.0,
                height: 100.0 + rng.random::<f32>() * 80.0,
                hue: 200.0 + rng.random::<f32>() * 60.0,
                lightness: 20.0 + rng.random::<f32>() * 30.0,
            },
            pos: Vec2::new(i as f32 * BUILDING_SPACING, y),
        });
    }

    for _ in 0..NEON_COUNT {
        let pos = Vec2::new(rng.random::<f32>() * w * 2.0, rng.random::<f32>() * h);
        background.push(BackgroundElement {
            kind: BackgroundKind::Neon {
                size: 2.0 + rng.random::<f32>() * 4.0,
                color_index: rng.random_range(0..NEON_COLORS),
                alpha: 0.5 + rng.random::<f32>() * 0.5,
            },
            pos,
        });
    }

    state.background = background;
}

/// Emit a thruster particle under the player (30% of ticks)
pub fn maybe_emit_particle(state: &mut GameState) {
    if state.particles.len() >= MAX_PARTICLES {
        return;
    }
    if state.rng.random::<f32>() >= PARTICLE_CHANCE {
        return;
    }
    let hitbox = super::collision::player_hitbox(state);
    let rng = &mut state.rng;
    state.particles.push(Particle {
        pos: Vec2::new(hitbox.x + hitbox.width / 2.0, hitbox.bottom()),
        vel: Vec2::new(-2.0 - rng.random::<f32>() * 3.0, -1.0 - rng.random::<f32>() * 2.0),
        life: PARTICLE_LIFE,
        size: 2.0 + rng.random::<f32>() * 3.0,
    });
}
