//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of obstacles)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod rect;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use collision::{player_hitbox, resolve_collisions};
pub use rect::Rect;
pub use stage::check_progress;
pub use state::{
    BackgroundElement, BackgroundKind, CollectibleKind, GameEvent, GamePhase, GameState,
    MAX_PARTICLES, Obstacle, ObstacleKind, Particle, Player,
};
pub use tick::{TickInput, tick};
