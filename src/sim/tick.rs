//! Fixed timestep simulation tick
//!
//! Core game step that advances the simulation deterministically.

use super::autopilot::autopilot;
use super::collision::{CollisionOutcome, resolve_collisions};
use super::physics::{
    apply_actions, update_background, update_obstacles, update_particles, update_player,
};
use super::spawn::{maybe_emit_particle, maybe_spawn};
use super::stage::check_progress;
use super::state::GameState;

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left held
    pub move_left: bool,
    /// Right held
    pub move_right: bool,
    /// Jump requested (one-shot)
    pub jump: bool,
    /// Slide requested (one-shot)
    pub slide: bool,
    /// Demo mode - autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed step
///
/// Order: background, player, obstacles, spawner, particles, collisions,
/// stage check. Does nothing unless the game is running.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if !state.phase.is_running() {
        return;
    }

    let input = if input.autopilot {
        TickInput {
            autopilot: true,
            ..autopilot(state)
        }
    } else {
        *input
    };

    state.time_ticks += 1;

    update_background(state);

    apply_actions(state, input.jump, input.slide);
    update_player(state, input.move_left, input.move_right);

    update_obstacles(state);
    maybe_spawn(state);

    maybe_emit_particle(state);
    update_particles(state);

    if let CollisionOutcome::Fatal(_) = resolve_collisions(state) {
        return;
    }

    check_progress(state);
}
