//! Demo-mode autopilot
//!
//! Reads the state and produces the input a cautious player would give:
//! hop ground hazards, grab chips, leave malware alone, and drift back to
//! the starting column in between.

use super::collision::player_hitbox;
use super::state::{CollectibleKind, GameState, Obstacle, ObstacleKind};
use super::tick::TickInput;

/// Gap (pixels) at which to hop something approaching at `speed` px/tick
fn hop_distance(speed: f32) -> f32 {
    speed * 6.0 + 10.0
}

/// Start holding right this far ahead of a wide block
const WIDE_BLOCK_APPROACH: f32 = 200.0;

/// Dead zone around the home column
const HOME_SLACK: f32 = 10.0;

/// Nearest obstacle the player has not fully passed, with its gap
fn nearest_ahead(state: &GameState) -> Option<(&Obstacle, f32)> {
    let hitbox = player_hitbox(state);
    state
        .obstacles
        .iter()
        .filter(|o| o.rect().right() > hitbox.x)
        .map(|o| (o, hitbox.gap_to(&o.rect())))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

/// Decide this tick's input
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player;
    let speed = state.scroll_speed;

    let mut hold_right = false;
    if let Some((obstacle, gap)) = nearest_ahead(state) {
        match obstacle.kind {
            ObstacleKind::Box => {
                input.jump = (0.0..=hop_distance(speed)).contains(&gap);
            }
            ObstacleKind::WideBlock => {
                // Too long to clear standing still: run at it and jump early
                hold_right = gap < WIDE_BLOCK_APPROACH;
                input.jump = (0.0..=(speed + 5.0) * 10.0).contains(&gap);
            }
            ObstacleKind::Laser | ObstacleKind::FloatingBlock => {
                // Both pass overhead while grounded
            }
            ObstacleKind::Collectible(CollectibleKind::CyberChip) => {
                input.jump = (0.0..=hop_distance(speed)).contains(&gap);
            }
            ObstacleKind::Collectible(CollectibleKind::Malware) => {}
        }
        // Keep pushing while airborne over a wide block
        if player.jumping && obstacle.kind == ObstacleKind::WideBlock {
            hold_right = true;
        }
    }

    let home = state.tuning.player.start_x;
    if hold_right {
        input.move_right = true;
    } else if player.pos.x > home + HOME_SLACK {
        input.move_left = true;
    } else if player.pos.x < home - HOME_SLACK {
        input.move_right = true;
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::build_obstacle;
    use crate::sim::state::GamePhase;
    use crate::sim::tick::tick;

    fn quiet_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        for cfg in &mut state.tuning.stages {
            cfg.obstacle_chance = 0.0;
            cfg.item_chance = 0.0;
        }
        state
    }

    #[test]
    fn test_idle_with_empty_track() {
        let state = quiet_state(1);
        let input = autopilot(&state);
        assert!(!input.jump && !input.slide && !input.move_left && !input.move_right);
    }

    #[test]
    fn test_hops_close_box_only() {
        let mut state = quiet_state(1);
        let mut b = build_obstacle(&mut state, ObstacleKind::Box);
        b.pos.x = 300.0;
        state.obstacles.push(b);
        assert!(!autopilot(&state).jump);

        state.obstacles[0].pos.x = state.player.pos.x + state.player.width + 20.0;
        assert!(autopilot(&state).jump);
    }

    #[test]
    fn test_returns_home() {
        let mut state = quiet_state(1);
        state.player.pos.x = 400.0;
        assert!(autopilot(&state).move_left);
        state.player.pos.x = 20.0;
        assert!(autopilot(&state).move_right);
    }

    #[test]
    fn test_clears_a_lone_box() {
        let mut state = quiet_state(3);
        let mut b = build_obstacle(&mut state, ObstacleKind::Box);
        b.pos.x = 300.0;
        state.obstacles.push(b);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..150 {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 10);
        assert!(state.obstacles.is_empty());
    }
}
