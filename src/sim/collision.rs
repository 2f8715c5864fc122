//! Collision detection and response
//!
//! Player hitbox vs. every active obstacle, in spawn order. Hazards end the
//! run on contact; collectibles adjust the score and disappear.

use super::rect::Rect;
use super::state::{CollectibleKind, GameEvent, GamePhase, GameState, ObstacleKind};

/// Result of resolving one tick's contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Nothing fatal happened (pickups may have been collected)
    Clear,
    /// A hazard was hit; the run is over
    Fatal(ObstacleKind),
}

/// The player's current hitbox (shorter and lower while sliding)
pub fn player_hitbox(state: &GameState) -> Rect {
    let player = &state.player;
    let tuning = &state.tuning.player;
    if player.sliding {
        Rect::new(
            player.pos.x,
            player.pos.y + tuning.slide_offset,
            player.width,
            tuning.slide_height,
        )
    } else {
        Rect::new(player.pos.x, player.pos.y, player.width, player.height)
    }
}

/// Resolve contacts between the player and all obstacles
///
/// Collected items are removed in one compaction pass after the scan. A hazard
/// contact stops the scan immediately and moves the game to
/// `GameOver { cleared: false }`.
pub fn resolve_collisions(state: &mut GameState) -> CollisionOutcome {
    let hitbox = player_hitbox(state);
    let mut collected: Vec<(u32, CollectibleKind, i32)> = Vec::new();
    let mut fatal = None;

    for obstacle in &state.obstacles {
        if !hitbox.overlaps(&obstacle.rect()) {
            continue;
        }
        match obstacle.kind {
            ObstacleKind::Collectible(kind) => collected.push((obstacle.id, kind, obstacle.value)),
            hazard @ (ObstacleKind::Box
            | ObstacleKind::Laser
            | ObstacleKind::FloatingBlock
            | ObstacleKind::WideBlock) => {
                fatal = Some(hazard);
                break;
            }
        }
    }

    for &(_, kind, value) in &collected {
        state.add_score(value);
        log::debug!("collected {:?} ({:+}), score {}", kind, value, state.score);
        state.events.push(GameEvent::Collected { kind, value });
    }
    if !collected.is_empty() {
        state
            .obstacles
            .retain(|o| !collected.iter().any(|(id, _, _)| *id == o.id));
    }

    match fatal {
        Some(kind) => {
            log::info!("hit {:?} on stage {} with score {}", kind, state.stage, state.score);
            state.phase = GamePhase::GameOver { cleared: false };
            state.events.push(GameEvent::HazardHit { kind });
            CollisionOutcome::Fatal(kind)
        }
        None => CollisionOutcome::Clear,
    }
}
