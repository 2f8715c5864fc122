//! Player movement and world scrolling
//!
//! All constants are per fixed tick; nothing here is scaled by frame time.

use rand::Rng;

use super::state::{GameEvent, GameState, Player};
use crate::tuning::PlayerTuning;

impl Player {
    /// Start a jump if grounded and not sliding
    pub fn try_jump(&mut self, tuning: &PlayerTuning) -> bool {
        if self.jumping || self.sliding {
            return false;
        }
        self.jumping = true;
        self.vel.y = tuning.jump_impulse;
        true
    }

    /// Start a slide if not airborne and not already sliding
    pub fn try_slide(&mut self, tuning: &PlayerTuning) -> bool {
        if self.jumping || self.sliding {
            return false;
        }
        self.sliding = true;
        self.slide_ticks = tuning.slide_ticks();
        true
    }

    /// Count down an active slide
    pub fn tick_slide(&mut self) {
        if !self.sliding {
            return;
        }
        self.slide_ticks = self.slide_ticks.saturating_sub(1);
        if self.slide_ticks == 0 {
            self.sliding = false;
        }
    }

    /// Horizontal acceleration, friction and wall stop
    pub fn update_horizontal(
        &mut self,
        left: bool,
        right: bool,
        tuning: &PlayerTuning,
        viewport_width: f32,
    ) {
        if left {
            self.vel.x = (self.vel.x - tuning.acceleration).max(-tuning.max_speed);
        } else if right {
            self.vel.x = (self.vel.x + tuning.acceleration).min(tuning.max_speed);
        } else {
            self.vel.x *= tuning.friction;
            if self.vel.x.abs() < tuning.stop_epsilon {
                self.vel.x = 0.0;
            }
        }

        self.pos.x += self.vel.x;

        let max_x = (viewport_width - self.width).max(0.0);
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
        }
        if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }
    }

    /// Gravity while airborne; lands on `ground_y`
    pub fn update_vertical(&mut self, tuning: &PlayerTuning, ground_y: f32) {
        if !self.jumping {
            return;
        }
        self.vel.y += tuning.gravity;
        self.pos.y += self.vel.y;

        if self.pos.y >= ground_y {
            self.pos.y = ground_y;
            self.jumping = false;
            self.vel.y = 0.0;
        }
    }
}

/// Apply the tick's jump/slide requests, emitting events for accepted ones
pub fn apply_actions(state: &mut GameState, jump: bool, slide: bool) {
    let tuning = &state.tuning.player;
    if jump && state.player.try_jump(tuning) {
        state.events.push(GameEvent::Jumped);
    }
    if slide && state.player.try_slide(tuning) {
        state.events.push(GameEvent::Slid);
    }
}

/// Integrate the player for one tick
pub fn update_player(state: &mut GameState, left: bool, right: bool) {
    let ground_y = state.ground_y();
    let width = state.viewport.width;
    let tuning = &state.tuning.player;
    state.player.tick_slide();
    state.player.update_horizontal(left, right, tuning, width);
    state.player.update_vertical(tuning, ground_y);
}

/// Scroll the skyline, wrapping elements that leave on the left
pub fn update_background(state: &mut GameState) {
    let speed = state.scroll_speed;
    let width = state.viewport.width;
    let rng = &mut state.rng;
    for element in &mut state.background {
        element.pos.x -= speed * element.parallax();
        if element.needs_wrap() {
            element.pos.x = width + rng.random::<f32>() * 100.0;
        }
    }
}

/// Scroll obstacles left and drop the ones that left the screen
///
/// Each hazard that scrolls off without being hit is worth the pass bonus.
pub fn update_obstacles(state: &mut GameState) {
    let speed = state.scroll_speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }

    let mut passed = Vec::new();
    state.obstacles.retain(|o| {
        if !o.is_offscreen() {
            return true;
        }
        if o.kind.is_hazard() {
            passed.push(o.kind);
        }
        false
    });

    for kind in passed {
        state.score = state.score.saturating_add(state.tuning.pass_bonus);
        state.events.push(GameEvent::HazardPassed { kind });
    }
}

/// Move particles and expire dead ones
pub fn update_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CollectibleKind, ObstacleKind};
    use crate::sim::spawn::build_obstacle;

    fn tuning() -> PlayerTuning {
        PlayerTuning::default()
    }

    #[test]
    fn test_acceleration_caps_at_max_speed() {
        let mut player = Player::new(100.0, 320.0, 40.0, 40.0);
        for _ in 0..20 {
            player.update_horizontal(false, true, &tuning(), 800.0);
        }
        assert_eq!(player.vel.x, 5.0);

        for _ in 0..40 {
            player.update_horizontal(true, false, &tuning(), 800.0);
        }
        assert_eq!(player.vel.x, 0.0, "wall stop zeroes velocity");
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let mut player = Player::new(100.0, 320.0, 40.0, 40.0);
        player.vel.x = 2.0;
        player.update_horizontal(false, false, &tuning(), 800.0);
        assert!((player.vel.x - 1.6).abs() < 1e-5);
        for _ in 0..20 {
            player.update_horizontal(false, false, &tuning(), 800.0);
        }
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_right_wall_clamp() {
        let mut player = Player::new(755.0, 320.0, 40.0, 40.0);
        player.vel.x = 5.0;
        player.update_horizontal(false, true, &tuning(), 800.0);
        assert_eq!(player.pos.x, 760.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_jump_arc_lands_on_ground() {
        let mut player = Player::new(100.0, 320.0, 40.0, 40.0);
        assert!(player.try_jump(&tuning()));
        assert_eq!(player.vel.y, -12.0);
        assert!(!player.try_jump(&tuning()), "no double jump");

        let mut apex = player.pos.y;
        let mut ticks = 0;
        while player.jumping {
            player.update_vertical(&tuning(), 320.0);
            apex = apex.min(player.pos.y);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(player.pos.y, 320.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(apex < 320.0 - 130.0);
    }

    #[test]
    fn test_jump_slide_exclusion() {
        let mut player = Player::new(100.0, 320.0, 40.0, 40.0);
        assert!(player.try_slide(&tuning()));
        assert!(!player.try_jump(&tuning()), "cannot jump while sliding");
        assert!(!player.try_slide(&tuning()), "cannot re-trigger slide");

        let mut player = Player::new(100.0, 320.0, 40.0, 40.0);
        assert!(player.try_jump(&tuning()));
        assert!(!player.try_slide(&tuning()), "cannot slide while jumping");
    }

    #[test]
    fn test_slide_expires_after_duration() {
        let mut player = Player::new(100.0, 320.0, 40.0, 40.0);
        player.try_slide(&tuning());
        for _ in 0..29 {
            player.tick_slide();
        }
        assert!(player.sliding);
        player.tick_slide();
        assert!(!player.sliding);
    }

    #[test]
    fn test_passed_hazard_scores_collectible_does_not() {
        let mut state = GameState::new(11);
        let mut hazard = build_obstacle(&mut state, ObstacleKind::Box);
        hazard.pos.x = -38.0;
        let mut chip =
            build_obstacle(&mut state, ObstacleKind::Collectible(CollectibleKind::CyberChip));
        chip.pos.x = -18.0;
        state.obstacles.push(hazard);
        state.obstacles.push(chip);
        state.events.clear();

        update_obstacles(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(
            state.events,
            vec![GameEvent::HazardPassed {
                kind: ObstacleKind::Box
            }]
        );
    }

    #[test]
    fn test_adjacent_offscreen_obstacles_all_removed() {
        let mut state = GameState::new(11);
        for _ in 0..3 {
            let mut o = build_obstacle(&mut state, ObstacleKind::Laser);
            o.pos.x = -60.0;
            state.obstacles.push(o);
        }
        update_obstacles(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_background_wraps() {
        let mut state = GameState::new(2);
        for element in &mut state.background {
            element.pos.x = -500.0;
        }
        update_background(&mut state);
        let width = state.viewport.width;
        assert!(state.background.iter().all(|b| b.pos.x >= width && b.pos.x < width + 100.0));
    }
}
