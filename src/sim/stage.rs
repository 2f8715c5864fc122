//! Stage progression and lifecycle transitions
//!
//! ```text
//! Running --score >= target, stage < 5--> StageClear --continue--> Running
//! Running --score >= target, stage = 5--> GameOver { cleared: true }
//! Running --hazard hit------------------> GameOver { cleared: false }
//! GameOver --restart--> Running (stage 1 if cleared, same stage otherwise)
//! ```

use super::spawn::generate_background;
use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::consts::FINAL_STAGE;

/// Check the score against the stage target after collisions
///
/// Only acts while running, so a hazard hit on the same tick stays a loss.
pub fn check_progress(state: &mut GameState) -> GamePhase {
    if !state.phase.is_running() || state.score < state.target_score {
        return state.phase;
    }

    if state.on_final_stage() {
        log::info!("all stages cleared with score {}", state.score);
        state.phase = GamePhase::GameOver { cleared: true };
        state.events.push(GameEvent::GameCleared);
    } else {
        let cleared = state.stage;
        state.stage += 1;
        state.target_score = state.tuning.stage(state.stage).target_score;
        state.scroll_speed += state.tuning.speed_increment;
        state.phase = GamePhase::StageClear;
        log::info!(
            "stage {} cleared with score {}; next target {} at speed {:.1}",
            cleared,
            state.score,
            state.target_score,
            state.scroll_speed
        );
        state.events.push(GameEvent::StageCleared { stage: cleared });
    }
    state.phase
}

impl GameState {
    /// Begin a fresh run at `stage` (clamped to the valid range)
    pub fn start_game(&mut self, stage: u32) {
        let stage = stage.clamp(1, FINAL_STAGE);
        self.stage = stage;
        self.score = 0;
        self.target_score = self.tuning.stage(stage).target_score;
        self.scroll_speed = self.tuning.speed_for_stage(stage);
        self.player = Player::new(
            self.tuning.player.start_x,
            self.ground_y(),
            self.tuning.player.width,
            self.tuning.player.height,
        );
        self.reset_stage_elements();
        self.phase = GamePhase::Running;
        log::info!(
            "stage {} started (target {}, speed {:.1})",
            stage,
            self.target_score,
            self.scroll_speed
        );
        self.events.push(GameEvent::StageStarted { stage });
    }

    /// Leave the stage-clear pause and play the next stage
    ///
    /// Returns false (and changes nothing) unless the game is in `StageClear`.
    pub fn continue_to_next_stage(&mut self) -> bool {
        if self.phase != GamePhase::StageClear {
            return false;
        }
        self.score = 0;
        self.reset_stage_elements();
        self.phase = GamePhase::Running;
        log::info!("continuing to stage {}", self.stage);
        self.events.push(GameEvent::StageStarted { stage: self.stage });
        true
    }

    /// Restart after a game over
    ///
    /// A cleared game starts again from stage 1; a lost run retries its stage.
    /// Returns the stage that was started, or `None` (changing nothing) unless
    /// the game is over.
    pub fn restart(&mut self) -> Option<u32> {
        let stage = match self.phase {
            GamePhase::GameOver { cleared: true } => 1,
            GamePhase::GameOver { cleared: false } => self.stage,
            GamePhase::Running | GamePhase::StageClear => return None,
        };
        self.start_game(stage);
        Some(stage)
    }

    /// Clear obstacles, particles and the skyline, then regenerate the skyline
    fn reset_stage_elements(&mut self) {
        self.obstacles.clear();
        self.particles.clear();
        self.background.clear();
        generate_background(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ObstacleKind, Particle};
    use crate::sim::spawn::build_obstacle;
    use glam::Vec2;

    fn populate(state: &mut GameState) {
        let o = build_obstacle(state, ObstacleKind::Box);
        state.obstacles.push(o);
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 10,
            size: 2.0,
        });
    }

    #[test]
    fn test_stage_one_clear() {
        let mut state = GameState::new(1);
        assert_eq!(state.target_score, 200);
        state.score = 199;
        assert_eq!(check_progress(&mut state), GamePhase::Running);
        state.score = 200;
        assert_eq!(check_progress(&mut state), GamePhase::StageClear);
        assert_eq!(state.stage, 2);
        assert_eq!(state.target_score, 400);
        assert_eq!(state.scroll_speed, 3.5);
        assert_eq!(state.score, 200, "score frozen until continue");
    }

    #[test]
    fn test_final_stage_wins() {
        let mut state = GameState::new(1);
        state.start_game(5);
        assert_eq!(state.score, 0);
        assert_eq!(state.target_score, 1000);
        state.score = 1040;
        assert_eq!(
            check_progress(&mut state),
            GamePhase::GameOver { cleared: true }
        );
        assert_eq!(state.stage, 5);
        assert!(state.events.contains(&GameEvent::GameCleared));
    }

    #[test]
    fn test_no_progress_after_loss() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver { cleared: false };
        state.score = 500;
        assert_eq!(
            check_progress(&mut state),
            GamePhase::GameOver { cleared: false }
        );
        assert_eq!(state.stage, 1);
    }

    #[test]
    fn test_continue_resets_and_keeps_speed() {
        let mut state = GameState::new(1);
        state.score = 250;
        check_progress(&mut state);
        populate(&mut state);

        assert!(state.continue_to_next_stage());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stage, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_speed, 3.5);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
        assert!(!state.background.is_empty());
    }

    #[test]
    fn test_continue_twice_is_noop() {
        let mut state = GameState::new(1);
        state.score = 200;
        check_progress(&mut state);
        assert!(state.continue_to_next_stage());
        populate(&mut state);
        state.score = 40;

        assert!(!state.continue_to_next_stage());
        assert_eq!(state.score, 40);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.stage, 2);
    }

    #[test]
    fn test_restart_after_loss_retries_stage() {
        let mut state = GameState::new(1);
        state.start_game(3);
        state.scroll_speed = 9.0;
        state.score = 120;
        populate(&mut state);
        state.phase = GamePhase::GameOver { cleared: false };

        assert_eq!(state.restart(), Some(3));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_speed, 4.0);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_restart_after_win_goes_to_stage_one() {
        let mut state = GameState::new(1);
        state.start_game(5);
        state.score = 1000;
        check_progress(&mut state);
        assert_eq!(state.restart(), Some(1));
        assert_eq!(state.stage, 1);
        assert_eq!(state.target_score, 200);
        assert_eq!(state.scroll_speed, 3.0);
    }

    #[test]
    fn test_restart_ignored_unless_game_over() {
        let mut state = GameState::new(1);
        state.start_game(2);
        state.score = 150;
        populate(&mut state);

        assert_eq!(state.restart(), None);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 150);
        assert_eq!(state.obstacles.len(), 1);

        state.score = 400;
        check_progress(&mut state);
        assert_eq!(state.phase, GamePhase::StageClear);
        assert_eq!(state.restart(), None);
        assert_eq!(state.phase, GamePhase::StageClear);
        assert_eq!(state.stage, 3);
        assert_eq!(state.score, 400);
    }

    #[test]
    fn test_start_game_clamps_stage() {
        let mut state = GameState::new(1);
        state.start_game(0);
        assert_eq!(state.stage, 1);
        state.start_game(99);
        assert_eq!(state.stage, 5);
    }
}
