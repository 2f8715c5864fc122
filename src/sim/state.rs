//! Game state and core simulation types
//!
//! Everything the tick mutates lives here, owned by a single [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::Viewport;
use crate::consts::FINAL_STAGE;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Stage target reached; waiting for the continue action
    StageClear,
    /// Run ended (`cleared` = every stage beaten)
    GameOver { cleared: bool },
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }
}

/// Things that happened during a tick, drained by the driver each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run (or stage) began at the given stage
    StageStarted { stage: u32 },
    Jumped,
    Slid,
    /// A hazard scrolled off-screen without touching the player
    HazardPassed { kind: ObstacleKind },
    /// A collectible was picked up; `value` is the signed score delta
    Collected { kind: CollectibleKind, value: i32 },
    /// The player ran into a hazard
    HazardHit { kind: ObstacleKind },
    /// `stage` was cleared and the next one is queued
    StageCleared { stage: u32 },
    /// The final stage was cleared
    GameCleared,
}

/// Collectible flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Beneficial pickup
    CyberChip,
    /// Harmful pickup
    Malware,
}

impl CollectibleKind {
    pub fn is_beneficial(&self) -> bool {
        matches!(self, CollectibleKind::CyberChip)
    }

    /// Side length of the square pickup
    pub fn size(&self) -> f32 {
        match self {
            CollectibleKind::CyberChip => 20.0,
            CollectibleKind::Malware => 25.0,
        }
    }

    /// Signed score delta applied on pickup
    pub fn value(&self) -> i32 {
        match self {
            CollectibleKind::CyberChip => 50,
            CollectibleKind::Malware => -100,
        }
    }
}

/// Obstacle and item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Ground-level crate
    Box,
    /// Thin beam at jump height
    Laser,
    /// Floating platform high above the ground
    FloatingBlock,
    /// Tall, wide ground block
    WideBlock,
    Collectible(CollectibleKind),
}

impl ObstacleKind {
    /// Every hazard kind, in spawn-table order
    pub const HAZARDS: [ObstacleKind; 4] = [
        ObstacleKind::Box,
        ObstacleKind::Laser,
        ObstacleKind::FloatingBlock,
        ObstacleKind::WideBlock,
    ];

    /// Returns true if touching this kind ends the run
    pub fn is_hazard(&self) -> bool {
        !matches!(self, ObstacleKind::Collectible(_))
    }

    /// Fixed hazard geometry: (offset of top edge above the viewport bottom, width, height)
    pub fn hazard_geometry(&self) -> Option<(f32, f32, f32)> {
        match self {
            ObstacleKind::Box => Some((60.0, 40.0, 40.0)),
            ObstacleKind::Laser => Some((120.0, 60.0, 10.0)),
            ObstacleKind::FloatingBlock => Some((160.0, 80.0, 30.0)),
            ObstacleKind::WideBlock => Some((100.0, 120.0, 80.0)),
            ObstacleKind::Collectible(_) => None,
        }
    }
}

/// An obstacle or collectible scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Score delta for collectibles (0 for hazards)
    pub value: i32,
    /// Glow strength for the renderer (lasers and floating blocks)
    #[serde(default)]
    pub glow: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Fully past the left edge of the screen
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.width < 0.0
    }
}

/// The player's robot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub jumping: bool,
    pub sliding: bool,
    /// Ticks left before the slide ends
    pub slide_ticks: u32,
}

impl Player {
    pub fn new(x: f32, ground_y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_y),
            vel: Vec2::ZERO,
            width,
            height,
            jumping: false,
            sliding: false,
            slide_ticks: 0,
        }
    }
}

/// Decorative layer kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BackgroundKind {
    Building {
        width: f32,
        height: f32,
        hue: f32,
        lightness: f32,
    },
    Neon {
        size: f32,
        color_index: u8,
        alpha: f32,
    },
}

/// A parallax background element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundElement {
    pub kind: BackgroundKind,
    pub pos: Vec2,
}

impl BackgroundElement {
    /// Fraction of the scroll speed this layer moves at
    pub fn parallax(&self) -> f32 {
        match self.kind {
            BackgroundKind::Building { .. } => 0.3,
            BackgroundKind::Neon { .. } => 0.5,
        }
    }

    /// Past the left edge and due to wrap around
    pub fn needs_wrap(&self) -> bool {
        match self.kind {
            BackgroundKind::Building { width, .. } => self.pos.x + width < 0.0,
            BackgroundKind::Neon { .. } => self.pos.x < 0.0,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Starting life of a thruster particle (ticks)
pub const PARTICLE_LIFE: u32 = 30;

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG driving spawns and cosmetics
    pub(crate) rng: Pcg32,
    /// Balance tables
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Current stage (1-based, never above the final stage)
    pub stage: u32,
    /// Score (floors at 0)
    pub score: u32,
    /// Score needed to clear the current stage
    pub target_score: u32,
    /// Pixels per tick that obstacles move left
    pub scroll_speed: f32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active obstacles and items (insertion order = spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Parallax city skyline
    pub background: Vec<BackgroundElement>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game at stage 1 with default tuning and viewport
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Viewport::default())
    }

    /// Create a new game at stage 1
    ///
    /// An invalid `tuning` is replaced by the defaults.
    pub fn with_config(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        let player = Player::new(
            tuning.player.start_x,
            viewport.ground_y(),
            tuning.player.width,
            tuning.player.height,
        );
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            target_score: tuning.stage(1).target_score,
            scroll_speed: tuning.speed_for_stage(1),
            tuning,
            viewport,
            stage: 1,
            score: 0,
            phase: GamePhase::Running,
            time_ticks: 0,
            player,
            obstacles: Vec::new(),
            particles: Vec::new(),
            background: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.start_game(1);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resting y of the player's top edge
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport.ground_y()
    }

    /// Apply a signed score delta, flooring at zero
    pub fn add_score(&mut self, delta: i32) {
        let score = i64::from(self.score) + i64::from(delta);
        self.score = score.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// True once the final stage has been reached
    pub fn on_final_stage(&self) -> bool {
        self.stage >= FINAL_STAGE
    }

    /// Adopt a new viewport (canvas resize)
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.player.jumping {
            self.player.pos.y = viewport.ground_y();
        }
        let max_x = (viewport.width - self.player.width).max(0.0);
        self.player.pos.x = self.player.pos.x.clamp(0.0, max_x);
        super::spawn::generate_background(self);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.stage, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.target_score, 200);
        assert_eq!(state.scroll_speed, 3.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.pos.x, 100.0);
        assert_eq!(state.player.pos.y, state.ground_y());
        assert!(state.obstacles.is_empty());
        assert!(!state.background.is_empty());
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let tuning = Tuning {
            stages: Vec::new(),
            ..Tuning::default()
        };
        let state = GameState::with_config(3, tuning, Viewport::default());
        assert_eq!(state.tuning, Tuning::default());
        assert_eq!(state.target_score, 200);
    }

    #[test]
    fn test_add_score_floors_at_zero() {
        let mut state = GameState::new(1);
        state.add_score(50);
        assert_eq!(state.score, 50);
        state.add_score(-100);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hazard_kinds() {
        for kind in ObstacleKind::HAZARDS {
            assert!(kind.is_hazard());
            assert!(kind.hazard_geometry().is_some());
        }
        let chip = ObstacleKind::Collectible(CollectibleKind::CyberChip);
        assert!(!chip.is_hazard());
        assert!(chip.hazard_geometry().is_none());
    }

    #[test]
    fn test_resize_snaps_grounded_player() {
        let mut state = GameState::new(3);
        state.player.pos.x = 700.0;
        state.resize(Viewport::new(400.0, 200.0));
        assert_eq!(state.player.pos.y, 120.0);
        assert_eq!(state.player.pos.x, 360.0);
    }
}
