//! Neon Runner - A cyberpunk side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, stages)
//! - `driver`: Frame-driven game loop and presentation seams
//! - `tuning`: Data-driven game balance
//! - `renderer`: Draw-list generation and Canvas 2D backend
//! - `platform`: Browser input mapping
//! - `audio`: Web Audio cue playback

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod driver;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{AudioCue, AudioSink, FrameOutcome, GameLoop, HudSnapshot, RenderSink};
pub use settings::{QualityPreset, Settings};
pub use tuning::{StageConfig, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the per-tick constants were tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed timestep in milliseconds
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame interval fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport (2:1 aspect, capped at 800 px wide)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 400.0;
    pub const VIEWPORT_ASPECT: f32 = 2.0;

    /// Player top edge sits this far above the bottom of the viewport when grounded
    pub const PLAYER_GROUND_OFFSET: f32 = 80.0;
    /// Height of the ground strip drawn at the bottom of the viewport
    pub const GROUND_STRIP_HEIGHT: f32 = 20.0;

    /// Final stage; clearing it wins the game
    pub const FINAL_STAGE: u32 = 5;
}

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: consts::VIEWPORT_WIDTH,
            height: consts::VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fit a 2:1 viewport inside the available area, capping width at 800 px
    pub fn fit(available_width: f32, available_height: f32) -> Self {
        let mut width = available_width.min(consts::VIEWPORT_WIDTH);
        let mut height = width / consts::VIEWPORT_ASPECT;
        if height > available_height {
            height = available_height;
            width = height * consts::VIEWPORT_ASPECT;
        }
        Self { width, height }
    }

    /// Resting y of the player's top edge
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - consts::PLAYER_GROUND_OFFSET
    }
}
