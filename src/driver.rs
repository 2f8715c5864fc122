//! Frame-driven game loop
//!
//! The host calls [`GameLoop::frame`] once per display frame with its
//! timestamp. Elapsed time feeds a fixed-step accumulator, so the per-tick
//! physics constants play the same at 30, 60 or 144 Hz. Rendering, HUD and
//! audio are delegated to the sink traits.

use serde::Serialize;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{CollectibleKind, GameEvent, GamePhase, GameState, TickInput, tick};

/// Discrete sound cues emitted by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Jump,
    /// Beneficial pickup
    Pickup,
    /// Harmful pickup
    Malware,
    /// Background music on (stage start)
    MusicStart,
    /// Background music off (stage clear, game over)
    MusicStop,
}

impl AudioCue {
    /// Map a simulation event to the cue it should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::StageStarted { .. } => Some(AudioCue::MusicStart),
            GameEvent::Jumped => Some(AudioCue::Jump),
            GameEvent::Collected {
                kind: CollectibleKind::CyberChip,
                ..
            } => Some(AudioCue::Pickup),
            GameEvent::Collected {
                kind: CollectibleKind::Malware,
                ..
            } => Some(AudioCue::Malware),
            GameEvent::HazardHit { .. }
            | GameEvent::StageCleared { .. }
            | GameEvent::GameCleared => Some(AudioCue::MusicStop),
            GameEvent::Slid | GameEvent::HazardPassed { .. } => None,
        }
    }
}

/// Plays audio cues. Implementations must swallow their own failures.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Audio sink that drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// What the score/stage display needs each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u32,
    pub stage: u32,
    pub target_score: u32,
    pub phase: GamePhase,
}

impl HudSnapshot {
    /// Snapshot the display values
    ///
    /// During the stage-clear pause the state already points at the next
    /// stage; the display stays frozen on the stage just cleared.
    pub fn from_state(state: &GameState) -> Self {
        let (stage, target_score) = match state.phase {
            GamePhase::StageClear => {
                let cleared = state.stage.saturating_sub(1).max(1);
                (cleared, state.tuning.stage(cleared).target_score)
            }
            _ => (state.stage, state.target_score),
        };
        Self {
            score: state.score,
            stage,
            target_score,
            phase: state.phase,
        }
    }
}

/// Draws the game
pub trait RenderSink {
    fn render(&mut self, state: &GameState);

    /// Update the score/stage display
    fn show_hud(&mut self, _hud: &HudSnapshot) {}
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Stage clear or game over; wait for a lifecycle call
    Halt,
}

/// Owns the game state and turns host frames into fixed ticks
#[derive(Debug, Clone)]
pub struct GameLoop {
    pub state: GameState,
    /// Current input snapshot; jump/slide are cleared once a tick consumes them
    pub input: TickInput,
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl GameLoop {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            last_time_ms: None,
        }
    }

    /// Run one host frame at timestamp `now_ms`
    pub fn frame<R, A>(&mut self, now_ms: f64, render: &mut R, audio: &mut A) -> FrameOutcome
    where
        R: RenderSink + ?Sized,
        A: AudioSink + ?Sized,
    {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time_ms = Some(now_ms);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT
            && substeps < MAX_SUBSTEPS
            && self.state.phase.is_running()
        {
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.slide = false;
        }
        if !self.state.phase.is_running() {
            self.accumulator = 0.0;
        }

        render.render(&self.state);
        render.show_hud(&self.hud());

        for event in self.state.drain_events() {
            if let Some(cue) = AudioCue::for_event(&event) {
                audio.play(cue);
            }
        }

        if self.state.phase.is_running() {
            FrameOutcome::Continue
        } else {
            FrameOutcome::Halt
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::from_state(&self.state)
    }

    /// Start a new run at `stage`
    pub fn start_game(&mut self, stage: u32) {
        self.state.start_game(stage);
        self.rearm();
    }

    /// Resume after a stage clear; false if not in `StageClear`
    pub fn continue_to_next_stage(&mut self) -> bool {
        let resumed = self.state.continue_to_next_stage();
        if resumed {
            self.rearm();
        }
        resumed
    }

    /// Restart after a game over; returns the stage started, `None` if not over
    pub fn restart(&mut self) -> Option<u32> {
        let stage = self.state.restart()?;
        self.rearm();
        Some(stage)
    }

    /// Forget the paused interval and any stale one-shot input
    fn rearm(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
        self.input.jump = false;
        self.input.slide = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingRender {
        frames: usize,
        last_hud: Option<HudSnapshot>,
    }

    impl RenderSink for CountingRender {
        fn render(&mut self, _state: &GameState) {
            self.frames += 1;
        }

        fn show_hud(&mut self, hud: &HudSnapshot) {
            self.last_hud = Some(*hud);
        }
    }

    #[derive(Default)]
    struct RecordingAudio(Vec<AudioCue>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) {
            self.0.push(cue);
        }
    }

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut game = GameLoop::new(GameState::new(1));
        let mut render = CountingRender::default();
        let mut audio = RecordingAudio::default();
        let outcome = game.frame(1000.0, &mut render, &mut audio);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert_eq!(game.state.time_ticks, 1);
        assert_eq!(render.frames, 1);
        assert_eq!(audio.0, vec![AudioCue::MusicStart]);
        assert_eq!(render.last_hud.map(|h| h.target_score), Some(200));
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = GameLoop::new(GameState::new(1));
        let mut render = CountingRender::default();
        game.frame(0.0, &mut render, &mut SilentAudio);
        // A 5 second stall only advances by the clamp (100 ms = 6 ticks)
        game.frame(5000.0, &mut render, &mut SilentAudio);
        assert!(game.state.time_ticks <= 1 + 6);
        assert!(game.state.time_ticks >= 6);
    }

    #[test]
    fn test_one_shot_jump_consumed() {
        let mut game = GameLoop::new(GameState::new(1));
        let mut render = CountingRender::default();
        let mut audio = RecordingAudio::default();
        game.input.jump = true;
        game.frame(0.0, &mut render, &mut audio);
        assert!(!game.input.jump);
        assert!(game.state.player.jumping);
        assert!(audio.0.contains(&AudioCue::Jump));
    }

    #[test]
    fn test_halts_on_stage_clear_and_resumes() {
        let mut game = GameLoop::new(GameState::new(1));
        let mut render = CountingRender::default();
        let mut audio = RecordingAudio::default();
        game.state.score = 200;
        assert_eq!(game.frame(0.0, &mut render, &mut audio), FrameOutcome::Halt);
        assert_eq!(game.state.phase, GamePhase::StageClear);
        assert!(audio.0.contains(&AudioCue::MusicStop));

        // Display stays on the cleared stage while paused
        let hud = render.last_hud.expect("hud shown");
        assert_eq!((hud.score, hud.stage, hud.target_score), (200, 1, 200));
        assert_eq!(game.state.stage, 2);

        // Frames while halted do not tick
        let ticks = game.state.time_ticks;
        game.frame(16.0, &mut render, &mut audio);
        assert_eq!(game.state.time_ticks, ticks);

        assert!(game.continue_to_next_stage());
        assert!(!game.continue_to_next_stage());
        assert_eq!(
            game.frame(10_000.0, &mut render, &mut audio),
            FrameOutcome::Continue
        );
        let hud = render.last_hud.expect("hud shown");
        assert_eq!((hud.score, hud.stage, hud.target_score), (0, 2, 400));
        assert_eq!(game.state.time_ticks, ticks + 1, "re-armed clock skips the pause");
    }

    #[test]
    fn test_event_cue_mapping() {
        assert_eq!(AudioCue::for_event(&GameEvent::Slid), None);
        assert_eq!(
            AudioCue::for_event(&GameEvent::Collected {
                kind: CollectibleKind::Malware,
                value: -100
            }),
            Some(AudioCue::Malware)
        );
        assert_eq!(
            AudioCue::for_event(&GameEvent::GameCleared),
            Some(AudioCue::MusicStop)
        );
    }
}
