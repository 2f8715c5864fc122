//! End-to-end runs through `GameLoop` with recording sinks

use neon_runner::sim::spawn::build_obstacle;
use neon_runner::sim::{GamePhase, GameState, ObstacleKind};
use neon_runner::{
    AudioCue, AudioSink, FrameOutcome, GameLoop, HudSnapshot, RenderSink, Tuning, Viewport,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
struct RecordingRender {
    frames: usize,
    huds: Vec<HudSnapshot>,
}

impl RenderSink for RecordingRender {
    fn render(&mut self, _state: &GameState) {
        self.frames += 1;
    }

    fn show_hud(&mut self, hud: &HudSnapshot) {
        self.huds.push(*hud);
    }
}

#[derive(Default)]
struct RecordingAudio(Vec<AudioCue>);

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.0.push(cue);
    }
}

struct Harness {
    game: GameLoop,
    render: RecordingRender,
    audio: RecordingAudio,
    now_ms: f64,
}

impl Harness {
    fn new(state: GameState) -> Self {
        Self {
            game: GameLoop::new(state),
            render: RecordingRender::default(),
            audio: RecordingAudio::default(),
            now_ms: 0.0,
        }
    }

    fn frame(&mut self) -> FrameOutcome {
        self.now_ms += FRAME_MS;
        self.game.frame(self.now_ms, &mut self.render, &mut self.audio)
    }

    fn crash_into_box(&mut self) {
        let state = &mut self.game.state;
        let mut b = build_obstacle(state, ObstacleKind::Box);
        b.pos.x = state.player.pos.x;
        state.obstacles.push(b);
        assert_eq!(self.frame(), FrameOutcome::Halt);
    }
}

#[test]
fn restart_after_loss_retries_the_same_stage() {
    let mut h = Harness::new(GameState::new(7));
    h.game.state.score = 200;
    assert_eq!(h.frame(), FrameOutcome::Halt);
    assert!(h.game.continue_to_next_stage());
    h.frame();
    h.game.state.score = 120;

    h.crash_into_box();
    assert_eq!(h.game.state.phase, GamePhase::GameOver { cleared: false });
    assert_eq!(h.render.huds.last().map(|hud| hud.score), Some(120));
    assert_eq!(h.render.frames, h.render.huds.len());

    h.audio.0.clear();
    assert_eq!(h.game.restart(), Some(2));
    assert_eq!(h.game.state.score, 0);
    assert!(h.game.state.obstacles.is_empty());
    assert!(h.game.state.particles.is_empty());
    assert_eq!(h.game.state.player.pos.x, h.game.state.tuning.player.start_x);

    assert_eq!(h.frame(), FrameOutcome::Continue);
    assert_eq!(h.audio.0.first(), Some(&AudioCue::MusicStart));
    let hud = h.game.hud();
    assert_eq!((hud.stage, hud.target_score), (2, 400));
}

#[test]
fn winning_then_restart_goes_back_to_stage_one() {
    let mut state = GameState::new(3);
    state.start_game(5);
    let mut h = Harness::new(state);
    h.game.state.score = 1000;
    assert_eq!(h.frame(), FrameOutcome::Halt);
    assert_eq!(h.game.state.phase, GamePhase::GameOver { cleared: true });
    assert!(h.audio.0.contains(&AudioCue::MusicStop));

    assert!(!h.game.continue_to_next_stage());
    assert_eq!(h.game.restart(), Some(1));
    assert_eq!(h.game.hud().target_score, 200);
}

#[test]
fn continue_is_idempotent() {
    let mut h = Harness::new(GameState::new(11));
    h.game.state.score = 250;
    assert_eq!(h.frame(), FrameOutcome::Halt);
    assert_eq!(h.game.state.phase, GamePhase::StageClear);
    assert_eq!(h.game.restart(), None, "restart only applies after a game over");
    assert_eq!(h.game.state.phase, GamePhase::StageClear);

    assert!(h.game.continue_to_next_stage());
    let stage = h.game.state.stage;
    let speed = h.game.state.scroll_speed;
    assert!(!h.game.continue_to_next_stage());
    assert_eq!(h.game.state.stage, stage);
    assert_eq!(h.game.state.scroll_speed, speed);
    assert_eq!(h.game.state.score, 0);
}

#[test]
fn autopilot_session_is_reproducible() {
    let run = |seed: u64| {
        let mut h = Harness::new(GameState::new(seed));
        h.game.input.autopilot = true;
        for _ in 0..3000 {
            if h.frame() == FrameOutcome::Halt && !h.game.continue_to_next_stage() {
                break;
            }
        }
        (h.game.hud(), h.game.state.time_ticks, h.audio.0.len())
    };
    assert_eq!(run(2024), run(2024));
}

#[test]
fn tuning_override_drives_targets() {
    let tuning = Tuning::from_json(
        r#"{ "stages": [
            { "target_score": 20, "obstacle_chance": 0.02, "item_chance": 0.0, "unlocks": [] },
            { "target_score": 40, "obstacle_chance": 0.02, "item_chance": 0.0, "unlocks": [] },
            { "target_score": 60, "obstacle_chance": 0.02, "item_chance": 0.0, "unlocks": [] },
            { "target_score": 80, "obstacle_chance": 0.02, "item_chance": 0.0, "unlocks": [] },
            { "target_score": 100, "obstacle_chance": 0.02, "item_chance": 0.0, "unlocks": [] }
        ] }"#,
    )
    .expect("valid tuning");
    let viewport = Viewport::fit(600.0, 1000.0);
    let mut h = Harness::new(GameState::with_config(1, tuning, viewport));
    assert_eq!(h.game.hud().target_score, 20);
    assert_eq!(h.game.state.player.pos.y, 300.0 - 80.0);

    h.game.state.score = 20;
    assert_eq!(h.frame(), FrameOutcome::Halt);
    assert_eq!(h.game.hud().target_score, 20);
    assert!(h.game.continue_to_next_stage());
    assert_eq!(h.game.hud().target_score, 40);
}
