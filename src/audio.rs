//! Audio system using Web Audio API
//!
//! Sound effects are procedurally generated; only the background loop is
//! streamed from a file. Every failure is swallowed so the game runs silently
//! when audio is unavailable.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::driver::{AudioCue, AudioSink};
use crate::settings::Settings;

/// Background music file, relative to the page
const MUSIC_SRC: &str = "audio/run.mp3";

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    sfx_gain: f32,
    music_gain: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }

        let music = HtmlAudioElement::new_with_src(MUSIC_SRC).ok();
        match &music {
            Some(el) => {
                el.set_loop(true);
                el.set_volume(settings.music_gain() as f64);
            }
            None => log::warn!("Background music unavailable"),
        }

        Self {
            ctx,
            music,
            sfx_gain: settings.sfx_gain(),
            music_gain: settings.music_gain(),
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(el) = &self.music {
            el.set_muted(muted);
        }
    }

    fn effective_sfx(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_gain }
    }

    fn effective_music(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_gain }
    }

    fn start_music(&self) {
        let Some(el) = &self.music else { return };
        el.set_volume(self.effective_music() as f64);
        el.set_current_time(0.0);
        // Rejected when autoplay is blocked; nothing to do about it
        let _ = el.play();
    }

    fn stop_music(&self) {
        if let Some(el) = &self.music {
            let _ = el.pause();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Jump - quick upward chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Cyber chip - bright arpeggio
    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [800.0, 1000.0, 1200.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Malware - glitchy descending buzz
    fn play_malware(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency().set_value_at_time(120.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(350.0, t + 0.08).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        // Low rumble underneath
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: AudioCue) {
        match cue {
            AudioCue::MusicStart => return self.start_music(),
            AudioCue::MusicStop => return self.stop_music(),
            _ => {}
        }

        let vol = self.effective_sfx();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            AudioCue::Jump => self.play_jump(ctx, vol),
            AudioCue::Pickup => self.play_pickup(ctx, vol),
            AudioCue::Malware => self.play_malware(ctx, vol),
            AudioCue::MusicStart | AudioCue::MusicStop => {}
        }
    }
}
