//! Keyboard and on-screen button mapping
//!
//! Browser handlers feed raw key names and button presses in; the game loop
//! reads a [`TickInput`] back out once per frame.

use crate::sim::TickInput;

/// On-screen control buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Jump,
    Slide,
}

/// Accumulated input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Movement keys currently held (by key name)
    held_keys: Vec<String>,
    left_button: bool,
    right_button: bool,
    jump_queued: bool,
    slide_queued: bool,
    autopilot: bool,
}

fn is_left_key(key: &str) -> bool {
    matches!(key, "ArrowLeft" | "a")
}

fn is_right_key(key: &str) -> bool {
    matches!(key, "ArrowRight" | "d")
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keydown; returns true if the key belongs to the game
    /// (the caller should suppress the browser default)
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            " " | "ArrowUp" => {
                self.jump_queued = true;
                true
            }
            "ArrowDown" => {
                self.slide_queued = true;
                true
            }
            k if is_left_key(k) || is_right_key(k) => {
                if !self.held_keys.iter().any(|h| h == k) {
                    self.held_keys.push(k.to_string());
                }
                true
            }
            "i" | "I" => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
                false
            }
            _ => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.held_keys.retain(|h| h != key);
    }

    /// Touch/mouse press on a control button
    pub fn press(&mut self, button: Button) {
        match button {
            Button::Left => self.left_button = true,
            Button::Right => self.right_button = true,
            Button::Jump => self.jump_queued = true,
            Button::Slide => self.slide_queued = true,
        }
    }

    /// Touch/mouse release; releasing either arrow stops all button movement
    pub fn release(&mut self, button: Button) {
        if matches!(button, Button::Left | Button::Right) {
            self.left_button = false;
            self.right_button = false;
        }
    }

    /// Drop everything held (window blur)
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.left_button = false;
        self.right_button = false;
        self.jump_queued = false;
        self.slide_queued = false;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn moving_left(&self) -> bool {
        self.left_button || self.held_keys.iter().any(|k| is_left_key(k))
    }

    pub fn moving_right(&self) -> bool {
        self.right_button || self.held_keys.iter().any(|k| is_right_key(k))
    }

    /// Copy held state into `input` and hand over queued one-shots
    ///
    /// Queued jump/slide are OR-ed in so a request survives frames that run
    /// no tick; the loop clears them once consumed.
    pub fn write_into(&mut self, input: &mut TickInput) {
        input.move_left = self.moving_left();
        input.move_right = self.moving_right();
        input.autopilot = self.autopilot;
        input.jump |= std::mem::take(&mut self.jump_queued);
        input.slide |= std::mem::take(&mut self.slide_queued);
    }
}
