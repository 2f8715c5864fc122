//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard and on-screen buttons)

pub mod input;

pub use input::{Button, InputState};
