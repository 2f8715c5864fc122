//! Rendering module
//!
//! The scene builder is platform-independent; the Canvas 2D backend only
//! exists on the web.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod palette;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use palette::Color;
pub use scene::{DrawCmd, build_scene};
