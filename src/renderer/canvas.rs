//! Canvas 2D backend and DOM HUD

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::scene::{DrawCmd, build_scene};
use crate::Viewport;
use crate::driver::{HudSnapshot, RenderSink};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Draws scenes onto a `<canvas>` and mirrors the HUD into the page
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    document: Document,
    pub settings: Settings,
    /// Last HUD shown, to skip redundant DOM writes
    last_hud: Option<HudSnapshot>,
}

impl CanvasRenderer {
    /// Wrap `canvas`; `None` if a 2D context is unavailable
    pub fn new(canvas: HtmlCanvasElement, settings: Settings) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let document = web_sys::window()?.document()?;
        Some(Self {
            canvas,
            ctx,
            document,
            settings,
            last_hud: None,
        })
    }

    /// Match the backing store and CSS size to `viewport`
    pub fn resize(&self, viewport: Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));
    }

    fn execute(&self, cmd: &DrawCmd, width: f64, height: f64) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Gradient { stops } => {
                let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
                for (offset, color) in stops {
                    let _ = gradient.add_color_stop(*offset, &color.to_css());
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            DrawCmd::Rect { rect, color, glow } => {
                self.set_glow(*glow, &color.to_css());
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(
                    rect.x as f64,
                    rect.y as f64,
                    rect.width as f64,
                    rect.height as f64,
                );
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
                glow,
            } => {
                self.set_glow(*glow, &color.to_css());
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                ctx.fill();
            }
            DrawCmd::Diamond { rect, color, glow } => {
                let (x, y) = (rect.x as f64, rect.y as f64);
                let (w, h) = (rect.width as f64, rect.height as f64);
                self.set_glow(*glow, &color.to_css());
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                ctx.move_to(x + w / 2.0, y);
                ctx.line_to(x + w, y + h / 2.0);
                ctx.line_to(x + w / 2.0, y + h);
                ctx.line_to(x, y + h / 2.0);
                ctx.close_path();
                ctx.fill();
            }
            DrawCmd::Text {
                text,
                pos,
                size,
                color,
            } => {
                self.set_glow(0.0, "");
                ctx.set_fill_style_str(&color.to_css());
                ctx.set_font(&format!("{}px Arial", size));
                ctx.set_text_align("center");
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
            DrawCmd::Line {
                from,
                to,
                width: line_width,
                color,
            } => {
                self.set_glow(0.0, "");
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*line_width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
        }
    }

    fn set_glow(&self, blur: f32, color: &str) {
        if blur > 0.0 {
            self.ctx.set_shadow_blur(blur as f64);
            self.ctx.set_shadow_color(color);
        } else {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn show_overlays(&self, hud: &HudSnapshot) {
        match hud.phase {
            GamePhase::Running => {
                self.set_hidden("stageClear", true);
                self.set_hidden("gameOver", true);
            }
            GamePhase::StageClear => {
                self.set_text("stageClearScore", &hud.score.to_string());
                self.set_hidden("stageClear", false);
            }
            GamePhase::GameOver { cleared } => {
                let (title, message, button) = if cleared {
                    (
                        "Game Clear! Congratulations!".to_string(),
                        "You cleared every stage!".to_string(),
                        "Play from the start",
                    )
                } else {
                    (
                        "Game Over".to_string(),
                        format!("Final score: {}", hud.score),
                        "Play again",
                    )
                };
                if let Ok(Some(el)) = self.document.query_selector("#gameOver h2") {
                    el.set_text_content(Some(&title));
                }
                if let Ok(Some(el)) = self.document.query_selector("#gameOver p") {
                    el.set_text_content(Some(&message));
                }
                self.set_text("restartBtn", button);
                self.set_hidden("gameOver", false);
            }
        }
    }
}

impl RenderSink for CanvasRenderer {
    fn render(&mut self, state: &GameState) {
        let (w, h) = (state.viewport.width as f64, state.viewport.height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        for cmd in build_scene(state, &self.settings) {
            self.execute(&cmd, w, h);
        }
        self.set_glow(0.0, "");
    }

    fn show_hud(&mut self, hud: &HudSnapshot) {
        if self.last_hud.as_ref() == Some(hud) {
            return;
        }
        self.set_text("score", &hud.score.to_string());
        self.set_text("currentStageDisplay", &hud.stage.to_string());
        self.set_text("targetScoreDisplay", &hud.target_score.to_string());
        if self.last_hud.map(|h| h.phase) != Some(hud.phase) {
            self.show_overlays(hud);
        }
        self.last_hud = Some(*hud);
    }
}
