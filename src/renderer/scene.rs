//! Draw-list generation
//!
//! Turns a [`GameState`] into backend-agnostic drawing commands. Flicker
//! effects use a hash of the tick counter instead of the simulation RNG, so
//! drawing never perturbs gameplay.

use glam::Vec2;

use super::palette::{self, Color};
use crate::consts::{GROUND_STRIP_HEIGHT, SIM_DT_MS};
use crate::settings::Settings;
use crate::sim::state::PARTICLE_LIFE;
use crate::sim::{BackgroundKind, CollectibleKind, GameState, ObstacleKind, Rect, player_hitbox};

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Full-screen vertical gradient (offset 0..1, color)
    Gradient { stops: [(f32, Color); 3] },
    Rect { rect: Rect, color: Color, glow: f32 },
    Circle { center: Vec2, radius: f32, color: Color, glow: f32 },
    /// Rhombus inscribed in `rect`
    Diamond { rect: Rect, color: Color, glow: f32 },
    /// Centered text
    Text { text: &'static str, pos: Vec2, size: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
}

/// Cheap deterministic hash to [0, 1)
fn flicker(tick: u64, a: u32, b: u32) -> f32 {
    let hash = (tick as u32)
        .wrapping_mul(2654435761)
        .wrapping_add(a.wrapping_mul(7919))
        .wrapping_add(b.wrapping_mul(104729));
    let hash = hash ^ (hash >> 15);
    (hash % 1000) as f32 / 1000.0
}

/// Build the full frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(64 + state.particles.len());
    let glow = |g: f32| if settings.quality.glow() { g } else { 0.0 };
    let tick = if settings.animate() { state.time_ticks } else { 0 };

    cmds.push(DrawCmd::Gradient {
        stops: [
            (0.0, palette::SKY_TOP),
            (0.5, palette::SKY_MID),
            (1.0, palette::SKY_BOTTOM),
        ],
    });

    push_background(&mut cmds, state, settings, tick, &glow);
    push_ground(&mut cmds, state);
    push_player(&mut cmds, state, &glow);
    push_obstacles(&mut cmds, state, settings, tick, &glow);

    for particle in state.particles.iter().take(settings.max_particles()) {
        let alpha = particle.life as f32 / PARTICLE_LIFE as f32;
        cmds.push(DrawCmd::Rect {
            rect: Rect::new(particle.pos.x, particle.pos.y, particle.size, particle.size),
            color: palette::PLAYER.with_alpha(alpha),
            glow: glow(5.0),
        });
    }

    cmds
}

fn push_background(
    cmds: &mut Vec<DrawCmd>,
    state: &GameState,
    settings: &Settings,
    tick: u64,
    glow: &impl Fn(f32) -> f32,
) {
    for (idx, element) in state.background.iter().enumerate() {
        match element.kind {
            BackgroundKind::Building {
                width,
                height,
                hue,
                lightness,
            } => {
                let (x, y) = (element.pos.x, element.pos.y);
                cmds.push(DrawCmd::Rect {
                    rect: Rect::new(x, y, width, height),
                    color: Color::Hsl(hue, 50.0, lightness),
                    glow: 0.0,
                });
                if !settings.quality.window_flicker() {
                    continue;
                }
                for i in 0..4u32 {
                    for j in 0..6u32 {
                        if flicker(tick, idx as u32 * 31 + i, j) < 0.3 {
                            cmds.push(DrawCmd::Rect {
                                rect: Rect::new(
                                    x + 8.0 + i as f32 * 12.0,
                                    y + 8.0 + j as f32 * 12.0,
                                    6.0,
                                    6.0,
                                ),
                                color: palette::WINDOW,
                                glow: 0.0,
                            });
                        }
                    }
                }
            }
            BackgroundKind::Neon {
                size,
                color_index,
                alpha,
            } => {
                let color = palette::NEON[color_index as usize % palette::NEON.len()];
                cmds.push(DrawCmd::Rect {
                    rect: Rect::new(element.pos.x, element.pos.y, size, size),
                    color: color.with_alpha(alpha),
                    glow: glow(8.0),
                });
            }
        }
    }
}

fn push_ground(cmds: &mut Vec<DrawCmd>, state: &GameState) {
    let (w, h) = (state.viewport.width, state.viewport.height);
    let top = h - GROUND_STRIP_HEIGHT;
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(0.0, top, w, GROUND_STRIP_HEIGHT),
        color: palette::GROUND,
        glow: 0.0,
    });
    cmds.push(DrawCmd::Line {
        from: Vec2::new(0.0, top),
        to: Vec2::new(w, top),
        width: 2.0,
        color: palette::GROUND_LINE,
    });
}

fn push_player(cmds: &mut Vec<DrawCmd>, state: &GameState, glow: &impl Fn(f32) -> f32) {
    let body = player_hitbox(state);
    cmds.push(DrawCmd::Rect {
        rect: body,
        color: palette::PLAYER,
        glow: glow(15.0),
    });

    for eye_x in [body.x + 6.0, body.right() - 12.0] {
        cmds.push(DrawCmd::Rect {
            rect: Rect::new(eye_x, body.y + 6.0, 6.0, 6.0),
            color: palette::PLAYER_EYES,
            glow: 0.0,
        });
    }

    // Arms tuck in while sliding
    if !state.player.sliding {
        for arm_x in [body.x - 6.0, body.right()] {
            cmds.push(DrawCmd::Rect {
                rect: Rect::new(arm_x, body.y + 12.0, 6.0, 12.0),
                color: palette::PLAYER,
                glow: glow(15.0),
            });
        }
    }
}

fn push_obstacles(
    cmds: &mut Vec<DrawCmd>,
    state: &GameState,
    settings: &Settings,
    tick: u64,
    glow: &impl Fn(f32) -> f32,
) {
    for obstacle in &state.obstacles {
        let r = obstacle.rect();
        match obstacle.kind {
            ObstacleKind::Box => {
                cmds.push(DrawCmd::Rect {
                    rect: r,
                    color: palette::BOX,
                    glow: glow(15.0),
                });
                cmds.push(DrawCmd::Rect {
                    rect: Rect::new(r.x + 5.0, r.y + 5.0, r.width - 10.0, 5.0),
                    color: palette::WHITE.with_alpha(0.3),
                    glow: 0.0,
                });
            }
            ObstacleKind::Laser => {
                cmds.push(DrawCmd::Rect {
                    rect: r,
                    color: palette::LASER,
                    glow: glow(obstacle.glow),
                });
                if flicker(tick, obstacle.id, 0) < 0.5 {
                    cmds.push(DrawCmd::Rect {
                        rect: Rect::new(r.x + 2.0, r.y + 2.0, r.width - 4.0, r.height - 4.0),
                        color: palette::WHITE,
                        glow: 0.0,
                    });
                }
            }
            ObstacleKind::FloatingBlock => {
                let bob = if settings.animate() {
                    (state.time_ticks as f32 * SIM_DT_MS * 0.01).sin() * 3.0
                } else {
                    0.0
                };
                let rect = Rect::new(r.x, r.y + bob, r.width, r.height);
                cmds.push(DrawCmd::Rect {
                    rect,
                    color: palette::FLOATING_BLOCK,
                    glow: glow(obstacle.glow),
                });
                cmds.push(DrawCmd::Rect {
                    rect,
                    color: palette::WHITE.with_alpha(0.2),
                    glow: 0.0,
                });
            }
            ObstacleKind::WideBlock => {
                cmds.push(DrawCmd::Rect {
                    rect: r,
                    color: palette::WIDE_BLOCK,
                    glow: glow(obstacle.glow),
                });
                cmds.push(DrawCmd::Text {
                    text: "⚠",
                    pos: Vec2::new(r.x + r.width / 2.0, r.y + r.height / 2.0 + 5.0),
                    size: 16.0,
                    color: palette::WARNING,
                });
            }
            ObstacleKind::Collectible(CollectibleKind::CyberChip) => {
                let center = Vec2::new(r.x + r.width / 2.0, r.y + r.height / 2.0);
                cmds.push(DrawCmd::Circle {
                    center,
                    radius: r.width / 2.0,
                    color: palette::CYBER_CHIP,
                    glow: glow(15.0),
                });
                cmds.push(DrawCmd::Circle {
                    center,
                    radius: r.width / 4.0,
                    color: palette::WHITE.with_alpha(0.5),
                    glow: 0.0,
                });
            }
            ObstacleKind::Collectible(CollectibleKind::Malware) => {
                cmds.push(DrawCmd::Diamond {
                    rect: r,
                    color: palette::MALWARE,
                    glow: glow(15.0),
                });
                cmds.push(DrawCmd::Text {
                    text: "X",
                    pos: Vec2::new(r.x + r.width / 2.0, r.y + r.height / 2.0 + 4.0),
                    size: 12.0,
                    color: palette::WHITE,
                });
            }
        }
    }
}
