//! Colors for game elements

/// A CSS-expressible color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgba(u8, u8, u8, f32),
    /// Hue (degrees), saturation and lightness (percent)
    Hsl(f32, f32, f32),
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba(r, g, b, 1.0)
    }

    /// Same color at a different opacity (HSL colors are always opaque)
    pub fn with_alpha(self, alpha: f32) -> Self {
        match self {
            Color::Rgba(r, g, b, _) => Color::Rgba(r, g, b, alpha.clamp(0.0, 1.0)),
            hsl => hsl,
        }
    }

    pub fn to_css(&self) -> String {
        match *self {
            Color::Rgba(r, g, b, a) if a >= 1.0 => format!("#{:02x}{:02x}{:02x}", r, g, b),
            Color::Rgba(r, g, b, a) => format!("rgba({}, {}, {}, {})", r, g, b, a),
            Color::Hsl(h, s, l) => format!("hsl({:.0}, {:.0}%, {:.0}%)", h, s, l),
        }
    }
}

pub const SKY_TOP: Color = Color::rgb(0x0a, 0x0f, 0x23);
pub const SKY_MID: Color = Color::rgb(0x1a, 0x1a, 0x2e);
pub const SKY_BOTTOM: Color = Color::rgb(0x16, 0x21, 0x3e);
pub const GROUND: Color = Color::rgb(0x33, 0x33, 0x33);
pub const GROUND_LINE: Color = Color::rgb(0x00, 0xff, 0xff);
pub const WINDOW: Color = Color::rgb(0xff, 0xff, 0x00);
pub const NEON: [Color; 4] = [
    Color::rgb(0xff, 0x6b, 0x6b),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xff, 0x00, 0xff),
];

pub const PLAYER: Color = Color::rgb(0x00, 0xff, 0xff);
pub const PLAYER_EYES: Color = Color::rgb(0xff, 0xff, 0x00);

pub const BOX: Color = Color::rgb(0xff, 0x6b, 0x6b);
pub const LASER: Color = Color::rgb(0xff, 0x00, 0x00);
pub const FLOATING_BLOCK: Color = Color::rgb(0xff, 0x99, 0x00);
pub const WIDE_BLOCK: Color = Color::rgb(0xff, 0x00, 0x66);
pub const WARNING: Color = Color::rgb(0xff, 0xff, 0x00);
pub const CYBER_CHIP: Color = Color::rgb(0x00, 0xcc, 0xff);
pub const MALWARE: Color = Color::rgb(0xff, 0x00, 0xff);
pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(BOX.to_css(), "#ff6b6b");
        assert_eq!(WHITE.with_alpha(0.3).to_css(), "rgba(255, 255, 255, 0.3)");
        assert_eq!(Color::Hsl(220.0, 50.0, 30.0).to_css(), "hsl(220, 50%, 30%)");
    }
}
