//! Color type and the few named colors the viewer needs.
//!
//! Components are RGBA `f32` values in `[0.0, 1.0]`, stored as written (no
//! color space conversion happens anywhere in the pipeline).

pub use rgb::Rgba;

/// The color type used throughout clipview.
pub type Color = Rgba<f32>;

/// Black (0, 0, 0)
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// White (255, 255, 255)
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Steel blue (51, 100, 149), the default viewer background.
pub const STEEL_BLUE: Color = Color::new(0.2, 0.39215687, 0.58431375, 1.0);

/// Builds an opaque color from a `0xRRGGBB` integer.
///
/// Bits above the lowest 24 are ignored.
///
/// # Example
/// ```
/// # use clipview::color;
/// assert_eq!(color::from_hex(0x336495), color::STEEL_BLUE);
/// ```
pub fn from_hex(hex: u32) -> Color {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Color::new(r, g, b, 1.0)
}

/// Converts a color back to its `0xRRGGBB` representation, rounding each channel.
pub fn to_hex(color: Color) -> u32 {
    let channel = |c: f32| ((c.clamp(0.0, 1.0) * 255.0).round() as u32) & 0xff;
    (channel(color.r) << 16) | (channel(color.g) << 8) | channel(color.b)
}

/// The RGB part of `color` scaled by `intensity`.
#[inline]
pub fn scaled_rgb(color: Color, intensity: f32) -> [f32; 3] {
    [
        color.r * intensity,
        color.g * intensity,
        color.b * intensity,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_components() {
        let c = from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1.0e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn hex_ignores_high_bits() {
        assert_eq!(from_hex(0xff00_0000), BLACK);
        assert_eq!(from_hex(0xffff_ffff), WHITE);
    }

    #[test]
    fn hex_round_trips_background() {
        assert_eq!(to_hex(from_hex(0x336495)), 0x336495);
        assert_eq!(to_hex(STEEL_BLUE), 0x336495);
    }

    #[test]
    fn intensity_scales_rgb_only() {
        assert_eq!(scaled_rgb(WHITE, 2.0), [2.0, 2.0, 2.0]);
        assert_eq!(scaled_rgb(from_hex(0x000000), 5.0), [0.0, 0.0, 0.0]);
    }
}
