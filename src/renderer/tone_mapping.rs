//! Mapping of high dynamic range lighting results to displayable colors.

use glamx::Vec3;
use serde::{Deserialize, Serialize};

/// Gamma used to encode colors for the (non-sRGB) window surface.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// The operator compressing lit colors into `[0, 1]`.
///
/// Every operator but [`ToneMapping::None`] first multiplies the color by
/// the exposure. The model shader mirrors [`ToneMapping::apply`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    /// Colors are only clamped; the exposure is ignored.
    None,
    /// Exposure, then clamping.
    Linear,
    /// `c / (1 + c)` on the exposed color.
    #[default]
    Reinhard,
    /// A fitted approximation of the ACES filmic curve.
    AcesFilmic,
}

impl ToneMapping {
    /// The operator identifier read by the model shader.
    pub fn as_gpu(self) -> u32 {
        match self {
            ToneMapping::None => 0,
            ToneMapping::Linear => 1,
            ToneMapping::Reinhard => 2,
            ToneMapping::AcesFilmic => 3,
        }
    }

    /// Tone maps a linear color. The result is still linear, in `[0, 1]`.
    pub fn apply(self, rgb: Vec3, exposure: f32) -> Vec3 {
        let mapped = match self {
            ToneMapping::None => rgb,
            ToneMapping::Linear => rgb * exposure,
            ToneMapping::Reinhard => {
                let c = rgb * exposure;
                c / (Vec3::ONE + c)
            }
            ToneMapping::AcesFilmic => {
                let c = rgb * exposure;
                (c * (c * 2.51 + 0.03)) / (c * (c * 2.43 + 0.59) + 0.14)
            }
        };

        mapped.clamp(Vec3::ZERO, Vec3::ONE)
    }
}

/// Gamma-encodes a linear color in `[0, 1]` for display.
#[inline]
pub fn encode_gamma(rgb: Vec3) -> Vec3 {
    rgb.powf(1.0 / DISPLAY_GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1.0e-5
    }

    #[test]
    fn reinhard_compresses_the_exposed_color() {
        let c = ToneMapping::Reinhard.apply(Vec3::new(0.5, 1.0, 0.0), 2.0);
        assert!(close(c, Vec3::new(0.5, 2.0 / 3.0, 0.0)));
    }

    #[test]
    fn reinhard_never_reaches_white() {
        let c = ToneMapping::Reinhard.apply(Vec3::splat(1000.0), 2.0);
        assert!(c.max_element() < 1.0);
        assert!(c.min_element() > 0.99);
    }

    #[test]
    fn none_ignores_exposure_but_clamps() {
        let c = ToneMapping::None.apply(Vec3::new(0.25, 3.0, -1.0), 8.0);
        assert!(close(c, Vec3::new(0.25, 1.0, 0.0)));
    }

    #[test]
    fn linear_scales_then_clamps() {
        let c = ToneMapping::Linear.apply(Vec3::new(0.25, 0.75, 0.0), 2.0);
        assert!(close(c, Vec3::new(0.5, 1.0, 0.0)));
    }

    #[test]
    fn aces_is_monotonic_and_bounded() {
        let mut previous = 0.0;
        for i in 1..100 {
            let v = ToneMapping::AcesFilmic.apply(Vec3::splat(i as f32 * 0.1), 1.0).x;
            assert!(v >= previous);
            assert!(v <= 1.0);
            previous = v;
        }
        assert!(close(ToneMapping::AcesFilmic.apply(Vec3::ZERO, 1.0), Vec3::ZERO));
    }

    #[test]
    fn gpu_identifiers_are_distinct() {
        let ids = [
            ToneMapping::None,
            ToneMapping::Linear,
            ToneMapping::Reinhard,
            ToneMapping::AcesFilmic,
        ]
        .map(ToneMapping::as_gpu);
        assert_eq!(ids, [0, 1, 2, 3]);
    }

    #[test]
    fn parses_from_snake_case() {
        #[derive(Deserialize)]
        struct Holder {
            tone_mapping: ToneMapping,
        }

        let h: Holder = toml::from_str("tone_mapping = \"aces_filmic\"").unwrap();
        assert_eq!(h.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(ToneMapping::default(), ToneMapping::Reinhard);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let c = encode_gamma(Vec3::splat(0.5));
        assert!((c.x - 0.5f32.powf(1.0 / 2.2)).abs() < 1.0e-6);
        assert!(close(encode_gamma(Vec3::ONE), Vec3::ONE));
    }
}
