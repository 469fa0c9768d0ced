//! Viewer settings with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file only needs to list the
//! values it overrides:
//!
//! ```
//! # use clipview::config::ViewerConfig;
//! let config = ViewerConfig::from_toml_str(
//!     r#"
//!     [renderer]
//!     exposure = 1.0
//!
//!     [animation]
//!     initial_clip = "Samba"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.renderer.exposure, 1.0);
//! assert_eq!(config.animation.clips, ["CatWalk", "Samba", "Belly"]);
//! ```

use std::path::{Path, PathBuf};

use glamx::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::{self, Color};
use crate::error::Result;
use crate::light::{AmbientLight, DirectionalLight, LightRig};
use crate::renderer::ToneMapping;
use crate::ui::Anchor;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub model: ModelConfig,
    pub scene: SceneConfig,
    pub lights: LightsConfig,
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
    pub animation: AnimationConfig,
    pub button: ButtonConfig,
}

impl ViewerConfig {
    /// Parses a TOML document. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a TOML file. Missing fields use defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial width, in logical pixels.
    pub width: u32,
    /// Initial height, in logical pixels.
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "clipview".to_string(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Uniform scale applied on top of the asset's own transforms.
    pub scale: f32,
    pub position: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/multi.glb"),
            scale: 10.0,
            position: [0.0, -6.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Background color as `0xRRGGBB`.
    pub background: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: 0x336495,
        }
    }
}

impl SceneConfig {
    pub fn background_color(&self) -> Color {
        color::from_hex(self.background)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightsConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub directional_color: u32,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub directional_target: [f32; 3],
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 1.0,
            directional_color: 0xffffff,
            directional_intensity: 2.0,
            directional_position: [0.0, 400.0, 350.0],
            directional_target: [0.0, 0.0, 0.0],
        }
    }
}

impl LightsConfig {
    /// The ambient light plus the single directional light described here.
    pub fn light_rig(&self) -> LightRig {
        let mut rig = LightRig::new(AmbientLight::new(
            color::from_hex(self.ambient_color),
            self.ambient_intensity,
        ));
        let _ = rig.add_directional(
            DirectionalLight::new(Vec3::from(self.directional_position))
                .with_target(Vec3::from(self.directional_target))
                .with_color(color::from_hex(self.directional_color))
                .with_intensity(self.directional_intensity),
        );
        rig
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view, in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, -3.0, 10.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    /// Drawing buffer pixels per logical pixel. Follows the display when unset.
    pub pixel_ratio: Option<f64>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMapping::Reinhard,
            exposure: 2.0,
            pixel_ratio: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// The clips the switch button cycles through, in order.
    pub clips: Vec<String>,
    pub initial_clip: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            clips: vec![
                "CatWalk".to_string(),
                "Samba".to_string(),
                "Belly".to_string(),
            ],
            initial_clip: "CatWalk".to_string(),
        }
    }
}

/// Placement of the clip switch button, in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ButtonConfig {
    pub anchor: Anchor,
    pub margin: [f64; 2],
    pub size: [f64; 2],
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            anchor: Anchor::TopLeft,
            margin: [16.0, 16.0],
            size: [120.0, 40.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;

    #[test]
    fn defaults_match_the_stock_viewer() {
        let config = ViewerConfig::default();
        assert_eq!(config.model.path, PathBuf::from("models/multi.glb"));
        assert_eq!(config.model.scale, 10.0);
        assert_eq!(config.model.position, [0.0, -6.0, 0.0]);
        assert_eq!(config.scene.background_color(), color::STEEL_BLUE);
        assert_eq!(config.camera.position, [0.0, -3.0, 10.0]);
        assert_eq!(config.renderer.tone_mapping, ToneMapping::Reinhard);
        assert_eq!(config.renderer.exposure, 2.0);
        assert_eq!(config.animation.initial_clip, "CatWalk");
    }

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(
            ViewerConfig::from_toml_str("").unwrap(),
            ViewerConfig::default()
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [scene]
            background = 0x000000

            [lights]
            directional_intensity = 0.5

            [renderer]
            tone_mapping = "aces_filmic"
            pixel_ratio = 1.0

            [button]
            anchor = "bottom_right"
            "#,
        )
        .unwrap();

        assert_eq!(config.scene.background_color(), color::BLACK);
        assert_eq!(config.lights.directional_intensity, 0.5);
        assert_eq!(config.lights.ambient_intensity, 1.0);
        assert_eq!(config.renderer.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(config.renderer.exposure, 2.0);
        assert_eq!(config.renderer.pixel_ratio, Some(1.0));
        assert_eq!(config.button.anchor, Anchor::BottomRight);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn light_rig_holds_one_directional_light() {
        let rig = LightsConfig::default().light_rig();
        assert_eq!(rig.ambient.intensity, 1.0);
        assert_eq!(rig.directional().len(), 1);

        let sun = rig.directional()[0];
        assert_eq!(sun.intensity, 2.0);
        assert!(sun.direction().y < 0.0);
        assert!(sun.direction().z < 0.0);
    }

    #[test]
    fn malformed_documents_are_config_errors() {
        let err = ViewerConfig::from_toml_str("[renderer]\nexposure = \"bright\"").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));

        let err = ViewerConfig::from_toml_str("[renderer]\ntone_mapping = \"filmic\"").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let err = ViewerConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ViewerError::Io(_)));
    }
}
