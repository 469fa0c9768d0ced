//! Scene lighting: one ambient term plus a few directional lights.
//!
//! Directional lights are described the way a scene author places them: a
//! position and a target. Only the direction between the two matters for
//! shading.

use crate::color::{Color, WHITE};
use glamx::Vec3;

/// Maximum number of directional lights the model shader evaluates.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Light reaching every surface equally, regardless of its orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    /// The color of the light (RGBA, each component 0.0-1.0).
    pub color: Color,
    /// The intensity multiplier for the light.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: WHITE,
            intensity: 1.0,
        }
    }
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

/// A light with parallel rays (like the sun), shining from `position` towards `target`.
///
/// # Examples
/// ```
/// # use clipview::prelude::*;
/// let sun = DirectionalLight::new(Vec3::new(0.0, 400.0, 350.0))
///     .with_color(WHITE)
///     .with_intensity(2.0);
/// assert!(sun.direction().y < 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    /// The point the light is aimed at (the origin by default).
    pub target: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: WHITE,
            intensity: 1.0,
            position: Vec3::Y,
            target: Vec3::ZERO,
        }
    }
}

impl DirectionalLight {
    /// A white light of intensity 1 at `position`, aimed at the origin.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the light color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the light intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Sets the point the light is aimed at.
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// The unit direction the rays travel in.
    ///
    /// When the position and the target coincide the light points straight down.
    pub fn direction(&self) -> Vec3 {
        let dir = self.target - self.position;
        if dir.length_squared() > f32::EPSILON {
            dir.normalize()
        } else {
            Vec3::NEG_Y
        }
    }
}

/// The lights of a scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LightRig {
    pub ambient: AmbientLight,
    directional: Vec<DirectionalLight>,
}

impl LightRig {
    pub fn new(ambient: AmbientLight) -> Self {
        Self {
            ambient,
            directional: Vec::with_capacity(MAX_DIRECTIONAL_LIGHTS),
        }
    }

    /// Adds a directional light if there's room.
    ///
    /// Returns `true` if the light was added, `false` if the rig is full.
    pub fn add_directional(&mut self, light: DirectionalLight) -> bool {
        if self.directional.len() < MAX_DIRECTIONAL_LIGHTS {
            self.directional.push(light);
            true
        } else {
            log::warn!(
                "Directional light ignored: at most {} are supported.",
                MAX_DIRECTIONAL_LIGHTS
            );
            false
        }
    }

    pub fn directional(&self) -> &[DirectionalLight] {
        &self.directional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_points_from_position_to_target() {
        let light = DirectionalLight::new(Vec3::new(0.0, 400.0, 350.0));
        let dir = light.direction();
        let expected = Vec3::new(0.0, -400.0, -350.0).normalize();
        assert!((dir - expected).length() < 1.0e-6);
        assert!((dir.length() - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn degenerate_direction_points_down() {
        let light = DirectionalLight::new(Vec3::ONE).with_target(Vec3::ONE);
        assert_eq!(light.direction(), Vec3::NEG_Y);
    }

    #[test]
    fn rig_is_bounded() {
        let mut rig = LightRig::default();
        for _ in 0..MAX_DIRECTIONAL_LIGHTS {
            assert!(rig.add_directional(DirectionalLight::default()));
        }
        assert!(!rig.add_directional(DirectionalLight::default()));
        assert_eq!(rig.directional().len(), MAX_DIRECTIONAL_LIGHTS);
    }

    #[test]
    fn default_ambient_is_white_unit() {
        let ambient = AmbientLight::default();
        assert_eq!(ambient.color, WHITE);
        assert_eq!(ambient.intensity, 1.0);
    }
}
