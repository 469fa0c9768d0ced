use crate::camera::Camera3d;
use crate::event::WindowEvent;
use crate::window::Viewport;
use glamx::{Mat4, Quat, Vec3};

/// A camera with a perspective projection, placed by a position and a rotation.
///
/// With the identity rotation the camera looks down `-Z` with `+Y` up.
///
/// Changing the aspect ratio through [`PerspectiveCamera::set_aspect`] only
/// takes effect after [`PerspectiveCamera::update_projection_matrix`]; window
/// resizes received through [`Camera3d::handle_event`] do both.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    position: Vec3,
    rotation: Quat,
    proj: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 800.0 / 600.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    /// Creates a camera at the origin.
    ///
    /// # Arguments
    /// * `fov_y_degrees` - Vertical field of view, in degrees
    /// * `aspect` - Width divided by height of the drawing area
    /// * `near` - Distance to the near clipping plane
    /// * `far` - Distance to the far clipping plane
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut res = Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        res.update_projection_matrix();
        res
    }

    #[inline]
    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }

    /// Rotates the camera so that it faces `target`, keeping `+Y` up.
    ///
    /// Does nothing if `target` is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() <= f32::EPSILON {
            return;
        }

        let world = Mat4::look_at_rh(self.position, target, Vec3::Y).inverse();
        let (_, rotation, _) = world.to_scale_rotation_translation();
        self.set_rotation(rotation);
    }

    /// Stores a new aspect ratio; call [`Self::update_projection_matrix`] to apply it.
    ///
    /// Non-finite or non-positive ratios are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Recomputes the projection from the field of view, aspect and clip planes.
    pub fn update_projection_matrix(&mut self) {
        self.proj = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }
}

impl Camera3d for PerspectiveCamera {
    fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            if w > 0 && h > 0 {
                self.set_aspect(w as f32 / h as f32);
                self.update_projection_matrix();
            }
        }
    }

    fn eye(&self) -> Vec3 {
        self.position
    }

    fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    fn projection(&self) -> Mat4 {
        self.proj
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    fn update(&mut self, viewport: &Viewport) {
        let aspect = viewport.aspect();
        if (aspect - self.aspect).abs() > f32::EPSILON {
            self.set_aspect(aspect);
            self.update_projection_matrix();
        }
    }
}
