use crate::event::WindowEvent;
use crate::window::Viewport;
use glamx::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};

/// Trait that all camera implementations must implement.
///
/// Cameras control the viewpoint from which the model is rendered. Projection
/// matrices follow the wgpu conventions: right-handed view space and a
/// `[0, 1]` depth range.
pub trait Camera3d {
    /// Handles window events to update camera state.
    fn handle_event(&mut self, event: &WindowEvent);

    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Transforms world coordinates into camera space.
    fn view(&self) -> Mat4;

    /// Transforms camera space into clip space.
    fn projection(&self) -> Mat4;

    /// The combined projection and view transformation.
    fn transformation(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Transforms normalized device coordinates back to world coordinates.
    fn inverse_transformation(&self) -> Mat4 {
        self.transformation().inverse()
    }

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);

    /// Updates the camera state for the current frame.
    ///
    /// This is called once at the beginning of each frame, before rendering.
    #[inline]
    fn update(&mut self, _viewport: &Viewport) {}

    /// Projects a 3D point in world coordinates to window coordinates.
    ///
    /// The result is in pixels, with its origin at the bottom-left corner.
    fn project(&self, world_coord: Vec3, size: Vec2) -> Vec2 {
        let h_normalized_coord = self.transformation() * world_coord.extend(1.0);
        let normalized_coord = h_normalized_coord.xyz() / h_normalized_coord.w;

        Vec2::new(
            (1.0 + normalized_coord.x) * size.x / 2.0,
            (1.0 + normalized_coord.y) * size.y / 2.0,
        )
    }

    /// Unprojects a window point (origin at the top-left) to a world-space ray.
    ///
    /// Returns the ray origin on the near plane and its unit direction.
    fn unproject(&self, window_coord: Vec2, size: Vec2) -> (Vec3, Vec3) {
        let normalized_coord = Vec2::new(
            2.0 * window_coord.x / size.x - 1.0,
            2.0 * -window_coord.y / size.y + 1.0,
        );

        let normalized_begin = Vec4::new(normalized_coord.x, normalized_coord.y, 0.0, 1.0);
        let normalized_end = Vec4::new(normalized_coord.x, normalized_coord.y, 1.0, 1.0);

        let cam = self.inverse_transformation();

        let h_unprojected_begin = cam * normalized_begin;
        let h_unprojected_end = cam * normalized_end;

        let unprojected_begin = h_unprojected_begin.xyz() / h_unprojected_begin.w;
        let unprojected_end = h_unprojected_end.xyz() / h_unprojected_end.w;

        (
            unprojected_begin,
            (unprojected_end - unprojected_begin).normalize(),
        )
    }
}
