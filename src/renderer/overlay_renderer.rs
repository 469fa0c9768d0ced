//! Screen-space rectangles drawn on top of the scene.

use crate::builtin::{OverlayMaterial, OverlayVertex};
use crate::color::Color;
use crate::resource::{BufferType, GpuVec};

/// Converts a window position in pixels (origin at the top-left, `y` down) to
/// normalized device coordinates.
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> [f32; 2] {
    [2.0 * x / width - 1.0, 1.0 - 2.0 * y / height]
}

/// Accumulates rectangles during a frame and draws them all at once.
pub struct OverlayRenderer {
    material: OverlayMaterial,
    vertices: GpuVec<OverlayVertex>,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer {
    pub fn new() -> OverlayRenderer {
        OverlayRenderer {
            material: OverlayMaterial::new(),
            vertices: GpuVec::new(Vec::new(), BufferType::Array, "overlay_vertices"),
        }
    }

    /// Indicates whether some rectangles have to be drawn.
    pub fn needs_rendering(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// Queues a rectangle for the current frame.
    ///
    /// `x`, `y`, `width` and `height` are in pixels of a `viewport_width` by
    /// `viewport_height` window, with the origin at its top-left corner.
    pub fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        viewport_width: f32,
        viewport_height: f32,
    ) {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return;
        }

        let corner = |px: f32, py: f32| OverlayVertex {
            position: pixel_to_ndc(px, py, viewport_width, viewport_height),
            color: [color.r, color.g, color.b, color.a],
        };
        let top_left = corner(x, y);
        let top_right = corner(x + width, y);
        let bottom_left = corner(x, y + height);
        let bottom_right = corner(x + width, y + height);

        self.vertices.data_mut().extend_from_slice(&[
            top_left,
            bottom_left,
            bottom_right,
            top_left,
            bottom_right,
            top_right,
        ]);
    }

    /// Forgets the queued rectangles.
    pub fn clear(&mut self) {
        self.vertices.data_mut().clear();
    }

    /// Draws the queued rectangles, then forgets them.
    pub fn render(&mut self, render_pass: &mut wgpu::RenderPass<'_>) {
        if !self.needs_rendering() {
            return;
        }

        self.vertices.load_to_gpu();
        if let Some(buffer) = self.vertices.buffer() {
            self.material
                .render(render_pass, buffer, self.vertices.len() as u32);
        }

        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_the_ndc_square() {
        assert_eq!(pixel_to_ndc(0.0, 0.0, 800.0, 600.0), [-1.0, 1.0]);
        assert_eq!(pixel_to_ndc(800.0, 600.0, 800.0, 600.0), [1.0, -1.0]);
        assert_eq!(pixel_to_ndc(400.0, 300.0, 800.0, 600.0), [0.0, 0.0]);
    }

    #[test]
    fn y_grows_downwards() {
        let top = pixel_to_ndc(10.0, 10.0, 100.0, 100.0);
        let bottom = pixel_to_ndc(10.0, 90.0, 100.0, 100.0);
        assert!(top[1] > bottom[1]);
        assert_eq!(top[0], bottom[0]);
    }
}
