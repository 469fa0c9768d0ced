//! Drawing buffer size bookkeeping.

/// The size of the drawing buffer, and the pixel ratio it was derived from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    size: (u32, u32),
    pixel_ratio: f64,
}

impl Viewport {
    /// A viewport of `width` by `height` pixels.
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Viewport {
        Viewport {
            size: (width, height),
            pixel_ratio: sanitize_ratio(pixel_ratio),
        }
    }

    /// The drawing buffer size, in pixels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of drawing buffer pixels per logical pixel.
    #[inline]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Sets the pixel ratio used by [`Viewport::drawing_size`].
    ///
    /// Non-finite or non-positive ratios are replaced by 1.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = sanitize_ratio(pixel_ratio)
    }

    /// The drawing buffer size matching a window of `logical_width` by
    /// `logical_height` logical pixels.
    pub fn drawing_size(&self, logical_width: f64, logical_height: f64) -> (u32, u32) {
        let scale = |v: f64| (v * self.pixel_ratio).round().max(0.0) as u32;
        (scale(logical_width), scale(logical_height))
    }

    /// Adopts `requested` as the drawing buffer size if it differs from the
    /// current one.
    ///
    /// Returns the new size when it changed. Equal sizes, and sizes with a
    /// zero dimension (minimized windows), leave the viewport untouched.
    pub fn sync(&mut self, requested: (u32, u32)) -> Option<(u32, u32)> {
        if requested.0 == 0 || requested.1 == 0 || requested == self.size {
            return None;
        }

        self.size = requested;
        Some(requested)
    }

    /// Width over height of the drawing buffer.
    pub fn aspect(&self) -> f32 {
        if self.size.1 == 0 {
            1.0
        } else {
            self.size.0 as f32 / self.size.1 as f32
        }
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
