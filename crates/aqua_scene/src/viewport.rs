use serde::{Deserialize, Serialize};

/// Default world height of the orthographic view, in world units.
pub const DEFAULT_WORLD_HEIGHT: f32 = 10.0;

/// Viewport extents in world units for an orthographic camera centered on
/// the origin.
///
/// World height is fixed; width follows the drawing buffer's aspect ratio.
/// Creatures read this during a tick but never mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Builds a viewport directly from world extents. Non-positive or
    /// non-finite values fall back to a square of the default height.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let height = if height.is_finite() && height > 0.0 { height } else { DEFAULT_WORLD_HEIGHT };
        let width = if width.is_finite() && width > 0.0 { width } else { height };
        Self { width, height }
    }

    /// Viewport for a `pixel_width` × `pixel_height` buffer showing
    /// `world_height` units vertically.
    #[must_use]
    pub fn from_pixels(pixel_width: u32, pixel_height: u32, world_height: f32) -> Self {
        let aspect = if pixel_height == 0 {
            1.0
        } else {
            pixel_width as f32 / pixel_height as f32
        };
        Self::new(world_height * aspect, world_height)
    }

    #[inline]
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    #[inline]
    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_HEIGHT * 16.0 / 9.0, DEFAULT_WORLD_HEIGHT)
    }
}

/// Owns the current [`Viewport`] and the world height it is derived from.
#[derive(Debug, Clone)]
pub struct ViewportModel {
    world_height: f32,
    viewport: Viewport,
    revision: u64,
}

impl ViewportModel {
    #[must_use]
    pub fn new(pixel_width: u32, pixel_height: u32, world_height: f32) -> Self {
        let viewport = Viewport::from_pixels(pixel_width, pixel_height, world_height);
        Self {
            world_height: viewport.height,
            viewport,
            revision: 0,
        }
    }

    #[must_use]
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            world_height: viewport.height,
            viewport,
            revision: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Viewport {
        self.viewport
    }

    /// Incremented on every change, so consumers can detect a resize.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Recomputes world extents for a new drawing-buffer size.
    pub fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        self.set(Viewport::from_pixels(pixel_width, pixel_height, self.world_height));
    }

    /// Replaces the world extents directly.
    pub fn set(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            log::debug!(
                "viewport {:.3}x{:.3} -> {:.3}x{:.3}",
                self.viewport.width,
                self.viewport.height,
                viewport.width,
                viewport.height
            );
            self.world_height = viewport.height;
            self.viewport = viewport;
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_aspect() {
        let vp = Viewport::from_pixels(1600, 800, 10.0);
        assert!((vp.width - 20.0).abs() < 1e-6);
        assert!((vp.height - 10.0).abs() < 1e-6);
    }

    #[test]
    fn zero_pixel_height_is_square() {
        let vp = Viewport::from_pixels(640, 0, 10.0);
        assert!((vp.width - 10.0).abs() < 1e-6);
    }

    #[test]
    fn resize_bumps_revision_only_on_change() {
        let mut model = ViewportModel::new(1000, 1000, 10.0);
        model.resize(1000, 1000);
        assert_eq!(model.revision(), 0);
        model.resize(2000, 1000);
        assert_eq!(model.revision(), 1);
        assert!((model.current().width - 20.0).abs() < 1e-6);
    }
}
