//! Scale normalization of unknown-unit assets.
//!
//! Assets arrive in whatever units their author used. A [`Footprint`] maps a
//! bounding box to one uniform scale so every creature occupies a configured
//! fraction of viewport height, plus the half-width the motion controller
//! needs for its bounds.

use aqua_scene::BoundingBox;
use glam::Vec3;

use crate::params::SizeParams;

/// Normalization output for one creature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub base_scale: f32,
    /// Half of the scaled horizontal extent, in world units.
    pub half_width: f32,
    /// Translation that moves the bounding box center to the local origin.
    pub pivot_offset: Vec3,
    /// Largest raw extent, after the degenerate-geometry fallback.
    pub max_dim: f32,
    /// Raw (unscaled) extents.
    pub size: Vec3,
}

impl Footprint {
    /// Scaled horizontal extent.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }
}

/// Computes the footprint of `bounds` for a viewport `viewport_height`
/// world units tall.
///
/// Total for any input: a zero-volume or non-finite box normalizes with
/// `max_dim = 1` and a zero pivot offset.
#[must_use]
pub fn normalize(bounds: &BoundingBox, viewport_height: f32, size: &SizeParams) -> Footprint {
    let (extent, pivot_offset) = if bounds.is_finite() {
        (bounds.size(), -bounds.center())
    } else {
        log::warn!("non-finite bounding box, normalizing as a unit cube");
        (Vec3::ZERO, Vec3::ZERO)
    };

    let raw_max = extent.max_element();
    let max_dim = if raw_max > 0.0 && raw_max.is_finite() {
        raw_max
    } else {
        log::debug!("degenerate geometry, using unit max dimension");
        1.0
    };

    let target = viewport_height * size.height_ratio * size.size_multiplier;
    let base_scale = if target.is_finite() && target > 0.0 {
        target / max_dim
    } else {
        1.0
    };

    Footprint {
        base_scale,
        half_width: extent.x * base_scale * 0.5,
        pivot_offset,
        max_dim,
        size: extent,
    }
}
