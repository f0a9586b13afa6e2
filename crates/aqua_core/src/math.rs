//! Scalar helpers shared by the motion and animation code.
//!
//! Everything here is total: non-finite inputs are mapped to a safe value
//! instead of propagating NaN into a transform.

use std::f32::consts::{PI, TAU};

/// Base of the exponential smoothing curve. After one second of smoothing
/// only `0.1%` of the initial gap remains.
pub const SMOOTHING_BASE: f32 = 0.001;

#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps to `[0, 1]`. NaN maps to `0`.
#[inline]
#[must_use]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Blend factor for frame-rate independent exponential smoothing.
///
/// `1 - 0.001^delta`: zero for a zero delta, approaches one for large deltas
/// and never exceeds it, so `lerp(current, target, factor)` cannot overshoot.
#[inline]
#[must_use]
pub fn smoothing_factor(delta: f32) -> f32 {
    let delta = sanitize_delta(delta);
    1.0 - SMOOTHING_BASE.powf(delta)
}

/// Maps negative and non-finite deltas to zero.
#[must_use]
pub fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        if delta != 0.0 {
            log::debug!("discarding frame delta {delta}");
        }
        0.0
    }
}

/// Wraps an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid lands exactly on -PI for odd multiples of PI.
    if a <= -PI {
        a += TAU;
    }
    a
}

/// Signed angular difference `to - from` along the shorter arc.
///
/// The magnitude never exceeds `PI`; an exact half-turn resolves to `+PI`.
#[inline]
#[must_use]
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Moves `from` toward `to` by fraction `t` of the shorter arc, returning a
/// wrapped angle.
#[inline]
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + shortest_arc(from, to) * t)
}
