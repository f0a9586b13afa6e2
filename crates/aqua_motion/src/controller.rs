//! Placement and locomotion state machine.
//!
//! A controller starts [`Placement::Unplaced`] and is placed once, on the
//! first tick after its creature has a [`Footprint`]. From then on every
//! [`step`](MotionController::step):
//!
//! 1. drifts the wave parameters,
//! 2. eases speed down toward a 35% floor near the walls,
//! 3. advances horizontally,
//! 4. flips direction once the leading edge reaches the boundary,
//! 5. applies the vertical wave around the lane center,
//! 6. reasserts the depth layer.
//!
//! Bounds are recomputed from the viewport on every call, so a resize takes
//! effect on the next tick without any explicit notification.

use aqua_core::RandomSource;
use aqua_core::math::{clamp01, lerp, lerp_angle, sanitize_delta, smoothing_factor};
use aqua_scene::{RenderTransform, Viewport};
use glam::Vec3;

use crate::drift::WaveDrift;
use crate::lanes::LaneAllocator;
use crate::normalization::Footprint;
use crate::params::{BoundaryPolicy, MotionParams, StartSide, WaveParams};

/// Distance a spawn point is moved inward from its boundary.
pub const SPAWN_INSET: f32 = 0.01;

/// Fraction of base speed left at the wall.
pub const MIN_SPEED_FACTOR: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `+1`
    Right,
    /// `-1`
    Left,
}

impl Direction {
    #[inline]
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

/// Horizontal range the creature's center may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
}

impl Bounds {
    #[must_use]
    pub fn new(viewport: Viewport, margin: f32, half_width: f32) -> Self {
        Self {
            left: -viewport.half_width() + margin + half_width,
            right: viewport.half_width() - margin - half_width,
        }
    }

    /// The creature is wider than the free space and cannot swim.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.left < self.right)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    #[inline]
    #[must_use]
    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.left).min(self.right)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// Signed distance from the leading edge to the boundary ahead.
    /// Negative once the boundary has been crossed.
    #[inline]
    #[must_use]
    pub fn edge_distance(&self, x: f32, direction: Direction) -> f32 {
        match direction {
            Direction::Right => self.right - x,
            Direction::Left => x - self.left,
        }
    }

    /// Signed distance to the closer boundary.
    #[inline]
    #[must_use]
    pub fn nearest_distance(&self, x: f32) -> f32 {
        (x - self.left).min(self.right - x)
    }
}

/// Speed for a creature at `x`.
///
/// Eases on the distance to the nearer wall, so speed is continuous across a
/// flip: it is exactly the floor at the wall and ramps back up as the
/// creature swims away.
#[must_use]
pub fn eased_speed(base_speed: f32, turn_zone: f32, bounds: &Bounds, x: f32) -> f32 {
    let distance = bounds.nearest_distance(x);
    let ease = if turn_zone > 0.0 {
        clamp01(distance / turn_zone)
    } else if distance > 0.0 {
        1.0
    } else {
        0.0
    };
    base_speed * (MIN_SPEED_FACTOR + (1.0 - MIN_SPEED_FACTOR) * ease)
}

/// Yaw a creature faces while moving in `direction`.
#[inline]
#[must_use]
pub fn facing_yaw(initial_yaw_deg: f32, direction: Direction) -> f32 {
    (initial_yaw_deg * direction.sign()).to_radians()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    pub yaw: f32,
    pub direction: Direction,
    /// Yaw the face-turn blend is heading for.
    pub target_yaw: f32,
    /// Sign of the horizontal scale; toggled per turn in flip mode.
    pub scale_sign: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Unplaced,
    Placed(Kinematics),
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Speed used for this step's advance.
    pub effective_speed: f32,
    /// Edge distance toward the travel direction after the advance.
    pub edge_distance: f32,
    pub turned: bool,
}

pub struct MotionController {
    params: MotionParams,
    wave: WaveParams,
    drift: WaveDrift,
    rng: Box<dyn RandomSource>,
    placement: Placement,
    elapsed: f32,
    pinned_warned: bool,
}

impl MotionController {
    pub fn new(params: MotionParams, wave: WaveParams, mut rng: Box<dyn RandomSource>) -> Self {
        let drift = WaveDrift::new(&wave, rng.as_mut());
        Self {
            params,
            wave,
            drift,
            rng,
            placement: Placement::Unplaced,
            elapsed: 0.0,
            pinned_warned: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn wave_params(&self) -> &WaveParams {
        &self.wave
    }

    #[inline]
    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    #[must_use]
    pub fn is_placed(&self) -> bool {
        matches!(self.placement, Placement::Placed(_))
    }

    #[must_use]
    pub fn kinematics(&self) -> Option<&Kinematics> {
        match &self.placement {
            Placement::Placed(k) => Some(k),
            Placement::Unplaced => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn drift(&self) -> &WaveDrift {
        &self.drift
    }

    pub fn drift_mut(&mut self) -> &mut WaveDrift {
        &mut self.drift
    }

    /// Seconds of placed motion so far.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[must_use]
    pub fn bounds(&self, viewport: Viewport, footprint: &Footprint) -> Bounds {
        Bounds::new(viewport, self.params.margin, footprint.half_width)
    }

    /// Speed the creature would move at from its current position.
    #[must_use]
    pub fn effective_speed(&self, viewport: Viewport, footprint: &Footprint) -> Option<f32> {
        let k = self.kinematics()?;
        let bounds = self.bounds(viewport, footprint);
        if bounds.is_degenerate() {
            return Some(0.0);
        }
        Some(eased_speed(self.params.speed, self.params.turn_zone, &bounds, k.position.x))
    }

    /// Replaces motion and wave parameters. The depth layer is kept from
    /// creation; live wave values converge on the new ranges at the next
    /// retarget.
    pub fn set_params(&mut self, mut params: MotionParams, wave: WaveParams) {
        if params.depth_layer != self.params.depth_layer {
            log::debug!("depth layer is fixed per creature, ignoring change");
        }
        params.depth_layer = self.params.depth_layer;
        self.params = params;
        self.wave = wave;
    }

    /// Back to Unplaced, for a new asset. Wave phase is kept.
    pub fn reset(&mut self) {
        self.placement = Placement::Unplaced;
        self.elapsed = 0.0;
        self.pinned_warned = false;
    }

    /// Unplaced to Placed, using the start side and lane configuration.
    /// A placed controller is left untouched.
    pub fn place(&mut self, viewport: Viewport, footprint: &Footprint) {
        if self.is_placed() {
            return;
        }
        let p = self.params;
        let bounds = Bounds::new(viewport, p.margin, footprint.half_width);

        let (x, direction) = match p.start_side {
            StartSide::Left => (bounds.left + SPAWN_INSET, Direction::Right),
            StartSide::Right => (bounds.right - SPAWN_INSET, Direction::Left),
            StartSide::Middle => (
                lerp(bounds.left, bounds.right, clamp01(p.spawn_fraction)),
                Direction::Right,
            ),
        };
        let x = if bounds.is_degenerate() {
            self.warn_pinned(&bounds);
            bounds.center()
        } else {
            bounds.clamp(x)
        };

        let yaw = facing_yaw(p.initial_yaw_deg, direction);
        let y = LaneAllocator::lane_y(viewport.height, p.vertical_fraction);

        log::debug!("placed at x={x:.3} moving {direction:?}");
        self.placement = Placement::Placed(Kinematics {
            position: Vec3::new(x, y, p.depth_layer),
            yaw,
            direction,
            target_yaw: yaw,
            scale_sign: 1.0,
        });
    }

    /// Advances one tick. Returns `None`, changing nothing, while unplaced.
    pub fn step(&mut self, viewport: Viewport, footprint: &Footprint, delta: f32) -> Option<StepReport> {
        let delta = sanitize_delta(delta);
        let bounds = Bounds::new(viewport, self.params.margin, footprint.half_width);
        if !self.is_placed() {
            return None;
        }
        if bounds.is_degenerate() {
            self.warn_pinned(&bounds);
        }

        let p = self.params;
        let Placement::Placed(k) = &mut self.placement else {
            return None;
        };

        self.elapsed += delta;
        self.drift.step(&self.wave, self.rng.as_mut(), delta);

        let mut report = StepReport {
            effective_speed: 0.0,
            edge_distance: 0.0,
            turned: false,
        };

        if bounds.is_degenerate() {
            k.position.x = bounds.center();
        } else {
            report.effective_speed = eased_speed(p.speed, p.turn_zone, &bounds, k.position.x);
            k.position.x += k.direction.sign() * report.effective_speed * delta;
            if p.boundary_policy == BoundaryPolicy::Clamp {
                k.position.x = bounds.clamp(k.position.x);
            }

            report.edge_distance = bounds.edge_distance(k.position.x, k.direction);
            if report.edge_distance <= 0.0 {
                k.direction = k.direction.flipped();
                if p.flip_on_turn {
                    k.scale_sign = -k.scale_sign;
                } else {
                    k.target_yaw = facing_yaw(p.initial_yaw_deg, k.direction);
                }
                report.turned = true;
                log::trace!("turned at x={:.3}, now moving {:?}", k.position.x, k.direction);
            }
        }

        if !p.flip_on_turn {
            k.yaw = lerp_angle(k.yaw, k.target_yaw, smoothing_factor(delta));
        }

        let lane_y = LaneAllocator::lane_y(viewport.height, p.vertical_fraction);
        k.position.y = lane_y + self.drift.offset(&self.wave, self.elapsed);
        k.position.z = p.depth_layer;

        Some(report)
    }

    /// What the renderer should draw, once placed.
    #[must_use]
    pub fn render_transform(&self, footprint: &Footprint) -> Option<RenderTransform> {
        let k = self.kinematics()?;
        let s = footprint.base_scale;
        Some(RenderTransform {
            position: k.position,
            yaw: k.yaw,
            scale: Vec3::new(s * k.scale_sign, s, s),
            pivot_offset: footprint.pivot_offset,
        })
    }

    fn warn_pinned(&mut self, bounds: &Bounds) {
        if !self.pinned_warned {
            self.pinned_warned = true;
            log::warn!(
                "creature does not fit between the walls (left {:.3} > right {:.3}), pinning to center",
                bounds.left,
                bounds.right
            );
        }
    }
}
