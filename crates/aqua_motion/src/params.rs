//! Creature configuration.
//!
//! [`CreatureConfig`] is the user-facing, all-optional surface (as read from
//! JSON). [`CreatureConfig::resolve`] fills the gaps from the creature's lane
//! preset and the built-in defaults, validates, and produces the concrete
//! [`CreatureParams`] the controller and blender run on.

use aqua_assets::AssetRef;
use aqua_core::{AquaError, Result, ValueRange};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HEIGHT_RATIO: f32 = 0.22;
pub const DEFAULT_SIZE_MULTIPLIER: f32 = 1.0;
pub const DEFAULT_SPEED: f32 = 1.5;
pub const DEFAULT_MARGIN: f32 = 0.5;
pub const DEFAULT_TURN_ZONE: f32 = 1.5;
pub const DEFAULT_INITIAL_YAW_DEG: f32 = 90.0;
pub const DEFAULT_SPAWN_FRACTION: f32 = 0.5;
pub const DEFAULT_BOB_AMPLITUDE: f32 = 0.15;
pub const DEFAULT_BOB_FREQUENCY: f32 = 0.35;
pub const DEFAULT_ANIMATION_SPEED: f32 = 1.0;
pub const DEFAULT_FADE_SECONDS: f32 = 0.3;
pub const DEFAULT_RETARGET_INTERVAL: ValueRange = ValueRange { min: 2.5, max: 5.0 };

/// Clip names tried, in order, after the configured one.
pub const PREFERRED_CLIP_NAMES: [&str; 2] = ["Swim_Loop", "ArmatureAction.001"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartSide {
    #[default]
    Left,
    Right,
    Middle,
}

/// What happens when a large delta carries a creature past its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Flip on the next distance check and let the creature swim back.
    #[default]
    Overshoot,
    /// Pin horizontal position into `[leftBound, rightBound]` every tick.
    Clamp,
}

/// One lane preset. See [`LaneAllocator`](crate::LaneAllocator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanePreset {
    pub vertical_fraction: f32,
    pub depth_layer: f32,
    pub speed: f32,
    pub start_side: StartSide,
    pub spawn_fraction: f32,
    pub size_multiplier: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatureConfig {
    pub source: Option<AssetRef>,
    pub height_ratio: Option<f32>,
    pub size_multiplier: Option<f32>,
    pub speed: Option<f32>,
    pub margin: Option<f32>,
    pub turn_zone: Option<f32>,
    pub flip_on_turn: Option<bool>,
    pub start_side: Option<StartSide>,
    pub initial_yaw_deg: Option<f32>,
    pub vertical_fraction: Option<f32>,
    pub depth_layer: Option<f32>,
    pub spawn_fraction: Option<f32>,
    pub bob_amplitude: Option<f32>,
    pub bob_frequency: Option<f32>,
    pub animation_name: Option<String>,
    pub animation_speed: Option<f32>,
    pub fade_seconds: Option<f32>,
    pub wave_amplitude_range: Option<ValueRange>,
    pub wave_frequency_range: Option<ValueRange>,
    pub retarget_interval_range: Option<ValueRange>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeParams {
    pub height_ratio: f32,
    pub size_multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub speed: f32,
    pub margin: f32,
    pub turn_zone: f32,
    pub flip_on_turn: bool,
    pub start_side: StartSide,
    pub spawn_fraction: f32,
    pub initial_yaw_deg: f32,
    pub vertical_fraction: f32,
    pub depth_layer: f32,
    pub boundary_policy: BoundaryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub amplitude_range: ValueRange,
    pub frequency_range: ValueRange,
    pub retarget_interval_range: ValueRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    pub clip_name: Option<String>,
    pub playback_rate: f32,
    pub fade_seconds: f32,
}

/// Fully resolved, validated creature parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureParams {
    pub size: SizeParams,
    pub motion: MotionParams,
    pub wave: WaveParams,
    pub animation: AnimationParams,
}

impl CreatureConfig {
    #[must_use]
    pub fn with_source(source: impl Into<AssetRef>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Resolves against `lane` (if any) and the defaults, then validates.
    pub fn resolve(&self, lane: Option<&LanePreset>, policy: BoundaryPolicy) -> Result<CreatureParams> {
        let or_lane = |own: Option<f32>, pick: fn(&LanePreset) -> f32, fallback: f32| {
            own.or_else(|| lane.map(pick)).unwrap_or(fallback)
        };

        let bob_amplitude = self.bob_amplitude.unwrap_or(DEFAULT_BOB_AMPLITUDE);
        let bob_frequency = self.bob_frequency.unwrap_or(DEFAULT_BOB_FREQUENCY);

        let params = CreatureParams {
            size: SizeParams {
                height_ratio: self.height_ratio.unwrap_or(DEFAULT_HEIGHT_RATIO),
                size_multiplier: or_lane(self.size_multiplier, |l| l.size_multiplier, DEFAULT_SIZE_MULTIPLIER),
            },
            motion: MotionParams {
                speed: or_lane(self.speed, |l| l.speed, DEFAULT_SPEED),
                margin: self.margin.unwrap_or(DEFAULT_MARGIN),
                turn_zone: self.turn_zone.unwrap_or(DEFAULT_TURN_ZONE),
                flip_on_turn: self.flip_on_turn.unwrap_or(false),
                start_side: self
                    .start_side
                    .or_else(|| lane.map(|l| l.start_side))
                    .unwrap_or_default(),
                spawn_fraction: or_lane(self.spawn_fraction, |l| l.spawn_fraction, DEFAULT_SPAWN_FRACTION),
                initial_yaw_deg: self.initial_yaw_deg.unwrap_or(DEFAULT_INITIAL_YAW_DEG),
                vertical_fraction: or_lane(self.vertical_fraction, |l| l.vertical_fraction, 0.0),
                depth_layer: or_lane(self.depth_layer, |l| l.depth_layer, 0.0),
                boundary_policy: policy,
            },
            wave: WaveParams {
                bob_amplitude,
                bob_frequency,
                amplitude_range: self
                    .wave_amplitude_range
                    .unwrap_or_else(|| ValueRange::new(bob_amplitude * 0.6, bob_amplitude * 1.4)),
                frequency_range: self
                    .wave_frequency_range
                    .unwrap_or_else(|| ValueRange::new(bob_frequency * 0.7, bob_frequency * 1.3)),
                retarget_interval_range: self.retarget_interval_range.unwrap_or(DEFAULT_RETARGET_INTERVAL),
            },
            animation: AnimationParams {
                clip_name: self.animation_name.clone(),
                playback_rate: self.animation_speed.unwrap_or(DEFAULT_ANIMATION_SPEED),
                fade_seconds: self.fade_seconds.unwrap_or(DEFAULT_FADE_SECONDS),
            },
        };

        params.validate()?;
        Ok(params)
    }
}

fn check(ok: bool, what: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(AquaError::InvalidConfig(what.to_string()))
    }
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn non_negative_range(r: ValueRange) -> bool {
    r.is_finite() && r.min >= 0.0
}

impl CreatureParams {
    pub fn validate(&self) -> Result<()> {
        let s = &self.size;
        check(s.height_ratio.is_finite() && s.height_ratio > 0.0, "heightRatio must be > 0")?;
        check(s.size_multiplier.is_finite() && s.size_multiplier > 0.0, "sizeMultiplier must be > 0")?;

        let m = &self.motion;
        check(non_negative(m.speed), "speed must be >= 0")?;
        check(non_negative(m.margin), "margin must be >= 0")?;
        check(non_negative(m.turn_zone), "turnZone must be >= 0")?;
        check(m.spawn_fraction.is_finite(), "spawnFraction must be finite")?;
        check(m.initial_yaw_deg.is_finite(), "initialYawDeg must be finite")?;
        check(m.vertical_fraction.is_finite(), "verticalFraction must be finite")?;
        check(m.depth_layer.is_finite(), "depthLayer must be finite")?;

        let w = &self.wave;
        check(non_negative(w.bob_amplitude), "bobAmplitude must be >= 0")?;
        check(non_negative(w.bob_frequency), "bobFrequency must be >= 0")?;
        check(non_negative_range(w.amplitude_range), "waveAmplitudeRange must be finite and >= 0")?;
        check(non_negative_range(w.frequency_range), "waveFrequencyRange must be finite and >= 0")?;
        check(
            non_negative_range(w.retarget_interval_range),
            "retargetIntervalRange must be finite and >= 0",
        )?;

        let a = &self.animation;
        check(a.playback_rate.is_finite(), "animationSpeed must be finite")?;
        check(non_negative(a.fade_seconds), "fadeSeconds must be >= 0")?;
        Ok(())
    }
}
