use std::sync::Arc;

use aqua_core::math::{clamp01, lerp, sanitize_delta};

use crate::binding::PropertyBinding;
use crate::clip::{AnimationClip, TrackData};
use crate::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
}

/// Linear weight ramp, driven by unscaled wall time.
#[derive(Debug, Clone, Copy)]
struct WeightFade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl WeightFade {
    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        lerp(self.from, self.to, clamp01(self.elapsed / self.duration))
    }

    fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip on one creature.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    track_cursors: Vec<KeyframeCursor>,
    fade: Option<WeightFade>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
            fade: None,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Ramps weight from zero to one over `seconds`.
    pub fn fade_in(&mut self, seconds: f32) {
        self.start_fade(0.0, 1.0, seconds);
    }

    /// Ramps weight from its current value to zero over `seconds`; the action
    /// is [`finished`](Self::is_finished) once the ramp completes.
    pub fn fade_out(&mut self, seconds: f32) {
        self.start_fade(self.weight, 0.0, seconds);
    }

    fn start_fade(&mut self, from: f32, to: f32, seconds: f32) {
        let duration = sanitize_delta(seconds);
        let fade = WeightFade {
            from,
            to,
            duration,
            elapsed: 0.0,
        };
        self.weight = fade.value();
        self.fade = (duration > 0.0).then_some(fade);
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Faded out completely, or disabled by [`stop`](Self::stop).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.enabled || (self.fade.is_none() && self.weight <= 0.0)
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.weight = 0.0;
        self.fade = None;
    }

    /// Advances the weight ramp by `dt` and the clip clock by
    /// `dt * time_scale`.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        let dt = sanitize_delta(dt);

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            self.weight = fade.value();
            if fade.done() {
                self.fade = None;
            }
        }

        if self.paused {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
        }
    }

    /// Samples the bound track at the current time.
    pub(crate) fn sample_binding(&mut self, binding: PropertyBinding) -> Option<SampledValue> {
        let track = self.clip.tracks.get(binding.track_index)?;
        let cursor = self.track_cursors.get_mut(binding.track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(SampledValue::Vector3),
            TrackData::Quaternion(t) => {
                t.sample_with_cursor(self.time, cursor).map(SampledValue::Quaternion)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SampledValue {
    Vector3(glam::Vec3),
    Quaternion(glam::Quat),
}
