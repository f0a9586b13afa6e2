//! Randomized drift of the vertical wave.
//!
//! Amplitude and frequency wander between targets resampled every few
//! seconds. Both follow their targets through [`smoothing_factor`], so the
//! path is the same for one long step or many short ones. The offset itself
//! is `sin(TAU * frequency * elapsed + phase) * amplitude`, evaluated with the
//! live values.

use std::f32::consts::TAU;

use aqua_core::{RandomSource, ValueRange};
use aqua_core::math::{lerp, smoothing_factor};

use crate::params::WaveParams;

#[derive(Debug, Clone, PartialEq)]
pub struct WaveDrift {
    pub current_amplitude: f32,
    pub current_frequency: f32,
    pub target_amplitude: f32,
    pub target_frequency: f32,
    /// Fixed at creation.
    pub phase: f32,
    pub change_timer: f32,
    pub next_change_in: f32,
}

impl WaveDrift {
    /// Starts at the configured bob values (clamped into their ranges) with a
    /// random phase and a first retarget interval.
    pub fn new(params: &WaveParams, rng: &mut dyn RandomSource) -> Self {
        let amplitude = clamp_into(params.bob_amplitude, params.amplitude_range);
        let frequency = clamp_into(params.bob_frequency, params.frequency_range);
        let phase = rng.next_unit() * TAU;
        Self {
            current_amplitude: amplitude,
            current_frequency: frequency,
            target_amplitude: amplitude,
            target_frequency: frequency,
            phase,
            change_timer: 0.0,
            next_change_in: rng.sample(params.retarget_interval_range),
        }
    }

    /// Advances timers, retargets if due, and smooths the live values.
    /// `delta` must already be sanitized.
    pub fn step(&mut self, params: &WaveParams, rng: &mut dyn RandomSource, delta: f32) {
        self.change_timer += delta;
        if self.change_timer > self.next_change_in {
            self.change_timer = 0.0;
            self.next_change_in = rng.sample(params.retarget_interval_range);
            self.target_amplitude = rng.sample(params.amplitude_range);
            self.target_frequency = rng.sample(params.frequency_range);
            log::trace!(
                "wave retarget: amplitude {:.3}, frequency {:.3}",
                self.target_amplitude,
                self.target_frequency
            );
        }

        let t = smoothing_factor(delta);
        self.current_amplitude = lerp(self.current_amplitude, self.target_amplitude, t);
        self.current_frequency = lerp(self.current_frequency, self.target_frequency, t);
    }

    /// Vertical offset from the lane center at `elapsed` seconds since
    /// placement. Zero when `bob_amplitude` is zero, with no residual drift.
    #[must_use]
    pub fn offset(&self, params: &WaveParams, elapsed: f32) -> f32 {
        if params.bob_amplitude > 0.0 {
            (TAU * self.current_frequency * elapsed + self.phase).sin() * self.current_amplitude
        } else {
            0.0
        }
    }

    /// Pins both targets, so the live values converge on them.
    pub fn hold_targets(&mut self, amplitude: f32, frequency: f32) {
        self.target_amplitude = amplitude;
        self.target_frequency = frequency;
        self.change_timer = 0.0;
        self.next_change_in = f32::INFINITY;
    }
}

fn clamp_into(v: f32, range: ValueRange) -> f32 {
    v.max(range.min).min(range.max)
}

#[cfg(test)]
mod tests {
    use aqua_core::CreatureRng;

    use super::*;

    fn params() -> WaveParams {
        WaveParams {
            bob_amplitude: 0.15,
            bob_frequency: 0.35,
            amplitude_range: ValueRange::new(0.09, 0.21),
            frequency_range: ValueRange::new(0.245, 0.455),
            retarget_interval_range: ValueRange::new(2.5, 5.0),
        }
    }

    #[test]
    fn zero_delta_is_idempotent() {
        let p = params();
        let mut rng = CreatureRng::seeded(1);
        let mut drift = WaveDrift::new(&p, &mut rng);
        drift.hold_targets(0.2, 0.4);
        let before = drift.clone();
        for _ in 0..10 {
            drift.step(&p, &mut rng, 0.0);
        }
        assert_eq!(drift, before);
    }

    #[test]
    fn live_values_stay_in_range() {
        let p = params();
        let mut rng = CreatureRng::seeded(9);
        let mut drift = WaveDrift::new(&p, &mut rng);
        for _ in 0..5_000 {
            drift.step(&p, &mut rng, 1.0 / 60.0);
            let a = drift.current_amplitude;
            let f = drift.current_frequency;
            assert!(a >= p.amplitude_range.min - 1e-6 && a <= p.amplitude_range.max + 1e-6);
            assert!(f >= p.frequency_range.min - 1e-6 && f <= p.frequency_range.max + 1e-6);
        }
    }

    #[test]
    fn no_bob_means_no_offset() {
        let mut p = params();
        p.bob_amplitude = 0.0;
        let mut rng = CreatureRng::seeded(3);
        let mut drift = WaveDrift::new(&p, &mut rng);
        drift.step(&p, &mut rng, 0.7);
        assert_eq!(drift.offset(&p, 0.7), 0.0);
    }

    #[test]
    fn offset_uses_live_frequency_and_phase() {
        let p = params();
        let mut rng = CreatureRng::seeded(5);
        let mut drift = WaveDrift::new(&p, &mut rng);
        drift.hold_targets(0.2, 0.4);
        for _ in 0..120 {
            drift.step(&p, &mut rng, 1.0 / 60.0);
        }
        let expected = (TAU * drift.current_frequency * 2.0 + drift.phase).sin() * drift.current_amplitude;
        assert!((drift.offset(&p, 2.0) - expected).abs() < 1e-6);
    }
}
