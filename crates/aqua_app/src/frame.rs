use aqua_animation::Pose;
use aqua_core::Timer;
use aqua_scene::{RenderTransform, Viewport};
use serde::Serialize;

use crate::aquarium::{Aquarium, CreatureKey};

/// One placed creature as the renderer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct CreatureFrame {
    pub key: CreatureKey,
    pub id: u64,
    pub transform: RenderTransform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<String>,
}

/// Result of one [`Aquarium::tick`]. Unplaced creatures are absent.
#[derive(Debug, Clone, Serialize)]
pub struct FrameOutput {
    pub frame: u64,
    pub time: f32,
    pub viewport: Viewport,
    pub live: usize,
    pub placed: usize,
    pub creatures: Vec<CreatureFrame>,
}

impl FrameOutput {
    #[must_use]
    pub fn creature(&self, key: CreatureKey) -> Option<&CreatureFrame> {
        self.creatures.iter().find(|c| c.key == key)
    }
}

/// Drives an [`Aquarium`] once per displayed frame.
///
/// Holds no tank state of its own. Deltas come from the wall clock and are
/// passed through unclamped.
#[derive(Default)]
pub struct FrameScheduler {
    timer: Timer,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks with the wall-clock time since the previous frame.
    pub fn frame(&mut self, aquarium: &mut Aquarium) -> FrameOutput {
        let delta = self.timer.tick();
        aquarium.tick(delta)
    }

    /// Ticks with an explicit delta, e.g. for fixed-step playback.
    pub fn step(&mut self, aquarium: &mut Aquarium, delta: f32) -> FrameOutput {
        self.timer.frame_count += 1;
        aquarium.tick(delta)
    }

    /// Forgets the gap since the last frame, e.g. after a known pause.
    pub fn resync(&mut self) {
        self.timer.resync();
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count
    }
}
