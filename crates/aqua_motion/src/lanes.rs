use crate::params::{LanePreset, StartSide};

/// Round-robin lane assignment.
///
/// Lanes only reduce overlap. With more creatures than presets, lanes are
/// reused and creatures sharing one may cross each other.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneAllocator {
    presets: Vec<LanePreset>,
}

impl LaneAllocator {
    #[must_use]
    pub fn new(presets: Vec<LanePreset>) -> Self {
        Self { presets }
    }

    #[must_use]
    pub fn presets(&self) -> &[LanePreset] {
        &self.presets
    }

    /// Lane for creature `index` of `count`. `None` when no presets are
    /// configured. `count` does not influence the choice.
    #[must_use]
    pub fn assign(&self, index: usize, count: usize) -> Option<&LanePreset> {
        if self.presets.is_empty() {
            return None;
        }
        let lane = &self.presets[index % self.presets.len()];
        if count > self.presets.len() {
            log::trace!("creature {index} of {count} shares a lane");
        }
        Some(lane)
    }

    /// World-space y of a lane's center line.
    #[inline]
    #[must_use]
    pub fn lane_y(viewport_height: f32, vertical_fraction: f32) -> f32 {
        viewport_height * 0.5 * vertical_fraction
    }
}

impl Default for LaneAllocator {
    fn default() -> Self {
        Self::new(vec![
            LanePreset {
                vertical_fraction: 0.35,
                depth_layer: 0.0,
                speed: 1.6,
                start_side: StartSide::Left,
                spawn_fraction: 0.0,
                size_multiplier: 1.0,
            },
            LanePreset {
                vertical_fraction: -0.05,
                depth_layer: -0.4,
                speed: 1.2,
                start_side: StartSide::Right,
                spawn_fraction: 1.0,
                size_multiplier: 0.85,
            },
            LanePreset {
                vertical_fraction: -0.4,
                depth_layer: -0.8,
                speed: 1.9,
                start_side: StartSide::Middle,
                spawn_fraction: 0.5,
                size_multiplier: 0.7,
            },
        ])
    }
}
