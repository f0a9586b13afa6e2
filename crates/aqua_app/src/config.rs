//! Tank configuration.
//!
//! ```json
//! {
//!   "viewport": { "worldHeight": 10, "pixelWidth": 1280, "pixelHeight": 720 },
//!   "motion": { "boundaryPolicy": "clamp" },
//!   "seed": 7,
//!   "creatures": [
//!     { "source": "clownfish.json", "speed": 1.2 },
//!     { "source": "tang.json", "flipOnTurn": true }
//!   ]
//! }
//! ```
//!
//! Every key is optional. Omitted `lanes` use the three built-in presets.

use std::path::Path;

use aqua_core::{AquaError, Result};
use aqua_motion::{BoundaryPolicy, CreatureConfig, LaneAllocator, LanePreset};
use aqua_scene::{DEFAULT_WORLD_HEIGHT, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportConfig {
    pub world_height: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            world_height: DEFAULT_WORLD_HEIGHT,
            pixel_width: 1280,
            pixel_height: 720,
        }
    }
}

impl ViewportConfig {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::from_pixels(self.pixel_width, self.pixel_height, self.world_height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionSettings {
    pub boundary_policy: BoundaryPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AquariumConfig {
    pub viewport: ViewportConfig,
    pub motion: MotionSettings,
    pub lanes: Vec<LanePreset>,
    pub creatures: Vec<CreatureConfig>,
    /// Base seed for every creature's random source.
    pub seed: u64,
}

impl Default for AquariumConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            motion: MotionSettings::default(),
            lanes: LaneAllocator::default().presets().to_vec(),
            creatures: Vec::new(),
            seed: 0,
        }
    }
}

impl AquariumConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded tank config from {}", path.display());
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let h = self.viewport.world_height;
        if !(h.is_finite() && h > 0.0) {
            return Err(AquaError::InvalidConfig(format!("worldHeight must be > 0, got {h}")));
        }
        for (i, lane) in self.lanes.iter().enumerate() {
            let finite = [
                lane.vertical_fraction,
                lane.depth_layer,
                lane.speed,
                lane.spawn_fraction,
                lane.size_multiplier,
            ]
            .iter()
            .all(|v| v.is_finite());
            if !finite || lane.speed < 0.0 || lane.size_multiplier <= 0.0 {
                return Err(AquaError::InvalidConfig(format!("lane {i} has invalid values")));
            }
            if !(-1.0..=1.0).contains(&lane.vertical_fraction) {
                log::warn!("lane {i} vertical fraction {} is outside [-1, 1]", lane.vertical_fraction);
            }
        }
        Ok(())
    }
}
