//! Programmatic creature assets.
//!
//! A [`FishBuilder`] produces a two-node rig (`body` with a child `tail`),
//! its bounding box and optionally a looping tail-sway clip. Useful
//! wherever an asset is needed without files: demos, tests and benches.

use std::sync::Arc;

use aqua_animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use aqua_scene::{BoundingBox, SceneGraph, Transform};
use glam::{Quat, Vec3};

use crate::loader::LoadedAsset;

pub const SWIM_CLIP_NAME: &str = "Swim_Loop";

#[derive(Debug, Clone)]
pub struct FishBuilder {
    /// Extents in asset units.
    pub size: Vec3,
    /// Bounding box center in asset units.
    pub center: Vec3,
    /// Names of sway clips to attach. Empty for a motion-only asset.
    pub clips: Vec<String>,
    /// Seconds per sway cycle.
    pub cycle: f32,
}

impl Default for FishBuilder {
    fn default() -> Self {
        Self {
            size: Vec3::new(2.0, 0.8, 0.5),
            center: Vec3::ZERO,
            clips: vec![SWIM_CLIP_NAME.to_string()],
            cycle: 1.0,
        }
    }
}

impl FishBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Drops every clip.
    #[must_use]
    pub fn without_animation(mut self) -> Self {
        self.clips.clear();
        self
    }

    #[must_use]
    pub fn with_clip(mut self, name: impl Into<String>) -> Self {
        self.clips.push(name.into());
        self
    }

    #[must_use]
    pub fn build(&self) -> LoadedAsset {
        let mut scene = SceneGraph::new();
        let body = scene.add_node("body", None, Transform::from_trs(self.center, Quat::IDENTITY, Vec3::ONE));
        let tail_offset = Vec3::new(-self.size.x * 0.4, 0.0, 0.0);
        scene.add_node("tail", Some(body), Transform::from_trs(tail_offset, Quat::IDENTITY, Vec3::ONE));

        let half = self.size * 0.5;
        let bounds = BoundingBox::new(self.center - half, self.center + half);

        let clips = self.clips.iter().map(|name| Arc::new(self.sway_clip(name))).collect();

        LoadedAsset { scene, bounds, clips }
    }

    fn sway_clip(&self, name: &str) -> AnimationClip {
        let cycle = if self.cycle > 0.0 { self.cycle } else { 1.0 };
        let times = vec![0.0, cycle * 0.25, cycle * 0.5, cycle * 0.75, cycle];
        let swing = 0.35;
        let values = [0.0, swing, 0.0, -swing, 0.0]
            .into_iter()
            .map(Quat::from_rotation_y)
            .collect();

        AnimationClip::new(
            name,
            vec![Track {
                meta: TrackMeta {
                    node_name: "tail".to_string(),
                    target: TargetPath::Rotation,
                },
                data: TrackData::Quaternion(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fish_has_swim_clip() {
        let asset = FishBuilder::new().build();
        assert_eq!(asset.scene.len(), 2);
        assert_eq!(asset.clips.len(), 1);
        assert_eq!(asset.clips[0].name, SWIM_CLIP_NAME);
        assert!((asset.clips[0].duration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_follow_center() {
        let asset = FishBuilder::new()
            .center(Vec3::new(5.0, 0.0, 0.0))
            .without_animation()
            .build();
        assert!(!asset.has_animation());
        assert_eq!(asset.bounds.center(), Vec3::new(5.0, 0.0, 0.0));
    }
}
