//! JSON asset descriptors.
//!
//! A descriptor is the already-decoded shape of a creature asset: node
//! hierarchy, bounds and keyframe clips. It stands in for a binary scene
//! format in tests, demos and the [`FileLoader`](crate::FileLoader).
//!
//! ```json
//! {
//!   "nodes": [{ "name": "body" }, { "name": "tail", "parent": 0, "translation": [-0.4, 0, 0] }],
//!   "bounds": { "min": [-0.6, -0.2, -0.1], "max": [0.6, 0.2, 0.1] },
//!   "clips": [{
//!     "name": "Swim_Loop",
//!     "tracks": [{ "node": "tail", "target": "rotation",
//!                  "times": [0, 0.5, 1], "values": [0,0,0,1, 0,0.2,0,0.98, 0,0,0,1] }]
//!   }]
//! }
//! ```

use std::sync::Arc;

use aqua_animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use aqua_core::LoadError;
use aqua_scene::{BoundingBox, SceneGraph, Transform};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::loader::{AssetRef, LoadedAsset};

fn default_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsDescriptor {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub node: String,
    pub target: TargetPath,
    #[serde(default)]
    pub interpolation: InterpolationMode,
    pub times: Vec<f32>,
    /// Flattened components: 3 per key for translation/scale, 4 (xyzw) for
    /// rotation.
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipDescriptor {
    pub name: String,
    pub tracks: Vec<TrackDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub nodes: Vec<NodeDescriptor>,
    pub bounds: BoundsDescriptor,
    #[serde(default)]
    pub clips: Vec<ClipDescriptor>,
}

impl AssetDescriptor {
    /// Parses descriptor JSON and decodes it in one step.
    pub fn decode_json(source: &AssetRef, bytes: &[u8]) -> Result<LoadedAsset, LoadError> {
        let descriptor: AssetDescriptor =
            serde_json::from_slice(bytes).map_err(|e| decode_error(source, e.to_string()))?;
        descriptor.decode(source)
    }

    /// Builds a [`LoadedAsset`], validating track shapes and key times.
    pub fn decode(&self, source: &AssetRef) -> Result<LoadedAsset, LoadError> {
        let mut scene = SceneGraph::new();
        for node in &self.nodes {
            let transform = Transform::from_trs(
                Vec3::from_array(node.translation),
                Quat::from_array(node.rotation).normalize(),
                Vec3::from_array(node.scale),
            );
            scene.add_node(node.name.clone(), node.parent, transform);
        }

        let bounds = BoundingBox::new(
            Vec3::from_array(self.bounds.min),
            Vec3::from_array(self.bounds.max),
        );
        if !bounds.is_finite() {
            return Err(decode_error(source, "bounds are not finite".into()));
        }

        let clips = self
            .clips
            .iter()
            .map(|clip| decode_clip(source, clip).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LoadedAsset { scene, bounds, clips })
    }
}

fn decode_clip(source: &AssetRef, clip: &ClipDescriptor) -> Result<AnimationClip, LoadError> {
    let mut tracks = Vec::with_capacity(clip.tracks.len());
    for (i, track) in clip.tracks.iter().enumerate() {
        let keys = track.times.len();
        if track.times.iter().any(|t| !t.is_finite()) || track.times.windows(2).any(|w| w[1] < w[0]) {
            return Err(decode_error(
                source,
                format!("clip '{}' track {i}: key times must be finite and non-decreasing", clip.name),
            ));
        }

        let components = match track.target {
            TargetPath::Rotation => 4,
            TargetPath::Translation | TargetPath::Scale => 3,
        };
        if track.values.len() != keys * components {
            return Err(decode_error(
                source,
                format!(
                    "clip '{}' track {i}: expected {} values for {keys} keys, found {}",
                    clip.name,
                    keys * components,
                    track.values.len()
                ),
            ));
        }

        let data = match track.target {
            TargetPath::Rotation => TrackData::Quaternion(KeyframeTrack::new(
                track.times.clone(),
                track
                    .values
                    .chunks_exact(4)
                    .map(|c| Quat::from_xyzw(c[0], c[1], c[2], c[3]).normalize())
                    .collect(),
                track.interpolation,
            )),
            TargetPath::Translation | TargetPath::Scale => TrackData::Vector3(KeyframeTrack::new(
                track.times.clone(),
                track.values.chunks_exact(3).map(Vec3::from_slice).collect(),
                track.interpolation,
            )),
        };

        tracks.push(Track {
            meta: TrackMeta {
                node_name: track.node.clone(),
                target: track.target,
            },
            data,
        });
    }
    Ok(AnimationClip::new(clip.name.clone(), tracks))
}

fn decode_error(source: &AssetRef, message: String) -> LoadError {
    LoadError::Decode {
        source_ref: source.to_string(),
        message,
    }
}
