//! Keyframe animation for creature rigs.
//!
//! - [`AnimationClip`]: named set of keyframe [`Track`]s
//! - [`AnimationAction`]: playback clock, loop mode and weight fade for one clip
//! - [`AnimationMixer`]: crossfades actions and blends them into a [`Pose`]
//! - [`Binder`]: resolves track node names to scene-graph node indices

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod pose;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::AnimationMixer;
pub use pose::{NodePose, Pose};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
