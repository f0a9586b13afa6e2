//! Clip selection and playback for one creature.
//!
//! Whether a creature animates at all is decided once, when its asset
//! arrives: an asset without clips yields [`AnimationBlender::NoAnimation`]
//! and every later call is a no-op. Otherwise a [`ClipPlayer`] owns the
//! mixer and crossfades between clips when the animation settings change.

use std::sync::Arc;

use aqua_animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode, Pose};
use aqua_core::math::sanitize_delta;
use aqua_scene::SceneGraph;

use crate::params::{AnimationParams, PREFERRED_CLIP_NAMES};

/// Picks the clip to play: the configured name, then the preferred swim
/// names, then the first clip.
#[must_use]
pub fn select_clip<'a>(clips: &'a [Arc<AnimationClip>], name: Option<&str>) -> Option<&'a Arc<AnimationClip>> {
    if let Some(name) = name {
        if let Some(clip) = AnimationClip::find_by_name(clips, name) {
            return Some(clip);
        }
        log::debug!("no clip named '{name}', falling back");
    }
    PREFERRED_CLIP_NAMES
        .iter()
        .find_map(|preferred| AnimationClip::find_by_name(clips, preferred))
        .or_else(|| clips.first())
}

pub struct ClipPlayer {
    mixer: AnimationMixer,
    clips: Vec<Arc<AnimationClip>>,
    active: Arc<AnimationClip>,
    params: AnimationParams,
    advances: u64,
}

impl ClipPlayer {
    fn start(&mut self, clip: Arc<AnimationClip>, scene: &SceneGraph) {
        let mut action = AnimationAction::new(Arc::clone(&clip));
        action.loop_mode = LoopMode::Loop;
        action.time_scale = self.params.playback_rate;
        action.bindings = Binder::bind(&clip, |name| scene.find(name));
        log::debug!(
            "playing '{}' at x{:.2}, {} of {} tracks bound",
            clip.name,
            self.params.playback_rate,
            action.bindings.len(),
            clip.tracks.len()
        );
        self.mixer.play(action, self.params.fade_seconds);
        self.active = clip;
    }

    #[inline]
    #[must_use]
    pub fn active_clip(&self) -> &Arc<AnimationClip> {
        &self.active
    }

    #[inline]
    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// Local clock of the active clip.
    #[must_use]
    pub fn clip_time(&self) -> Option<f32> {
        self.mixer.current().map(|a| a.time)
    }
}

/// Animation capability of a creature.
pub enum AnimationBlender {
    /// Motion-only creature.
    NoAnimation,
    Animated(ClipPlayer),
}

impl AnimationBlender {
    /// Chooses the mode for a freshly loaded asset and starts its clip.
    #[must_use]
    pub fn from_asset(clips: &[Arc<AnimationClip>], scene: &SceneGraph, params: &AnimationParams) -> Self {
        let Some(clip) = select_clip(clips, params.clip_name.as_deref()) else {
            log::debug!("asset has no clips, motion only");
            return AnimationBlender::NoAnimation;
        };

        let mut player = ClipPlayer {
            mixer: AnimationMixer::new(),
            clips: clips.to_vec(),
            active: Arc::clone(clip),
            params: params.clone(),
            advances: 0,
        };
        player.start(Arc::clone(clip), scene);
        AnimationBlender::Animated(player)
    }

    #[inline]
    #[must_use]
    pub fn has_active_clip(&self) -> bool {
        match self {
            AnimationBlender::NoAnimation => false,
            AnimationBlender::Animated(player) => player.mixer.current().is_some(),
        }
    }

    #[must_use]
    pub fn active_clip_name(&self) -> Option<&str> {
        match self {
            AnimationBlender::NoAnimation => None,
            AnimationBlender::Animated(player) => Some(player.active.name.as_str()),
        }
    }

    /// Number of clip advances ever performed.
    #[must_use]
    pub fn advance_count(&self) -> u64 {
        match self {
            AnimationBlender::NoAnimation => 0,
            AnimationBlender::Animated(player) => player.advances,
        }
    }

    /// Moves clip clocks forward by `delta * playbackRate` and weight fades by
    /// `delta`.
    pub fn advance(&mut self, delta: f32) {
        if let AnimationBlender::Animated(player) = self {
            player.mixer.update(sanitize_delta(delta));
            player.advances += 1;
        }
    }

    /// Blended pose of every playing clip. `None` in motion-only mode.
    pub fn pose(&mut self) -> Option<Pose> {
        match self {
            AnimationBlender::NoAnimation => None,
            AnimationBlender::Animated(player) => Some(player.mixer.sample_pose()),
        }
    }

    /// Applies new animation settings without reloading. A different clip
    /// crossfades in; a rate change applies to the running clip at once.
    pub fn reconfigure(&mut self, params: &AnimationParams, scene: &SceneGraph) {
        let AnimationBlender::Animated(player) = self else {
            return;
        };
        player.params = params.clone();

        let Some(next) = select_clip(&player.clips, params.clip_name.as_deref()).cloned() else {
            return;
        };
        if Arc::ptr_eq(&next, &player.active) && player.mixer.current().is_some() {
            if let Some(action) = player.mixer.current_mut() {
                action.time_scale = params.playback_rate;
            }
            return;
        }
        player.start(next, scene);
    }

    /// Stops every clip and releases the player.
    pub fn teardown(&mut self) {
        if let AnimationBlender::Animated(player) = self {
            player.mixer.stop_all();
            log::debug!("stopped '{}'", player.active.name);
        }
        *self = AnimationBlender::NoAnimation;
    }
}
