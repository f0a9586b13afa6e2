use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::action::{AnimationAction, SampledValue};
use crate::binding::TargetPath;
use crate::pose::{NodePose, Pose};

/// Running weighted blend of one channel.
#[derive(Clone, Copy)]
struct Accum<T> {
    value: T,
    weight: f32,
}

#[derive(Default)]
struct NodeAccum {
    translation: Option<Accum<Vec3>>,
    rotation: Option<Accum<Quat>>,
    scale: Option<Accum<Vec3>>,
}

fn accumulate<T: Copy>(slot: &mut Option<Accum<T>>, value: T, weight: f32, mix: fn(T, T, f32) -> T) {
    match slot {
        None => *slot = Some(Accum { value, weight }),
        Some(acc) => {
            acc.weight += weight;
            acc.value = mix(acc.value, value, weight / acc.weight);
        }
    }
}

/// Owns the actions playing on one creature and blends them into a [`Pose`].
///
/// At most a handful of actions are alive at once: the current clip plus
/// any clips still fading out after a crossfade.
#[derive(Default)]
pub struct AnimationMixer {
    actions: SmallVec<[AnimationAction; 2]>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `action`, crossfading every currently playing action out over
    /// the same `fade_seconds` the new one fades in.
    pub fn play(&mut self, mut action: AnimationAction, fade_seconds: f32) {
        for existing in &mut self.actions {
            if existing.enabled {
                existing.fade_out(fade_seconds);
            }
        }
        action.fade_in(fade_seconds);
        self.actions.push(action);
        self.actions.retain(|a| !a.is_finished());
    }

    /// The most recently started action, if it is still playing.
    #[must_use]
    pub fn current(&self) -> Option<&AnimationAction> {
        self.actions.last().filter(|a| a.enabled)
    }

    pub fn current_mut(&mut self) -> Option<&mut AnimationAction> {
        self.actions.last_mut().filter(|a| a.enabled)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Stops and drops every action.
    pub fn stop_all(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
        self.actions.clear();
    }

    /// Advances every action and drops those that finished fading out.
    pub fn update(&mut self, dt: f32) {
        for action in &mut self.actions {
            action.update(dt);
        }
        self.actions.retain(|a| !a.is_finished());
    }

    /// Samples all weighted actions and blends them per node and channel.
    pub fn sample_pose(&mut self) -> Pose {
        let mut nodes: FxHashMap<usize, NodeAccum> = FxHashMap::default();

        for action in &mut self.actions {
            let weight = action.weight;
            if !action.enabled || weight <= 0.0 {
                continue;
            }

            let bindings = std::mem::take(&mut action.bindings);
            for &binding in &bindings {
                let Some(sample) = action.sample_binding(binding) else {
                    continue;
                };
                let node = nodes.entry(binding.node_index).or_default();

                match (binding.target, sample) {
                    (TargetPath::Translation, SampledValue::Vector3(v)) => {
                        accumulate(&mut node.translation, v, weight, Vec3::lerp);
                    }
                    (TargetPath::Scale, SampledValue::Vector3(v)) => {
                        accumulate(&mut node.scale, v, weight, Vec3::lerp);
                    }
                    (TargetPath::Rotation, SampledValue::Quaternion(q)) => {
                        accumulate(&mut node.rotation, q, weight, Quat::slerp);
                    }
                    (target, _) => {
                        log::trace!("track data does not match target {target:?}, skipped");
                    }
                }
            }
            action.bindings = bindings;
        }

        let mut out: Vec<NodePose> = nodes
            .into_iter()
            .map(|(node_index, acc)| {
                let weight = [
                    acc.translation.map(|a| a.weight),
                    acc.rotation.map(|a| a.weight),
                    acc.scale.map(|a| a.weight),
                ]
                .into_iter()
                .flatten()
                .fold(0.0_f32, f32::max)
                .min(1.0);

                NodePose {
                    node_index,
                    translation: acc.translation.map(|a| a.value),
                    rotation: acc.rotation.map(|a| a.value.normalize()),
                    scale: acc.scale.map(|a| a.value),
                    weight,
                }
            })
            .collect();
        out.sort_unstable_by_key(|n| n.node_index);

        Pose { nodes: out }
    }
}
