use crate::binding::PropertyBinding;
use crate::clip::AnimationClip;

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node index using `lookup`.
    ///
    /// Tracks naming a node the scene does not contain are skipped; a clip
    /// authored for a different rig still plays, just without those channels.
    pub fn bind<F>(clip: &AnimationClip, lookup: F) -> Vec<PropertyBinding>
    where
        F: Fn(&str) -> Option<usize>,
    {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            match lookup(&track.meta.node_name) {
                Some(node_index) => bindings.push(PropertyBinding {
                    track_index,
                    node_index,
                    target: track.meta.target,
                }),
                None => log::trace!(
                    "clip '{}': no node named '{}', track {} unbound",
                    clip.name,
                    track.meta.node_name,
                    track_index
                ),
            }
        }

        bindings
    }
}
