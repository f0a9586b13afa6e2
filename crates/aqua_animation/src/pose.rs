use glam::{Quat, Vec3};
use serde::Serialize;

/// Blended local transform channels for one scene-graph node.
///
/// Channels no active clip animates stay `None` and the node keeps its rest
/// value for them. `weight` is the summed influence of the contributing
/// actions, capped at one; below one the pose is blended with the rest pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NodePose {
    pub node_index: usize,
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
    pub weight: f32,
}

/// Skeletal pose produced by the mixer for one frame, sorted by node index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pose {
    pub nodes: Vec<NodePose>,
}

impl Pose {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, node_index: usize) -> Option<&NodePose> {
        self.nodes
            .binary_search_by_key(&node_index, |n| n.node_index)
            .ok()
            .map(|i| &self.nodes[i])
    }
}
