//! Per-creature scene graph.
//!
//! Each creature owns its own copy of the loaded hierarchy, so animating one
//! creature never touches another's nodes. Nodes are stored flat; parents
//! always precede their children.

use aqua_animation::Pose;
use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Axis-aligned bounding box in asset units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extents along each axis. Inverted boxes report zero, not negative.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        (self.max - self.min).max(Vec3::ZERO)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub transform: Transform,
    /// Transform before any animation was applied.
    pub rest: Transform,
    world_matrix: Affine3A,
}

impl SceneNode {
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node. A `parent` that does not precede the new node is
    /// ignored and the node becomes a root.
    pub fn add_node(&mut self, name: impl Into<String>, parent: Option<usize>, transform: Transform) -> usize {
        let index = self.nodes.len();
        let parent = parent.filter(|&p| {
            let valid = p < index;
            if !valid {
                log::warn!("node {index}: parent {p} does not precede it, attached as root");
            }
            valid
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(index);
        }
        self.nodes.push(SceneNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            rest: transform.clone(),
            transform,
            world_matrix: Affine3A::IDENTITY,
        });
        index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// First node with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Writes a blended pose onto node transforms. Channels the pose leaves
    /// out are restored to rest.
    pub fn apply_pose(&mut self, pose: &Pose) {
        for node in &mut self.nodes {
            node.transform.position = node.rest.position;
            node.transform.rotation = node.rest.rotation;
            node.transform.scale = node.rest.scale;
        }

        for np in &pose.nodes {
            let Some(node) = self.nodes.get_mut(np.node_index) else {
                continue;
            };
            let w = np.weight.clamp(0.0, 1.0);
            if let Some(t) = np.translation {
                node.transform.position = node.rest.position.lerp(t, w);
            }
            if let Some(r) = np.rotation {
                node.transform.rotation = node.rest.rotation.slerp(r, w);
            }
            if let Some(s) = np.scale {
                node.transform.scale = node.rest.scale.lerp(s, w);
            }
        }
    }

    /// Resets every node to its rest transform.
    pub fn reset_to_rest(&mut self) {
        self.apply_pose(&Pose::default());
    }

    /// Propagates local matrices to world matrices, parents first.
    pub fn update_world_matrices(&mut self, root: &Affine3A) {
        for i in 0..self.nodes.len() {
            self.nodes[i].transform.update_local_matrix();
            let parent_world = match self.nodes[i].parent {
                Some(p) => self.nodes[p].world_matrix,
                None => *root,
            };
            self.nodes[i].world_matrix = parent_world * *self.nodes[i].transform.local_matrix();
        }
    }
}
