//! Asset loading: turns a model resource into scene nodes plus the ordered
//! list of animation clips the blend controller is built from.
//!
//! Loading is the only asynchronous boundary of the system and it is
//! resolved before anything else runs: a [`LoadedModel`] only exists once
//! the load succeeded, so no controller call can ever observe an unready
//! action set. A failed load is returned as an error and only logged by the
//! caller; there is no retry and no fallback visual.

#[cfg(feature = "gltf")]
mod gltf_loader;

#[cfg(feature = "gltf")]
pub use gltf_loader::load_gltf;

use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::scene::{Node, NodeHandle, Scene};

/// A fully loaded model: its root node, the hidden skeleton helper node and
/// the animation clips found in the source, in document order.
pub struct LoadedModel {
    pub root: NodeHandle,
    pub skeleton: NodeHandle,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl LoadedModel {
    /// Builds a model from pre-made clips, without an asset file. Used by
    /// tests and by the demo when no model path is given.
    pub fn from_clips(scene: &mut Scene, name: &str, clips: Vec<Arc<AnimationClip>>) -> Self {
        let root = scene.add_node(Node::new(name), None);
        let skeleton = Self::add_skeleton_helper(scene, root);
        Self {
            root,
            skeleton,
            clips,
        }
    }

    pub(crate) fn add_skeleton_helper(scene: &mut Scene, root: NodeHandle) -> NodeHandle {
        let mut helper = Node::new("skeleton-helper");
        helper.visible = false;
        scene.add_node(helper, Some(root))
    }
}
