use std::path::Path;

use glam::Vec3;

use crate::animation::AnimationClip;
use crate::assets::LoadedModel;
use crate::errors::Result;
use crate::scene::{Node, NodeHandle, Scene};

/// Imports a glTF file, attaches its node hierarchy to the scene and
/// extracts one [`AnimationClip`] per animation in the document.
///
/// Clip durations are the longest sampler input time across the animation's
/// channels; unnamed animations fall back to `anim_<index>`.
pub fn load_gltf(scene: &mut Scene, path: impl AsRef<Path>) -> Result<LoadedModel> {
    let path = path.as_ref();
    log::info!("loading model: {}", path.display());

    let (document, buffers, _images) = gltf::import(path)?;

    let root_name = path
        .file_stem()
        .map_or_else(|| "model".to_string(), |s| s.to_string_lossy().into_owned());
    let root = scene.add_node(Node::new(root_name), None);

    if let Some(gltf_scene) = document.default_scene().or_else(|| document.scenes().next()) {
        for gltf_node in gltf_scene.nodes() {
            attach_node(scene, root, &gltf_node);
        }
    }

    let skeleton = LoadedModel::add_skeleton_helper(scene, root);

    let mut clips = Vec::new();
    for (index, animation) in document.animations().enumerate() {
        let name = animation
            .name()
            .map_or_else(|| format!("anim_{index}"), str::to_string);

        let mut duration = 0.0_f32;
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            if let Some(inputs) = reader.read_inputs() {
                duration = inputs.fold(duration, f32::max);
            }
        }

        log::debug!("clip '{name}' ({duration:.3}s)");
        clips.push(AnimationClip::new(name, duration));
    }

    log::info!(
        "loaded {} nodes, {} clips",
        scene.node_count(),
        clips.len()
    );

    Ok(LoadedModel {
        root,
        skeleton,
        clips,
    })
}

fn attach_node(scene: &mut Scene, parent: NodeHandle, gltf_node: &gltf::Node<'_>) {
    let name = gltf_node
        .name()
        .map_or_else(|| format!("node_{}", gltf_node.index()), str::to_string);

    let (translation, _, _) = gltf_node.transform().decomposed();
    let node = Node::new(name).with_position(Vec3::from_array(translation));
    let handle = scene.add_node(node, Some(parent));

    for child in gltf_node.children() {
        attach_node(scene, handle, &child);
    }
}
