//! Minimal scene graph: named, positionable nodes with visibility flags.
//!
//! Just enough hierarchy for the showcase to attach a loaded model and its
//! skeleton helper, and for the panel's visibility toggles to act on.

use glam::Vec3;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct NodeHandle;
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub visible: bool,
    pub position: Vec3,
    pub parent: Option<NodeHandle>,
    pub children: Vec<NodeHandle>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            position: Vec3::ZERO,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

#[derive(Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, under `parent` when given, otherwise as a root node.
    pub fn add_node(&mut self, node: Node, parent: Option<NodeHandle>) -> NodeHandle {
        let handle = self.nodes.insert(node);

        if let Some(parent_handle) = parent {
            if let Some(p) = self.nodes.get_mut(parent_handle) {
                p.children.push(handle);
            }
            if let Some(c) = self.nodes.get_mut(handle) {
                c.parent = Some(parent_handle);
            }
        } else {
            self.root_nodes.push(handle);
        }
        handle
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Depth-first name lookup starting at `root`.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        for &child in &node.children {
            if let Some(found) = self.find_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Sets the visibility flag of a node and its whole subtree.
    pub fn set_visible_recursive(&mut self, root: NodeHandle, visible: bool) {
        let children = match self.nodes.get_mut(root) {
            Some(node) => {
                node.visible = visible;
                node.children.clone()
            }
            None => return,
        };
        for child in children {
            self.set_visible_recursive(child, visible);
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
