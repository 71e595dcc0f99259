//! Scene Container - root of the active scene graph
//!
//! Nodes live in a `slotmap` arena and are linked by parent/child keys.
//! A node can be in one of three states:
//! - **attached**: reachable from the container's root children
//! - **detached**: still in the arena but unlinked (after [`SceneContainer::remove`])
//! - **disposed**: gone from the arena, its GPU references released
//!
//! The container also owns the [`ResourceRegistry`] its meshes allocate
//! from and the [`SceneAuxiliaryState`] side table. The camera proxy node
//! is the only node that survives a scene teardown.

use super::node::{HelperKind, Light, MaterialSlot, NodeFlags, NodeKey, NodeKind, SceneNode};
use crate::render::{Color, ResourceError, ResourceRegistry, TextureHandle};
use crate::ui::{DebugPanel, PanelError};
use slotmap::SlotMap;

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Fog color
    pub color: Color,
    /// Distance where fog starts
    pub near: f32,
    /// Distance where fog is opaque
    pub far: f32,
}

/// Named per-scene handles that are not plain scene-graph children
#[derive(Debug, Default)]
pub struct SceneAuxiliaryState {
    /// Directional light direction helper
    pub light_helper: Option<NodeKey>,
    /// Shadow camera frustum helper
    pub shadow_helper: Option<NodeKey>,
    /// Active fog
    pub fog: Option<Fog>,
    /// Background texture
    pub background: Option<TextureHandle>,
    /// Principal ambient light
    pub ambient_light: Option<NodeKey>,
    /// Principal directional light
    pub sun: Option<NodeKey>,
    /// Debug control panel
    pub debug_panel: Option<DebugPanel>,
}

impl SceneAuxiliaryState {
    /// True when every handle is empty
    pub fn is_clear(&self) -> bool {
        self.light_helper.is_none()
            && self.shadow_helper.is_none()
            && self.fog.is_none()
            && self.background.is_none()
            && self.ambient_light.is_none()
            && self.sun.is_none()
            && self.debug_panel.is_none()
    }
}

/// Result of disposing one subtree
#[derive(Debug, Default)]
pub struct DisposeOutcome {
    /// Nodes removed from the arena
    pub nodes: usize,
    /// Release errors, one per failing node; disposal continued past each
    pub failures: Vec<ResourceError>,
}

impl DisposeOutcome {
    /// Fold another outcome into this one
    pub fn merge(&mut self, other: DisposeOutcome) {
        self.nodes += other.nodes;
        self.failures.extend(other.failures);
    }
}

/// Root of the active scene graph
#[derive(Debug)]
pub struct SceneContainer {
    nodes: SlotMap<NodeKey, SceneNode>,
    children: Vec<NodeKey>,
    camera: Option<NodeKey>,
    resources: ResourceRegistry,
    aux: SceneAuxiliaryState,
}

impl Default for SceneContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: Vec::new(),
            camera: None,
            resources: ResourceRegistry::new(),
            aux: SceneAuxiliaryState::default(),
        }
    }

    /// Create a container holding the camera proxy
    pub fn with_camera() -> Self {
        let mut container = Self::new();
        container.attach_camera();
        container
    }

    /// Attach the camera proxy node (idempotent)
    pub fn attach_camera(&mut self) -> NodeKey {
        if let Some(key) = self.camera {
            return key;
        }
        let key = self.add(SceneNode::new("camera", NodeKind::Camera));
        self.camera = Some(key);
        key
    }

    /// Camera proxy key, if attached
    pub fn camera_node(&self) -> Option<NodeKey> {
        self.camera
    }

    /// Insert a node without attaching it anywhere
    pub fn insert(&mut self, node: SceneNode) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Insert a node as a direct child of the container
    pub fn add(&mut self, node: SceneNode) -> NodeKey {
        let key = self.nodes.insert(node);
        self.children.push(key);
        key
    }

    /// Insert a node under `parent`; returns `None` if the parent does not exist
    pub fn add_child(&mut self, parent: NodeKey, mut node: SceneNode) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(key);
        }
        Some(key)
    }

    /// Attach an existing detached node to the container root
    pub fn attach(&mut self, key: NodeKey) -> bool {
        if !self.nodes.contains_key(key) {
            return false;
        }
        self.unlink(key);
        self.children.push(key);
        true
    }

    /// Detach a node from its parent, keeping it (and its subtree) in the arena
    pub fn remove(&mut self, key: NodeKey) -> bool {
        if !self.nodes.contains_key(key) {
            return false;
        }
        self.unlink(key);
        true
    }

    fn unlink(&mut self, key: NodeKey) {
        let parent = self.nodes.get_mut(key).and_then(|node| node.parent.take());
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|&child| child != key);
                }
            }
            None => self.children.retain(|&child| child != key),
        }
    }

    /// Whether the key refers to a node in the arena
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Whether the node is reachable from the container root
    pub fn is_attached(&self, key: NodeKey) -> bool {
        let mut current = key;
        loop {
            match self.nodes.get(current) {
                None => return false,
                Some(node) => match node.parent {
                    Some(parent) => current = parent,
                    None => return self.children.contains(&current),
                },
            }
        }
    }

    /// Node lookup
    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutable node lookup
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Direct children of the container
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Number of direct children, camera included
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of nodes in the arena (attached or detached)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Pre-order keys of the subtree rooted at `root` (root first)
    pub fn subtree(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get(key) {
                out.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Visit every node of a subtree in pre-order
    pub fn traverse(&self, root: NodeKey, mut visit: impl FnMut(NodeKey, &SceneNode)) {
        for key in self.subtree(root) {
            if let Some(node) = self.nodes.get(key) {
                visit(key, node);
            }
        }
    }

    /// Visit every attached node in pre-order
    pub fn traverse_all(&self, mut visit: impl FnMut(NodeKey, &SceneNode)) {
        for &child in &self.children {
            self.traverse(child, &mut visit);
        }
    }

    /// Visit attached nodes whose whole ancestor chain is visible
    pub fn traverse_visible(&self, mut visit: impl FnMut(NodeKey, &SceneNode)) {
        let mut stack: Vec<NodeKey> = self.children.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if !node.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            visit(key, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// First attached node with the given name, in pre-order
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        let mut found = None;
        self.traverse_all(|key, node| {
            if found.is_none() && node.name == name {
                found = Some(key);
            }
        });
        found
    }

    /// First node named `name` inside a subtree
    pub fn find_in_subtree(&self, root: NodeKey, name: &str) -> Option<NodeKey> {
        self.subtree(root)
            .into_iter()
            .find(|&key| self.nodes.get(key).is_some_and(|node| node.name == name))
    }

    /// Attached light nodes, direct and transitive
    pub fn lights(&self) -> Vec<NodeKey> {
        let mut lights = Vec::new();
        self.traverse_all(|key, node| {
            if node.is_light() {
                lights.push(key);
            }
        });
        lights
    }

    /// Detached nodes with no parent: removed from the graph but never disposed
    pub fn detached_roots(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(key, node)| node.parent.is_none() && !self.children.contains(key))
            .map(|(key, _)| key)
            .collect()
    }

    /// Deep-copy a subtree as a new detached node
    ///
    /// Meshes share geometry and materials with the source (reference
    /// counts are bumped). Custom payloads cannot be duplicated and are
    /// cloned as empty groups.
    pub fn clone_subtree(&mut self, root: NodeKey) -> Result<NodeKey, ResourceError> {
        let Some(source) = self.nodes.get(root) else {
            return Err(ResourceError::UnknownHandle { kind: "node" });
        };
        let kind = match &source.kind {
            NodeKind::Group => NodeKind::Group,
            NodeKind::Mesh { geometry, material } => NodeKind::Mesh {
                geometry: *geometry,
                material: material.clone(),
            },
            NodeKind::Light(light) => NodeKind::Light(light.clone()),
            NodeKind::Helper(kind) => NodeKind::Helper(*kind),
            NodeKind::Camera => NodeKind::Group,
            NodeKind::Custom(payload) => {
                log::debug!("Cloning custom node '{}' as an empty group", payload.label());
                NodeKind::Group
            }
        };
        let mut copy = SceneNode::new(source.name.clone(), kind);
        copy.transform = source.transform;
        copy.flags = source.flags;
        let children = source.children.clone();

        if let NodeKind::Mesh { geometry, material } = &copy.kind {
            self.resources.retain_geometry(*geometry)?;
            for handle in material.handles() {
                self.resources.retain_material(handle)?;
            }
        }

        let copy_key = self.nodes.insert(copy);
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            if let Some(node) = self.nodes.get_mut(child_copy) {
                node.parent = Some(copy_key);
            }
            if let Some(node) = self.nodes.get_mut(copy_key) {
                node.children.push(child_copy);
            }
        }
        Ok(copy_key)
    }

    /// Every mesh in the subtree casts and receives shadows
    pub fn enable_shadows(&mut self, root: NodeKey) {
        for key in self.subtree(root) {
            if let Some(node) = self.nodes.get_mut(key) {
                if node.is_mesh() {
                    node.flags |= NodeFlags::CAST_SHADOW | NodeFlags::RECEIVE_SHADOW;
                }
            }
        }
    }

    /// Set opacity on every material used in the subtree
    pub fn set_opacity(&mut self, root: NodeKey, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        for key in self.subtree(root) {
            let handles = match self.nodes.get(key).map(|node| &node.kind) {
                Some(NodeKind::Mesh { material, .. }) => material.handles(),
                _ => continue,
            };
            for handle in handles {
                if let Some(material) = self.resources.material_mut(handle) {
                    material.opacity = opacity;
                    material.transparent = opacity < 1.0;
                }
            }
        }
    }

    /// Convenience: add a light to the container root
    pub fn add_light(&mut self, name: impl Into<String>, light: Light) -> NodeKey {
        self.add(SceneNode::light(name, light))
    }

    /// Convenience: add a helper to the container root
    pub fn add_helper(&mut self, name: impl Into<String>, kind: HelperKind) -> NodeKey {
        self.add(SceneNode::helper(name, kind))
    }

    /// Detach a subtree, release its GPU references and drop it from the arena
    ///
    /// Release failures are collected per node; the walk always finishes.
    pub fn dispose_subtree(&mut self, root: NodeKey) -> DisposeOutcome {
        let mut outcome = DisposeOutcome::default();
        if !self.nodes.contains_key(root) {
            return outcome;
        }
        self.unlink(root);
        if self.camera == Some(root) {
            self.camera = None;
        }

        for key in self.subtree(root) {
            let Some(node) = self.nodes.remove(key) else {
                continue;
            };
            outcome.nodes += 1;
            if let Err(e) = self.release_node(node) {
                outcome.failures.push(e);
            }
        }
        outcome
    }

    fn release_node(&mut self, node: SceneNode) -> Result<(), ResourceError> {
        match node.kind {
            NodeKind::Mesh { geometry, material } => {
                let mut first_error = self.resources.release_geometry(geometry).err();
                let handles = match material {
                    MaterialSlot::Single(handle) => vec![handle],
                    MaterialSlot::Multi(handles) => handles,
                };
                for handle in handles {
                    if let Err(e) = self.resources.release_material(handle) {
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
            NodeKind::Custom(mut payload) => payload.dispose(&mut self.resources),
            NodeKind::Group | NodeKind::Light(_) | NodeKind::Helper(_) | NodeKind::Camera => Ok(()),
        }
    }

    /// GPU resource registry
    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// Mutable GPU resource registry
    pub fn resources_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.resources
    }

    /// Auxiliary handles
    pub fn aux(&self) -> &SceneAuxiliaryState {
        &self.aux
    }

    /// Mutable auxiliary handles
    pub fn aux_mut(&mut self) -> &mut SceneAuxiliaryState {
        &mut self.aux
    }

    /// Use `texture` as the background, releasing the texture it replaces
    ///
    /// The new texture is installed even if releasing the old one fails.
    pub fn set_background(&mut self, texture: TextureHandle) -> Result<(), ResourceError> {
        match self.aux.background.replace(texture) {
            Some(previous) if previous != texture => self.resources.release_texture(previous),
            _ => Ok(()),
        }
    }

    /// Mount `panel`, destroying the panel it replaces
    pub fn set_debug_panel(&mut self, panel: DebugPanel) -> Result<(), PanelError> {
        match self.aux.debug_panel.replace(panel) {
            Some(mut previous) => previous.destroy(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{GeometryDesc, MaterialDesc, TextureDesc};
    use crate::scene::node::Disposable;

    fn mesh(container: &mut SceneContainer, name: &str) -> SceneNode {
        let resources = container.resources_mut();
        let geometry = resources.create_geometry(GeometryDesc {
            label: format!("{name}-geo"),
            vertex_count: 8,
        });
        let material = resources.create_material(MaterialDesc::standard(name, Color::WHITE));
        SceneNode::mesh(name, geometry, MaterialSlot::Single(material))
    }

    struct Faulty;

    impl Disposable for Faulty {
        fn label(&self) -> &str {
            "faulty"
        }

        fn dispose(&mut self, _resources: &mut ResourceRegistry) -> Result<(), ResourceError> {
            Err(ResourceError::ReleaseFailed {
                label: "faulty".to_string(),
                reason: "device lost".to_string(),
            })
        }
    }

    #[test]
    fn test_add_child_and_traverse_order() {
        let mut container = SceneContainer::new();
        let root = container.add(SceneNode::group("car"));
        let body = container.add_child(root, SceneNode::group("body")).unwrap();
        let wheel = container.add_child(root, SceneNode::group("wheel")).unwrap();
        container.add_child(body, SceneNode::group("door")).unwrap();

        let mut names = Vec::new();
        container.traverse(root, |_, node| names.push(node.name.clone()));
        assert_eq!(names, ["car", "body", "door", "wheel"]);
        assert_eq!(container.find_by_name("wheel"), Some(wheel));
        assert!(container.is_attached(wheel));
    }

    #[test]
    fn test_replacing_background_releases_old_texture() {
        let mut container = SceneContainer::new();
        let mut texture = |label: &str| {
            container.resources_mut().create_texture(TextureDesc {
                label: label.to_string(),
                width: 16,
                height: 8,
            })
        };
        let dusk = texture("dusk.jpg");
        let dawn = texture("dawn.jpg");

        container.set_background(dusk).unwrap();
        container.set_background(dusk).unwrap();
        assert_eq!(container.resources().live_count(), 2);

        container.set_background(dawn).unwrap();
        assert_eq!(container.aux().background, Some(dawn));
        assert_eq!(container.resources().live_count(), 1);
    }

    #[test]
    fn test_replacing_panel_destroys_old_one() {
        let mut container = SceneContainer::new();
        container.set_debug_panel(DebugPanel::new("Fog")).unwrap();

        let mut detached = DebugPanel::new("Sun");
        detached.detach_host();
        container.set_debug_panel(detached).unwrap();
        assert!(container.set_debug_panel(DebugPanel::new("Lights")).is_err());
        assert_eq!(container.aux().debug_panel.as_ref().map(DebugPanel::title), Some("Lights"));
    }

    #[test]
    fn test_remove_detaches_but_keeps_node() {
        let mut container = SceneContainer::new();
        let key = container.add(SceneNode::group("lamp"));
        assert!(container.remove(key));
        assert!(container.contains(key));
        assert!(!container.is_attached(key));
        assert_eq!(container.detached_roots(), vec![key]);
    }

    #[test]
    fn test_clone_shares_resources() {
        let mut container = SceneContainer::new();
        let node = mesh(&mut container, "taxi");
        let original = container.add(node);
        let copy = container.clone_subtree(original).unwrap();
        container.attach(copy);

        let Some(NodeKind::Mesh { geometry, .. }) = container.get(original).map(|n| &n.kind) else {
            panic!("expected mesh");
        };
        assert_eq!(container.resources().geometry_refs(*geometry), 2);

        container.dispose_subtree(original);
        assert_eq!(container.resources().live_geometries(), 1);
        container.dispose_subtree(copy);
        assert_eq!(container.resources().live_count(), 0);
    }

    #[test]
    fn test_dispose_continues_past_failure() {
        let mut container = SceneContainer::new();
        let root = container.add(SceneNode::group("fountain"));
        container
            .add_child(root, SceneNode::new("particles", NodeKind::Custom(Box::new(Faulty))))
            .unwrap();
        let node = mesh(&mut container, "basin");
        container.add_child(root, node).unwrap();

        let outcome = container.dispose_subtree(root);
        assert_eq!(outcome.nodes, 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(container.resources().live_count(), 0);
        assert_eq!(container.child_count(), 0);
    }

    #[test]
    fn test_enable_shadows_and_opacity() {
        let mut container = SceneContainer::new();
        let root = container.add(SceneNode::group("bus"));
        let node = mesh(&mut container, "shell");
        let shell = container.add_child(root, node).unwrap();

        container.enable_shadows(root);
        container.set_opacity(root, 0.5);

        let shell = container.get(shell).unwrap();
        assert!(shell.flags.contains(NodeFlags::CAST_SHADOW | NodeFlags::RECEIVE_SHADOW));
        let NodeKind::Mesh { material: MaterialSlot::Single(material), .. } = &shell.kind else {
            panic!("expected single-material mesh");
        };
        let material = container.resources().material(*material).unwrap();
        assert_eq!(material.opacity, 0.5);
        assert!(material.transparent);
        assert!(!container.get(root).unwrap().flags.contains(NodeFlags::CAST_SHADOW));
    }

    #[test]
    fn test_lights_found_transitively() {
        let mut container = SceneContainer::with_camera();
        let lamp_post = container.add(SceneNode::group("lamp_post"));
        container
            .add_child(lamp_post, SceneNode::light("bulb", Light::directional(Color::WHITE, 1.0)))
            .unwrap();
        container.add_light("ambient", Light::ambient(Color::WHITE, 0.3));

        assert_eq!(container.lights().len(), 2);
        assert_eq!(container.child_count(), 3);
    }
}
