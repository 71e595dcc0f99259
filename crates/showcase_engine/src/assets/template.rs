//! Model templates
//!
//! A template is plain data. [`ModelTemplate::instantiate`] turns it into
//! scene nodes, allocating one geometry per mesh and one material (plus
//! optional texture) per material entry in the container's registry.

use crate::animation::AnimationClip;
use crate::foundation::math::{Transform, Vec3};
use crate::render::{Color, GeometryDesc, MaterialDesc, TextureDesc};
use crate::scene::{MaterialSlot, NodeKey, SceneContainer, SceneNode};
use serde::{Deserialize, Serialize};

/// Texture referenced by a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureTemplate {
    /// Image path
    pub path: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Material description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTemplate {
    /// Material name
    pub name: String,
    /// Base color, linear RGB
    #[serde(default = "white")]
    pub color: [f32; 3],
    /// Roughness
    #[serde(default = "one")]
    pub roughness: f32,
    /// Metalness
    #[serde(default)]
    pub metalness: f32,
    /// Opacity
    #[serde(default = "one")]
    pub opacity: f32,
    /// Optional color map
    #[serde(default)]
    pub map: Option<TextureTemplate>,
}

fn white() -> [f32; 3] {
    [1.0; 3]
}

fn one() -> f32 {
    1.0
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

/// What a template node becomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeTemplateKind {
    /// Transform-only node
    Group,
    /// Mesh with one or more materials
    Mesh {
        /// Vertex count of the geometry
        vertex_count: u32,
        /// Materials; more than one becomes a multi-material mesh
        materials: Vec<MaterialTemplate>,
    },
}

/// One node of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Node name
    pub name: String,
    /// Node kind
    pub kind: NodeTemplateKind,
    /// Local position
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler rotation in radians
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Scale
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Children
    #[serde(default)]
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    /// Group node with children
    pub fn group(name: impl Into<String>, children: Vec<NodeTemplate>) -> Self {
        Self {
            name: name.into(),
            kind: NodeTemplateKind::Group,
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
            children,
        }
    }

    /// Single-material mesh node
    pub fn mesh(name: impl Into<String>, vertex_count: u32, material: MaterialTemplate) -> Self {
        Self {
            name: name.into(),
            kind: NodeTemplateKind::Mesh {
                vertex_count,
                materials: vec![material],
            },
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
            children: Vec::new(),
        }
    }

    fn transform(&self) -> Transform {
        Transform::from_position(Vec3::from(self.position))
            .with_rotation(Vec3::from(self.rotation))
            .with_scale(Vec3::from(self.scale))
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(NodeTemplate::count).sum::<usize>()
    }
}

impl MaterialTemplate {
    /// Plain colored material
    pub fn colored(name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            map: None,
        }
    }
}

/// A loadable model: node tree plus animation clips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTemplate {
    /// Root node
    pub root: NodeTemplate,
    /// Animation clips
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
}

impl ModelTemplate {
    /// Model without animations
    pub fn new(root: NodeTemplate) -> Self {
        Self {
            root,
            clips: Vec::new(),
        }
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Clip by name
    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        AnimationClip::find_by_name(&self.clips, name)
    }

    /// Build the node tree into `container` as a detached subtree
    ///
    /// The caller decides where to attach the returned root.
    pub fn instantiate(&self, container: &mut SceneContainer) -> NodeKey {
        let node = build_node(&self.root, container);
        let root = container.insert(node);
        instantiate_children(&self.root, root, container);
        root
    }
}

fn instantiate_children(template: &NodeTemplate, parent: NodeKey, container: &mut SceneContainer) {
    for child in &template.children {
        let node = build_node(child, container);
        if let Some(key) = container.add_child(parent, node) {
            instantiate_children(child, key, container);
        }
    }
}

fn build_node(template: &NodeTemplate, container: &mut SceneContainer) -> SceneNode {
    let node = match &template.kind {
        NodeTemplateKind::Group => SceneNode::group(template.name.clone()),
        NodeTemplateKind::Mesh {
            vertex_count,
            materials,
        } => {
            let resources = container.resources_mut();
            let geometry = resources.create_geometry(GeometryDesc {
                label: template.name.clone(),
                vertex_count: *vertex_count,
            });
            let mut handles = Vec::with_capacity(materials.len());
            for material in materials {
                let mut desc = MaterialDesc::standard(material.name.clone(), Color::from_array(material.color))
                    .with_surface(material.roughness, material.metalness);
                desc.opacity = material.opacity;
                desc.transparent = material.opacity < 1.0;
                if let Some(texture) = &material.map {
                    desc.map = Some(resources.create_texture(TextureDesc {
                        label: texture.path.clone(),
                        width: texture.width,
                        height: texture.height,
                    }));
                }
                handles.push(resources.create_material(desc));
            }
            let slot = if handles.len() == 1 {
                MaterialSlot::Single(handles[0])
            } else {
                MaterialSlot::Multi(handles)
            };
            SceneNode::mesh(template.name.clone(), geometry, slot)
        }
    };
    node.with_transform(template.transform())
}
