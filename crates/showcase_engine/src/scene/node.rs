//! Scene graph node types

use crate::foundation::math::{Transform, Vec3};
use crate::render::{Color, GeometryHandle, MaterialHandle, ResourceError, ResourceRegistry};
use bitflags::bitflags;
use slotmap::new_key_type;

new_key_type! {
    /// Stable key of a node inside a [`SceneContainer`](super::SceneContainer)
    pub struct NodeKey;
}

bitflags! {
    /// Per-node render flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are drawn
        const VISIBLE = 1 << 0;
        /// Mesh casts shadows
        const CAST_SHADOW = 1 << 1;
        /// Mesh receives shadows
        const RECEIVE_SHADOW = 1 << 2;
        /// Mesh may be skipped when outside the view frustum
        const FRUSTUM_CULLED = 1 << 3;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::FRUSTUM_CULLED
    }
}

/// Material assignment of a mesh: one material, or one per geometry group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialSlot {
    /// Single material
    Single(MaterialHandle),
    /// Ordered list of materials
    Multi(Vec<MaterialHandle>),
}

impl MaterialSlot {
    /// Every material handle in order
    pub fn handles(&self) -> Vec<MaterialHandle> {
        match self {
            Self::Single(handle) => vec![*handle],
            Self::Multi(handles) => handles.clone(),
        }
    }
}

/// Orthographic shadow camera of a directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
    /// Half extent of the frustum in X and Y
    pub extent: f32,
    /// Shadow map resolution
    pub map_size: u32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            near: 0.5,
            far: 500.0,
            extent: 5.0,
            map_size: 512,
        }
    }
}

/// Light variants
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Uniform ambient term
    Ambient,
    /// Sun-like light, optionally casting shadows
    Directional {
        /// Shadow configuration when shadows are enabled
        shadow: Option<ShadowCamera>,
    },
    /// Omni light with falloff distance
    Point {
        /// Zero means infinite range
        distance: f32,
    },
}

/// Light parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light variant
    pub kind: LightKind,
    /// Light color
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
}

impl Light {
    /// Ambient light
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    /// Directional light without shadows
    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { shadow: None },
            color,
            intensity,
        }
    }

    /// Builder: enable shadows on a directional light
    #[must_use]
    pub fn with_shadow(mut self, shadow: ShadowCamera) -> Self {
        if let LightKind::Directional { shadow: slot } = &mut self.kind {
            *slot = Some(shadow);
        }
        self
    }
}

/// Debug helper variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    /// Line showing a directional light's direction
    LightDirection,
    /// Wireframe of a shadow camera frustum
    ShadowFrustum,
    /// Ground grid
    Grid,
}

/// An object with its own release operation
///
/// Used for scene-graph payloads the core does not know how to free
/// (particle systems, video textures, audio emitters). Teardown calls
/// [`Disposable::dispose`] and tolerates failure.
pub trait Disposable {
    /// Human-readable label for diagnostics
    fn label(&self) -> &str;

    /// Release everything this object holds
    fn dispose(&mut self, resources: &mut ResourceRegistry) -> Result<(), ResourceError>;
}

/// What a node is
pub enum NodeKind {
    /// Pure transform node
    Group,
    /// Renderable mesh
    Mesh {
        /// Geometry allocation
        geometry: GeometryHandle,
        /// Material allocation(s)
        material: MaterialSlot,
    },
    /// Light source
    Light(Light),
    /// Debug visualisation
    Helper(HelperKind),
    /// Camera proxy; survives teardown
    Camera,
    /// Node with a custom release operation
    Custom(Box<dyn Disposable>),
}

impl std::fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => f.write_str("Group"),
            Self::Mesh { geometry, material } => f
                .debug_struct("Mesh")
                .field("geometry", geometry)
                .field("material", material)
                .finish(),
            Self::Light(light) => f.debug_tuple("Light").field(light).finish(),
            Self::Helper(kind) => f.debug_tuple("Helper").field(kind).finish(),
            Self::Camera => f.write_str("Camera"),
            Self::Custom(payload) => f.debug_tuple("Custom").field(&payload.label()).finish(),
        }
    }
}

/// A node in the scene graph
#[derive(Debug)]
pub struct SceneNode {
    /// Node name (model part names, lookup key for animation tracks)
    pub name: String,
    /// What the node is
    pub kind: NodeKind,
    /// Local transform
    pub transform: Transform,
    /// Render flags
    pub flags: NodeFlags,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl SceneNode {
    /// New node of the given kind at the origin
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::default(),
            flags: NodeFlags::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    /// Mesh node
    pub fn mesh(name: impl Into<String>, geometry: GeometryHandle, material: MaterialSlot) -> Self {
        Self::new(name, NodeKind::Mesh { geometry, material })
    }

    /// Light node
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    /// Helper node
    pub fn helper(name: impl Into<String>, kind: HelperKind) -> Self {
        Self::new(name, NodeKind::Helper(kind))
    }

    /// Builder: set transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: set position
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Parent node, `None` for container children and detached nodes
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Light parameters if this is a light
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light parameters if this is a light
    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Whether this node is a light
    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }

    /// Whether this node is a mesh
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    /// Whether this node is the camera proxy
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera)
    }
}
