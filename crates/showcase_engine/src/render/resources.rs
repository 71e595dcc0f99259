//! Resource Registry - CPU-side tracking of GPU allocations
//!
//! **SEPARATION OF CONCERNS**:
//! - ResourceRegistry: which geometries, materials and textures exist and
//!   how many scene nodes reference each one
//! - Renderer: actual GPU objects (external; keyed by the handles issued here)
//! - SceneContainer: which nodes hold which handles
//!
//! Model clones share geometry and materials with their source, so every
//! allocation is reference counted. A handle is freed when its last
//! reference is released; releasing a freed handle is reported as
//! [`ResourceError::UnknownHandle`] instead of silently succeeding, which is
//! what lets teardown detect double-disposal bugs.

use super::color::Color;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Handle to a tracked geometry allocation
    pub struct GeometryHandle;
    /// Handle to a tracked material allocation
    pub struct MaterialHandle;
    /// Handle to a tracked texture allocation
    pub struct TextureHandle;
}

/// Resource registry errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Handle was never issued or has already been freed
    #[error("Unknown or already released {kind} handle")]
    UnknownHandle {
        /// Resource kind ("geometry", "material", "texture")
        kind: &'static str,
    },

    /// A node's own release operation failed
    #[error("Release failed for '{label}': {reason}")]
    ReleaseFailed {
        /// Label of the object that failed to release
        label: String,
        /// Backend-provided reason
        reason: String,
    },
}

/// Geometry description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryDesc {
    /// Debug label
    pub label: String,
    /// Vertex count (drives memory accounting only)
    pub vertex_count: u32,
}

/// Material description
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    /// Debug label
    pub label: String,
    /// Base color
    pub color: Color,
    /// Surface roughness
    pub roughness: f32,
    /// Surface metalness
    pub metalness: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether opacity is honoured by the renderer
    pub transparent: bool,
    /// Optional color map; owned by the material and released with it
    pub map: Option<TextureHandle>,
}

impl MaterialDesc {
    /// Opaque standard material with the given color
    pub fn standard(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
            map: None,
        }
    }

    /// Builder: set roughness and metalness
    #[must_use]
    pub fn with_surface(mut self, roughness: f32, metalness: f32) -> Self {
        self.roughness = roughness;
        self.metalness = metalness;
        self
    }

    /// Builder: attach a color map
    #[must_use]
    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }
}

/// Texture description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    /// Debug label (usually the source path)
    pub label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Lifetime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Allocations ever created
    pub allocated: u64,
    /// Allocations freed
    pub freed: u64,
    /// Release calls that named an unknown handle
    pub rejected_releases: u64,
}

#[derive(Debug)]
struct Tracked<T> {
    desc: T,
    refs: u32,
}

/// Reference-counted pool, shared by the three resource kinds
#[derive(Debug)]
struct Pool<K: slotmap::Key, T> {
    kind: &'static str,
    entries: SlotMap<K, Tracked<T>>,
}

impl<K: slotmap::Key, T> Pool<K, T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: SlotMap::with_key(),
        }
    }

    fn insert(&mut self, desc: T) -> K {
        self.entries.insert(Tracked { desc, refs: 1 })
    }

    fn retain(&mut self, key: K) -> Result<(), ResourceError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or(ResourceError::UnknownHandle { kind: self.kind })?;
        entry.refs += 1;
        Ok(())
    }

    /// Drop one reference; returns the description if this freed the entry
    fn release(&mut self, key: K) -> Result<Option<T>, ResourceError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or(ResourceError::UnknownHandle { kind: self.kind })?;
        entry.refs -= 1;
        if entry.refs == 0 {
            Ok(self.entries.remove(key).map(|tracked| tracked.desc))
        } else {
            Ok(None)
        }
    }

    fn get(&self, key: K) -> Option<&T> {
        self.entries.get(key).map(|tracked| &tracked.desc)
    }

    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.entries.get_mut(key).map(|tracked| &mut tracked.desc)
    }

    fn refs(&self, key: K) -> u32 {
        self.entries.get(key).map_or(0, |tracked| tracked.refs)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Registry of live GPU allocations for one scene container
#[derive(Debug)]
pub struct ResourceRegistry {
    geometries: Pool<GeometryHandle, GeometryDesc>,
    materials: Pool<MaterialHandle, MaterialDesc>,
    textures: Pool<TextureHandle, TextureDesc>,
    stats: ResourceStats,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            geometries: Pool::new("geometry"),
            materials: Pool::new("material"),
            textures: Pool::new("texture"),
            stats: ResourceStats::default(),
        }
    }

    /// Track a new geometry allocation
    pub fn create_geometry(&mut self, desc: GeometryDesc) -> GeometryHandle {
        self.stats.allocated += 1;
        self.geometries.insert(desc)
    }

    /// Track a new material allocation
    ///
    /// The material takes ownership of the reference to its `map`, if any.
    pub fn create_material(&mut self, desc: MaterialDesc) -> MaterialHandle {
        self.stats.allocated += 1;
        self.materials.insert(desc)
    }

    /// Track a new texture allocation
    pub fn create_texture(&mut self, desc: TextureDesc) -> TextureHandle {
        self.stats.allocated += 1;
        self.textures.insert(desc)
    }

    /// Add a reference to a geometry
    pub fn retain_geometry(&mut self, handle: GeometryHandle) -> Result<(), ResourceError> {
        self.geometries.retain(handle)
    }

    /// Add a reference to a material
    pub fn retain_material(&mut self, handle: MaterialHandle) -> Result<(), ResourceError> {
        self.materials.retain(handle)
    }

    /// Add a reference to a texture
    pub fn retain_texture(&mut self, handle: TextureHandle) -> Result<(), ResourceError> {
        self.textures.retain(handle)
    }

    /// Release one reference to a geometry
    pub fn release_geometry(&mut self, handle: GeometryHandle) -> Result<(), ResourceError> {
        let freed = self.geometries.release(handle);
        self.record(freed.map(|desc| desc.is_some()))
    }

    /// Release one reference to a material, and its color map when freed
    pub fn release_material(&mut self, handle: MaterialHandle) -> Result<(), ResourceError> {
        let freed = match self.materials.release(handle) {
            Ok(freed) => freed,
            Err(e) => return self.record(Err(e)),
        };
        let map = freed.as_ref().and_then(|desc| desc.map);
        self.record(Ok(freed.is_some()))?;
        match map {
            Some(texture) => self.release_texture(texture),
            None => Ok(()),
        }
    }

    /// Release one reference to a texture
    pub fn release_texture(&mut self, handle: TextureHandle) -> Result<(), ResourceError> {
        let freed = self.textures.release(handle);
        self.record(freed.map(|desc| desc.is_some()))
    }

    fn record(&mut self, outcome: Result<bool, ResourceError>) -> Result<(), ResourceError> {
        match outcome {
            Ok(true) => {
                self.stats.freed += 1;
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                self.stats.rejected_releases += 1;
                Err(e)
            }
        }
    }

    /// Look up a geometry
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryDesc> {
        self.geometries.get(handle)
    }

    /// Look up a material
    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDesc> {
        self.materials.get(handle)
    }

    /// Mutable material access (opacity and color changes at runtime)
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut MaterialDesc> {
        self.materials.get_mut(handle)
    }

    /// Look up a texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(handle)
    }

    /// Current reference count of a material (0 when freed)
    pub fn material_refs(&self, handle: MaterialHandle) -> u32 {
        self.materials.refs(handle)
    }

    /// Current reference count of a geometry (0 when freed)
    pub fn geometry_refs(&self, handle: GeometryHandle) -> u32 {
        self.geometries.refs(handle)
    }

    /// Number of live geometries
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Number of live materials
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Number of live textures
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Total live allocations of every kind
    pub fn live_count(&self) -> usize {
        self.live_geometries() + self.live_materials() + self.live_textures()
    }

    /// Lifetime counters
    pub fn stats(&self) -> ResourceStats {
        self.stats
    }
}
