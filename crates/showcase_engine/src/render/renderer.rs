//! Renderer boundary
//!
//! The real renderer (GPU backend, windowing) is an external collaborator.
//! The core only needs to hand it the container and the camera once per
//! tick and tell it when the output surface changes size.

use super::camera::Camera;
use crate::foundation::math::Vec3;
use crate::scene::SceneContainer;
use thiserror::Error;

/// Renderer errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Output surface has a zero dimension (minimised window)
    #[error("Cannot render to a {width}x{height} surface")]
    ZeroSizedSurface {
        /// Surface width in pixels
        width: u32,
        /// Surface height in pixels
        height: u32,
    },

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Draws the active scene
pub trait Renderer {
    /// Render the container from the camera
    fn render(&mut self, container: &SceneContainer, camera: &Camera) -> Result<(), RenderError>;

    /// Resize the output surface
    fn set_size(&mut self, width: u32, height: u32);
}

/// What one rendered frame contained
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    /// Frame index, starting at 1
    pub frame: u64,
    /// Visible mesh nodes
    pub meshes: usize,
    /// Visible light nodes
    pub lights: usize,
    /// Whether fog was active
    pub fog: bool,
    /// Camera position the frame was drawn from
    pub camera_position: Vec3,
    /// Camera field of view in degrees
    pub camera_fov: f32,
}

/// Headless renderer that records frame statistics
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    width: u32,
    height: u32,
    frames: u64,
    last: Option<FrameStats>,
}

impl FrameRecorder {
    /// Create a recorder with an initial surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: 0,
            last: None,
        }
    }

    /// Number of frames successfully rendered
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Statistics of the most recent frame
    pub fn last_frame(&self) -> Option<&FrameStats> {
        self.last.as_ref()
    }

    /// Current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Renderer for FrameRecorder {
    fn render(&mut self, container: &SceneContainer, camera: &Camera) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::ZeroSizedSurface {
                width: self.width,
                height: self.height,
            });
        }

        let mut meshes = 0;
        let mut lights = 0;
        container.traverse_visible(|_, node| {
            if node.is_mesh() {
                meshes += 1;
            } else if node.is_light() {
                lights += 1;
            }
        });

        self.frames += 1;
        self.last = Some(FrameStats {
            frame: self.frames,
            meshes,
            lights,
            fog: container.aux().fog.is_some(),
            camera_position: camera.position,
            camera_fov: camera.fov,
        });
        log::trace!("Frame {}: {} meshes, {} lights", self.frames, meshes, lights);
        Ok(())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use crate::scene::{Light, NodeFlags, SceneNode};

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 5.0, 10.0), 45.0, 16.0 / 9.0, 0.1, 100.0)
    }

    #[test]
    fn test_counts_visible_nodes_only() {
        let mut container = SceneContainer::with_camera();
        let hidden = container.add(SceneNode::group("hidden"));
        container
            .add_child(hidden, SceneNode::light("lamp", Light::ambient(Color::WHITE, 1.0)))
            .unwrap();
        container.get_mut(hidden).unwrap().flags.remove(NodeFlags::VISIBLE);
        container.add_light("sun", Light::directional(Color::WHITE, 2.0));

        let mut recorder = FrameRecorder::new(640, 480);
        recorder.render(&container, &camera()).unwrap();

        let stats = recorder.last_frame().unwrap();
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.lights, 1);
        assert_eq!(stats.meshes, 0);
    }

    #[test]
    fn test_zero_size_fails() {
        let container = SceneContainer::new();
        let mut recorder = FrameRecorder::new(640, 480);
        recorder.set_size(0, 480);

        let err = recorder.render(&container, &camera()).unwrap_err();
        assert_eq!(err, RenderError::ZeroSizedSurface { width: 0, height: 480 });
        assert_eq!(recorder.frames_rendered(), 0);
    }
}
