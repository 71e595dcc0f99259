//! Output surface size

use crate::render::{Camera, Renderer};

/// Tracks the output surface and propagates size changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Viewport of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Current size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Aspect ratio; `None` while a dimension is zero
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }

    /// Apply a new size to the camera projection and the renderer
    ///
    /// A zero-sized surface (minimised window) keeps the previous aspect.
    pub fn resize(&mut self, camera: &mut Camera, renderer: &mut dyn Renderer, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if let Some(aspect) = self.aspect() {
            camera.set_aspect(aspect);
        }
        renderer.set_size(width, height);
        log::debug!("Viewport resized to {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::FrameRecorder;
    use approx::assert_relative_eq;

    #[test]
    fn test_resize_updates_camera_and_renderer() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 45.0, 1.0, 0.1, 100.0);
        let mut renderer = FrameRecorder::new(100, 100);
        let mut viewport = Viewport::new(100, 100);

        viewport.resize(&mut camera, &mut renderer, 1920, 1080);

        assert_relative_eq!(camera.aspect, 1920.0 / 1080.0);
        assert_eq!(renderer.size(), (1920, 1080));
    }

    #[test]
    fn test_zero_height_keeps_aspect() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 45.0, 2.0, 0.1, 100.0);
        let mut renderer = FrameRecorder::new(100, 50);
        let mut viewport = Viewport::new(100, 50);

        viewport.resize(&mut camera, &mut renderer, 100, 0);

        assert_eq!(camera.aspect, 2.0);
        assert_eq!(viewport.aspect(), None);
        assert_eq!(renderer.size(), (100, 0));
    }
}
