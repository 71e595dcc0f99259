//! # Shared View Camera
//!
//! One perspective camera and one set of orbit controls live for the whole
//! run. Scenes reposition them in `load` and script them in `animate`, but
//! never replace them: a scene switch only tears down what the container
//! owns, and the camera is not owned by the container.
//!
//! ## Conventions
//! - Right-handed, Y-up world space
//! - Field of view is stored in **degrees**, matching how scene scripts
//!   author and animate it; conversion happens in
//!   [`Camera::update_projection_matrix`]

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in degrees
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,

    projection: Mat4,
}

impl Camera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: fov_degrees,
            aspect,
            near,
            far,
            projection: Mat4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera look_at updated - target: {:?}", target);
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Recomputes the projection immediately.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Recompute the cached projection after changing `fov`, `aspect`, `near` or `far`
    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect > 0.0 { self.aspect } else { 1.0 };
        self.projection = Mat4::new_perspective(aspect, self.fov.to_radians(), self.near, self.far);
    }

    /// Cached projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// View matrix derived from position, target and up
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Distance from the camera to its look-at target
    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).magnitude()
    }
}

/// Orbit-style view controls
///
/// Holds the orbit target and distance limits; [`OrbitControls::update`]
/// applies them to the camera. Scenes move `target` directly when they
/// script a pan.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Minimum camera distance from target
    pub min_distance: f32,
    /// Maximum camera distance from target
    pub max_distance: f32,
    /// Whether user panning is allowed
    pub enable_pan: bool,
    /// Whether user input is processed at all
    pub enabled: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::zeros(),
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            enable_pan: true,
            enabled: true,
        }
    }
}

impl OrbitControls {
    /// Create controls orbiting the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orbit target
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Set distance limits
    pub fn set_distance_limits(&mut self, min: f32, max: f32) {
        self.min_distance = min;
        self.max_distance = max.max(min);
    }

    /// Apply the controls to the camera: clamp its distance and aim it at the target
    pub fn update(&self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let distance = offset.magnitude();
        if distance > 0.0 {
            let clamped = distance.clamp(self.min_distance, self.max_distance);
            if (clamped - distance).abs() > f32::EPSILON {
                camera.position = self.target + offset * (clamped / distance);
            }
        }
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 45.0, 2.0, 0.1, 100.0)
    }

    #[test]
    fn test_aspect_updates_projection() {
        let mut camera = camera();
        let before = *camera.projection_matrix();
        camera.set_aspect(1.0);
        assert_ne!(before, *camera.projection_matrix());
    }

    #[test]
    fn test_controls_clamp_distance() {
        let mut camera = camera();
        let mut controls = OrbitControls::new();
        controls.set_distance_limits(1.0, 4.0);

        controls.update(&mut camera);

        assert_relative_eq!(camera.distance_to_target(), 4.0, epsilon = 1e-5);
        assert_eq!(camera.target, controls.target);
    }

    #[test]
    fn test_controls_keep_distance_within_limits() {
        let mut camera = camera();
        let controls = OrbitControls {
            target: Vec3::new(0.0, 0.0, 5.0),
            ..OrbitControls::default()
        };

        controls.update(&mut camera);

        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(camera.target, Vec3::new(0.0, 0.0, 5.0));
    }
}
