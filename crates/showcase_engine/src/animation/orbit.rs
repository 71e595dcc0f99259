//! Camera orbit with zoom and snap-back

use super::snapshot::CameraSnapshot;
use crate::foundation::math::Vec3;
use crate::render::{Camera, OrbitControls};
use std::f32::consts::TAU;

/// What an orbit update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitPhase {
    /// Camera advanced along the circle
    Orbiting,
    /// A full turn completed; camera restored to its initial state
    Reset,
}

/// Orbits the camera around a pivot while zooming in, then snaps back
///
/// The orbit angle and radius are derived from the camera's current
/// horizontal offset from the pivot each update, so user input between
/// ticks is respected. Cumulative rotation is tracked separately and the
/// camera is restored to the recorded state once it reaches a full turn.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    pivot: Vec3,
    rotation_speed: f32,
    zoom_speed: f32,
    min_fov: f32,
    initial: CameraSnapshot,
    total_rotation: f32,
}

impl OrbitRig {
    /// Create a rig; `initial` is what a completed turn restores
    pub fn new(pivot: Vec3, initial: CameraSnapshot) -> Self {
        Self {
            pivot,
            rotation_speed: 0.5,
            zoom_speed: 3.0,
            min_fov: 20.0,
            initial,
            total_rotation: 0.0,
        }
    }

    /// Builder: angular speed in radians per second
    #[must_use]
    pub fn with_rotation_speed(mut self, radians_per_second: f32) -> Self {
        self.rotation_speed = radians_per_second;
        self
    }

    /// Builder: fov decrease in degrees per second and the fov floor
    #[must_use]
    pub fn with_zoom(mut self, degrees_per_second: f32, min_fov: f32) -> Self {
        self.zoom_speed = degrees_per_second;
        self.min_fov = min_fov;
        self
    }

    /// Cumulative rotation since the last reset, in radians
    pub fn total_rotation(&self) -> f32 {
        self.total_rotation
    }

    /// Advance the orbit by `elapsed` seconds
    pub fn update(&mut self, camera: &mut Camera, controls: &mut OrbitControls, elapsed: f32) -> OrbitPhase {
        if camera.fov > self.min_fov {
            camera.fov = (camera.fov - self.zoom_speed * elapsed).max(self.min_fov);
            camera.update_projection_matrix();
        }

        let increment = self.rotation_speed * elapsed;
        self.total_rotation += increment;
        if self.total_rotation.abs() >= TAU {
            self.total_rotation = 0.0;
            self.initial.restore(camera, controls);
            controls.set_target(self.pivot);
            controls.update(camera);
            camera.look_at(self.initial.target);
            return OrbitPhase::Reset;
        }

        let dx = camera.position.x - self.pivot.x;
        let dz = camera.position.z - self.pivot.z;
        let angle = dx.atan2(dz) + increment;
        let radius = (dx * dx + dz * dz).sqrt();
        camera.position.x = self.pivot.x + radius * angle.sin();
        camera.position.z = self.pivot.z + radius * angle.cos();
        camera.look_at(self.pivot);
        OrbitPhase::Orbiting
    }
}
