//! Recorded initial state for cycle resets

use crate::foundation::math::{Transform, Vec3};
use crate::render::{Camera, OrbitControls};
use crate::scene::{NodeKey, SceneContainer};

/// Camera and control state at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    /// Camera position
    pub position: Vec3,
    /// Camera look-at target
    pub target: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Orbit controls target
    pub control_target: Vec3,
}

impl CameraSnapshot {
    /// Record the current camera and controls
    pub fn capture(camera: &Camera, controls: &OrbitControls) -> Self {
        Self {
            position: camera.position,
            target: camera.target,
            fov: camera.fov,
            control_target: controls.target,
        }
    }

    /// Put camera and controls back
    pub fn restore(&self, camera: &mut Camera, controls: &mut OrbitControls) {
        camera.set_position(self.position);
        camera.fov = self.fov;
        camera.update_projection_matrix();
        controls.set_target(self.control_target);
        camera.look_at(self.target);
    }
}

/// Camera state plus node transforms, restored together
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    camera: Option<CameraSnapshot>,
    nodes: Vec<(NodeKey, Transform)>,
}

impl StateSnapshot {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record camera and controls
    pub fn record_camera(&mut self, camera: &Camera, controls: &OrbitControls) {
        self.camera = Some(CameraSnapshot::capture(camera, controls));
    }

    /// Record a node's current transform; unknown keys are ignored
    pub fn record_node(&mut self, container: &SceneContainer, key: NodeKey) {
        if let Some(node) = container.get(key) {
            self.nodes.retain(|(recorded, _)| *recorded != key);
            self.nodes.push((key, node.transform));
        }
    }

    /// Recorded camera state
    pub fn camera(&self) -> Option<&CameraSnapshot> {
        self.camera.as_ref()
    }

    /// Number of recorded nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Restore everything recorded; nodes disposed since are skipped
    pub fn restore(&self, container: &mut SceneContainer, camera: &mut Camera, controls: &mut OrbitControls) {
        if let Some(snapshot) = &self.camera {
            snapshot.restore(camera, controls);
        }
        for (key, transform) in &self.nodes {
            if let Some(node) = container.get_mut(*key) {
                node.transform = *transform;
            }
        }
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.camera = None;
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;

    #[test]
    fn test_restore_camera_and_nodes() {
        let mut container = SceneContainer::new();
        let walker = container.add(SceneNode::group("walker").at(Vec3::new(0.0, 0.0, 5.0)));
        let mut camera = Camera::perspective(Vec3::new(0.0, 2.0, 10.0), 45.0, 1.5, 0.1, 100.0);
        let mut controls = OrbitControls::new();

        let mut snapshot = StateSnapshot::new();
        snapshot.record_camera(&camera, &controls);
        snapshot.record_node(&container, walker);

        camera.set_position(Vec3::new(50.0, 50.0, 50.0));
        camera.fov = 20.0;
        controls.set_target(Vec3::new(1.0, 1.0, 1.0));
        container.get_mut(walker).unwrap().transform.position.z = 40.0;

        snapshot.restore(&mut container, &mut camera, &mut controls);

        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 10.0));
        assert_eq!(camera.fov, 45.0);
        assert_eq!(controls.target, Vec3::zeros());
        assert_eq!(container.get(walker).unwrap().transform.position.z, 5.0);
    }
}
