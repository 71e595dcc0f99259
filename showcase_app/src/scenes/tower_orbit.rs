//! Slow orbit around the clock tower while the lens zooms in

use super::{add_light_rig, frame_camera, load_set_piece, mount_panel, set_atmosphere, LightRig};
use showcase_engine::animation::{CameraSnapshot, OrbitPhase, OrbitRig};
use showcase_engine::foundation::math::{Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{AnimateContext, Fog, LoadContext, SceneError, SceneModule};
use showcase_engine::ui::DebugPanel;

pub const TOWER: &str = "environment/clock_tower.glb";

const PIVOT: Vec3 = Vec3::new(0.0, 125.0, 0.0);
const CAMERA_START: Vec3 = Vec3::new(0.0, 150.0, 300.0);

#[derive(Default)]
pub struct TowerOrbitScene {
    rig: Option<OrbitRig>,
    turns: u32,
}

impl TowerOrbitScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneModule for TowerOrbitScene {
    fn name(&self) -> &str {
        "Tower Orbit"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        frame_camera(ctx, CAMERA_START, PIVOT);
        add_light_rig(
            ctx,
            &LightRig {
                ambient: Color::from_hex(0xFFF4E0),
                ambient_intensity: 1.2,
                sun_position: Vec3::new(-150.0, 250.0, 120.0),
                ..LightRig::default()
            },
        );
        set_atmosphere(
            ctx,
            Fog {
                color: Color::from_rgb8(170, 180, 200),
                near: 50.0,
                far: 1500.0,
            },
            "backgrounds/dusk.jpg",
        );
        mount_panel(ctx, DebugPanel::new("Orbit").with_control("rotation speed", 0.5, 0.0, 2.0));

        load_set_piece(ctx, TOWER, Transform::identity());

        let initial = CameraSnapshot::capture(ctx.camera, ctx.controls);
        self.rig = Some(OrbitRig::new(PIVOT, initial));
        self.turns = 0;
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        let rig = self
            .rig
            .as_mut()
            .ok_or_else(|| SceneError::Animate("orbit rig missing".to_string()))?;
        if rig.update(ctx.camera, ctx.controls, elapsed) == OrbitPhase::Reset {
            self.turns += 1;
            log::debug!("Tower orbit completed turn {}", self.turns);
        }
        Ok(())
    }
}
