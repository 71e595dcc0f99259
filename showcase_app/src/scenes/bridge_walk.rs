//! Walk across the bridge deck
//!
//! A character walks east with its walk cycle playing while the camera
//! drifts after it and the sun slides along the river. Every eight seconds
//! the whole shot starts over.

use super::{add_light_rig, frame_camera, load_set_piece, mount_panel, per_frame, place, set_atmosphere, LightRig};
use showcase_engine::animation::{AnimationMixer, LoopMode, Rate, StateSnapshot, TimedCycle};
use showcase_engine::foundation::math::{utils::deg_to_rad, Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{AnimateContext, Fog, LoadContext, NodeFlags, SceneError, SceneModule};
use showcase_engine::ui::DebugPanel;

pub const BRIDGE: &str = "environment/brooklyn_bridge.glb";
pub const WALKER: &str = "characters/walker.glb";

const SHOT_LENGTH: f32 = 8.0;
const WALKER_SPAWN: Vec3 = Vec3::new(11.0, 0.0, -0.3);

fn walker_transform() -> Transform {
    Transform::from_position(WALKER_SPAWN)
        .with_rotation_y(deg_to_rad(90.0))
        .with_uniform_scale(10.0)
}

pub struct BridgeWalkScene {
    shot: TimedCycle,
    initial: StateSnapshot,
    camera_drift: Rate,
    walk_speed: Rate,
    sun_drift: Rate,
}

impl BridgeWalkScene {
    pub fn new() -> Self {
        Self {
            shot: TimedCycle::new(SHOT_LENGTH),
            initial: StateSnapshot::new(),
            camera_drift: per_frame(0.007),
            walk_speed: per_frame(0.015),
            sun_drift: per_frame(-0.1),
        }
    }
}

impl SceneModule for BridgeWalkScene {
    fn name(&self) -> &str {
        "Bridge Walk"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        *self = Self::new();

        frame_camera(ctx, Vec3::new(6.6, 1.4, 1.19), Vec3::new(43.5, 1.15, -2.29));
        let sun = add_light_rig(
            ctx,
            &LightRig {
                ambient: Color::from_hex(0xFEFCBE),
                ambient_intensity: 3.0,
                sun_position: Vec3::new(-100.0, -22.7, -43.0),
                ..LightRig::default()
            },
        );
        set_atmosphere(
            ctx,
            Fog {
                color: Color::from_rgb8(115, 115, 115),
                near: 0.1,
                far: 100.0,
            },
            "backgrounds/harbour_haze.jpg",
        );
        mount_panel(
            ctx,
            DebugPanel::new("Lights")
                .with_control("ambient intensity", 3.0, 0.0, 5.0)
                .with_control("sun intensity", 3.0, 0.0, 10.0)
                .with_control("sun z", -43.0, -100.0, 100.0),
        );

        self.initial.record_camera(ctx.camera, ctx.controls);
        self.initial.record_node(ctx.container, sun);

        load_set_piece(ctx, BRIDGE, Transform::identity());

        let walker = ctx.actors.reserve();
        ctx.load_model(WALKER, move |stage, template| {
            let key = place(stage, &template, walker_transform());
            for part in stage.container.subtree(key) {
                if let Some(node) = stage.container.get_mut(part) {
                    node.flags.remove(NodeFlags::FRUSTUM_CULLED);
                }
            }
            stage.actors.fill(walker, key);

            let mut mixer = AnimationMixer::new(key);
            match template.clip("walk") {
                Some(clip) => {
                    mixer.play(clip.clone(), LoopMode::Repeat);
                }
                None => log::warn!("{} has no walk clip", WALKER),
            }
            stage.mixers.push(mixer);
        });
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        let walker = ctx.actors.get(0);
        let sun = ctx.container.aux().sun;

        if self.shot.advance(elapsed) {
            self.initial.restore(ctx.container, ctx.camera, ctx.controls);
            if let Some(node) = walker.and_then(|key| ctx.container.get_mut(key)) {
                node.transform = walker_transform();
            }
            return Ok(());
        }

        ctx.camera.position.x += self.camera_drift.step(elapsed);
        if let Some(node) = walker.and_then(|key| ctx.container.get_mut(key)) {
            node.transform.position.x += self.walk_speed.step(elapsed);
        }
        if let Some(node) = sun.and_then(|key| ctx.container.get_mut(key)) {
            node.transform.position.z += self.sun_drift.step(elapsed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::test_support::loaded;
    use approx::assert_relative_eq;

    #[test]
    fn test_walker_arrives_with_walk_cycle() {
        let manager = loaded(BridgeWalkScene::new());
        assert_eq!(manager.actors().populated(), 1);
        assert_eq!(manager.mixers().len(), 1);
        let mixer = manager.mixers().get(0).unwrap();
        assert_eq!(mixer.actions()[0].name(), "walk");
    }

    #[test]
    fn test_shot_restarts_every_cycle() {
        let mut manager = loaded(BridgeWalkScene::new());
        let start_camera = manager.camera().position;

        for _ in 0..40 {
            manager.animate_active(0.1).unwrap();
        }
        let walker = manager.actors().get(0).unwrap();
        let mid = manager.container().get(walker).unwrap().transform.position.x;
        assert_relative_eq!(mid, WALKER_SPAWN.x + 0.9 * 4.0, epsilon = 1e-3);
        assert!(manager.camera().position.x > start_camera.x);

        for _ in 0..50 {
            manager.animate_active(0.1).unwrap();
        }
        let after = manager.container().get(walker).unwrap().transform.position.x;
        assert!(after - WALKER_SPAWN.x < 0.9 * 1.2, "walker never went back, at {after}");
        assert!(manager.camera().position.x - start_camera.x < 0.42 * 1.2);
    }
}
