//! Street with a subway train crossing on the elevated line and a delivery
//! van driving up the side street

use super::{add_light_rig, frame_camera, load_set_piece, mount_panel, per_frame, place, set_atmosphere, LightRig};
use showcase_engine::animation::{BoundPolicy, LinearPatrol};
use showcase_engine::foundation::math::{utils::deg_to_rad, Axis, Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{AnimateContext, Fog, LoadContext, SceneError, SceneModule};
use showcase_engine::ui::DebugPanel;

pub const STREET: &str = "environment/street.glb";
pub const SUBWAY: &str = "vehicles/subway.glb";
pub const VAN: &str = "vehicles/delivery_van.glb";

const TRAIN: usize = 0;
const DELIVERY: usize = 1;

const TRAIN_SPAWN: Vec3 = Vec3::new(20.0, 4.2, -6.0);
const VAN_SPAWN: Vec3 = Vec3::new(-3.5, 0.0, -10.0);

pub struct StreetScene {
    train: LinearPatrol,
    van: LinearPatrol,
}

impl StreetScene {
    pub fn new() -> Self {
        Self {
            train: LinearPatrol::new(Axis::X, per_frame(-0.07), -50.0, TRAIN_SPAWN.x, BoundPolicy::Wrap),
            van: LinearPatrol::new(Axis::Z, per_frame(0.03), VAN_SPAWN.z, 25.0, BoundPolicy::ResetTo(VAN_SPAWN.z)),
        }
    }
}

impl SceneModule for StreetScene {
    fn name(&self) -> &str {
        "Street"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        *self = Self::new();

        frame_camera(ctx, Vec3::new(-12.0, 2.5, 14.0), Vec3::new(4.0, 3.0, -6.0));
        add_light_rig(
            ctx,
            &LightRig {
                ambient: Color::from_hex(0xFEFCBE),
                ambient_intensity: 2.0,
                ..LightRig::default()
            },
        );
        set_atmosphere(
            ctx,
            Fog {
                color: Color::from_rgb8(153, 153, 153),
                near: 0.1,
                far: 300.0,
            },
            "backgrounds/overcast.jpg",
        );
        mount_panel(
            ctx,
            DebugPanel::new("Street")
                .with_control("ambient intensity", 2.0, 0.0, 5.0)
                .with_control("fog far", 300.0, 0.1, 1000.0),
        );

        load_set_piece(ctx, STREET, Transform::identity());

        let train = ctx.actors.reserve();
        ctx.load_model(SUBWAY, move |stage, template| {
            let key = place(
                stage,
                &template,
                Transform::from_position(TRAIN_SPAWN).with_rotation_y(deg_to_rad(-90.0)),
            );
            stage.actors.fill(train, key);
        });

        let van = ctx.actors.reserve();
        ctx.load_model(VAN, move |stage, template| {
            let key = place(stage, &template, Transform::from_position(VAN_SPAWN));
            stage.actors.fill(van, key);
        });
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        if let Some(node) = ctx.actors.get(TRAIN).and_then(|key| ctx.container.get_mut(key)) {
            self.train.apply(&mut node.transform, elapsed);
        }
        if let Some(node) = ctx.actors.get(DELIVERY).and_then(|key| ctx.container.get_mut(key)) {
            if self.van.apply(&mut node.transform, elapsed).crossed {
                log::debug!("Delivery van back at the corner");
            }
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
    fn test_train_wraps_and_van_resets() {
        let mut manager = loaded(StreetScene::new());
        assert_eq!(manager.actors().populated(), 2);

        let dt = 1.0 / 60.0;
        for _ in 0..1200 {
            manager.animate_active(dt).unwrap();
        }

        let train = manager.actors().get(TRAIN).unwrap();
        let x = manager.container().get(train).unwrap().transform.position.x;
        assert!((-50.0..TRAIN_SPAWN.x).contains(&x), "train left the line at {x}");

        let van = manager.actors().get(DELIVERY).unwrap();
        let z = manager.container().get(van).unwrap().transform.position.z;
        assert!((VAN_SPAWN.z..=25.0).contains(&z));
    }

    #[test]
    fn test_reentry_restarts_from_spawn() {
        let mut manager = loaded(StreetScene::new());
        for _ in 0..30 {
            manager.animate_active(0.1).unwrap();
        }
        manager.switch_to(1).unwrap();
        manager.deliver_assets();

        let train = manager.actors().get(TRAIN).unwrap();
        let position = manager.container().get(train).unwrap().transform.position;
        assert_relative_eq!(position.x, TRAIN_SPAWN.x);
        assert_eq!(manager.container().aux().debug_panel.as_ref().map(DebugPanel::title), Some("Street"));
    }
}
