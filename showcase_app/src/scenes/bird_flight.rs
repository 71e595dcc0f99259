//! A dove gliding a quarter circle below the cliffs, banking into the turn

use super::{add_light_rig, frame_camera, load_set_piece, per_frame, place, set_atmosphere, LightRig};
use showcase_engine::animation::{AnimationMixer, CatmullRomCurve, LoopMode, PathFollower};
use showcase_engine::foundation::math::{utils::deg_to_rad, Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{AnimateContext, Fog, LoadContext, SceneError, SceneModule};
use std::f32::consts::FRAC_PI_2;

pub const CLIFFS: &str = "environment/cliffs.glb";
pub const DOVE: &str = "animals/dove.glb";

const FLIGHT_RADIUS: f32 = 400.0;
const FLIGHT_ALTITUDE: f32 = -450.0;
const FLIGHT_OFFSET: Vec3 = Vec3::new(400.0, 0.0, -400.0);
const SAMPLES: u32 = 5;

/// Quarter circle from (-R, Y, 0) to (0, Y, R)
pub fn flight_path() -> CatmullRomCurve {
    let points = (0..=SAMPLES)
        .map(|i| {
            let angle = FRAC_PI_2 * i as f32 / SAMPLES as f32;
            Vec3::new(-FLIGHT_RADIUS * angle.cos(), FLIGHT_ALTITUDE, FLIGHT_RADIUS * angle.sin())
        })
        .collect();
    CatmullRomCurve::new(points)
}

pub struct BirdFlightScene {
    flight: PathFollower,
}

impl BirdFlightScene {
    pub fn new() -> Self {
        Self {
            flight: PathFollower::new(flight_path(), per_frame(0.004))
                .with_offset(FLIGHT_OFFSET)
                .with_max_extra_yaw(deg_to_rad(45.0)),
        }
    }
}

impl SceneModule for BirdFlightScene {
    fn name(&self) -> &str {
        "Bird Flight"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        self.flight.reset();

        frame_camera(ctx, Vec3::new(-150.0, -380.0, 420.0), Vec3::new(150.0, -450.0, -150.0));
        add_light_rig(
            ctx,
            &LightRig {
                ambient: Color::from_hex(0xDDE8FF),
                ambient_intensity: 1.5,
                sun_position: Vec3::new(200.0, 300.0, 100.0),
                ..LightRig::default()
            },
        );
        set_atmosphere(
            ctx,
            Fog {
                color: Color::from_rgb8(190, 210, 230),
                near: 10.0,
                far: 2000.0,
            },
            "backgrounds/open_sky.jpg",
        );

        let ground = Transform::from_position(Vec3::new(0.0, -520.0, 0.0));
        load_set_piece(ctx, CLIFFS, ground);

        let start = self.flight.pose_at(0.0);
        let dove = ctx.actors.reserve();
        ctx.load_model(DOVE, move |stage, template| {
            let transform = Transform::from_position(start.position)
                .with_rotation_y(deg_to_rad(45.0))
                .with_uniform_scale(3.0);
            let key = place(stage, &template, transform);
            stage.actors.fill(dove, key);

            let mut mixer = AnimationMixer::new(key);
            if let Some(clip) = template.clip("Take 001") {
                mixer.play(clip.clone(), LoopMode::Repeat);
            }
            stage.mixers.push(mixer);
        });
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        let Some(node) = ctx.actors.get(0).and_then(|key| ctx.container.get_mut(key)) else {
            return Ok(());
        };
        let pose = self.flight.advance(elapsed);
        node.transform.position = pose.position;
        node.transform.rotation.y = pose.yaw;
        Ok(())
    }
}
