//! Sunrise over the harbour
//!
//! The sun sweeps east and warms from amber to white while the view pans
//! along the quay. Once the sun clears the headland the morning replays.

use super::{add_light_rig, frame_camera, load_set_piece, mount_panel, per_frame, set_atmosphere, LightRig};
use showcase_engine::animation::{ChannelRamp, Rate};
use showcase_engine::foundation::math::{Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{AnimateContext, Fog, LoadContext, SceneError, SceneModule};
use showcase_engine::ui::DebugPanel;

pub const HARBOUR: &str = "environment/harbour.glb";

const DAWN: Color = Color::rgb(1.0, 0.847, 0.235);
const SUN_START: Vec3 = Vec3::new(-100.0, 13.9, 100.0);
const SUN_SET_X: f32 = 100.0;
const VIEW_TARGET: Vec3 = Vec3::new(41.06, 14.41, 40.21);

pub struct SunriseScene {
    sweep: Rate,
    pan: Rate,
    warmth: ChannelRamp,
}

impl SunriseScene {
    pub fn new() -> Self {
        Self {
            sweep: Rate::PerSecond(20.0),
            pan: per_frame(-0.03),
            warmth: ChannelRamp::new(DAWN, [Rate::PerSecond(0.0), Rate::PerSecond(0.1), Rate::PerSecond(0.5)]),
        }
    }
}

impl SceneModule for SunriseScene {
    fn name(&self) -> &str {
        "Sunrise"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        frame_camera(ctx, Vec3::new(205.3, -102.3, 82.1), VIEW_TARGET);
        ctx.controls.set_distance_limits(0.1, 1000.0);
        add_light_rig(
            ctx,
            &LightRig {
                ambient: Color::from_hex(0xFFDA24),
                ambient_intensity: 1.0,
                sun: DAWN,
                sun_intensity: 2.0,
                sun_position: SUN_START,
                ..LightRig::default()
            },
        );
        set_atmosphere(
            ctx,
            Fog {
                color: Color::from_rgb8(255, 214, 150),
                near: 1.0,
                far: 800.0,
            },
            "backgrounds/sunrise.jpg",
        );
        mount_panel(
            ctx,
            DebugPanel::new("Sun")
                .with_control("intensity", 2.0, 0.0, 10.0)
                .with_control("x", SUN_START.x, -100.0, 100.0),
        );

        load_set_piece(ctx, HARBOUR, Transform::identity());
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        let sun = ctx.container.aux().sun;
        let Some(sun) = sun.and_then(|key| ctx.container.get_mut(key)) else {
            return Err(SceneError::Animate("sunrise has no sun".to_string()));
        };

        sun.transform.position.x += self.sweep.step(elapsed);
        ctx.controls.target.z += self.pan.step(elapsed);

        let reset = sun.transform.position.x >= SUN_SET_X;
        if reset {
            sun.transform.position = SUN_START;
            ctx.controls.set_target(VIEW_TARGET);
        }
        if let Some(light) = sun.as_light_mut() {
            if reset {
                self.warmth.reset(&mut light.color);
            } else {
                self.warmth.apply(&mut light.color, elapsed);
            }
        }
        Ok(())
    }
}
