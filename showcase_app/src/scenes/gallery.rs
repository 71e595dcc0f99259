//! Sculpture gallery, a still life with nothing scripted

use super::{add_light_rig, frame_camera, load_set_piece, mount_panel, set_atmosphere, LightRig};
use showcase_engine::foundation::math::{Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{Fog, Light, LightKind, LoadContext, SceneError, SceneModule, SceneNode};
use showcase_engine::ui::DebugPanel;

pub const SCULPTURE: &str = "gallery/sculpture.glb";

const PLINTHS: [Vec3; 3] = [
    Vec3::new(-6.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, -2.0),
    Vec3::new(6.0, 0.0, 0.0),
];

pub struct GalleryScene;

impl GalleryScene {
    pub fn new() -> Self {
        Self
    }
}

impl SceneModule for GalleryScene {
    fn name(&self) -> &str {
        "Gallery"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        frame_camera(ctx, Vec3::new(0.0, 4.0, 14.0), Vec3::new(0.0, 2.0, 0.0));
        add_light_rig(
            ctx,
            &LightRig {
                ambient_intensity: 0.6,
                sun_intensity: 1.5,
                sun_position: Vec3::new(10.0, 20.0, 10.0),
                ..LightRig::default()
            },
        );
        set_atmosphere(
            ctx,
            Fog {
                color: Color::from_rgb8(30, 30, 34),
                near: 20.0,
                far: 120.0,
            },
            "backgrounds/gallery_hall.jpg",
        );
        mount_panel(ctx, DebugPanel::new("Spotlights").with_control("intensity", 4.0, 0.0, 10.0));

        for (index, plinth) in PLINTHS.into_iter().enumerate() {
            let spot = Light {
                kind: LightKind::Point { distance: 12.0 },
                color: Color::from_hex(0xFFF1D6),
                intensity: 4.0,
            };
            ctx.container
                .add(SceneNode::light(format!("spotlight {}", index + 1), spot).at(plinth + Vec3::new(0.0, 6.0, 2.0)));
            load_set_piece(ctx, SCULPTURE, Transform::from_position(plinth));
        }
        Ok(())
    }

    fn is_animated(&self) -> bool {
        false
    }
}
