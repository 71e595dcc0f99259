//! Showcase scenes
//!
//! Every scene owns its motion state and rebuilds it in `load`, so a scene
//! can be entered any number of times and always starts from the same
//! pose. The shared helpers below cover the staging every scene repeats:
//! framing the camera, the ambient plus sun light rig and the atmosphere.

mod bird_flight;
mod bridge_walk;
mod gallery;
mod street;
mod sunrise;
mod taxi_rank;
mod tower_orbit;

pub use bird_flight::BirdFlightScene;
pub use bridge_walk::BridgeWalkScene;
pub use gallery::GalleryScene;
pub use street::StreetScene;
pub use sunrise::SunriseScene;
pub use taxi_rank::TaxiRankScene;
pub use tower_orbit::TowerOrbitScene;

use showcase_engine::animation::Rate;
use showcase_engine::assets::ModelTemplate;
use showcase_engine::foundation::math::{Transform, Vec3};
use showcase_engine::render::{Color, TextureDesc};
use showcase_engine::scene::{
    Fog, HelperKind, Light, LoadContext, NodeFlags, NodeKey, SceneCatalog, SceneError, SceneNode, ShadowCamera,
    StageContext,
};
use showcase_engine::ui::DebugPanel;

/// Display rate the per-frame speeds below were tuned against
pub const REFERENCE_FPS: f32 = 60.0;

/// Field of view every scene starts from
pub const DEFAULT_FOV: f32 = 45.0;

/// Speed authored as "units per displayed frame", applied per second
pub fn per_frame(step: f32) -> Rate {
    Rate::PerSecond(step * REFERENCE_FPS)
}

/// Build the catalog with every showcase scene
pub fn catalog(taxi_seed: u64) -> Result<SceneCatalog, SceneError> {
    SceneCatalog::builder()
        .register(1, StreetScene::new())
        .register(2, BridgeWalkScene::new())
        .register(3, BirdFlightScene::new())
        .register(4, TowerOrbitScene::new())
        .register(5, SunriseScene::new())
        .register(6, TaxiRankScene::with_seed(taxi_seed))
        .register(7, GalleryScene::new())
        .build()
}

/// Put the shared camera and controls at a scene's starting view
pub fn frame_camera(ctx: &mut LoadContext<'_>, position: Vec3, target: Vec3) {
    ctx.camera.set_position(position);
    ctx.camera.fov = DEFAULT_FOV;
    ctx.camera.update_projection_matrix();
    ctx.controls.set_target(target);
    ctx.controls.set_distance_limits(0.1, 2000.0);
    ctx.controls.enable_pan = true;
    ctx.controls.update(ctx.camera);
}

/// Ambient fill plus one shadow-casting sun
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub ambient: Color,
    pub ambient_intensity: f32,
    pub sun: Color,
    pub sun_intensity: f32,
    pub sun_position: Vec3,
    pub shadow: ShadowCamera,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            ambient_intensity: 1.0,
            sun: Color::WHITE,
            sun_intensity: 3.0,
            sun_position: Vec3::new(-100.0, 22.5, 100.0),
            shadow: ShadowCamera {
                near: -500.0,
                far: 500.0,
                extent: 500.0,
                map_size: 2048,
            },
        }
    }
}

/// Add the rig and record it, with hidden debug helpers, in the auxiliary state
///
/// Returns the sun.
pub fn add_light_rig(ctx: &mut LoadContext<'_>, rig: &LightRig) -> NodeKey {
    let ambient = ctx
        .container
        .add_light("ambient light", Light::ambient(rig.ambient, rig.ambient_intensity));
    let sun = ctx.container.add(
        SceneNode::light(
            "directional light",
            Light::directional(rig.sun, rig.sun_intensity).with_shadow(rig.shadow),
        )
        .at(rig.sun_position),
    );

    let light_helper = ctx.container.add_helper("directional light helper", HelperKind::LightDirection);
    let shadow_helper = ctx.container.add_helper("shadow camera helper", HelperKind::ShadowFrustum);
    for helper in [light_helper, shadow_helper] {
        if let Some(node) = ctx.container.get_mut(helper) {
            node.flags.remove(NodeFlags::VISIBLE);
        }
    }

    let aux = ctx.container.aux_mut();
    aux.ambient_light = Some(ambient);
    aux.sun = Some(sun);
    aux.light_helper = Some(light_helper);
    aux.shadow_helper = Some(shadow_helper);
    sun
}

/// Fog and an equirectangular background image
pub fn set_atmosphere(ctx: &mut LoadContext<'_>, fog: Fog, background: &str) {
    let texture = ctx.container.resources_mut().create_texture(TextureDesc {
        label: background.to_string(),
        width: 4096,
        height: 2048,
    });
    ctx.container.aux_mut().fog = Some(fog);
    if let Err(e) = ctx.container.set_background(texture) {
        log::error!("Failed to release replaced background: {}", e);
    }
}

/// Attach a debug panel to the scene, replacing any earlier one
pub fn mount_panel(ctx: &mut LoadContext<'_>, panel: DebugPanel) {
    if let Err(e) = ctx.container.set_debug_panel(panel) {
        log::warn!("Replaced debug panel cleanup failed: {}", e);
    }
}

/// Spawn a model with a transform, shadows on
pub fn place(stage: &mut StageContext<'_>, template: &ModelTemplate, transform: Transform) -> NodeKey {
    let root = stage.spawn(template);
    stage.container.enable_shadows(root);
    if let Some(node) = stage.container.get_mut(root) {
        node.transform = transform;
    }
    root
}

/// Request a static set piece
pub fn load_set_piece(ctx: &mut LoadContext<'_>, path: &str, transform: Transform) {
    ctx.load_model(path, move |stage, template| {
        place(stage, &template, transform);
    });
}
