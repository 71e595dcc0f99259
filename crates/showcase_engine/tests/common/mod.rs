//! Shared scenes and fixtures for the integration tests

#![allow(dead_code)]

use showcase_engine::animation::{
    AnimationClip, AnimationMixer, BoundPolicy, KeyframeTrack, LinearPatrol, LoopMode, Rate, TrackProperty,
};
use showcase_engine::assets::{AssetLibrary, MaterialTemplate, ModelTemplate, NodeTemplate};
use showcase_engine::core::config::DispatcherConfig;
use showcase_engine::foundation::math::{Axis, Vec3};
use showcase_engine::render::{Camera, Color, GeometryDesc, MaterialDesc, ResourceError, ResourceRegistry, TextureDesc};
use showcase_engine::scene::{
    AnimateContext, Disposable, Fog, HelperKind, Light, LoadContext, MaterialSlot, NodeKind, SceneCatalog,
    SceneContainer, SceneError, SceneLifecycleManager, SceneModule, SceneNode, ShadowCamera,
};
use showcase_engine::ui::DebugPanel;
use std::cell::Cell;
use std::rc::Rc;

pub const TRAM: &str = "models/tram.glb";
pub const MISSING: &str = "models/missing.glb";

/// Library with a tram model carrying a looping "run" clip
pub fn library() -> AssetLibrary {
    let tram = ModelTemplate {
        root: NodeTemplate::group(
            "tram",
            vec![
                NodeTemplate::mesh("carriage", 480, MaterialTemplate::colored("livery", [0.8, 0.1, 0.1])),
                NodeTemplate::mesh("pantograph", 60, MaterialTemplate::colored("steel", [0.5, 0.5, 0.5])),
            ],
        ),
        clips: vec![AnimationClip {
            name: "run".to_string(),
            duration: 1.0,
            tracks: vec![KeyframeTrack {
                target: "pantograph".to_string(),
                property: TrackProperty::Position,
                times: vec![0.0, 1.0],
                values: vec![[0.0, 3.0, 0.0], [0.0, 3.5, 0.0]],
            }],
        }],
    };
    AssetLibrary::new().with_model(TRAM, tram)
}

pub fn camera() -> Camera {
    Camera::perspective(Vec3::new(0.0, 10.0, 30.0), 45.0, 16.0 / 9.0, 0.1, 2000.0)
}

pub fn manager(catalog: SceneCatalog, latency_frames: u32) -> SceneLifecycleManager {
    SceneLifecycleManager::new(catalog, Box::new(library()), camera(), latency_frames)
}

pub fn dispatcher_config() -> DispatcherConfig {
    DispatcherConfig {
        max_frame_delta: 0.1,
        freeze_on_error: true,
    }
}

fn mesh(container: &mut SceneContainer, name: &str, color: Color) -> SceneNode {
    let resources = container.resources_mut();
    let geometry = resources.create_geometry(GeometryDesc {
        label: name.to_string(),
        vertex_count: 24,
    });
    let material = resources.create_material(MaterialDesc::standard(name, color));
    SceneNode::mesh(name, geometry, MaterialSlot::Single(material))
}

/// Red cube moving +0.2 z per tick, reset to -20 past 70
pub struct RedCube {
    patrol: LinearPatrol,
}

impl RedCube {
    pub fn new() -> Self {
        Self {
            patrol: LinearPatrol::new(Axis::Z, Rate::PerTick(0.2), -20.0, 70.0, BoundPolicy::ResetTo(-20.0)),
        }
    }
}

impl SceneModule for RedCube {
    fn name(&self) -> &str {
        "red cube"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        let node = mesh(ctx.container, "cube", Color::rgb(1.0, 0.0, 0.0));
        let cube = ctx.container.add(node);
        ctx.actors.push(cube);
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        if let Some(node) = ctx.actors.get(0).and_then(|key| ctx.container.get_mut(key)) {
            self.patrol.apply(&mut node.transform, elapsed);
        }
        Ok(())
    }
}

/// Release operation that always fails
pub struct FaultyEmitter;

impl Disposable for FaultyEmitter {
    fn label(&self) -> &str {
        "fountain particles"
    }

    fn dispose(&mut self, _resources: &mut ResourceRegistry) -> Result<(), ResourceError> {
        Err(ResourceError::ReleaseFailed {
            label: self.label().to_string(),
            reason: "emitter already released".to_string(),
        })
    }
}

/// Release operation that records it ran
pub struct TrackedEmitter(pub Rc<Cell<u32>>);

impl Disposable for TrackedEmitter {
    fn label(&self) -> &str {
        "tracked particles"
    }

    fn dispose(&mut self, _resources: &mut ResourceRegistry) -> Result<(), ResourceError> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

/// Everything a scene can own: lights (nested too), helpers, fog,
/// background, panel, custom nodes, an orphan and an async tram with a mixer
pub struct Plaza {
    pub faulty_emitter: bool,
    pub detach_panel: bool,
}

impl Plaza {
    pub fn new() -> Self {
        Self {
            faulty_emitter: false,
            detach_panel: false,
        }
    }
}

impl SceneModule for Plaza {
    fn name(&self) -> &str {
        "plaza"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        ctx.camera.set_position(Vec3::new(0.0, 40.0, 120.0));
        ctx.controls.set_target(Vec3::new(0.0, 5.0, 0.0));

        let ambient = ctx.container.add_light("ambient", Light::ambient(Color::WHITE, 0.4));
        let sun = ctx.container.add_light(
            "sun",
            Light::directional(Color::from_hex(0xFFD83C), 2.0).with_shadow(ShadowCamera::default()),
        );
        let lamp_post = ctx.container.add(SceneNode::group("lamp post"));
        ctx.container
            .add_child(lamp_post, SceneNode::light("lamp", Light::ambient(Color::WHITE, 0.2)))
            .ok_or_else(|| SceneError::Load("lamp post vanished".to_string()))?;

        let node = mesh(ctx.container, "ground", Color::rgb(0.3, 0.3, 0.3));
        ctx.container.add(node);

        let emitter: Box<dyn Disposable> = if self.faulty_emitter {
            Box::new(FaultyEmitter)
        } else {
            Box::new(TrackedEmitter(Rc::new(Cell::new(0))))
        };
        ctx.container.add(SceneNode::new("fountain", NodeKind::Custom(emitter)));

        let debris = mesh(ctx.container, "debris", Color::BLACK);
        let debris = ctx.container.add(debris);
        ctx.container.remove(debris);

        let light_helper = ctx.container.add_helper("sun helper", HelperKind::LightDirection);
        let shadow_helper = ctx.container.add_helper("shadow helper", HelperKind::ShadowFrustum);
        let background = ctx.container.resources_mut().create_texture(TextureDesc {
            label: "sky.jpg".to_string(),
            width: 2048,
            height: 1024,
        });
        let mut panel = DebugPanel::new("Sun").with_control("x", 10.0, -100.0, 100.0);
        if self.detach_panel {
            panel.detach_host();
        }

        let aux = ctx.container.aux_mut();
        aux.ambient_light = Some(ambient);
        aux.sun = Some(sun);
        aux.light_helper = Some(light_helper);
        aux.shadow_helper = Some(shadow_helper);
        aux.background = Some(background);
        aux.fog = Some(Fog {
            color: Color::WHITE,
            near: 10.0,
            far: 400.0,
        });
        aux.debug_panel = Some(panel);

        let slot = ctx.actors.reserve();
        ctx.load_model(TRAM, move |stage, template| {
            let tram = stage.spawn(&template);
            stage.actors.fill(slot, tram);
            let mut mixer = AnimationMixer::new(tram);
            if let Some(clip) = template.clip("run") {
                mixer.play(clip.clone(), LoopMode::Repeat);
            }
            stage.mixers.push(mixer);
        });
        Ok(())
    }
}

/// Minimal scene: one light and one mesh
pub struct Kiosk;

impl SceneModule for Kiosk {
    fn name(&self) -> &str {
        "kiosk"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        ctx.container.add_light("ambient", Light::ambient(Color::WHITE, 1.0));
        let node = mesh(ctx.container, "kiosk", Color::rgb(0.2, 0.6, 0.2));
        ctx.container.add(node);
        Ok(())
    }

    fn is_animated(&self) -> bool {
        false
    }
}

/// Moves an actor each tick and fails on the configured call
pub struct Flaky {
    pub fail_on_call: u32,
    calls: u32,
}

impl Flaky {
    pub fn new(fail_on_call: u32) -> Self {
        Self {
            fail_on_call,
            calls: 0,
        }
    }
}

impl SceneModule for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        self.calls = 0;
        let node = mesh(ctx.container, "bus", Color::WHITE);
        let bus = ctx.container.add(node);
        ctx.actors.push(bus);
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, _elapsed: f32) -> Result<(), SceneError> {
        self.calls += 1;
        if self.calls == self.fail_on_call {
            return Err(SceneError::Animate("bus route missing".to_string()));
        }
        if let Some(node) = ctx.actors.get(0).and_then(|key| ctx.container.get_mut(key)) {
            node.transform.position.x += 1.0;
        }
        Ok(())
    }
}

/// Requests a model that does not exist
pub struct Broken;

impl SceneModule for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        ctx.container.add_light("ambient", Light::ambient(Color::WHITE, 1.0));
        ctx.load_model(MISSING, |stage, template| {
            stage.spawn(&template);
        });
        Ok(())
    }
}

/// Mounts a reticle and a head lamp on the camera node
pub struct Hud;

impl SceneModule for Hud {
    fn name(&self) -> &str {
        "hud"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        let camera = ctx
            .container
            .camera_node()
            .ok_or_else(|| SceneError::Load("no camera node".to_string()))?;
        let reticle = mesh(ctx.container, "reticle", Color::WHITE);
        let reticle = ctx
            .container
            .add_child(camera, reticle)
            .ok_or_else(|| SceneError::Load("camera node vanished".to_string()))?;
        let crosshair = mesh(ctx.container, "crosshair", Color::BLACK);
        ctx.container.add_child(reticle, crosshair);
        ctx.container
            .add_child(camera, SceneNode::light("head lamp", Light::ambient(Color::WHITE, 0.5)));
        Ok(())
    }

    fn is_animated(&self) -> bool {
        false
    }
}
