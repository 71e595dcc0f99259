//! Taxi rank: cabs pull away down both lanes and a fresh one takes the
//! place of every cab that leaves the street

use super::{add_light_rig, frame_camera, load_set_piece, mount_panel, per_frame, place, set_atmosphere, LightRig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use showcase_engine::animation::{BoundPolicy, LinearPatrol};
use showcase_engine::foundation::math::{Axis, Transform, Vec3};
use showcase_engine::render::Color;
use showcase_engine::scene::{AnimateContext, Fog, LoadContext, SceneError, SceneModule};
use showcase_engine::ui::DebugPanel;
use std::f32::consts::PI;

pub const RANK: &str = "environment/taxi_rank.glb";
pub const TAXI: &str = "vehicles/taxi.glb";

pub const TAXI_COUNT: usize = 10;
const LANE_START: f32 = -2.0;
const LANE_END: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TaxiSpawn {
    heading: Heading,
    position: Vec3,
    opacity: f32,
}

impl TaxiSpawn {
    fn random(rng: &mut StdRng) -> Self {
        let heading = if rng.gen_bool(0.5) { Heading::East } else { Heading::West };
        let position = match heading {
            Heading::East => Vec3::new(rng.gen_range(LANE_START..10.0), 0.0, -2.0),
            Heading::West => Vec3::new(rng.gen_range(28.0..LANE_END), 0.0, 2.5),
        };
        Self {
            heading,
            position,
            opacity: rng.gen_range(0.6..=1.0),
        }
    }

    fn transform(&self) -> Transform {
        let yaw = match self.heading {
            Heading::East => 0.0,
            Heading::West => PI,
        };
        Transform::from_position(self.position).with_rotation_y(yaw)
    }
}

/// Lane patrol of one cab; faster cabs further down the rank
fn lane_patrol(index: usize, spawn: &TaxiSpawn) -> LinearPatrol {
    let speed = 0.4 + index as f32 * 0.1;
    let signed = match spawn.heading {
        Heading::East => speed,
        Heading::West => -speed,
    };
    LinearPatrol::new(
        Axis::X,
        per_frame(signed),
        LANE_START,
        LANE_END,
        BoundPolicy::ResetTo(spawn.position.x),
    )
}

pub struct TaxiRankScene {
    seed: u64,
    rng: StdRng,
    taxis: Vec<LinearPatrol>,
}

impl TaxiRankScene {
    /// Spawns are drawn from `seed`, so every visit starts with the same rank
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            taxis: Vec::with_capacity(TAXI_COUNT),
        }
    }
}

impl SceneModule for TaxiRankScene {
    fn name(&self) -> &str {
        "Taxi Rank"
    }

    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.taxis.clear();

        frame_camera(ctx, Vec3::new(15.3, 1.33, 15.44), Vec3::new(15.16, 2.48, -5.26));
        add_light_rig(ctx, &LightRig::default());
        let fog = Fog {
            color: Color::from_rgb8(153, 153, 153),
            near: 0.1,
            far: 1000.0,
        };
        set_atmosphere(ctx, fog, "backgrounds/avenue.jpg");
        mount_panel(
            ctx,
            DebugPanel::new("Fog")
                .with_control("near", fog.near, 0.1, 1000.0)
                .with_control("far", fog.far, 0.1, 1000.0),
        );

        load_set_piece(ctx, RANK, Transform::identity());

        for index in 0..TAXI_COUNT {
            let spawn = TaxiSpawn::random(&mut self.rng);
            self.taxis.push(lane_patrol(index, &spawn));

            let slot = ctx.actors.reserve();
            ctx.load_model(TAXI, move |stage, template| {
                let key = place(stage, &template, spawn.transform());
                stage.container.set_opacity(key, spawn.opacity);
                stage.actors.fill(slot, key);
            });
        }
        Ok(())
    }

    fn animate(&mut self, ctx: &mut AnimateContext<'_>, elapsed: f32) -> Result<(), SceneError> {
        if ctx.actors.populated() < TAXI_COUNT {
            return Ok(());
        }

        for (index, patrol) in self.taxis.iter_mut().enumerate() {
            let Some(key) = ctx.actors.get(index) else {
                continue;
            };
            let Some(node) = ctx.container.get_mut(key) else {
                continue;
            };
            if !patrol.apply(&mut node.transform, elapsed).crossed {
                continue;
            }

            let spawn = TaxiSpawn::random(&mut self.rng);
            node.transform = spawn.transform();
            *patrol = lane_patrol(index, &spawn);
            ctx.container.set_opacity(key, spawn.opacity);
        }
        Ok(())
    }
}
