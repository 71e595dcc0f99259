//! Animation
//!
//! Two kinds of motion drive a showcase scene:
//! - [`AnimationMixer`]s play keyframe clips baked into loaded models and
//!   are advanced by the dispatcher before the scene's own script runs
//! - scripted motion written in a scene's `animate`, built from the small
//!   primitives here ([`LinearPatrol`], [`TimedCycle`], [`OrbitRig`],
//!   [`PathFollower`], [`ChannelRamp`]) with [`StateSnapshot`] recording
//!   what a cycle resets to

pub mod cycle;
pub mod mixer;
pub mod orbit;
pub mod path;
pub mod patrol;
pub mod ramp;
pub mod snapshot;

pub use cycle::TimedCycle;
pub use mixer::{AnimationAction, AnimationClip, AnimationMixer, KeyframeTrack, LoopMode, TrackProperty};
pub use orbit::{OrbitPhase, OrbitRig};
pub use path::{CatmullRomCurve, PathFollower, PathPose};
pub use patrol::{BoundPolicy, LinearPatrol, PatrolStep};
pub use ramp::ChannelRamp;
pub use snapshot::{CameraSnapshot, StateSnapshot};

/// How a scripted motion scales with time
///
/// Many scene scripts move a fixed amount per call regardless of frame
/// time; newer ones scale by elapsed seconds. Both are supported so the
/// two styles can coexist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// Fixed amount per tick
    PerTick(f32),
    /// Amount per second of elapsed time
    PerSecond(f32),
}

impl Rate {
    /// Amount to apply for one tick of `elapsed` seconds
    pub fn step(self, elapsed: f32) -> f32 {
        match self {
            Self::PerTick(amount) => amount,
            Self::PerSecond(amount) => amount * elapsed,
        }
    }
}
