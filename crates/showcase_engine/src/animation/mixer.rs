//! Keyframe clips and the mixers that play them
//!
//! A clip is a set of tracks, each driving one property of one named node.
//! A mixer is bound to a root node; on every update it advances its actions
//! and writes the sampled values onto the nodes under that root whose names
//! match the tracks.

use crate::foundation::math::Vec3;
use crate::scene::{NodeKey, SceneContainer};
use serde::{Deserialize, Serialize};

/// Which transform component a track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackProperty {
    /// Local position
    Position,
    /// Euler rotation in radians
    Rotation,
    /// Scale factors
    Scale,
}

/// Keyframes for one property of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    /// Name of the node this track drives
    pub target: String,
    /// Driven property
    pub property: TrackProperty,
    /// Keyframe times in seconds, ascending
    pub times: Vec<f32>,
    /// One value per keyframe
    pub values: Vec<[f32; 3]>,
}

impl KeyframeTrack {
    /// Linearly interpolated value at `time`, clamped to the first and last keys
    pub fn sample(&self, time: f32) -> Option<Vec3> {
        let count = self.times.len().min(self.values.len());
        if count == 0 {
            return None;
        }
        let last = count - 1;
        if time <= self.times[0] {
            return Some(Vec3::from(self.values[0]));
        }
        if time >= self.times[last] {
            return Some(Vec3::from(self.values[last]));
        }

        let next = self.times[..count].partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let alpha = if span > 0.0 {
            (time - self.times[prev]) / span
        } else {
            0.0
        };
        let a = Vec3::from(self.values[prev]);
        let b = Vec3::from(self.values[next]);
        Some(a.lerp(&b, alpha))
    }
}

/// A named animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name ("walk", "Take 001")
    pub name: String,
    /// Length in seconds
    pub duration: f32,
    /// Tracks
    pub tracks: Vec<KeyframeTrack>,
}

impl AnimationClip {
    /// Find a clip by name in a model's clip list
    pub fn find_by_name<'a>(clips: &'a [AnimationClip], name: &str) -> Option<&'a AnimationClip> {
        clips.iter().find(|clip| clip.name == name)
    }
}

/// Loop behaviour of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play once and hold the last frame
    Once,
    /// Restart from the beginning at the end of the clip
    #[default]
    Repeat,
}

/// A clip being played by a mixer
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: AnimationClip,
    time: f32,
    loop_mode: LoopMode,
    running: bool,
}

impl AnimationAction {
    /// Clip name
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Local playback time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Whether the action is still advancing
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn advance(&mut self, delta: f32) {
        if !self.running {
            return;
        }
        self.time += delta;
        let duration = self.clip.duration;
        if duration <= 0.0 {
            self.time = 0.0;
            return;
        }
        match self.loop_mode {
            LoopMode::Repeat => self.time = self.time.rem_euclid(duration),
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.running = false;
                }
            }
        }
    }
}

/// Time-driven controller bound to one animated model
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    root: Option<NodeKey>,
    actions: Vec<AnimationAction>,
    time: f32,
}

impl AnimationMixer {
    /// Create a mixer bound to `root`
    pub fn new(root: NodeKey) -> Self {
        Self {
            root: Some(root),
            actions: Vec::new(),
            time: 0.0,
        }
    }

    /// Start playing a clip
    pub fn play(&mut self, clip: AnimationClip, loop_mode: LoopMode) -> &AnimationAction {
        self.actions.retain(|action| action.clip.name != clip.name);
        self.actions.push(AnimationAction {
            clip,
            time: 0.0,
            loop_mode,
            running: true,
        });
        &self.actions[self.actions.len() - 1]
    }

    /// Stop and forget every action
    pub fn stop_all(&mut self) {
        self.actions.clear();
    }

    /// Bound root, `None` once uncached
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Whether the mixer still references its target
    pub fn is_bound(&self) -> bool {
        self.root.is_some()
    }

    /// Active actions
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    /// Total time this mixer has been advanced
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Unbind from the target so its nodes can be disposed
    pub fn uncache_root(&mut self) {
        self.root = None;
        self.actions.clear();
    }

    /// Advance every action by `delta` seconds and apply the result
    ///
    /// Does nothing once uncached or when the root has been disposed.
    pub fn update(&mut self, delta: f32, container: &mut SceneContainer) {
        let Some(root) = self.root else {
            return;
        };
        if !container.contains(root) {
            return;
        }
        self.time += delta;

        for action in &mut self.actions {
            action.advance(delta);
            for track in &action.clip.tracks {
                let Some(value) = track.sample(action.time) else {
                    continue;
                };
                let Some(key) = container.find_in_subtree(root, &track.target) else {
                    continue;
                };
                if let Some(node) = container.get_mut(key) {
                    match track.property {
                        TrackProperty::Position => node.transform.position = value,
                        TrackProperty::Rotation => node.transform.rotation = value,
                        TrackProperty::Scale => node.transform.scale = value,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    fn bob_clip() -> AnimationClip {
        AnimationClip {
            name: "bob".to_string(),
            duration: 2.0,
            tracks: vec![KeyframeTrack {
                target: "body".to_string(),
                property: TrackProperty::Position,
                times: vec![0.0, 1.0, 2.0],
                values: vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
            }],
        }
    }

    #[test]
    fn test_track_interpolates() {
        let clip = bob_clip();
        let value = clip.tracks[0].sample(0.5).unwrap();
        assert_relative_eq!(value.y, 0.5);
        assert_relative_eq!(clip.tracks[0].sample(5.0).unwrap().y, 0.0);
    }

    #[test]
    fn test_repeat_wraps_time() {
        let mut container = SceneContainer::new();
        let root = container.add(SceneNode::group("walker"));
        let body = container.add_child(root, SceneNode::group("body")).unwrap();

        let mut mixer = AnimationMixer::new(root);
        mixer.play(bob_clip(), LoopMode::Repeat);
        mixer.update(2.5, &mut container);

        assert_relative_eq!(mixer.actions()[0].time(), 0.5);
        assert_relative_eq!(container.get(body).unwrap().transform.position.y, 0.5);
    }

    #[test]
    fn test_once_holds_last_frame() {
        let mut container = SceneContainer::new();
        let root = container.add(SceneNode::group("body"));

        let mut mixer = AnimationMixer::new(root);
        mixer.play(bob_clip(), LoopMode::Once);
        mixer.update(3.0, &mut container);

        assert!(!mixer.actions()[0].is_running());
        assert_relative_eq!(mixer.actions()[0].time(), 2.0);
    }

    #[test]
    fn test_uncached_mixer_is_inert() {
        let mut container = SceneContainer::new();
        let root = container.add(SceneNode::group("body"));
        let mut mixer = AnimationMixer::new(root);
        mixer.play(bob_clip(), LoopMode::Repeat);

        mixer.uncache_root();
        mixer.update(0.5, &mut container);

        assert!(!mixer.is_bound());
        assert!(mixer.actions().is_empty());
        assert_eq!(mixer.time(), 0.0);
    }

    #[test]
    fn test_find_by_name() {
        let clips = vec![bob_clip()];
        assert!(AnimationClip::find_by_name(&clips, "bob").is_some());
        assert!(AnimationClip::find_by_name(&clips, "walk").is_none());
    }
}
