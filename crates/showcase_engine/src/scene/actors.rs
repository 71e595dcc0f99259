//! Actor and mixer lists

use crate::animation::AnimationMixer;
use crate::scene::{NodeKey, SceneContainer};

/// Position in an [`ActorList`] reserved before its node exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorSlot(usize);

impl ActorSlot {
    /// Index in the list
    pub fn index(self) -> usize {
        self.0
    }
}

/// Nodes the active scene animates, by position
///
/// Scenes that load several models asynchronously reserve a slot per model
/// up front so animate can address them by index regardless of arrival
/// order. A slot whose load never completes stays empty, so lookups by
/// index return `Option`.
#[derive(Debug, Clone, Default)]
pub struct ActorList {
    slots: Vec<Option<NodeKey>>,
}

impl ActorList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node
    pub fn push(&mut self, key: NodeKey) -> usize {
        self.slots.push(Some(key));
        self.slots.len() - 1
    }

    /// Append an empty slot to be filled later
    pub fn reserve(&mut self) -> ActorSlot {
        self.slots.push(None);
        ActorSlot(self.slots.len() - 1)
    }

    /// Fill a reserved slot; false if the slot no longer exists
    pub fn fill(&mut self, slot: ActorSlot, key: NodeKey) -> bool {
        match self.slots.get_mut(slot.0) {
            Some(entry) => {
                *entry = Some(key);
                true
            }
            None => false,
        }
    }

    /// Node at `index`, `None` for holes and out of range
    pub fn get(&self, index: usize) -> Option<NodeKey> {
        self.slots.get(index).copied().flatten()
    }

    /// Number of slots, holes included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of filled slots
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Filled slots in order
    pub fn iter(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Filled slots with their indices
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, NodeKey)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|key| (index, key)))
    }

    /// Remove every slot, returning the filled ones
    pub fn drain(&mut self) -> Vec<NodeKey> {
        self.slots.drain(..).flatten().collect()
    }

    /// Remove every slot
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Mixers of the active scene
#[derive(Debug, Clone, Default)]
pub struct MixerList {
    mixers: Vec<AnimationMixer>,
}

impl MixerList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mixer
    pub fn push(&mut self, mixer: AnimationMixer) -> usize {
        self.mixers.push(mixer);
        self.mixers.len() - 1
    }

    /// Mixer at `index`
    pub fn get(&self, index: usize) -> Option<&AnimationMixer> {
        self.mixers.get(index)
    }

    /// Mutable mixer at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut AnimationMixer> {
        self.mixers.get_mut(index)
    }

    /// Number of mixers
    pub fn len(&self) -> usize {
        self.mixers.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.mixers.is_empty()
    }

    /// All mixers
    pub fn iter(&self) -> impl Iterator<Item = &AnimationMixer> {
        self.mixers.iter()
    }

    /// Advance every mixer
    pub fn update_all(&mut self, delta: f32, container: &mut SceneContainer) {
        for mixer in &mut self.mixers {
            mixer.update(delta, container);
        }
    }

    /// Unbind every mixer from its target, then empty the list
    pub fn uncache_and_clear(&mut self) -> usize {
        for mixer in &mut self.mixers {
            mixer.uncache_root();
        }
        let count = self.mixers.len();
        self.mixers.clear();
        count
    }
}
