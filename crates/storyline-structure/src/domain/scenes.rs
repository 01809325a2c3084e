//! Scenes: the ordered content items that occupy beats.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::beats::{Beat, BeatId};
use super::structure::Structure;

/// Identifier of a scene.
pub type SceneId = Uuid;

/// A scene's reference to a beat of one particular structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeatRef {
    /// The structure the beat belongs to.
    pub structure_id: Uuid,
    /// The referenced beat.
    pub beat_id: BeatId,
}

/// An ordered content unit. Its position in the parent list is its ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Stable identity.
    pub id: SceneId,
    /// Display title.
    pub title: String,
    /// At most one reference per structure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beats: Vec<BeatRef>,
}

impl Scene {
    /// Creates a scene with no beat references.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            beats: Vec::new(),
        }
    }

    /// Replaces the generated identifier with a fixed one.
    #[must_use]
    pub fn with_id(mut self, id: SceneId) -> Self {
        self.id = id;
        self
    }

    /// Returns this scene's reference into `structure_id`, if any.
    #[must_use]
    pub fn beat_ref(&self, structure_id: Uuid) -> Option<&BeatRef> {
        self.beats.iter().find(|r| r.structure_id == structure_id)
    }

    /// Resolves the referenced beat in `structure`, enabled or not.
    #[must_use]
    pub fn beat<'s>(&self, structure: &'s Structure) -> Option<&'s Beat> {
        self.beat_ref(structure.id)
            .and_then(|r| structure.beat(r.beat_id))
    }

    /// Resolves the referenced beat in `structure` if it is enabled.
    /// Disabled beats do not count as occupied.
    #[must_use]
    pub fn active_beat<'s>(&self, structure: &'s Structure) -> Option<&'s Beat> {
        self.beat(structure).filter(|beat| beat.enabled)
    }

    /// Points this scene at `beat_id` of `structure_id`, replacing any
    /// previous reference into the same structure. Returns the replaced
    /// reference.
    pub fn assign_beat(&mut self, structure_id: Uuid, beat_id: BeatId) -> Option<BeatRef> {
        let previous = self.clear_beat(structure_id);
        self.beats.push(BeatRef {
            structure_id,
            beat_id,
        });
        previous
    }

    /// Drops this scene's reference into `structure_id`.
    pub fn clear_beat(&mut self, structure_id: Uuid) -> Option<BeatRef> {
        let index = self
            .beats
            .iter()
            .position(|r| r.structure_id == structure_id)?;
        Some(self.beats.remove(index))
    }
}
