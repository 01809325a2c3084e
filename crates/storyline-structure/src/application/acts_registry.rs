//! Acts registry: which act each scene belongs to, and which beats are in
//! use.
//!
//! Act membership is driven by usage. An act boundary only takes effect once
//! a scene occupies it: scenes before the first occupied boundary are in act
//! 1, and scenes after the last occupied boundary stay in the act that
//! boundary opened, even if later boundaries exist but are unoccupied.
//!
//! The registry is a pure derived index. It is rebuilt in full by
//! [`ActsRegistry::refresh`] whenever the structure, the scene order or a
//! scene's beat reference changes.

use std::collections::{BTreeMap, HashMap, HashSet};

use storyline_core::event::Notification;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::beats::BeatId;
use crate::domain::events::{ChangeListener, StructureChange};
use crate::domain::scenes::{Scene, SceneId};
use crate::domain::structure::Structure;

/// Derived act membership and beat occupancy for one structure and one
/// scene list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActsRegistry {
    structure_id: Option<Uuid>,
    acts_per_scene: HashMap<SceneId, u32>,
    occupied: HashSet<BeatId>,
    scenes_per_beat: HashMap<BeatId, SceneId>,
    act_endings: BTreeMap<u32, usize>,
}

impl ActsRegistry {
    /// Creates an empty registry. Every scene is in act 1 until the first
    /// refresh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the registry to `structure` and rebuilds it.
    pub fn set_structure(&mut self, structure: &Structure, scenes: &[Scene]) {
        self.structure_id = Some(structure.id);
        self.refresh(structure, scenes);
    }

    /// The structure the registry was last built from.
    #[must_use]
    pub fn structure_id(&self) -> Option<Uuid> {
        self.structure_id
    }

    /// Recomputes every map in one pass over `scenes`.
    ///
    /// Never fails: references to unknown or disabled beats are treated as
    /// no reference at all.
    pub fn refresh(&mut self, structure: &Structure, scenes: &[Scene]) {
        self.structure_id = Some(structure.id);
        self.acts_per_scene.clear();
        self.occupied.clear();
        self.scenes_per_beat.clear();
        self.act_endings.clear();

        let mut current_act = 1;
        for (index, scene) in scenes.iter().enumerate() {
            self.acts_per_scene.insert(scene.id, current_act);

            let Some(beat) = scene.active_beat(structure) else {
                let dangling = scene
                    .beat_ref(structure.id)
                    .filter(|beat_ref| structure.beat(beat_ref.beat_id).is_none());
                if let Some(beat_ref) = dangling {
                    warn!(
                        scene_id = %scene.id,
                        beat_id = %beat_ref.beat_id,
                        "scene references a beat missing from the structure"
                    );
                }
                continue;
            };

            self.occupied.insert(beat.id);
            self.scenes_per_beat.insert(beat.id, scene.id);
            if beat.ends_act() {
                self.act_endings.insert(beat.act, index);
                current_act = current_act.max(beat.act.saturating_add(1));
            }
        }

        debug!(
            structure_id = %structure.id,
            scenes = scenes.len(),
            occupied = self.occupied.len(),
            last_act = current_act,
            "acts registry refreshed"
        );
    }

    /// The act of `scene_id`. Unknown scenes are in act 1.
    #[must_use]
    pub fn act(&self, scene_id: SceneId) -> u32 {
        self.acts_per_scene.get(&scene_id).copied().unwrap_or(1)
    }

    /// Returns `true` if a scene references `beat_id`.
    #[must_use]
    pub fn occupied(&self, beat_id: BeatId) -> bool {
        self.occupied.contains(&beat_id)
    }

    /// The scene referencing `beat_id`. When several scenes reference the
    /// same beat, the last one in order wins.
    #[must_use]
    pub fn occupying_scene(&self, beat_id: BeatId) -> Option<SceneId> {
        self.scenes_per_beat.get(&beat_id).copied()
    }

    /// Ordinal of the scene that occupies the boundary closing `act`.
    #[must_use]
    pub fn act_ending_index(&self, act: u32) -> Option<usize> {
        self.act_endings.get(&act).copied()
    }

    /// All occupied beats, in no particular order.
    pub fn occupied_beats(&self) -> impl Iterator<Item = &BeatId> {
        self.occupied.iter()
    }
}

impl ChangeListener for ActsRegistry {
    fn on_change(&mut self, change: &StructureChange, structure: &Structure, scenes: &[Scene]) {
        if change.invalidates_index() {
            self.refresh(structure, scenes);
        }
    }
}
