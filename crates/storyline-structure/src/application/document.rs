//! The story document: one structure, one ordered scene list, and the
//! derived state kept in step with them.
//!
//! Every mutation goes through the document, which publishes a
//! [`StructureChange`] afterwards. The acts registry sees the change first,
//! then the layout engine, then subscribers in subscription order, so a
//! subscriber always observes refreshed derived state.

use std::fmt;

use storyline_core::error::DomainError;
use storyline_core::event::Notification;
use tracing::{debug, info};

use super::acts_registry::ActsRegistry;
use super::layout::{self, ActResize, Highlight, LayoutConfig, LayoutEngine};
use crate::domain::beats::{Beat, BeatId};
use crate::domain::events::{ChangeListener, StructureChange};
use crate::domain::scenes::{Scene, SceneId};
use crate::domain::structure::Structure;

/// A structure, its scenes, and their derived act and layout state.
pub struct StoryDocument {
    structure: Structure,
    scenes: Vec<Scene>,
    registry: ActsRegistry,
    layout: LayoutEngine,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl fmt::Debug for StoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryDocument")
            .field("structure", &self.structure.id)
            .field("scenes", &self.scenes.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl StoryDocument {
    /// Builds a document and computes its derived state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStructure` if the structure breaks the
    /// act partition and `DomainError::Validation` if the viewport is empty.
    pub fn new(
        structure: Structure,
        scenes: Vec<Scene>,
        config: LayoutConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        structure.validate()?;

        let mut registry = ActsRegistry::new();
        registry.set_structure(&structure, &scenes);
        let mut layout = LayoutEngine::new(config);
        layout.rearrange(&structure);

        info!(
            structure_id = %structure.id,
            title = %structure.title,
            scenes = scenes.len(),
            "story document opened"
        );
        Ok(Self {
            structure,
            scenes,
            registry,
            layout,
            listeners: Vec::new(),
        })
    }

    /// The active structure.
    #[must_use]
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Scenes in story order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Looks up a scene.
    #[must_use]
    pub fn scene(&self, scene_id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Act membership and beat occupancy derived from the scenes.
    #[must_use]
    pub fn registry(&self) -> &ActsRegistry {
        &self.registry
    }

    /// Beat geometry for the current viewport.
    #[must_use]
    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// The act `scene_id` belongs to.
    #[must_use]
    pub fn act(&self, scene_id: SceneId) -> u32 {
        self.registry.act(scene_id)
    }

    /// Registers a listener for every subsequent change.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn publish(&mut self, change: &StructureChange) {
        debug!(
            change = change.notification_type(),
            listeners = self.listeners.len(),
            "publishing structure change"
        );
        let Self {
            structure,
            scenes,
            registry,
            layout,
            listeners,
        } = self;
        registry.on_change(change, structure, scenes);
        layout.on_change(change, structure, scenes);
        for listener in listeners.iter_mut() {
            listener.on_change(change, structure, scenes);
        }
    }

    fn scene_index(&self, scene_id: SceneId) -> Result<usize, DomainError> {
        self.scenes
            .iter()
            .position(|s| s.id == scene_id)
            .ok_or(DomainError::SceneNotFound(scene_id))
    }

    /// Swaps in another structure and returns the previous one. Scene
    /// references into the old structure are kept but no longer count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStructure` if the new structure breaks
    /// the act partition.
    pub fn replace_structure(&mut self, structure: Structure) -> Result<Structure, DomainError> {
        structure.validate()?;
        let previous = std::mem::replace(&mut self.structure, structure);
        info!(
            previous = %previous.id,
            structure_id = %self.structure.id,
            "structure replaced"
        );
        self.publish(&StructureChange::StructureReplaced {
            structure_id: self.structure.id,
        });
        Ok(previous)
    }

    /// Appends a scene at the end of the story.
    pub fn push_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
        self.publish(&StructureChange::SceneOrderChanged);
    }

    /// Inserts a scene at `index`, clamped to the scene count.
    pub fn insert_scene(&mut self, index: usize, scene: Scene) {
        let index = index.min(self.scenes.len());
        self.scenes.insert(index, scene);
        self.publish(&StructureChange::SceneOrderChanged);
    }

    /// Removes a scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene is not in the story.
    pub fn remove_scene(&mut self, scene_id: SceneId) -> Result<Scene, DomainError> {
        let index = self.scene_index(scene_id)?;
        let scene = self.scenes.remove(index);
        self.publish(&StructureChange::SceneOrderChanged);
        Ok(scene)
    }

    /// Moves a scene to `to_index`, clamped to the last position, and
    /// returns the index it landed on.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene is not in the story.
    pub fn move_scene(&mut self, scene_id: SceneId, to_index: usize) -> Result<usize, DomainError> {
        let from = self.scene_index(scene_id)?;
        let to = to_index.min(self.scenes.len() - 1);
        if from != to {
            let scene = self.scenes.remove(from);
            self.scenes.insert(to, scene);
            self.publish(&StructureChange::SceneOrderChanged);
        }
        Ok(to)
    }

    /// Links a scene to a beat of the active structure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` or `DomainError::BeatNotFound`
    /// if either side is missing.
    pub fn assign_beat(&mut self, scene_id: SceneId, beat_id: BeatId) -> Result<(), DomainError> {
        if self.structure.beat(beat_id).is_none() {
            return Err(DomainError::BeatNotFound(beat_id));
        }
        let index = self.scene_index(scene_id)?;
        let structure_id = self.structure.id;
        let previous = self.scenes[index].assign_beat(structure_id, beat_id);
        if previous.is_some_and(|r| r.beat_id == beat_id) {
            return Ok(());
        }
        self.publish(&StructureChange::SceneBeatChanged { scene_id });
        Ok(())
    }

    /// Unlinks a scene from the active structure. Returns `true` if the
    /// scene had a beat.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene is not in the story.
    pub fn clear_beat(&mut self, scene_id: SceneId) -> Result<bool, DomainError> {
        let index = self.scene_index(scene_id)?;
        let structure_id = self.structure.id;
        let cleared = self.scenes[index].clear_beat(structure_id).is_some();
        if cleared {
            self.publish(&StructureChange::SceneBeatChanged { scene_id });
        }
        Ok(cleared)
    }

    /// Adds a beat to the active structure. Adding an act boundary
    /// renumbers the acts by percentage and moves every other beat into the
    /// act whose window now contains it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a beat with the same id exists
    /// and `DomainError::InvalidStructure` if the structure would break the
    /// act partition. The structure is left unchanged on error.
    pub fn insert_beat(&mut self, beat: Beat) -> Result<(), DomainError> {
        let beat_id = beat.id;
        if self.structure.beat(beat_id).is_some() {
            return Err(DomainError::Validation(format!(
                "beat {beat_id} already exists"
            )));
        }

        let mut candidate = self.structure.clone();
        let renumber = beat.ends_act();
        candidate.insert_beat(beat);
        if renumber {
            candidate.normalize_acts();
        }
        candidate.validate()?;
        self.structure = candidate;

        info!(beat_id = %beat_id, acts = self.structure.acts_count(), "beat inserted");
        self.publish(&StructureChange::BeatInserted { beat_id });
        Ok(())
    }

    /// Deletes a beat from the active structure and returns it. Scenes lose
    /// their reference to it, and removing an act boundary renumbers the
    /// remaining acts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` if the beat does not exist.
    pub fn remove_beat(&mut self, beat_id: BeatId) -> Result<Beat, DomainError> {
        let beat = self.structure.remove_beat(beat_id)?;
        if beat.ends_act() {
            self.structure.normalize_acts();
        }

        let structure_id = self.structure.id;
        let mut unlinked = 0;
        for scene in &mut self.scenes {
            if scene
                .beat_ref(structure_id)
                .is_some_and(|r| r.beat_id == beat_id)
            {
                scene.clear_beat(structure_id);
                unlinked += 1;
            }
        }

        info!(beat_id = %beat_id, unlinked, "beat removed");
        self.publish(&StructureChange::BeatRemoved { beat_id });
        Ok(beat)
    }

    /// Shows or hides a beat. Returns `true` if its visibility changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` if the beat does not exist.
    pub fn set_beat_enabled(&mut self, beat_id: BeatId, enabled: bool) -> Result<bool, DomainError> {
        let changed = self.structure.set_beat_enabled(beat_id, enabled)?;
        if changed {
            self.publish(&StructureChange::BeatToggled { beat_id, enabled });
        }
        Ok(changed)
    }

    /// Resizes the viewport.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `width` is 0.
    pub fn set_viewport_width(&mut self, width: u32) -> Result<(), DomainError> {
        LayoutConfig {
            width,
            ..*self.layout.config()
        }
        .validate()?;
        self.layout.set_width(width, &self.structure);
        self.publish(&StructureChange::ViewportResized { width });
        Ok(())
    }

    /// Drags an act boundary to pixel `x`, see
    /// [`LayoutEngine::resize_act_boundary`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` or `DomainError::NotAnActBoundary`.
    pub fn resize_act_boundary(&mut self, beat_id: BeatId, x: i32) -> Result<ActResize, DomainError> {
        let resize = self
            .layout
            .resize_act_boundary(&mut self.structure, beat_id, x)?;
        if !resize.changed.is_empty() {
            self.publish(&StructureChange::ActsResized {
                act: resize.act,
                changed: resize.changed.clone(),
            });
        }
        Ok(resize)
    }

    /// Drags a milestone to pixel `x`, see
    /// [`LayoutEngine::reposition_beat`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` or `DomainError::NotDraggable`.
    pub fn reposition_beat(&mut self, beat_id: BeatId, x: i32) -> Result<f64, DomainError> {
        let percentage = self
            .layout
            .reposition_beat(&mut self.structure, beat_id, x)?;
        self.publish(&StructureChange::BeatMoved {
            beat_id,
            percentage,
        });
        Ok(percentage)
    }

    /// Timeline position of a scene, see [`layout::interpolate_at`].
    #[must_use]
    pub fn interpolate_position(&self, scene_id: SceneId) -> Option<f64> {
        layout::interpolate_position(&self.structure, &self.scenes, scene_id)
    }

    /// Selects a scene on the timeline.
    pub fn highlight_scene(&mut self, scene_id: SceneId) -> Highlight {
        self.layout
            .highlight_scene(&self.structure, &self.scenes, scene_id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use uuid::Uuid;

    use super::*;
    use crate::domain::beats::Beat;

    struct Fixture {
        document: StoryDocument,
        midpoint: BeatId,
        end: BeatId,
    }

    fn fixture(scene_count: usize) -> Fixture {
        let midpoint = Beat::act_boundary("Midpoint", 1, 50.0);
        let end = Beat::act_boundary("End", 2, 90.0);
        let (midpoint_id, end_id) = (midpoint.id, end.id);
        let structure = Structure::new("Two boundaries").with_beats([midpoint, end]);
        let scenes = (1..=scene_count)
            .map(|i| Scene::new(format!("Scene {i}")))
            .collect();
        Fixture {
            document: StoryDocument::new(structure, scenes, LayoutConfig::default()).unwrap(),
            midpoint: midpoint_id,
            end: end_id,
        }
    }

    fn recorder(document: &mut StoryDocument) -> Rc<RefCell<Vec<StructureChange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        document.subscribe(move |change: &StructureChange, _: &Structure, _: &[Scene]| {
            sink.borrow_mut().push(change.clone());
        });
        seen
    }

    #[test]
    fn test_new_rejects_invalid_structure() {
        let structure =
            Structure::new("Broken").with_beats([Beat::act_boundary("Late", 3, 50.0)]);

        let result = StoryDocument::new(structure, Vec::new(), LayoutConfig::default());

        assert!(matches!(result, Err(DomainError::InvalidStructure(_))));
    }

    #[test]
    fn test_assign_beat_refreshes_acts_before_listeners() {
        // Arrange
        let mut f = fixture(4);
        let seen = recorder(&mut f.document);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();

        // Act
        f.document.assign_beat(ids[1], f.midpoint).unwrap();
        f.document.assign_beat(ids[3], f.end).unwrap();

        // Assert
        let acts: Vec<u32> = ids.iter().map(|id| f.document.act(*id)).collect();
        assert_eq!(acts, vec![1, 1, 2, 2]);
        assert_eq!(
            *seen.borrow(),
            vec![
                StructureChange::SceneBeatChanged { scene_id: ids[1] },
                StructureChange::SceneBeatChanged { scene_id: ids[3] },
            ]
        );
    }

    #[test]
    fn test_reassigning_same_beat_publishes_nothing() {
        let mut f = fixture(1);
        let scene_id = f.document.scenes()[0].id;
        f.document.assign_beat(scene_id, f.midpoint).unwrap();
        let seen = recorder(&mut f.document);

        f.document.assign_beat(scene_id, f.midpoint).unwrap();

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_assign_unknown_beat_or_scene_fails() {
        let mut f = fixture(1);
        let scene_id = f.document.scenes()[0].id;
        let missing = Uuid::new_v4();

        assert!(matches!(
            f.document.assign_beat(scene_id, missing),
            Err(DomainError::BeatNotFound(id)) if id == missing
        ));
        assert!(matches!(
            f.document.assign_beat(missing, f.midpoint),
            Err(DomainError::SceneNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_move_scene_reorders_and_recomputes_acts() {
        // Arrange
        let mut f = fixture(3);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();
        f.document.assign_beat(ids[0], f.midpoint).unwrap();

        // Act
        let landed = f.document.move_scene(ids[0], 10).unwrap();

        // Assert
        assert_eq!(landed, 2);
        assert_eq!(f.document.scenes()[2].id, ids[0]);
        assert_eq!(f.document.act(ids[1]), 1);
        assert_eq!(f.document.act(ids[0]), 1);
        assert_eq!(f.document.registry().act_ending_index(1), Some(2));
    }

    #[test]
    fn test_clear_beat_reports_whether_a_reference_was_dropped() {
        let mut f = fixture(2);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();
        f.document.assign_beat(ids[0], f.midpoint).unwrap();

        assert!(f.document.clear_beat(ids[0]).unwrap());
        assert!(!f.document.clear_beat(ids[0]).unwrap());
        assert_eq!(f.document.act(ids[1]), 1);
    }

    #[test]
    fn test_disabling_occupied_boundary_closes_its_act() {
        let mut f = fixture(2);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();
        f.document.assign_beat(ids[0], f.midpoint).unwrap();
        assert_eq!(f.document.act(ids[1]), 2);

        let changed = f.document.set_beat_enabled(f.midpoint, false).unwrap();

        assert!(changed);
        assert_eq!(f.document.act(ids[1]), 1);
        assert!(f.document.layout().geometry(f.midpoint).is_none());
    }

    #[test]
    fn test_replace_structure_drops_old_references_from_the_index() {
        let mut f = fixture(2);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();
        f.document.assign_beat(ids[0], f.midpoint).unwrap();

        let previous = f
            .document
            .replace_structure(Structure::new("Blank"))
            .unwrap();

        assert_eq!(previous.title, "Two boundaries");
        assert_eq!(f.document.act(ids[1]), 1);
        assert!(f.document.scenes()[0].beat_ref(previous.id).is_some());
    }

    #[test]
    fn test_resize_publishes_changed_beats() {
        let mut f = fixture(0);
        f.document.set_viewport_width(1000).unwrap();
        let seen = recorder(&mut f.document);

        let resize = f.document.resize_act_boundary(f.midpoint, 590).unwrap();

        assert_eq!(resize.new_percentage, 60.0);
        assert_eq!(
            *seen.borrow(),
            vec![StructureChange::ActsResized {
                act: 1,
                changed: vec![f.midpoint],
            }]
        );
    }

    #[test]
    fn test_removing_occupied_boundary_recomputes_acts() {
        // Arrange
        let mut f = fixture(4);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();
        f.document.assign_beat(ids[1], f.midpoint).unwrap();
        f.document.assign_beat(ids[3], f.end).unwrap();
        let seen = recorder(&mut f.document);

        // Act
        let removed = f.document.remove_beat(f.midpoint).unwrap();

        // Assert
        assert_eq!(removed.text, "Midpoint");
        let acts: Vec<u32> = ids.iter().map(|id| f.document.act(*id)).collect();
        assert_eq!(acts, vec![1, 1, 1, 1]);
        assert!(f.document.scenes()[1].beat_ref(f.document.structure().id).is_none());
        assert!(!f.document.registry().occupied(f.midpoint));
        assert_eq!(f.document.structure().beat(f.end).unwrap().act, 1);
        assert!(f.document.structure().validate().is_ok());
        assert!(f.document.layout().geometry(f.midpoint).is_none());
        assert_eq!(
            *seen.borrow(),
            vec![StructureChange::BeatRemoved {
                beat_id: f.midpoint
            }]
        );
    }

    #[test]
    fn test_inserting_boundary_renumbers_acts() {
        // Arrange
        let mut f = fixture(3);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();
        let opening = Beat::act_boundary("Opening", 1, 20.0);
        let opening_id = opening.id;

        // Act
        f.document.insert_beat(opening).unwrap();
        f.document.assign_beat(ids[0], opening_id).unwrap();

        // Assert
        let structure = f.document.structure();
        assert_eq!(structure.acts_count(), 4);
        assert_eq!(structure.beat(opening_id).unwrap().act, 1);
        assert_eq!(structure.beat(f.midpoint).unwrap().act, 2);
        assert_eq!(structure.beat(f.end).unwrap().act, 3);
        assert!(f.document.layout().geometry(opening_id).is_some());
        assert_eq!(f.document.act(ids[1]), 2);
    }

    #[test]
    fn test_inserting_invalid_beat_leaves_structure_untouched() {
        let mut f = fixture(1);
        let before = f.document.structure().clone();
        let seen = recorder(&mut f.document);

        let outside = f
            .document
            .insert_beat(Beat::milestone("Outside", 1, 120.0));
        let duplicate = f
            .document
            .insert_beat(Beat::milestone("Copy", 1, 10.0).with_id(f.midpoint));

        assert!(matches!(outside, Err(DomainError::InvalidStructure(_))));
        assert!(matches!(duplicate, Err(DomainError::Validation(_))));
        assert_eq!(*f.document.structure(), before);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_zero_viewport_width_is_rejected() {
        let mut f = fixture(0);

        assert!(f.document.set_viewport_width(0).is_err());
        assert_eq!(f.document.layout().config().width, 800);
    }

    #[test]
    fn test_highlight_scene_clears_on_reorder() {
        let mut f = fixture(3);
        let ids: Vec<SceneId> = f.document.scenes().iter().map(|s| s.id).collect();

        assert_eq!(
            f.document.highlight_scene(ids[1]),
            Highlight::Indicator(50.0)
        );
        assert_eq!(f.document.layout().current_percentage(), Some(50.0));

        f.document.remove_scene(ids[2]).unwrap();

        assert_eq!(f.document.layout().current_percentage(), None);
    }
}
