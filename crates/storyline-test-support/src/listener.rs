//! Test listener — records every published `StructureChange`.

use std::sync::{Arc, Mutex};

use storyline_structure::domain::events::{ChangeListener, StructureChange};
use storyline_structure::domain::scenes::Scene;
use storyline_structure::domain::structure::Structure;

/// A listener that records every change it receives. Clones share the same
/// log, so keep one clone and subscribe the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    changes: Arc<Mutex<Vec<StructureChange>>>,
    scene_counts: Arc<Mutex<Vec<usize>>>,
}

impl RecordingListener {
    /// Creates a listener with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded changes.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn changes(&self) -> Vec<StructureChange> {
        self.changes.lock().unwrap().clone()
    }

    /// Number of scenes the document held at each recorded change.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn scene_counts(&self) -> Vec<usize> {
        self.scene_counts.lock().unwrap().clone()
    }
}

impl ChangeListener for RecordingListener {
    fn on_change(&mut self, change: &StructureChange, _structure: &Structure, scenes: &[Scene]) {
        self.changes.lock().unwrap().push(change.clone());
        self.scene_counts.lock().unwrap().push(scenes.len());
    }
}
