//! Change notifications for the Story Structure context.

use serde::{Deserialize, Serialize};
use storyline_core::event::Notification;
use uuid::Uuid;

use super::scenes::Scene;
use super::structure::Structure;

/// The closed set of changes a document publishes to its listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructureChange {
    /// Scenes were inserted, removed or reordered.
    SceneOrderChanged,
    /// A scene gained, lost or swapped its beat reference.
    SceneBeatChanged {
        /// The scene whose reference changed.
        scene_id: Uuid,
    },
    /// The document now lays out a different structure.
    StructureReplaced {
        /// The new structure.
        structure_id: Uuid,
    },
    /// A beat was added to the structure.
    BeatInserted {
        /// The new beat.
        beat_id: Uuid,
    },
    /// A beat was deleted from the structure.
    BeatRemoved {
        /// The deleted beat.
        beat_id: Uuid,
    },
    /// A beat was shown or hidden.
    BeatToggled {
        /// The toggled beat.
        beat_id: Uuid,
        /// New visibility.
        enabled: bool,
    },
    /// A milestone was dragged to a new percentage.
    BeatMoved {
        /// The dragged beat.
        beat_id: Uuid,
        /// Its new percentage.
        percentage: f64,
    },
    /// An act boundary was dragged and the act's beats were rescaled.
    ActsResized {
        /// The act whose closing boundary moved.
        act: u32,
        /// Every beat whose percentage changed.
        changed: Vec<Uuid>,
    },
    /// The viewport width changed.
    ViewportResized {
        /// New width in pixels.
        width: u32,
    },
}

impl Notification for StructureChange {
    fn notification_type(&self) -> &'static str {
        match self {
            Self::SceneOrderChanged => "structure.scene_order_changed",
            Self::SceneBeatChanged { .. } => "structure.scene_beat_changed",
            Self::StructureReplaced { .. } => "structure.structure_replaced",
            Self::BeatInserted { .. } => "structure.beat_inserted",
            Self::BeatRemoved { .. } => "structure.beat_removed",
            Self::BeatToggled { .. } => "structure.beat_toggled",
            Self::BeatMoved { .. } => "structure.beat_moved",
            Self::ActsResized { .. } => "structure.acts_resized",
            Self::ViewportResized { .. } => "structure.viewport_resized",
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("StructureChange serialization is infallible")
    }

    fn invalidates_index(&self) -> bool {
        match self {
            Self::SceneOrderChanged
            | Self::SceneBeatChanged { .. }
            | Self::StructureReplaced { .. }
            | Self::BeatInserted { .. }
            | Self::BeatRemoved { .. }
            | Self::BeatToggled { .. } => true,
            Self::BeatMoved { .. } | Self::ActsResized { .. } | Self::ViewportResized { .. } => {
                false
            }
        }
    }
}

/// Receives the changes published by a document, together with the state
/// after the change.
pub trait ChangeListener {
    /// Called once per published change.
    fn on_change(&mut self, change: &StructureChange, structure: &Structure, scenes: &[Scene]);
}

impl<F> ChangeListener for F
where
    F: FnMut(&StructureChange, &Structure, &[Scene]),
{
    fn on_change(&mut self, change: &StructureChange, structure: &Structure, scenes: &[Scene]) {
        self(change, structure, scenes);
    }
}
