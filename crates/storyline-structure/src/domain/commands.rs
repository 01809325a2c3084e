//! Commands for the Story Structure context.
//!
//! Pointer input is captured by the host and arrives here as viewport
//! pixel coordinates.

use storyline_core::command::Command;
use uuid::Uuid;

/// Command to move an act boundary to a new pixel position.
#[derive(Debug, Clone)]
pub struct ResizeActBoundary {
    /// The boundary beat being dragged.
    pub beat_id: Uuid,
    /// Drop position in viewport pixels.
    pub x: i32,
}

/// Command to drag a milestone beat to a new pixel position.
#[derive(Debug, Clone)]
pub struct RepositionBeat {
    /// The beat being dragged.
    pub beat_id: Uuid,
    /// Drop position in viewport pixels.
    pub x: i32,
}

/// Command to link a scene to a beat of the active structure.
#[derive(Debug, Clone)]
pub struct AssignBeat {
    /// The scene to link.
    pub scene_id: Uuid,
    /// The beat the scene fulfils.
    pub beat_id: Uuid,
}

/// Command to unlink a scene from the active structure.
#[derive(Debug, Clone)]
pub struct ClearBeat {
    /// The scene to unlink.
    pub scene_id: Uuid,
}

/// Command to move a scene to another ordinal position.
#[derive(Debug, Clone)]
pub struct MoveScene {
    /// The scene to move.
    pub scene_id: Uuid,
    /// Target index in the scene list, clamped to the list length.
    pub to_index: usize,
}

/// Command to show or hide a beat.
#[derive(Debug, Clone)]
pub struct ToggleBeat {
    /// The beat to toggle.
    pub beat_id: Uuid,
    /// New visibility.
    pub enabled: bool,
}

impl Command for ResizeActBoundary {
    fn command_type(&self) -> &'static str {
        "structure.resize_act_boundary"
    }
}

impl Command for RepositionBeat {
    fn command_type(&self) -> &'static str {
        "structure.reposition_beat"
    }
}

impl Command for AssignBeat {
    fn command_type(&self) -> &'static str {
        "structure.assign_beat"
    }
}

impl Command for ClearBeat {
    fn command_type(&self) -> &'static str {
        "structure.clear_beat"
    }
}

impl Command for MoveScene {
    fn command_type(&self) -> &'static str {
        "structure.move_scene"
    }
}

impl Command for ToggleBeat {
    fn command_type(&self) -> &'static str {
        "structure.toggle_beat"
    }
}
