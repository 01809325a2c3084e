//! Command handlers for the Story Structure context.
//!
//! Each handler applies one command to a [`StoryDocument`]. The document
//! publishes the resulting change, so handlers only translate and log.

use storyline_core::command::Command;
use storyline_core::error::DomainError;
use tracing::{info, instrument};

use crate::application::document::StoryDocument;
use crate::application::layout::ActResize;
use crate::domain::commands::{
    AssignBeat, ClearBeat, MoveScene, RepositionBeat, ResizeActBoundary, ToggleBeat,
};

/// Handles the `ResizeActBoundary` command.
///
/// # Errors
///
/// Returns `DomainError::BeatNotFound` or `DomainError::NotAnActBoundary`.
#[instrument(skip(document), fields(command_type = command.command_type()))]
pub fn handle_resize_act_boundary(
    command: &ResizeActBoundary,
    document: &mut StoryDocument,
) -> Result<ActResize, DomainError> {
    let resize = document.resize_act_boundary(command.beat_id, command.x)?;
    info!(
        act = resize.act,
        new_percentage = resize.new_percentage,
        "act boundary command applied"
    );
    Ok(resize)
}

/// Handles the `RepositionBeat` command and returns the beat's new
/// percentage.
///
/// # Errors
///
/// Returns `DomainError::BeatNotFound` or `DomainError::NotDraggable`.
#[instrument(skip(document), fields(command_type = command.command_type()))]
pub fn handle_reposition_beat(
    command: &RepositionBeat,
    document: &mut StoryDocument,
) -> Result<f64, DomainError> {
    let percentage = document.reposition_beat(command.beat_id, command.x)?;
    info!(percentage, "reposition command applied");
    Ok(percentage)
}

/// Handles the `AssignBeat` command.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` or `DomainError::BeatNotFound`.
#[instrument(skip(document), fields(command_type = command.command_type()))]
pub fn handle_assign_beat(
    command: &AssignBeat,
    document: &mut StoryDocument,
) -> Result<(), DomainError> {
    document.assign_beat(command.scene_id, command.beat_id)?;
    info!(act = document.act(command.scene_id), "beat assigned");
    Ok(())
}

/// Handles the `ClearBeat` command. Returns `true` if a reference was
/// dropped.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` if the scene is not in the story.
#[instrument(skip(document), fields(command_type = command.command_type()))]
pub fn handle_clear_beat(
    command: &ClearBeat,
    document: &mut StoryDocument,
) -> Result<bool, DomainError> {
    let cleared = document.clear_beat(command.scene_id)?;
    info!(cleared, "beat cleared");
    Ok(cleared)
}

/// Handles the `MoveScene` command and returns the index the scene landed
/// on.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` if the scene is not in the story.
#[instrument(skip(document), fields(command_type = command.command_type()))]
pub fn handle_move_scene(
    command: &MoveScene,
    document: &mut StoryDocument,
) -> Result<usize, DomainError> {
    let index = document.move_scene(command.scene_id, command.to_index)?;
    info!(index, "scene moved");
    Ok(index)
}

/// Handles the `ToggleBeat` command. Returns `true` if visibility changed.
///
/// # Errors
///
/// Returns `DomainError::BeatNotFound` if the beat does not exist.
#[instrument(skip(document), fields(command_type = command.command_type()))]
pub fn handle_toggle_beat(
    command: &ToggleBeat,
    document: &mut StoryDocument,
) -> Result<bool, DomainError> {
    let changed = document.set_beat_enabled(command.beat_id, command.enabled)?;
    info!(changed, "beat visibility updated");
    Ok(changed)
}
