//! Query handlers for the Story Structure context.
//!
//! This module builds read-only view DTOs from a [`StoryDocument`] for
//! whatever host renders the timeline.

use serde::Serialize;
use storyline_core::error::DomainError;
use uuid::Uuid;

use crate::application::document::StoryDocument;
use crate::application::layout::Rect;
use crate::domain::beats::{Beat, BeatKind};
use crate::domain::scenes::Scene;
use crate::domain::structure::DisplayMode;

/// Read-only view of one act of the timeline.
#[derive(Debug, Serialize)]
pub struct ActView {
    /// Act number, starting at 1.
    pub act: u32,
    /// Display label.
    pub label: String,
    /// Window start percentage.
    pub start: f64,
    /// Window end percentage.
    pub end: f64,
    /// Width in per-mille of the timeline.
    pub proportion: u32,
}

/// Read-only view of a beat.
#[derive(Debug, Serialize)]
pub struct BeatView {
    /// The beat identifier.
    pub id: Uuid,
    /// Display name.
    pub text: String,
    /// Guidance for the writer.
    pub description: String,
    /// Milestone, act boundary or container.
    pub kind: BeatKind,
    /// The act the beat is part of.
    pub act: u32,
    /// Position along the timeline.
    pub percentage: f64,
    /// End of the span, for containers.
    pub percentage_end: Option<f64>,
    /// Whether the beat is shown.
    pub enabled: bool,
    /// Whether a scene references this beat.
    pub occupied: bool,
    /// The scene referencing this beat, last one wins.
    pub scene_id: Option<Uuid>,
    /// Pixel geometry, absent for hidden beats and sequential display.
    pub rect: Option<Rect>,
}

/// Read-only view of a scene on the timeline.
#[derive(Debug, Serialize)]
pub struct SceneView {
    /// The scene identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// The act the scene belongs to.
    pub act: u32,
    /// The beat the scene occupies in the active structure.
    pub beat_id: Option<Uuid>,
    /// Timeline percentage, own or interpolated.
    pub position: Option<f64>,
}

/// Everything a host needs to draw the timeline.
#[derive(Debug, Serialize)]
pub struct TimelineView {
    /// The active structure.
    pub structure_id: Uuid,
    /// Title of the active structure.
    pub title: String,
    /// Proportional or sequential layout.
    pub display_mode: DisplayMode,
    /// Viewport width the geometry was computed for.
    pub width: u32,
    /// Acts in order.
    pub acts: Vec<ActView>,
    /// Beats sorted by percentage.
    pub beats: Vec<BeatView>,
    /// Scenes in story order.
    pub scenes: Vec<SceneView>,
    /// Beat order for sequential display.
    pub sequence: Vec<Uuid>,
    /// Position indicator of the highlighted scene.
    pub indicator: Option<Rect>,
}

fn beat_view(document: &StoryDocument, beat: &Beat) -> BeatView {
    let registry = document.registry();
    BeatView {
        id: beat.id,
        text: beat.text.clone(),
        description: beat.description.clone(),
        kind: beat.kind,
        act: beat.act,
        percentage: beat.percentage,
        percentage_end: beat.percentage_end,
        enabled: beat.enabled,
        occupied: registry.occupied(beat.id),
        scene_id: registry.occupying_scene(beat.id),
        rect: document.layout().geometry(beat.id),
    }
}

fn scene_view(document: &StoryDocument, scene: &Scene) -> SceneView {
    SceneView {
        id: scene.id,
        title: scene.title.clone(),
        act: document.act(scene.id),
        beat_id: scene.active_beat(document.structure()).map(|b| b.id),
        position: document.interpolate_position(scene.id),
    }
}

/// Builds the full timeline view of `document`.
#[must_use]
pub fn timeline_view(document: &StoryDocument) -> TimelineView {
    let structure = document.structure();
    let proportions = structure.act_proportions();
    let acts = structure
        .act_windows()
        .iter()
        .zip(proportions)
        .map(|(window, proportion)| ActView {
            act: window.act,
            label: structure.act_label(window.act),
            start: window.start,
            end: window.end,
            proportion,
        })
        .collect();

    TimelineView {
        structure_id: structure.id,
        title: structure.title.clone(),
        display_mode: structure.display_mode,
        width: document.layout().config().width,
        acts,
        beats: structure
            .sorted_beats()
            .into_iter()
            .map(|beat| beat_view(document, beat))
            .collect(),
        scenes: document
            .scenes()
            .iter()
            .map(|scene| scene_view(document, scene))
            .collect(),
        sequence: document.layout().sequence().to_vec(),
        indicator: document.layout().current_indicator(),
    }
}

/// Retrieves one scene's timeline view.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` if the scene is not in the story.
pub fn get_scene_view(document: &StoryDocument, scene_id: Uuid) -> Result<SceneView, DomainError> {
    let scene = document
        .scene(scene_id)
        .ok_or(DomainError::SceneNotFound(scene_id))?;
    Ok(scene_view(document, scene))
}
