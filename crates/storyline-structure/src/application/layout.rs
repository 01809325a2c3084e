//! Proportional layout engine.
//!
//! Maps the normalized 0–100% timeline onto a viewport of `width` pixels.
//! Beats are drawn as glyphs of `beat_size` pixels centered on their
//! percentage, containers as spans on a second row below the beats.
//!
//! The engine also implements the two drag interactions: dragging a
//! milestone to a new point, and dragging an act boundary, which rescales
//! the milestones of the act it closes so they keep their relative position
//! inside the act.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use storyline_core::error::DomainError;
use tracing::{debug, info};

use crate::domain::beats::{BeatId, BeatKind, same_percentage};
use crate::domain::events::{ChangeListener, StructureChange};
use crate::domain::scenes::{Scene, SceneId};
use crate::domain::structure::{DisplayMode, Structure};

/// Percentage given to the gap before the first occupied beat.
const LEADING_PERCENTAGE: f64 = 1.0;
/// Percentage given to the gap after the last occupied beat.
const TRAILING_PERCENTAGE: f64 = 99.0;

/// Viewport and glyph dimensions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport width.
    pub width: u32,
    /// Diameter of a beat glyph.
    pub beat_size: u32,
    /// Height of the act bar; beats are drawn right below it.
    pub line_height: u32,
    /// Gap between the beat row and the container row.
    pub container_top_margin: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800,
            beat_size: 20,
            line_height: 25,
            container_top_margin: 6,
        }
    }
}

impl LayoutConfig {
    /// Checks that the viewport can hold a timeline.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the width or the beat size is 0.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.width == 0 {
            return Err(DomainError::Validation(
                "viewport width must be positive".to_owned(),
            ));
        }
        if self.beat_size == 0 {
            return Err(DomainError::Validation(
                "beat size must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

/// What the timeline should highlight for a selected scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Highlight {
    /// The scene occupies this beat.
    Beat(BeatId),
    /// The scene has no beat; show the position indicator here.
    Indicator(f64),
    /// Nothing to show.
    Hidden,
}

/// Outcome of an act boundary resize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActResize {
    /// The act closed by the moved boundary.
    pub act: u32,
    /// Boundary percentage before the drag.
    pub old_percentage: f64,
    /// Boundary percentage after the drag.
    pub new_percentage: f64,
    /// Every beat whose percentage changed, boundary first.
    pub changed: Vec<BeatId>,
}

/// Pixel x of the left edge of a beat glyph centered on `percentage`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn x_for_percentage(percentage: f64, width: u32, beat_size: u32) -> i32 {
    (f64::from(width) * percentage / 100.0 - f64::from(beat_size) / 2.0).round() as i32
}

/// Percentage whose beat glyph would have its left edge at `x`. Inverse of
/// [`x_for_percentage`] up to rounding. A zero-width viewport maps
/// everything to 0.
#[must_use]
pub fn percentage_for_x(x: i32, width: u32, beat_size: u32) -> f64 {
    if width == 0 {
        return 0.0;
    }
    (f64::from(x) + f64::from(beat_size) / 2.0) * 100.0 / f64::from(width)
}

/// Keeps a dragged percentage on the timeline.
#[must_use]
pub fn clamp_percentage(percentage: f64) -> f64 {
    percentage.clamp(0.0, 100.0)
}

/// Moves `percentage` so that its position relative to `[act_start,
/// old_end]` is the same relative to `[act_start, new_end]`. The point stays
/// where it is when either window has no width, so beats inside the act
/// never swap order.
#[must_use]
pub fn rescale_in_act(percentage: f64, act_start: f64, old_end: f64, new_end: f64) -> f64 {
    let act_range = old_end - act_start;
    if act_range <= 0.0 || new_end <= act_start {
        return percentage;
    }
    let relative = (percentage - act_start) / act_range;
    act_start + relative * (new_end - act_start)
}

/// Timeline position of the scene at `index`.
///
/// A scene occupying an enabled beat sits on that beat. Otherwise the
/// position is interpolated linearly by ordinal between the nearest
/// preceding and following occupied beats, falling back to 1% before the
/// first and 99% after the last. Returns `None` when the neighbours
/// collapse onto a single ordinal.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interpolate_at(structure: &Structure, scenes: &[Scene], index: usize) -> Option<f64> {
    let scene = scenes.get(index)?;
    if let Some(beat) = scene.active_beat(structure) {
        return Some(beat.percentage);
    }

    let previous = scenes[..index]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, s)| s.active_beat(structure).map(|b| (i, b.percentage)));
    let next = scenes
        .iter()
        .enumerate()
        .skip(index)
        .find_map(|(i, s)| s.active_beat(structure).map(|b| (i, b.percentage)));

    let (min_index, min_percentage) = previous.unwrap_or((0, LEADING_PERCENTAGE));
    let (max_index, max_percentage) = next.unwrap_or((scenes.len() - 1, TRAILING_PERCENTAGE));
    if max_index == min_index {
        return None;
    }

    let step = (max_percentage - min_percentage) / (max_index - min_index) as f64;
    Some(min_percentage + step * (index - min_index) as f64)
}

/// Timeline position of `scene_id`, see [`interpolate_at`]. Unknown scenes
/// have no position.
#[must_use]
pub fn interpolate_position(
    structure: &Structure,
    scenes: &[Scene],
    scene_id: SceneId,
) -> Option<f64> {
    let index = scenes.iter().position(|s| s.id == scene_id)?;
    interpolate_at(structure, scenes, index)
}

/// Beat geometry for one structure in one viewport.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    geometry: HashMap<BeatId, Rect>,
    sequence: Vec<BeatId>,
    current_percentage: Option<f64>,
}

impl LayoutEngine {
    /// Creates an engine with no geometry. Call [`LayoutEngine::rearrange`]
    /// once a structure is available.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current viewport configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Pixel x for `percentage` in this viewport.
    #[must_use]
    pub fn x_for_percentage(&self, percentage: f64) -> i32 {
        x_for_percentage(percentage, self.config.width, self.config.beat_size)
    }

    /// Percentage for pixel `x` in this viewport.
    #[must_use]
    pub fn percentage_for_x(&self, x: i32) -> f64 {
        percentage_for_x(x, self.config.width, self.config.beat_size)
    }

    fn px(value: u32) -> i32 {
        i32::try_from(value).unwrap_or(i32::MAX)
    }

    /// Recomputes the geometry of every enabled beat.
    ///
    /// In sequential display no geometry is produced; the enabled
    /// non-container beats are recorded in display order instead.
    pub fn rearrange(&mut self, structure: &Structure) {
        self.geometry.clear();
        self.sequence.clear();

        let beats = structure.enabled_beats();
        if structure.display_mode == DisplayMode::Sequential {
            self.sequence = beats
                .iter()
                .filter(|b| !b.is_container())
                .map(|b| b.id)
                .collect();
            debug!(structure_id = %structure.id, beats = self.sequence.len(), "sequential layout");
            return;
        }

        let size = Self::px(self.config.beat_size);
        let line_height = Self::px(self.config.line_height);
        let container_row = line_height + size + Self::px(self.config.container_top_margin);
        for beat in beats {
            let x = self.x_for_percentage(beat.percentage);
            let rect = match (beat.kind, beat.percentage_end) {
                (BeatKind::Container, Some(end)) => Rect {
                    x: x + size / 2,
                    y: container_row,
                    width: self.x_for_percentage(end) - x,
                    height: size,
                },
                _ => Rect {
                    x,
                    y: line_height,
                    width: size,
                    height: size,
                },
            };
            self.geometry.insert(beat.id, rect);
        }
        debug!(
            structure_id = %structure.id,
            width = self.config.width,
            beats = self.geometry.len(),
            "proportional layout"
        );
    }

    /// Changes the viewport width and recomputes the geometry.
    pub fn set_width(&mut self, width: u32, structure: &Structure) {
        self.config.width = width;
        self.rearrange(structure);
    }

    /// Geometry of `beat_id`, if it is laid out.
    #[must_use]
    pub fn geometry(&self, beat_id: BeatId) -> Option<Rect> {
        self.geometry.get(&beat_id).copied()
    }

    /// Display order of the beats in sequential mode.
    #[must_use]
    pub fn sequence(&self) -> &[BeatId] {
        &self.sequence
    }

    /// Decides what to highlight for `scene_id` and remembers the indicator
    /// position, if any.
    pub fn highlight_scene(
        &mut self,
        structure: &Structure,
        scenes: &[Scene],
        scene_id: SceneId,
    ) -> Highlight {
        self.current_percentage = None;
        let Some(scene) = scenes.iter().find(|s| s.id == scene_id) else {
            return Highlight::Hidden;
        };
        if let Some(beat) = scene.active_beat(structure) {
            return Highlight::Beat(beat.id);
        }
        if structure.display_mode != DisplayMode::Proportional {
            return Highlight::Hidden;
        }

        match interpolate_position(structure, scenes, scene_id) {
            Some(percentage) => {
                self.current_percentage = Some(percentage);
                Highlight::Indicator(percentage)
            }
            None => Highlight::Hidden,
        }
    }

    /// Hides the position indicator.
    pub fn clear_highlight(&mut self) {
        self.current_percentage = None;
    }

    /// Percentage of the position indicator, if shown.
    #[must_use]
    pub fn current_percentage(&self) -> Option<f64> {
        self.current_percentage
    }

    /// Geometry of the position indicator, if shown. The indicator is
    /// centered on the act bar's half height rather than on the beat size.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn current_indicator(&self) -> Option<Rect> {
        let percentage = self.current_percentage?;
        let size = Self::px(self.config.beat_size);
        let line_height = Self::px(self.config.line_height);
        let center = (f64::from(self.config.width) * percentage / 100.0).round() as i32;
        Some(Rect {
            x: center - line_height / 2,
            y: line_height,
            width: size,
            height: size,
        })
    }

    /// Moves the act boundary `beat_id` to pixel `x`.
    ///
    /// Containers anchored at the old boundary follow it, and the milestones
    /// of the act the boundary closes are rescaled to keep their relative
    /// position inside the act. Other boundaries are left alone, so a large
    /// drag can push this boundary past a neighbour.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` if the beat does not exist and
    /// `DomainError::NotAnActBoundary` if it does not end an act.
    pub fn resize_act_boundary(
        &mut self,
        structure: &mut Structure,
        beat_id: BeatId,
        x: i32,
    ) -> Result<ActResize, DomainError> {
        let boundary = structure
            .beat(beat_id)
            .ok_or(DomainError::BeatNotFound(beat_id))?;
        if !boundary.ends_act() {
            return Err(DomainError::NotAnActBoundary(beat_id));
        }

        let act = boundary.act;
        let old_percentage = boundary.percentage;
        let new_percentage = clamp_percentage(self.percentage_for_x(x));
        let act_start = structure.act_window(act).map_or(0.0, |w| w.start);

        let mut changed = Vec::new();
        if !same_percentage(old_percentage, new_percentage) {
            changed.push(beat_id);
            for beat in structure.beats_mut() {
                if beat.id == beat_id {
                    beat.percentage = new_percentage;
                    continue;
                }
                match beat.kind {
                    BeatKind::Container => {
                        let mut moved = false;
                        if same_percentage(beat.percentage, old_percentage) {
                            beat.percentage = new_percentage;
                            moved = true;
                        }
                        if beat
                            .percentage_end
                            .is_some_and(|end| same_percentage(end, old_percentage))
                        {
                            beat.percentage_end = Some(new_percentage);
                            moved = true;
                        }
                        if moved {
                            changed.push(beat.id);
                        }
                    }
                    BeatKind::Milestone if beat.act == act => {
                        let rescaled = rescale_in_act(
                            beat.percentage,
                            act_start,
                            old_percentage,
                            new_percentage,
                        );
                        if !same_percentage(rescaled, beat.percentage) {
                            beat.percentage = rescaled;
                            changed.push(beat.id);
                        }
                    }
                    _ => {}
                }
            }
        }

        self.rearrange(structure);
        info!(
            beat_id = %beat_id,
            act,
            old_percentage,
            new_percentage,
            changed = changed.len(),
            "act boundary resized"
        );
        Ok(ActResize {
            act,
            old_percentage,
            new_percentage,
            changed,
        })
    }

    /// Drags the milestone `beat_id` to pixel `x` and returns its new
    /// percentage. The beat keeps its act even if dropped inside another
    /// act's window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` if the beat does not exist and
    /// `DomainError::NotDraggable` unless it is a milestone in proportional
    /// display.
    pub fn reposition_beat(
        &mut self,
        structure: &mut Structure,
        beat_id: BeatId,
        x: i32,
    ) -> Result<f64, DomainError> {
        let mode = structure.display_mode;
        let percentage = clamp_percentage(self.percentage_for_x(x));
        let beat = structure
            .beat_mut(beat_id)
            .ok_or(DomainError::BeatNotFound(beat_id))?;
        if !beat.is_drag_eligible(mode) {
            return Err(DomainError::NotDraggable(beat_id));
        }
        beat.percentage = percentage;

        self.rearrange(structure);
        info!(beat_id = %beat_id, percentage, "beat repositioned");
        Ok(percentage)
    }
}

impl ChangeListener for LayoutEngine {
    fn on_change(&mut self, change: &StructureChange, structure: &Structure, _scenes: &[Scene]) {
        // The indicator is interpolated between occupied beats, so any change
        // to those beats or to the scene order invalidates it.
        match change {
            StructureChange::StructureReplaced { .. }
            | StructureChange::BeatToggled { .. }
            | StructureChange::BeatInserted { .. }
            | StructureChange::BeatRemoved { .. } => {
                self.clear_highlight();
                self.rearrange(structure);
            }
            StructureChange::SceneOrderChanged
            | StructureChange::SceneBeatChanged { .. }
            | StructureChange::BeatMoved { .. }
            | StructureChange::ActsResized { .. } => self.clear_highlight(),
            StructureChange::ViewportResized { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beats::Beat;

    const WIDTH: u32 = 1000;
    const SIZE: u32 = 20;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig {
            width: WIDTH,
            beat_size: SIZE,
            ..LayoutConfig::default()
        })
    }

    fn scene_on(structure: &Structure, beat: Option<BeatId>) -> Scene {
        let mut scene = Scene::new("Scene");
        if let Some(beat_id) = beat {
            scene.assign_beat(structure.id, beat_id);
        }
        scene
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_x_for_percentage_centers_glyph() {
        assert_eq!(x_for_percentage(0.0, WIDTH, SIZE), -10);
        assert_eq!(x_for_percentage(50.0, WIDTH, SIZE), 490);
        assert_eq!(x_for_percentage(100.0, WIDTH, SIZE), 990);
        assert_eq!(x_for_percentage(25.0, WIDTH, SIZE), 240);
        assert_eq!(x_for_percentage(12.34, 100, 0), 12);
    }

    #[test]
    fn test_percentage_for_x_inverts_mapping() {
        assert_close(percentage_for_x(490, WIDTH, SIZE), 50.0);
        assert_close(percentage_for_x(-10, WIDTH, SIZE), 0.0);
    }

    #[test]
    fn test_round_trip_within_rounding_tolerance() {
        for width in [50_u32, 100, 333, 800, 1920] {
            for size in [0_u32, 15, 20, 35] {
                let tolerance = 50.0 / f64::from(width) + 1e-9;
                for step in 0..=1000 {
                    let p = f64::from(step) / 10.0;
                    let back = percentage_for_x(x_for_percentage(p, width, size), width, size);
                    assert!(
                        (back - p).abs() <= tolerance,
                        "width {width}, size {size}: {p} came back as {back}"
                    );
                    assert!((back - p).abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_zero_width_viewport_maps_to_origin() {
        assert_close(percentage_for_x(120, 0, SIZE), 0.0);
        assert!(
            LayoutConfig {
                width: 0,
                ..LayoutConfig::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_rescale_in_act_preserves_relative_position() {
        assert_close(rescale_in_act(30.0, 0.0, 50.0, 70.0), 42.0);
        assert_close(rescale_in_act(60.0, 50.0, 90.0, 70.0), 55.0);
        assert_close(rescale_in_act(25.0, 20.0, 20.0, 40.0), 25.0);
    }

    #[test]
    fn test_rescale_below_act_start_leaves_points() {
        assert_close(rescale_in_act(60.0, 50.0, 90.0, 30.0), 60.0);
        assert_close(rescale_in_act(70.0, 50.0, 90.0, 30.0), 70.0);
        assert_close(rescale_in_act(70.0, 50.0, 90.0, 50.0), 70.0);
    }

    #[test]
    fn test_resize_below_act_start_keeps_interior_order() {
        // Arrange
        let first = Beat::act_boundary("First", 1, 50.0);
        let early = Beat::milestone("Early", 2, 60.0);
        let late = Beat::milestone("Late", 2, 70.0);
        let second = Beat::act_boundary("Second", 2, 90.0);
        let (early_id, late_id, second_id) = (early.id, late.id, second.id);
        let mut structure = Structure::new("Reversal").with_beats([first, early, late, second]);
        let mut engine = engine();

        // Act
        let resize = engine
            .resize_act_boundary(&mut structure, second_id, 290)
            .unwrap();

        // Assert
        assert_close(resize.new_percentage, 30.0);
        assert_eq!(resize.changed, vec![second_id]);
        let early = structure.beat(early_id).unwrap().percentage;
        let late = structure.beat(late_id).unwrap().percentage;
        assert!(early < late, "order reversed: early={early} late={late}");
        assert_close(early, 60.0);
        assert_close(late, 70.0);
    }

    #[test]
    fn test_rearrange_places_beats_and_containers() {
        // Arrange
        let hook = Beat::milestone("Hook", 1, 10.0);
        let setup = Beat::container("Setup", 1, 10.0, 30.0);
        let hidden = Beat::milestone("Crisis", 1, 40.0).disabled();
        let (hook_id, setup_id, hidden_id) = (hook.id, setup.id, hidden.id);
        let structure = Structure::new("Layout").with_beats([hook, setup, hidden]);
        let mut engine = engine();

        // Act
        engine.rearrange(&structure);

        // Assert
        assert_eq!(
            engine.geometry(hook_id),
            Some(Rect {
                x: 90,
                y: 25,
                width: 20,
                height: 20
            })
        );
        assert_eq!(
            engine.geometry(setup_id),
            Some(Rect {
                x: 100,
                y: 51,
                width: 200,
                height: 20
            })
        );
        assert_eq!(engine.geometry(hidden_id), None);
    }

    #[test]
    fn test_sequential_display_records_order_without_geometry() {
        let late = Beat::milestone("Late", 1, 80.0);
        let early = Beat::act_boundary("Early", 1, 20.0);
        let span = Beat::container("Span", 1, 10.0, 30.0);
        let (late_id, early_id) = (late.id, early.id);
        let structure = Structure::new("Listed")
            .with_beats([late, early, span])
            .with_display_mode(DisplayMode::Sequential);
        let mut engine = engine();

        engine.rearrange(&structure);

        assert_eq!(engine.sequence(), &[early_id, late_id]);
        assert_eq!(engine.geometry(early_id), None);
    }

    #[test]
    fn test_set_width_recomputes_geometry() {
        let hook = Beat::milestone("Hook", 1, 50.0);
        let hook_id = hook.id;
        let structure = Structure::new("Layout").with_beats([hook]);
        let mut engine = engine();
        engine.rearrange(&structure);

        engine.set_width(500, &structure);

        assert_eq!(engine.geometry(hook_id).unwrap().x, 240);
    }

    #[test]
    fn test_interpolate_between_occupied_neighbours() {
        // Arrange
        let start = Beat::milestone("Start", 1, 10.0);
        let finish = Beat::milestone("Finish", 1, 50.0);
        let (start_id, finish_id) = (start.id, finish.id);
        let structure = Structure::new("Interp").with_beats([start, finish]);
        let scenes = vec![
            scene_on(&structure, Some(start_id)),
            scene_on(&structure, None),
            scene_on(&structure, None),
            scene_on(&structure, None),
            scene_on(&structure, Some(finish_id)),
        ];

        // Act
        let positions: Vec<Option<f64>> = (0..scenes.len())
            .map(|i| interpolate_at(&structure, &scenes, i))
            .collect();

        // Assert
        assert_eq!(
            positions,
            vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0)]
        );
    }

    #[test]
    fn test_interpolate_uses_defaults_at_the_edges() {
        let middle = Beat::milestone("Middle", 1, 51.0);
        let middle_id = middle.id;
        let structure = Structure::new("Interp").with_beats([middle]);
        let scenes = vec![
            scene_on(&structure, None),
            scene_on(&structure, Some(middle_id)),
            scene_on(&structure, None),
            scene_on(&structure, None),
        ];

        assert_close(interpolate_at(&structure, &scenes, 0).unwrap(), 1.0);
        assert_close(interpolate_at(&structure, &scenes, 2).unwrap(), 75.0);
        assert_close(interpolate_at(&structure, &scenes, 3).unwrap(), 99.0);
    }

    #[test]
    fn test_interpolate_single_scene_has_no_position() {
        let structure = Structure::new("Interp");
        let scenes = vec![scene_on(&structure, None)];

        assert_eq!(interpolate_at(&structure, &scenes, 0), None);
        assert_eq!(interpolate_at(&structure, &scenes, 5), None);
        assert_eq!(
            interpolate_position(&structure, &scenes, uuid::Uuid::new_v4()),
            None
        );
    }

    #[test]
    fn test_highlight_scene_prefers_own_beat() {
        let hook = Beat::milestone("Hook", 1, 10.0);
        let hook_id = hook.id;
        let structure = Structure::new("Highlight").with_beats([hook]);
        let scenes = vec![scene_on(&structure, Some(hook_id)), scene_on(&structure, None)];
        let mut engine = engine();

        assert_eq!(
            engine.highlight_scene(&structure, &scenes, scenes[0].id),
            Highlight::Beat(hook_id)
        );
        assert_eq!(engine.current_indicator(), None);

        assert_eq!(
            engine.highlight_scene(&structure, &scenes, scenes[1].id),
            Highlight::Indicator(99.0)
        );
        assert_eq!(
            engine.current_indicator(),
            Some(Rect {
                x: 978,
                y: 25,
                width: 20,
                height: 20
            })
        );
    }

    #[test]
    fn test_beat_changes_clear_the_indicator() {
        // Arrange
        let start = Beat::milestone("Start", 1, 10.0);
        let finish = Beat::milestone("Finish", 1, 50.0);
        let (start_id, finish_id) = (start.id, finish.id);
        let structure = Structure::new("Indicator").with_beats([start, finish]);
        let scenes = vec![
            scene_on(&structure, Some(start_id)),
            scene_on(&structure, None),
            scene_on(&structure, Some(finish_id)),
        ];
        let changes = [
            StructureChange::BeatMoved {
                beat_id: finish_id,
                percentage: 80.0,
            },
            StructureChange::ActsResized {
                act: 1,
                changed: vec![finish_id],
            },
            StructureChange::BeatToggled {
                beat_id: finish_id,
                enabled: false,
            },
            StructureChange::BeatRemoved { beat_id: finish_id },
        ];
        let mut engine = engine();

        for change in &changes {
            assert_eq!(
                engine.highlight_scene(&structure, &scenes, scenes[1].id),
                Highlight::Indicator(30.0)
            );

            // Act
            engine.on_change(change, &structure, &scenes);

            // Assert
            assert_eq!(engine.current_indicator(), None, "{change:?}");
        }
    }

    #[test]
    fn test_viewport_resize_keeps_the_indicator() {
        let structure = Structure::new("Indicator");
        let scenes = vec![scene_on(&structure, None), scene_on(&structure, None)];
        let mut engine = engine();
        engine.highlight_scene(&structure, &scenes, scenes[0].id);

        engine.set_width(500, &structure);
        engine.on_change(
            &StructureChange::ViewportResized { width: 500 },
            &structure,
            &scenes,
        );

        assert_eq!(engine.current_percentage(), Some(1.0));
        assert_eq!(engine.current_indicator().map(|r| r.x), Some(-7));
    }

    #[test]
    fn test_resize_rescales_interior_beats_of_the_act() {
        // Arrange
        let catalyst = Beat::milestone("Catalyst", 1, 30.0);
        let midpoint = Beat::act_boundary("Midpoint", 1, 50.0);
        let later = Beat::milestone("Later", 2, 60.0);
        let (catalyst_id, midpoint_id, later_id) = (catalyst.id, midpoint.id, later.id);
        let mut structure = Structure::new("Resize").with_beats([catalyst, midpoint, later]);
        let mut engine = engine();

        // Act
        let resize = engine
            .resize_act_boundary(&mut structure, midpoint_id, 690)
            .unwrap();

        // Assert
        assert_eq!(resize.act, 1);
        assert_close(resize.old_percentage, 50.0);
        assert_close(resize.new_percentage, 70.0);
        assert_eq!(resize.changed, vec![midpoint_id, catalyst_id]);
        assert_close(structure.beat(catalyst_id).unwrap().percentage, 42.0);
        assert_close(structure.beat(later_id).unwrap().percentage, 60.0);
        assert_eq!(engine.geometry(midpoint_id).unwrap().x, 690);
    }

    #[test]
    fn test_resize_moves_anchored_containers() {
        let debate = Beat::container("Debate", 1, 10.0, 20.0);
        let boundary = Beat::act_boundary("Break into Two", 1, 20.0);
        let fun = Beat::container("Fun and Games", 2, 20.0, 50.0);
        let (debate_id, boundary_id, fun_id) = (debate.id, boundary.id, fun.id);
        let mut structure = Structure::new("Resize").with_beats([debate, boundary, fun]);
        let mut engine = engine();

        let resize = engine
            .resize_act_boundary(&mut structure, boundary_id, 290)
            .unwrap();

        assert_eq!(resize.changed, vec![boundary_id, debate_id, fun_id]);
        assert_eq!(structure.beat(debate_id).unwrap().percentage_end, Some(30.0));
        assert_close(structure.beat(fun_id).unwrap().percentage, 30.0);
        assert_eq!(structure.beat(fun_id).unwrap().percentage_end, Some(50.0));
    }

    #[test]
    fn test_resize_zero_width_act_leaves_interior_beats() {
        let pinned = Beat::milestone("Pinned", 1, 0.0);
        let boundary = Beat::act_boundary("Opening", 1, 0.0);
        let (pinned_id, boundary_id) = (pinned.id, boundary.id);
        let mut structure = Structure::new("Degenerate").with_beats([pinned, boundary]);
        let mut engine = engine();

        let resize = engine
            .resize_act_boundary(&mut structure, boundary_id, 190)
            .unwrap();

        assert_eq!(resize.changed, vec![boundary_id]);
        assert_close(structure.beat(pinned_id).unwrap().percentage, 0.0);
        assert_close(structure.beat(boundary_id).unwrap().percentage, 20.0);
    }

    #[test]
    fn test_resize_rejects_milestones_and_unknown_beats() {
        let hook = Beat::milestone("Hook", 1, 10.0);
        let hook_id = hook.id;
        let mut structure = Structure::new("Resize").with_beats([hook]);
        let mut engine = engine();
        let missing = uuid::Uuid::new_v4();

        assert!(matches!(
            engine.resize_act_boundary(&mut structure, hook_id, 100),
            Err(DomainError::NotAnActBoundary(id)) if id == hook_id
        ));
        assert!(matches!(
            engine.resize_act_boundary(&mut structure, missing, 100),
            Err(DomainError::BeatNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_resize_to_same_point_changes_nothing() {
        let boundary = Beat::act_boundary("Midpoint", 1, 50.0);
        let boundary_id = boundary.id;
        let mut structure = Structure::new("Resize").with_beats([boundary]);
        let mut engine = engine();

        let resize = engine
            .resize_act_boundary(&mut structure, boundary_id, 490)
            .unwrap();

        assert!(resize.changed.is_empty());
    }

    #[test]
    fn test_reposition_assigns_dropped_percentage() {
        let hook = Beat::milestone("Hook", 1, 10.0);
        let hook_id = hook.id;
        let mut structure = Structure::new("Drag").with_beats([hook]);
        let mut engine = engine();

        let percentage = engine
            .reposition_beat(&mut structure, hook_id, 240)
            .unwrap();

        assert_close(percentage, 25.0);
        assert_close(structure.beat(hook_id).unwrap().percentage, 25.0);
        assert_eq!(engine.geometry(hook_id).unwrap().x, 240);
    }

    #[test]
    fn test_reposition_clamps_to_timeline() {
        let hook = Beat::milestone("Hook", 1, 10.0);
        let hook_id = hook.id;
        let mut structure = Structure::new("Drag").with_beats([hook]);
        let mut engine = engine();

        assert_close(
            engine.reposition_beat(&mut structure, hook_id, 5000).unwrap(),
            100.0
        );
        assert_close(
            engine.reposition_beat(&mut structure, hook_id, -500).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_reposition_rejects_boundaries_and_sequential_display() {
        let hook = Beat::milestone("Hook", 1, 10.0);
        let boundary = Beat::act_boundary("Midpoint", 1, 50.0);
        let (hook_id, boundary_id) = (hook.id, boundary.id);
        let mut structure = Structure::new("Drag").with_beats([hook, boundary]);
        let mut engine = engine();

        assert!(matches!(
            engine.reposition_beat(&mut structure, boundary_id, 100),
            Err(DomainError::NotDraggable(_))
        ));

        structure.display_mode = DisplayMode::Sequential;
        assert!(matches!(
            engine.reposition_beat(&mut structure, hook_id, 100),
            Err(DomainError::NotDraggable(_))
        ));
        assert_close(structure.beat(hook_id).unwrap().percentage, 10.0);
    }
}
