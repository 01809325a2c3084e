//! Story structures: ordered beats partitioned into acts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storyline_core::error::DomainError;
use uuid::Uuid;

use super::beats::{Beat, BeatId};

/// How a structure is laid out along the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Beats are placed at their percentage.
    #[default]
    Proportional,
    /// Beats are listed in order without geometric meaning.
    Sequential,
}

/// The `[start, end)` percentage window covered by one act.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActWindow {
    /// Act number, starting at 1.
    pub act: u32,
    /// Inclusive start percentage.
    pub start: f64,
    /// Exclusive end percentage.
    pub end: f64,
}

impl ActWindow {
    /// Width of the window in percentage points. Negative if a boundary
    /// was dragged past its predecessor.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Returns `true` if `percentage` falls in `[start, end)`.
    #[must_use]
    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.start && percentage < self.end
    }
}

/// A story structure: the beats of one timeline plus how to display them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Stable identity. Generated when missing from hand-written files.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Layout mode.
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// `true` for structures authored by the user rather than shipped.
    #[serde(default)]
    pub custom: bool,
    /// Optional per-act labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub acts_text: BTreeMap<u32, String>,
    /// Beats in insertion order. Insertion order breaks percentage ties.
    #[serde(default)]
    beats: Vec<Beat>,
}

impl Structure {
    /// Creates an empty custom structure.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            display_mode: DisplayMode::Proportional,
            custom: true,
            acts_text: BTreeMap::new(),
            beats: Vec::new(),
        }
    }

    /// Replaces the generated identifier with a fixed one.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Appends `beats` in order.
    #[must_use]
    pub fn with_beats(mut self, beats: impl IntoIterator<Item = Beat>) -> Self {
        self.beats.extend(beats);
        self
    }

    /// Sets the display mode.
    #[must_use]
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Returns the beats in insertion order.
    #[must_use]
    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub(crate) fn beats_mut(&mut self) -> &mut [Beat] {
        &mut self.beats
    }

    /// Returns all beats sorted by percentage. The sort is stable, so beats
    /// sharing a percentage keep their insertion order.
    #[must_use]
    pub fn sorted_beats(&self) -> Vec<&Beat> {
        let mut sorted: Vec<&Beat> = self.beats.iter().collect();
        sorted.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
        sorted
    }

    /// Returns the enabled beats sorted by percentage.
    #[must_use]
    pub fn enabled_beats(&self) -> Vec<&Beat> {
        self.sorted_beats()
            .into_iter()
            .filter(|beat| beat.enabled)
            .collect()
    }

    /// Returns the act boundaries in act order.
    #[must_use]
    pub fn act_beats(&self) -> Vec<&Beat> {
        let mut boundaries: Vec<&Beat> = self.beats.iter().filter(|b| b.ends_act()).collect();
        boundaries.sort_by(|a, b| {
            a.act
                .cmp(&b.act)
                .then(a.percentage.total_cmp(&b.percentage))
        });
        boundaries
    }

    /// Number of acts: one more than the number of boundaries, or 0 for a
    /// structure without beats.
    #[must_use]
    pub fn acts_count(&self) -> u32 {
        if self.beats.is_empty() {
            return 0;
        }
        let boundaries = self.beats.iter().filter(|b| b.ends_act()).count();
        u32::try_from(boundaries + 1).unwrap_or(u32::MAX)
    }

    /// Computes each act's window from the boundaries, in act order. The
    /// first act starts at 0 and the last one ends at 100.
    #[must_use]
    pub fn act_windows(&self) -> Vec<ActWindow> {
        if self.beats.is_empty() {
            return Vec::new();
        }

        let mut windows = Vec::new();
        let mut start = 0.0;
        let mut act = 1;
        for boundary in self.act_beats() {
            windows.push(ActWindow {
                act,
                start,
                end: boundary.percentage,
            });
            start = boundary.percentage;
            act += 1;
        }
        windows.push(ActWindow {
            act,
            start,
            end: 100.0,
        });
        windows
    }

    /// Returns the window of `act`, if the structure has that many acts.
    #[must_use]
    pub fn act_window(&self, act: u32) -> Option<ActWindow> {
        self.act_windows().into_iter().find(|w| w.act == act)
    }

    /// Width of each act in per-mille of the timeline. Acts with a negative
    /// width report 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn act_proportions(&self) -> Vec<u32> {
        self.act_windows()
            .iter()
            .map(|w| (10.0 * w.width()).max(0.0) as u32)
            .collect()
    }

    /// Returns the label of `act`.
    #[must_use]
    pub fn act_label(&self, act: u32) -> String {
        self.acts_text
            .get(&act)
            .cloned()
            .unwrap_or_else(|| format!("Act {act}"))
    }

    /// Looks up a beat by identifier.
    #[must_use]
    pub fn beat(&self, id: BeatId) -> Option<&Beat> {
        self.beats.iter().find(|b| b.id == id)
    }

    pub(crate) fn beat_mut(&mut self, id: BeatId) -> Option<&mut Beat> {
        self.beats.iter_mut().find(|b| b.id == id)
    }

    /// Appends a beat.
    pub fn insert_beat(&mut self, beat: Beat) {
        self.beats.push(beat);
    }

    /// Removes a beat.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` if no beat has the identifier.
    pub fn remove_beat(&mut self, id: BeatId) -> Result<Beat, DomainError> {
        let index = self
            .beats
            .iter()
            .position(|b| b.id == id)
            .ok_or(DomainError::BeatNotFound(id))?;
        Ok(self.beats.remove(index))
    }

    /// Enables or disables a beat. Returns `true` if the flag changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BeatNotFound` if no beat has the identifier.
    pub fn set_beat_enabled(&mut self, id: BeatId, enabled: bool) -> Result<bool, DomainError> {
        let beat = self.beat_mut(id).ok_or(DomainError::BeatNotFound(id))?;
        let changed = beat.enabled != enabled;
        beat.enabled = enabled;
        Ok(changed)
    }

    /// Checks the act partition invariant and the per-beat ranges.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStructure` describing the first
    /// violation found.
    pub fn validate(&self) -> Result<(), DomainError> {
        let acts = self.acts_count();
        for beat in &self.beats {
            if !(0.0..=100.0).contains(&beat.percentage) {
                return Err(DomainError::InvalidStructure(format!(
                    "beat '{}' lies outside the timeline at {}%",
                    beat.text, beat.percentage
                )));
            }
            if beat.act == 0 || beat.act > acts {
                return Err(DomainError::InvalidStructure(format!(
                    "beat '{}' refers to act {} of {acts}",
                    beat.text, beat.act
                )));
            }
            match (beat.is_container(), beat.percentage_end) {
                (true, Some(end)) if end > beat.percentage && end <= 100.0 => {}
                (true, _) => {
                    return Err(DomainError::InvalidStructure(format!(
                        "container '{}' needs an end after its start",
                        beat.text
                    )));
                }
                (false, Some(_)) => {
                    return Err(DomainError::InvalidStructure(format!(
                        "only containers may span, '{}' does not",
                        beat.text
                    )));
                }
                (false, None) => {}
            }
        }

        let mut boundaries: Vec<&Beat> = self.beats.iter().filter(|b| b.ends_act()).collect();
        boundaries.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
        for (expected, boundary) in (1..).zip(boundaries) {
            if boundary.act != expected {
                return Err(DomainError::InvalidStructure(format!(
                    "boundary '{}' closes act {} but is boundary number {expected}",
                    boundary.text, boundary.act
                )));
            }
        }
        Ok(())
    }

    /// Renumbers boundaries 1..n in percentage order, then assigns every
    /// other beat to the act whose window contains it.
    pub fn normalize_acts(&mut self) {
        let mut boundaries: Vec<usize> = (0..self.beats.len())
            .filter(|&i| self.beats[i].ends_act())
            .collect();
        boundaries.sort_by(|&a, &b| self.beats[a].percentage.total_cmp(&self.beats[b].percentage));
        for (act, index) in (1..).zip(boundaries) {
            self.beats[index].act = act;
        }

        let windows = self.act_windows();
        for beat in self.beats.iter_mut().filter(|b| !b.ends_act()) {
            beat.act = act_at(&windows, beat.percentage);
        }
    }
}

/// Returns the act whose window contains `percentage`. Points past the end
/// belong to the last act.
#[must_use]
pub fn act_at(windows: &[ActWindow], percentage: f64) -> u32 {
    windows
        .iter()
        .find(|w| w.contains(percentage))
        .or_else(|| {
            if percentage < 0.0 {
                windows.first()
            } else {
                windows.last()
            }
        })
        .map_or(1, |w| w.act)
}
