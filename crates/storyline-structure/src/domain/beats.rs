//! Beats: named milestones along the normalized story timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::structure::DisplayMode;

/// Identifier of a beat.
pub type BeatId = Uuid;

/// Tolerance used when comparing percentages that were copied from one beat
/// to another.
pub const PERCENTAGE_EPSILON: f64 = 1e-9;

/// The role a beat plays on the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatKind {
    /// A single point on the timeline.
    #[default]
    Milestone,
    /// A point that closes an act.
    ActBoundary,
    /// A span between `percentage` and `percentage_end`.
    Container,
}

/// A named point (or span, for containers) along the 0–100% timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    /// Stable identity. Generated when missing from hand-written files.
    #[serde(default = "Uuid::new_v4")]
    pub id: BeatId,
    /// Display name.
    pub text: String,
    /// Guidance for the writer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Role on the timeline.
    #[serde(default)]
    pub kind: BeatKind,
    /// The act this beat is part of. Boundaries belong to the act they close.
    pub act: u32,
    /// Position along the timeline, in `[0, 100]`.
    pub percentage: f64,
    /// End of the span. Only set for containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_end: Option<f64>,
    /// Disabled beats are excluded from layout and from act membership.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Beat {
    fn with_kind(text: impl Into<String>, kind: BeatKind, act: u32, percentage: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            description: String::new(),
            kind,
            act,
            percentage,
            percentage_end: None,
            enabled: true,
        }
    }

    /// Creates a milestone beat.
    #[must_use]
    pub fn milestone(text: impl Into<String>, act: u32, percentage: f64) -> Self {
        Self::with_kind(text, BeatKind::Milestone, act, percentage)
    }

    /// Creates a beat that closes `act`.
    #[must_use]
    pub fn act_boundary(text: impl Into<String>, act: u32, percentage: f64) -> Self {
        Self::with_kind(text, BeatKind::ActBoundary, act, percentage)
    }

    /// Creates a container spanning `[percentage, percentage_end]`.
    #[must_use]
    pub fn container(
        text: impl Into<String>,
        act: u32,
        percentage: f64,
        percentage_end: f64,
    ) -> Self {
        Self {
            percentage_end: Some(percentage_end),
            ..Self::with_kind(text, BeatKind::Container, act, percentage)
        }
    }

    /// Replaces the generated identifier with a fixed one.
    #[must_use]
    pub fn with_id(mut self, id: BeatId) -> Self {
        self.id = id;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the beat as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Returns `true` for beats that close an act.
    #[must_use]
    pub fn ends_act(&self) -> bool {
        self.kind == BeatKind::ActBoundary
    }

    /// Returns `true` for container spans.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind == BeatKind::Container
    }

    /// Whether the beat may be dragged directly in the given display mode.
    ///
    /// Act boundaries only move through an act resize, and containers have
    /// no drag handle of their own.
    #[must_use]
    pub fn is_drag_eligible(&self, mode: DisplayMode) -> bool {
        self.kind == BeatKind::Milestone && mode == DisplayMode::Proportional
    }
}

/// Returns `true` if two percentages denote the same timeline point.
#[must_use]
pub fn same_percentage(a: f64, b: f64) -> bool {
    (a - b).abs() < PERCENTAGE_EPSILON
}
