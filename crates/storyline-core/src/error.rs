//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A beat was not found in the structure.
    #[error("beat not found: {0}")]
    BeatNotFound(Uuid),

    /// A scene was not found in the scene list.
    #[error("scene not found: {0}")]
    SceneNotFound(Uuid),

    /// An act resize was requested on a beat that does not end an act.
    #[error("beat {0} does not end an act")]
    NotAnActBoundary(Uuid),

    /// A drag was requested on a beat that cannot be moved directly.
    #[error("beat {0} cannot be dragged")]
    NotDraggable(Uuid),

    /// The structure breaks the act partition invariant.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
