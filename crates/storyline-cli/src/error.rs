//! Storyline CLI — error types.

use storyline_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the command-line host.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// No built-in template has the requested name.
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    /// A scene names a beat the structure does not have.
    #[error("scene '{scene}' refers to unknown beat '{beat}'")]
    UnknownBeat {
        /// Title of the offending scene.
        scene: String,
        /// The beat text that did not match.
        beat: String,
    },

    /// The structure or a command was rejected by the domain.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A structure or scene file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A structure or scene file is not valid YAML for its type.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The timeline view could not be rendered.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_convert_with_question_mark() {
        fn fails() -> Result<(), AppError> {
            Err(DomainError::Validation("viewport width must be positive".into()))?;
            Ok(())
        }

        let err = fails().unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert_eq!(
            err.to_string(),
            "domain error: validation error: viewport width must be positive"
        );
    }

    #[test]
    fn test_unknown_beat_message_names_scene_and_beat() {
        let err = AppError::UnknownBeat {
            scene: "Opening".to_owned(),
            beat: "Prologue".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "scene 'Opening' refers to unknown beat 'Prologue'"
        );
    }
}
