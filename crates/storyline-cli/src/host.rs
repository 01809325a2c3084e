//! Builds a story document from files or templates and renders it.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use storyline_structure::application::document::StoryDocument;
use storyline_structure::application::query_handlers::timeline_view;
use storyline_structure::domain::scenes::Scene;
use storyline_structure::domain::structure::Structure;
use storyline_structure::domain::templates;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;

/// One entry of a scene list file.
///
/// ```yaml
/// - title: Opening
///   beat: Opening Image
/// - title: Breakfast
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SceneEntry {
    /// Scene title.
    pub title: String,
    /// Text of the beat the scene fulfils, matched without regard to case.
    #[serde(default)]
    pub beat: Option<String>,
}

/// Parses a structure from YAML. Files without `custom` are treated as
/// user-authored.
///
/// # Errors
///
/// Returns `AppError::Yaml` if the document does not describe a structure.
pub fn parse_structure(yaml: &str) -> Result<Structure, AppError> {
    let mut value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    if let serde_yaml::Value::Mapping(map) = &mut value {
        map.entry("custom".into()).or_insert(true.into());
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Parses a scene list from YAML.
///
/// # Errors
///
/// Returns `AppError::Yaml` if the document is not a list of scenes.
pub fn parse_scenes(yaml: &str) -> Result<Vec<SceneEntry>, AppError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Turns scene entries into scenes linked to `structure`.
///
/// # Errors
///
/// Returns `AppError::UnknownBeat` if an entry names a beat the structure
/// does not have.
pub fn build_scenes(structure: &Structure, entries: &[SceneEntry]) -> Result<Vec<Scene>, AppError> {
    entries
        .iter()
        .map(|entry| {
            let mut scene = Scene::new(entry.title.clone());
            if let Some(text) = &entry.beat {
                let beat = structure
                    .beats()
                    .iter()
                    .find(|b| b.text.eq_ignore_ascii_case(text.trim()))
                    .ok_or_else(|| AppError::UnknownBeat {
                        scene: entry.title.clone(),
                        beat: text.clone(),
                    })?;
                if !beat.enabled {
                    warn!(scene = %entry.title, beat = %beat.text, "scene linked to a disabled beat");
                }
                scene.assign_beat(structure.id, beat.id);
            }
            Ok(scene)
        })
        .collect()
}

fn load_structure(config: &Config) -> Result<Structure, AppError> {
    match &config.structure_file {
        Some(path) => {
            info!(path = %path.display(), "loading structure file");
            parse_structure(&fs::read_to_string(path)?)
        }
        None => templates::by_name(&config.template)
            .ok_or_else(|| AppError::UnknownTemplate(config.template.clone())),
    }
}

fn load_scenes(path: Option<&Path>) -> Result<Vec<SceneEntry>, AppError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading scene list");
            parse_scenes(&fs::read_to_string(path)?)
        }
        None => Ok(Vec::new()),
    }
}

/// Builds the story document described by `config`.
///
/// # Errors
///
/// Returns `AppError` if a file cannot be read or parsed, the template is
/// unknown, a scene names an unknown beat, or the structure is invalid.
pub fn open_document(config: &Config) -> Result<StoryDocument, AppError> {
    let structure = load_structure(config)?;
    let entries = load_scenes(config.scenes_file.as_deref())?;
    let scenes = build_scenes(&structure, &entries)?;
    Ok(StoryDocument::new(structure, scenes, config.layout)?)
}

/// Renders the timeline view of `document` as pretty JSON.
///
/// # Errors
///
/// Returns `AppError::Json` if serialization fails.
pub fn render(document: &StoryDocument) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&timeline_view(document))?)
}

/// Opens the document described by `config` and renders it.
///
/// # Errors
///
/// See [`open_document`] and [`render`].
pub fn run(config: &Config) -> Result<String, AppError> {
    let document = open_document(config)?;
    info!(
        structure = %document.structure().title,
        acts = document.structure().acts_count(),
        scenes = document.scenes().len(),
        "rendering timeline"
    );
    render(&document)
}
