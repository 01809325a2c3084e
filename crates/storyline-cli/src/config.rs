//! Host configuration read from the environment.

use std::path::PathBuf;

use storyline_structure::application::layout::LayoutConfig;

use crate::error::AppError;

/// Built-in template used when neither a template nor a file is given.
pub const DEFAULT_TEMPLATE: &str = "three-act-structure";

/// Where the structure comes from, how wide the viewport is, and which
/// scenes to lay out.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Name of a built-in template, see `templates::by_name`.
    pub template: String,
    /// YAML structure file. Takes precedence over `template`.
    pub structure_file: Option<PathBuf>,
    /// YAML scene list. No scenes when absent.
    pub scenes_file: Option<PathBuf>,
    /// Viewport dimensions.
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_owned(),
            structure_file: None,
            scenes_file: None,
            layout: LayoutConfig::default(),
        }
    }
}

fn parse_pixels(name: &str, value: &str) -> Result<u32, AppError> {
    let pixels: u32 = value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{name} must be a pixel count: {e}")))?;
    if pixels == 0 {
        return Err(AppError::Config(format!("{name} must be positive")));
    }
    Ok(pixels)
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// Recognized variables: `STORYLINE_TEMPLATE`,
    /// `STORYLINE_STRUCTURE_FILE`, `STORYLINE_SCENES`, `STORYLINE_WIDTH` and
    /// `STORYLINE_BEAT_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse or is
    /// 0.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Some(template) = lookup("STORYLINE_TEMPLATE") {
            config.template = template;
        }
        config.structure_file = lookup("STORYLINE_STRUCTURE_FILE").map(PathBuf::from);
        config.scenes_file = lookup("STORYLINE_SCENES").map(PathBuf::from);
        if let Some(width) = lookup("STORYLINE_WIDTH") {
            config.layout.width = parse_pixels("STORYLINE_WIDTH", &width)?;
        }
        if let Some(size) = lookup("STORYLINE_BEAT_SIZE") {
            config.layout.beat_size = parse_pixels("STORYLINE_BEAT_SIZE", &size)?;
        }
        Ok(config)
    }
}
