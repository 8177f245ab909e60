//! gamedb.toml configuration
//!
//! Supplies the directory layout and per-asset constraints the linter checks
//! every game folder against. Every key is optional; anything left out falls
//! back to the layout used by the compatibility database.
//!
//! ```toml
//! root = "games"
//! regions = ["Japan", "USA", "Europe"]
//!
//! [boxart]
//! filename = "boxart.png"
//! width = 328
//! height = 300
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gamedb.toml";

const DEFAULT_MIME: &str = "image/png";

/// Expected pixel size and media type of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConstraint<'a> {
    pub width: u32,
    pub height: u32,
    pub mime: &'a str,
}

/// A single image every game folder must carry (box art, icon).
#[derive(Debug, Clone)]
pub struct ImageRule {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub mime: String,
}

/// A directory of images sharing one constraint (screenshots).
#[derive(Debug, Clone)]
pub struct ImageDirRule {
    pub dirname: String,
    pub width: u32,
    pub height: u32,
    pub mime: String,
}

/// Location of the save bundles inside a game folder.
#[derive(Debug, Clone)]
pub struct SavesRule {
    pub dirname: String,
}

/// Full linter configuration. Loaded once and never mutated during a run.
#[derive(Debug, Clone)]
pub struct LintConfig {
    /// Directory holding one folder per game
    pub root: PathBuf,
    /// Folder names under `root` that are not games
    pub skip: Vec<String>,
    /// Metadata document filename inside each game folder
    pub metadata: String,
    pub boxart: ImageRule,
    pub icon: ImageRule,
    pub screenshots: ImageDirRule,
    pub saves: SavesRule,
    /// Allowed values for `releases[].region`
    pub regions: Vec<String>,
}

/// gamedb.toml as written. Absent keys keep the built-in value, section by
/// section and field by field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    root: Option<PathBuf>,
    skip: Option<Vec<String>>,
    metadata: Option<String>,
    boxart: ImageSection,
    icon: ImageSection,
    screenshots: ImageDirSection,
    saves: SavesSection,
    regions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageSection {
    filename: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    mime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageDirSection {
    dirname: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    mime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavesSection {
    dirname: Option<String>,
}

impl ImageSection {
    fn apply(self, rule: &mut ImageRule) {
        overlay(&mut rule.filename, self.filename);
        overlay(&mut rule.width, self.width);
        overlay(&mut rule.height, self.height);
        overlay(&mut rule.mime, self.mime);
    }
}

impl ImageDirSection {
    fn apply(self, rule: &mut ImageDirRule) {
        overlay(&mut rule.dirname, self.dirname);
        overlay(&mut rule.width, self.width);
        overlay(&mut rule.height, self.height);
        overlay(&mut rule.mime, self.mime);
    }
}

impl ConfigFile {
    fn into_config(self) -> LintConfig {
        let mut config = LintConfig::default();
        overlay(&mut config.root, self.root);
        overlay(&mut config.skip, self.skip);
        overlay(&mut config.metadata, self.metadata);
        self.boxart.apply(&mut config.boxart);
        self.icon.apply(&mut config.icon);
        self.screenshots.apply(&mut config.screenshots);
        overlay(&mut config.saves.dirname, self.saves.dirname);
        overlay(&mut config.regions, self.regions);
        config
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn default_mime() -> String {
    DEFAULT_MIME.to_string()
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("games"),
            skip: vec![".git".to_string(), "_validation".to_string()],
            metadata: "game.dat".to_string(),
            boxart: ImageRule {
                filename: "boxart.png".to_string(),
                width: 328,
                height: 300,
                mime: default_mime(),
            },
            icon: ImageRule {
                filename: "icon.png".to_string(),
                width: 48,
                height: 48,
                mime: default_mime(),
            },
            screenshots: ImageDirRule {
                dirname: "screenshots".to_string(),
                width: 400,
                height: 480,
                mime: default_mime(),
            },
            saves: SavesRule {
                dirname: "savefiles".to_string(),
            },
            regions: [
                "Japan",
                "USA",
                "Europe",
                "Australia",
                "China",
                "Korea",
                "Taiwan",
                "Worldwide",
            ]
            .iter()
            .map(|r| r.to_string())
            .collect(),
        }
    }
}

impl ImageRule {
    pub fn constraint(&self) -> ImageConstraint<'_> {
        ImageConstraint {
            width: self.width,
            height: self.height,
            mime: &self.mime,
        }
    }
}

impl ImageDirRule {
    pub fn constraint(&self) -> ImageConstraint<'_> {
        ImageConstraint {
            width: self.width,
            height: self.height,
            mime: &self.mime,
        }
    }
}

impl LintConfig {
    /// Load config from file
    ///
    /// A relative `root` is resolved against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;

        if config.root.is_relative() {
            if let Some(base) = path.parent() {
                config.root = base.join(&config.root);
            }
        }

        Ok(config)
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.into_config())
    }

    /// Pick the config for a run.
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. `gamedb.toml` in the working directory
    /// 3. Built-in defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!("Using {}", local.display());
            return Self::load(local);
        }

        tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
        Ok(Self::default())
    }

    /// Validate config fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metadata.is_empty() {
            return Err(ConfigError::Invalid(
                "metadata filename must not be empty".into(),
            ));
        }

        for (name, rule) in [("boxart", &self.boxart), ("icon", &self.icon)] {
            if rule.filename.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{name}.filename must not be empty"
                )));
            }
            check_constraint(name, rule.constraint())?;
        }

        if self.screenshots.dirname.is_empty() {
            return Err(ConfigError::Invalid(
                "screenshots.dirname must not be empty".into(),
            ));
        }
        check_constraint("screenshots", self.screenshots.constraint())?;

        if self.saves.dirname.is_empty() {
            return Err(ConfigError::Invalid(
                "saves.dirname must not be empty".into(),
            ));
        }

        if self.regions.is_empty() {
            return Err(ConfigError::Invalid("regions must not be empty".into()));
        }

        Ok(())
    }
}

fn check_constraint(name: &str, constraint: ImageConstraint<'_>) -> Result<(), ConfigError> {
    if constraint.width == 0 || constraint.height == 0 {
        return Err(ConfigError::Invalid(format!(
            "{name} dimensions must be non-zero (got {}x{})",
            constraint.width, constraint.height
        )));
    }
    if constraint.mime.is_empty() {
        return Err(ConfigError::Invalid(format!("{name}.mime must not be empty")));
    }
    Ok(())
}
