//! TOML configuration for the convention engine.
//!
//! Options live under an `[fsd]` table in `fsd-guard.toml`. Every option
//! has a Feature-Sliced Design default, so an empty file is a valid config.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration, immutable for the duration of a setup cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory the layer tree lives under, joined to the project
    /// directory when relative.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Ordered layer names. The first and last entries are boundary
    /// layers and carry no slices.
    #[serde(default = "default_layers")]
    pub layers: Vec<String>,

    /// Segment directory names scanned inside slices and boundary layers.
    #[serde(default = "default_segments")]
    pub segments: Vec<String>,

    /// Prefix prepended to every generated alias name.
    #[serde(default)]
    pub alias_prefix: String,

    /// When false, no restriction rules are derived at all.
    #[serde(default = "default_prevent_cross_imports")]
    pub prevent_cross_imports: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            layers: default_layers(),
            segments: default_segments(),
            alias_prefix: String::new(),
            prevent_cross_imports: default_prevent_cross_imports(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_layers() -> Vec<String> {
    ["app", "pages", "widgets", "features", "entities", "shared"]
        .map(String::from)
        .to_vec()
}

fn default_segments() -> Vec<String> {
    ["ui", "model", "api", "lib", "config"].map(String::from).to_vec()
}

fn default_prevent_cross_imports() -> bool {
    true
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
}

impl Config {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        /// Wrapper to handle the `[fsd]` section in the TOML.
        #[derive(Deserialize)]
        struct RawConfig {
            #[serde(default)]
            fsd: Config,
        }

        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Ok(raw.fsd)
    }
}

/// A soft configuration diagnostic.
///
/// Issues are reported, not fatal: the cycle continues with the degraded
/// configuration and carries the issues in its plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic, Serialize)]
#[serde(tag = "issue", rename_all = "kebab-case")]
pub enum ConfigIssue {
    /// Fewer than two layers declared.
    #[error("layer list needs at least two entries, found {count}")]
    #[diagnostic(
        code(fsd::config::insufficient_layers),
        help("declare at least an application layer and a shared layer")
    )]
    InsufficientLayers {
        /// How many layers were declared.
        count: usize,
    },

    /// A layer name is empty.
    #[error("layer name at position {position} is empty")]
    #[diagnostic(code(fsd::config::empty_layer_name))]
    EmptyLayerName {
        /// Zero-based position in the layer list.
        position: usize,
    },

    /// A layer name contains a character unusable in a directory name.
    #[error("layer name `{name}` contains illegal character `{character}`")]
    #[diagnostic(
        code(fsd::config::illegal_layer_name),
        help("layer names become directory names and aliases; drop the special character")
    )]
    IllegalLayerName {
        /// The offending name.
        name: String,
        /// The first illegal character found.
        character: char,
    },

    /// The same layer name appears more than once.
    #[error("layer name `{name}` is declared more than once")]
    #[diagnostic(code(fsd::config::duplicate_layer_name))]
    DuplicateLayerName {
        /// The duplicated name.
        name: String,
    },

    /// The segment list is empty.
    #[error("segment list must not be empty")]
    #[diagnostic(
        code(fsd::config::no_segments),
        help("declare at least one segment, e.g. `ui`")
    )]
    NoSegments,

    /// A segment name is empty.
    #[error("segment name at position {position} is empty")]
    #[diagnostic(code(fsd::config::empty_segment_name))]
    EmptySegmentName {
        /// Zero-based position in the segment list.
        position: usize,
    },

    /// A segment name contains a character unusable in a directory name.
    #[error("segment name `{name}` contains illegal character `{character}`")]
    #[diagnostic(code(fsd::config::illegal_segment_name))]
    IllegalSegmentName {
        /// The offending name.
        name: String,
        /// The first illegal character found.
        character: char,
    },
}
