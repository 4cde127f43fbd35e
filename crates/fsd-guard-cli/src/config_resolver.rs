//! Locating and loading the configuration file.
//!
//! Resolution walks a fixed priority order: the `--config` flag, then
//! `fsd-guard.toml` or `.fsd-guard.toml` beside the project, then the
//! global config directory. When no file exists anywhere, built-in
//! defaults apply.

use anyhow::{Context, Result};
use fsd_guard_core::Config;
use std::path::{Path, PathBuf};

/// Project-level file names, most specific first.
const PROJECT_CONFIG_NAMES: [&str; 2] = ["fsd-guard.toml", ".fsd-guard.toml"];

/// File name inside the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
const CONFIG_DIR_ENV: &str = "FSD_GUARD_CONFIG_DIR";

/// Where a configuration file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given on the command line.
    Explicit(PathBuf),
    /// File sitting in the project directory.
    Project(PathBuf),
    /// File from the global config directory.
    Global(PathBuf),
    /// Nothing found anywhere.
    Default,
}

impl ConfigSource {
    /// The file behind this source, absent for [`ConfigSource::Default`].
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Whether the file came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Resolves and loads the configuration for one invocation.
///
/// A missing file at every level means defaults; a file that resolves
/// but fails to read or parse is a hard error.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<(Config, ConfigSource)> {
    let source = resolve(project_dir, explicit, global_config_dir());
    let config = match source.path() {
        Some(p) => {
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
        None => Config::default(),
    };
    Ok((config, source))
}

/// Picks the configuration source without touching its contents.
///
/// The explicit path is trusted as given; the project and global
/// candidates must exist on disk. The global directory comes in as an
/// argument, and [`load`] passes [`global_config_dir`].
#[must_use]
pub fn resolve(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let project_hit = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.exists());
    if let Some(found) = project_hit {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    if let Some(candidate) = global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// The global config directory: `$FSD_GUARD_CONFIG_DIR` when set,
/// `~/.fsd-guard` otherwise.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) => Some(PathBuf::from(dir)),
        Err(_) => home::home_dir().map(|h| h.join(".fsd-guard")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    // -- source selection --

    #[test]
    fn explicit_path_wins_without_existence_check() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join("fsd-guard.toml"));

        // The flag is trusted as-is even when it points nowhere;
        // loading reports the error instead.
        let flag = Path::new("/does/not/exist.toml");
        let source = resolve(project.path(), Some(flag), None);
        assert_eq!(source, ConfigSource::Explicit(flag.to_path_buf()));
    }

    #[test]
    fn project_file_found_under_either_name() {
        for name in PROJECT_CONFIG_NAMES {
            let project = TempDir::new().unwrap();
            touch(&project.path().join(name));
            let source = resolve(project.path(), None, None);
            assert_eq!(source, ConfigSource::Project(project.path().join(name)));
        }
    }

    #[test]
    fn undotted_name_beats_dotted() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join("fsd-guard.toml"));
        touch(&project.path().join(".fsd-guard.toml"));

        let source = resolve(project.path(), None, None);
        assert_eq!(
            source,
            ConfigSource::Project(project.path().join("fsd-guard.toml"))
        );
    }

    #[test]
    fn global_directory_is_checked_last() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        touch(&global.path().join(GLOBAL_CONFIG_NAME));

        let source = resolve(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            source,
            ConfigSource::Global(global.path().join(GLOBAL_CONFIG_NAME))
        );
        assert!(source.is_global());
    }

    #[test]
    fn project_file_shadows_global() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join("fsd-guard.toml"));
        let global = TempDir::new().unwrap();
        touch(&global.path().join(GLOBAL_CONFIG_NAME));

        let source = resolve(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(source, ConfigSource::Project(_)));
    }

    #[test]
    fn nothing_found_means_defaults() {
        let project = TempDir::new().unwrap();
        let empty_global = TempDir::new().unwrap();

        assert_eq!(resolve(project.path(), None, None), ConfigSource::Default);
        assert_eq!(
            resolve(project.path(), None, Some(empty_global.path().to_path_buf())),
            ConfigSource::Default
        );
        assert!(ConfigSource::Default.path().is_none());
    }

    // -- loading --

    #[test]
    fn load_parses_empty_table_as_defaults() {
        let project = TempDir::new().unwrap();
        // A project config takes priority, so load never consults the
        // real home directory here.
        fs::write(project.path().join("fsd-guard.toml"), "[fsd]\n").unwrap();

        let (config, source) = load(project.path(), None).unwrap();
        assert!(matches!(source, ConfigSource::Project(_)));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reads_layer_overrides() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("fsd-guard.toml"),
            "[fsd]\nlayers = [\"app\", \"features\", \"shared\"]\n",
        )
        .unwrap();

        let (config, _) = load(project.path(), None).unwrap();
        assert_eq!(config.layers, ["app", "features", "shared"]);
    }

    #[test]
    fn load_surfaces_parse_failures() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("fsd-guard.toml"), "[fsd\nbroken").unwrap();
        assert!(load(project.path(), None).is_err());
    }

    #[test]
    fn source_paths_round_trip() {
        let p = PathBuf::from("/tmp/fsd-guard.toml");
        for source in [
            ConfigSource::Explicit(p.clone()),
            ConfigSource::Project(p.clone()),
            ConfigSource::Global(p.clone()),
        ] {
            assert_eq!(source.path(), Some(p.as_path()));
        }
        assert!(!ConfigSource::Explicit(p.clone()).is_global());
        assert!(ConfigSource::Global(p).is_global());
    }
}
