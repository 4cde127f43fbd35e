//! Build-host integration seam.
//!
//! The host build system is an external collaborator; this trait is the
//! registration surface a setup plan drives. [`RecordingHost`] is the
//! in-memory reference implementation used by tests and by tooling that
//! renders a plan instead of applying it.

use crate::artifacts::{ComponentDir, DirRemap};
use std::path::{Path, PathBuf};

/// Registration surface of the host build system.
pub trait BuildHost {
    /// Adds one module-resolution alias.
    fn register_alias(&mut self, name: &str, path: &Path);

    /// Registers directories whose code is auto-imported, in order.
    fn register_import_dirs(&mut self, dirs: &[PathBuf]);

    /// Registers one component directory with its naming prefix.
    fn register_component_dir(&mut self, dir: &ComponentDir);

    /// Points a conventional directory at a new location.
    fn remap_directory(&mut self, remap: &DirRemap);
}

/// An in-memory host that records every registration.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Aliases in registration order.
    pub aliases: Vec<(String, PathBuf)>,
    /// Auto-import directories in registration order.
    pub import_dirs: Vec<PathBuf>,
    /// Component directories in registration order.
    pub component_dirs: Vec<ComponentDir>,
    /// Remap instructions in registration order.
    pub remaps: Vec<DirRemap>,
}

impl RecordingHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything recorded, for reuse across cycles.
    pub fn clear(&mut self) {
        self.aliases.clear();
        self.import_dirs.clear();
        self.component_dirs.clear();
        self.remaps.clear();
    }
}

impl BuildHost for RecordingHost {
    fn register_alias(&mut self, name: &str, path: &Path) {
        self.aliases.push((name.to_string(), path.to_path_buf()));
    }

    fn register_import_dirs(&mut self, dirs: &[PathBuf]) {
        self.import_dirs.extend_from_slice(dirs);
    }

    fn register_component_dir(&mut self, dir: &ComponentDir) {
        self.component_dirs.push(dir.clone());
    }

    fn remap_directory(&mut self, remap: &DirRemap) {
        self.remaps.push(remap.clone());
    }
}
