//! Slice discovery by recursive directory traversal.
//!
//! Every directory at every depth under a middle layer is a candidate
//! slice, so a grouping directory is itself a slice. The scan is a full
//! rescan on every invocation; nothing is cached between cycles.

use crate::layers::{Layer, Layers};
use crate::pattern;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A slice directory discovered under a middle layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    layer: Layer,
    name: String,
    path: PathBuf,
}

impl Slice {
    /// Creates a slice record.
    #[must_use]
    pub fn new(layer: Layer, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            layer,
            name: name.into(),
            path: path.into(),
        }
    }

    /// Returns the layer this slice belongs to.
    #[must_use]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Returns the slice name relative to its layer directory,
    /// `/`-separated even for nested slices.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the absolute slice directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.layer.name(), self.name)
    }
}

/// Discovers every slice under the middle layers of `root`.
///
/// Layers whose directory does not exist contribute nothing. Unreadable
/// entries are skipped. Traversal is name-sorted per directory, so the
/// result is deterministic for a given tree.
#[must_use]
pub fn discover_slices(root: &Path, layers: &Layers) -> Vec<Slice> {
    let mut slices = Vec::new();
    for layer in layers.middle() {
        let layer_dir = root.join(layer.name());
        if !layer_dir.is_dir() {
            debug!(layer = layer.name(), "layer directory missing, no slices");
            continue;
        }
        for entry in WalkDir::new(&layer_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(layer = layer.name(), error = %e, "skipping unreadable entry");
                    None
                }
            })
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&layer_dir) else {
                continue;
            };
            slices.push(Slice::new(
                layer.clone(),
                pattern::normalize(relative),
                entry.path(),
            ));
        }
        debug!(layer = layer.name(), "layer scanned");
    }
    debug!(count = slices.len(), "slices discovered");
    slices
}
