//! Directory-creation watching.
//!
//! A new directory under the tree root is classified by its depth
//! against the layer model; anything classifiable triggers a full
//! re-setup on the caller's side. Unclassifiable paths are ignored
//! without comment. There is no debounce: bursts of creations each
//! trigger their own cycle, and the host is expected to tolerate that.

use crate::layers::Layers;
use notify::event::{CreateKind, EventKind};
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A classified directory creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// New segment directly under a boundary layer.
    BoundarySegment {
        /// The boundary layer.
        layer: String,
        /// The new segment directory.
        segment: String,
    },
    /// New slice directly under a middle layer.
    SliceCreated {
        /// The middle layer.
        layer: String,
        /// The new slice directory.
        slice: String,
    },
    /// New segment inside a middle-layer slice.
    SliceSegment {
        /// The middle layer.
        layer: String,
        /// The owning slice.
        slice: String,
        /// The new segment directory.
        segment: String,
    },
}

/// Classifies a created directory path against the layer model.
///
/// Returns `None` for anything outside the root, under an unknown
/// layer, or at an unexpected depth.
#[must_use]
pub fn classify(root: &Path, layers: &Layers, path: &Path) -> Option<TreeEvent> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let layer = layers.get(parts.first()?)?;
    let boundary = layers.is_boundary(layer);
    match (boundary, parts.len()) {
        (true, 2) => Some(TreeEvent::BoundarySegment {
            layer: layer.name().to_string(),
            segment: parts[1].clone(),
        }),
        (false, 2) => Some(TreeEvent::SliceCreated {
            layer: layer.name().to_string(),
            slice: parts[1].clone(),
        }),
        (false, 3) => Some(TreeEvent::SliceSegment {
            layer: layer.name().to_string(),
            slice: parts[1].clone(),
            segment: parts[2].clone(),
        }),
        _ => None,
    }
}

/// Errors starting the watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The watch backend failed to start or register the root.
    #[error("failed to watch {path}: {source}")]
    Watch {
        /// The directory that could not be watched.
        path: PathBuf,
        /// Backend error.
        source: notify::Error,
    },
}

/// Watches the tree root for new directories and reports classified
/// events. Events arrive on a channel and are consumed synchronously.
pub struct ChangeWatcher {
    // Held only to keep the backend alive for the receiver's lifetime.
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<notify::Result<Event>>,
    root: PathBuf,
    layers: Layers,
}

impl std::fmt::Debug for ChangeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeWatcher")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl ChangeWatcher {
    /// Starts watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be created or the root cannot
    /// be registered.
    pub fn new(root: &Path, layers: Layers) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let mut watcher =
            RecommendedWatcher::new(tx, NotifyConfig::default()).map_err(|e| {
                WatchError::Watch {
                    path: root.to_path_buf(),
                    source: e,
                }
            })?;
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Watch {
                path: root.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            _watcher: watcher,
            rx,
            root: root.to_path_buf(),
            layers,
        })
    }

    /// Blocks on the event stream, invoking `on_event` for every
    /// classified directory creation. Returns when the backend shuts
    /// down, which in practice means process teardown.
    pub fn run<F>(&self, mut on_event: F)
    where
        F: FnMut(TreeEvent),
    {
        while let Ok(result) = self.rx.recv() {
            match result {
                Ok(event) => {
                    for tree_event in self.classify_event(&event) {
                        on_event(tree_event);
                    }
                }
                Err(e) => warn!(error = %e, "watch backend error"),
            }
        }
    }

    /// Waits up to `timeout` for the next classified event.
    #[must_use]
    pub fn poll(&self, timeout: Duration) -> Option<TreeEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.rx.recv_timeout(remaining) {
                Ok(Ok(event)) => {
                    if let Some(tree_event) = self.classify_event(&event).into_iter().next() {
                        return Some(tree_event);
                    }
                }
                Ok(Err(e)) => warn!(error = %e, "watch backend error"),
                Err(_) => return None,
            }
        }
    }

    fn classify_event(&self, event: &Event) -> Vec<TreeEvent> {
        if !matches!(
            event.kind,
            EventKind::Create(CreateKind::Folder | CreateKind::Any)
        ) {
            return Vec::new();
        }
        let mut classified = Vec::new();
        for path in &event.paths {
            // Backends reporting Create(Any) do not distinguish files
            // from directories; check the disk for those.
            if event.kind == EventKind::Create(CreateKind::Any) && !path.is_dir() {
                continue;
            }
            match classify(&self.root, &self.layers, path) {
                Some(tree_event) => {
                    debug!(?tree_event, "directory created");
                    classified.push(tree_event);
                }
                None => debug!(path = %path.display(), "ignoring unclassifiable creation"),
            }
        }
        classified
    }
}
