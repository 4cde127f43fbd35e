//! Ordered layer model.
//!
//! Layers are declared outermost-first: index 0 is the application boundary
//! layer, index N-1 the shared boundary layer. Neither boundary carries
//! slices. Validation is soft: the resolved model is returned together
//! with any diagnostics, and callers decide how loudly to complain.

use crate::config::ConfigIssue;
use serde::Serialize;
use std::collections::HashSet;

/// Characters that cannot appear in a layer or segment name because the
/// name doubles as a directory name on every supported filesystem.
pub const ILLEGAL_NAME_CHARS: [char; 10] = ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// A single architectural layer: its name and position in the declared order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Layer {
    name: String,
    index: usize,
}

impl Layer {
    /// Returns the layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the position in the declared order, 0-based.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The validated ordered layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layers {
    layers: Vec<Layer>,
}

impl Layers {
    /// Builds the layer model from declared names, collecting soft
    /// diagnostics instead of failing.
    ///
    /// Offending names stay in the model so the cycle can continue with
    /// the configuration as declared; the issues describe what to fix.
    #[must_use]
    pub fn resolve(names: &[String]) -> (Self, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if names.len() < 2 {
            issues.push(ConfigIssue::InsufficientLayers { count: names.len() });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                issues.push(ConfigIssue::EmptyLayerName { position });
            } else if let Some(character) = first_illegal_char(name) {
                issues.push(ConfigIssue::IllegalLayerName {
                    name: name.clone(),
                    character,
                });
            }
            if !seen.insert(name.as_str()) {
                issues.push(ConfigIssue::DuplicateLayerName { name: name.clone() });
            }
        }

        let layers = names
            .iter()
            .enumerate()
            .map(|(index, name)| Layer {
                name: name.clone(),
                index,
            })
            .collect();

        (Self { layers }, issues)
    }

    /// Returns the outermost boundary layer (by default `app`).
    #[must_use]
    pub fn first(&self) -> Option<&Layer> {
        self.layers.first()
    }

    /// Returns the innermost boundary layer (by default `shared`).
    #[must_use]
    pub fn last(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Returns the sliced layers between the two boundaries, in order.
    #[must_use]
    pub fn middle(&self) -> &[Layer] {
        if self.layers.len() < 2 {
            return &[];
        }
        &self.layers[1..self.layers.len() - 1]
    }

    /// Returns all layers in declared order.
    #[must_use]
    pub fn all(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the layers declared before `index`, i.e. everything a slice
    /// at that index must not import from.
    #[must_use]
    pub fn before(&self, index: usize) -> &[Layer] {
        &self.layers[..index.min(self.layers.len())]
    }

    /// Looks up a layer by name. Duplicates resolve to the first occurrence.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Returns the index of a layer by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.get(name).map(Layer::index)
    }

    /// Tests whether the layer sits at either boundary.
    #[must_use]
    pub fn is_boundary(&self, layer: &Layer) -> bool {
        layer.index == 0 || layer.index + 1 == self.layers.len()
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true when no layers are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Checks declared segment names, collecting soft diagnostics.
#[must_use]
pub fn check_segments(segments: &[String]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if segments.is_empty() {
        issues.push(ConfigIssue::NoSegments);
    }
    for (position, name) in segments.iter().enumerate() {
        if name.is_empty() {
            issues.push(ConfigIssue::EmptySegmentName { position });
        } else if let Some(character) = first_illegal_char(name) {
            issues.push(ConfigIssue::IllegalSegmentName {
                name: name.clone(),
                character,
            });
        }
    }
    issues
}

fn first_illegal_char(name: &str) -> Option<char> {
    name.chars().find(|c| ILLEGAL_NAME_CHARS.contains(c))
}
