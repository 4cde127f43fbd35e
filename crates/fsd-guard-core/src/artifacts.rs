//! Build-host artifacts derived from the layer tree.
//!
//! Aliases cover every declared layer whether or not its directory
//! exists; everything that names a concrete directory is filtered to
//! directories actually on disk, so a missing segment simply
//! contributes nothing.

use crate::layers::{Layer, Layers};
use crate::scan::Slice;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One module-resolution alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias {
    /// Alias name including the configured prefix.
    pub name: String,
    /// Absolute directory the alias resolves to.
    pub path: PathBuf,
}

/// An existing segment directory eligible for auto-import registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentLocation {
    /// Owning layer name.
    pub layer: String,
    /// Owning slice name; absent inside boundary layers.
    pub slice: Option<String>,
    /// Segment name.
    pub segment: String,
    /// Absolute directory.
    pub path: PathBuf,
}

/// A component directory paired with its naming prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDir {
    /// Absolute directory.
    pub path: PathBuf,
    /// Prefix prepended to auto-registered component names.
    pub prefix: String,
}

/// Conventional directories pointed at the application boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemapKind {
    /// The host's page-route directory.
    PageRoutes,
    /// The host's layout directory.
    Layouts,
}

impl std::fmt::Display for RemapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageRoutes => write!(f, "page-routes"),
            Self::Layouts => write!(f, "layouts"),
        }
    }
}

/// One directory remap instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirRemap {
    /// Which conventional directory moves.
    pub kind: RemapKind,
    /// Where it now points.
    pub path: PathBuf,
}

/// Builds the alias table: one entry per declared layer, in layer order.
#[must_use]
pub fn alias_map(root: &Path, layers: &Layers, prefix: &str) -> Vec<Alias> {
    layers
        .all()
        .iter()
        .map(|layer| Alias {
            name: format!("{prefix}{}", layer.name()),
            path: root.join(layer.name()),
        })
        .collect()
}

/// Collects existing segment directories.
///
/// Boundary layers contribute `<root>/<layer>/<segment>`; middle layers
/// contribute `<slice>/<segment>` for every discovered slice. Order is
/// layer order, then slice scan order, then declared segment order.
#[must_use]
pub fn segment_locations(
    root: &Path,
    layers: &Layers,
    slices: &[Slice],
    segments: &[String],
) -> Vec<SegmentLocation> {
    let mut locations = Vec::new();
    for layer in layers.all() {
        if layers.is_boundary(layer) {
            for segment in segments {
                push_existing(&mut locations, layer, None, segment, root.join(layer.name()));
            }
        } else {
            for slice in slices.iter().filter(|s| s.layer() == layer) {
                for segment in segments {
                    push_existing(
                        &mut locations,
                        layer,
                        Some(slice.name()),
                        segment,
                        slice.path().to_path_buf(),
                    );
                }
            }
        }
    }
    locations
}

fn push_existing(
    locations: &mut Vec<SegmentLocation>,
    layer: &Layer,
    slice: Option<&str>,
    segment: &str,
    parent: PathBuf,
) {
    let path = parent.join(segment);
    if path.is_dir() {
        locations.push(SegmentLocation {
            layer: layer.name().to_string(),
            slice: slice.map(ToString::to_string),
            segment: segment.to_string(),
            path,
        });
    }
}

/// Pairs every segment location with its component naming prefix:
/// the layer name for boundary layers, layer plus slice for middle
/// layers, joined in PascalCase.
#[must_use]
pub fn component_dirs(locations: &[SegmentLocation]) -> Vec<ComponentDir> {
    locations
        .iter()
        .map(|location| {
            let prefix = match &location.slice {
                Some(slice) => format!("{}{}", pascal_case(&location.layer), pascal_case(slice)),
                None => pascal_case(&location.layer),
            };
            ComponentDir {
                path: location.path.clone(),
                prefix,
            }
        })
        .collect()
}

/// Remap instructions pointing page-routes and layouts at the first
/// boundary layer. Empty when no layers are declared.
#[must_use]
pub fn dir_remaps(root: &Path, layers: &Layers) -> Vec<DirRemap> {
    let Some(first) = layers.first() else {
        return Vec::new();
    };
    let base = root.join(first.name());
    vec![
        DirRemap {
            kind: RemapKind::PageRoutes,
            path: base.join("routes"),
        },
        DirRemap {
            kind: RemapKind::Layouts,
            path: base.join("layouts"),
        },
    ]
}

/// Joins a name into PascalCase on every non-alphanumeric boundary,
/// so `payments/cart` becomes `PaymentsCart` and `add-to-cart`
/// becomes `AddToCart`.
#[must_use]
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
