//! Restriction rule derivation.
//!
//! For every discovered slice, two policies apply: no imports from
//! layers declared before the slice's own layer, and no imports from
//! sibling slices except through the `@x/<consumer>` public API.
//! Boundary layers carry no slices and therefore no rules.

use crate::layers::Layers;
use crate::pattern::{self, ForbiddenPattern, PatternError, ScopeGlob};
use crate::scan::Slice;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Violation message for imports reaching into a higher layer.
pub const CROSS_LAYER_MESSAGE: &str = "cross-imports from higher layers are not allowed.";

/// Violation message for imports reaching into a sibling slice.
pub const CROSS_SLICE_MESSAGE: &str =
    "cross-imports from different slices in the same layer are not allowed; \
     use the public-API escape instead.";

/// One derived restriction: files in `scope` must not import paths
/// matching `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictionRule {
    /// Subtree the rule applies to.
    pub scope: ScopeGlob,
    /// Forbidden import paths.
    pub pattern: ForbiddenPattern,
    /// Message reported by the enforcement collaborator on violation.
    pub message: &'static str,
}

/// All rules protecting one slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceRules {
    /// The protected slice.
    pub slice: Slice,
    /// Higher-layer rules in layer order, then the sibling-slice rule.
    pub rules: Vec<RestrictionRule>,
}

/// Derives restriction rules from the layer model and discovered slices.
#[derive(Debug)]
pub struct RuleBuilder<'a> {
    root: String,
    layers: &'a Layers,
}

impl<'a> RuleBuilder<'a> {
    /// Creates a builder for the given tree root and layer model.
    #[must_use]
    pub fn new(root: &Path, layers: &'a Layers) -> Self {
        Self {
            root: pattern::normalize(root),
            layers,
        }
    }

    /// Derives the rule set for a single slice.
    ///
    /// # Errors
    ///
    /// Returns error if a pattern fails to compile after escaping.
    pub fn rules_for(&self, slice: &Slice) -> Result<SliceRules, PatternError> {
        let layer = slice.layer();
        let scope = ScopeGlob::for_slice(&self.root, layer.name(), slice.name())?;

        let previous = self.layers.before(layer.index());
        let mut rules = Vec::with_capacity(previous.len() + 1);
        for higher in previous {
            rules.push(RestrictionRule {
                scope: scope.clone(),
                pattern: ForbiddenPattern::layer_subtree(&self.root, higher.name())?,
                message: CROSS_LAYER_MESSAGE,
            });
        }
        rules.push(RestrictionRule {
            scope,
            pattern: ForbiddenPattern::sibling_slices(&self.root, layer.name(), slice.name())?,
            message: CROSS_SLICE_MESSAGE,
        });

        debug!(slice = %slice, rules = rules.len(), "rules derived");
        Ok(SliceRules {
            slice: slice.clone(),
            rules,
        })
    }

    /// Derives rules for every slice, preserving slice order.
    ///
    /// # Errors
    ///
    /// Returns the first pattern construction failure.
    pub fn derive_all(&self, slices: &[Slice]) -> Result<Vec<SliceRules>, PatternError> {
        slices.iter().map(|slice| self.rules_for(slice)).collect()
    }
}
