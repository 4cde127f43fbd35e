//! Path-derived patterns: scope globs and forbidden-import patterns.
//!
//! All patterns embed filesystem paths, so construction normalizes
//! separators to `/` and escapes every regex/glob metacharacter before
//! splicing path text into a pattern. The emitted pattern string is the
//! canonical artifact handed to the enforcement collaborator; matching
//! in-process uses a compiled form with identical semantics.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::path::Path;

/// The sub-path segment that marks a slice's public API for one named
/// consumer, e.g. `cart/@x/checkout` lets `checkout` import from `cart`.
pub const CROSS_IMPORT_SEGMENT: &str = "@x";

/// Errors constructing a pattern from path text.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// A scope glob failed to compile.
    #[error("invalid scope glob `{pattern}`: {reason}")]
    Glob {
        /// The offending glob.
        pattern: String,
        /// Why it failed.
        reason: String,
    },
    /// A forbidden-import pattern failed to compile.
    #[error("invalid restriction pattern `{pattern}`: {reason}")]
    Regex {
        /// The offending pattern.
        pattern: String,
        /// Why it failed.
        reason: String,
    },
}

/// Normalizes a path for embedding: lossy UTF-8, `\` becomes `/`,
/// trailing separators dropped.
#[must_use]
pub fn normalize(path: &Path) -> String {
    normalize_str(&path.to_string_lossy())
}

/// Normalizes an already-stringly path the same way as [`normalize`].
#[must_use]
pub fn normalize_str(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

// ────────────────────────────────────────────
// Scope globs
// ────────────────────────────────────────────

/// A glob anchoring a rule set to one slice's subtree.
///
/// The raw form is the plain `<root>/<layer>/<slice>/**/*` string the
/// collaborator consumes; the compiled form escapes glob metacharacters
/// in the path portion so arbitrary roots cannot derail matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeGlob {
    raw: String,
    compiled: glob::Pattern,
}

impl ScopeGlob {
    /// Builds the scope glob for one slice subtree.
    ///
    /// # Errors
    ///
    /// Returns error if the glob fails to compile even after escaping.
    pub fn for_slice(root: &str, layer: &str, slice: &str) -> Result<Self, PatternError> {
        let raw = format!("{root}/{layer}/{slice}/**/*");
        let escaped = format!(
            "{}/{}/{}/**/*",
            glob::Pattern::escape(root),
            glob::Pattern::escape(layer),
            glob::Pattern::escape(slice)
        );
        let compiled = glob::Pattern::new(&escaped).map_err(|e| PatternError::Glob {
            pattern: raw.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { raw, compiled })
    }

    /// Tests whether a file path falls inside this scope.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = normalize(path);
        if self.compiled.matches(&path_str) {
            return true;
        }
        // `**/*` requires at least one component in some glob versions;
        // accept anything strictly below the slice directory by prefix.
        if let Some(prefix) = self.raw.strip_suffix("/**/*") {
            return path_str.starts_with(prefix)
                && path_str
                    .as_bytes()
                    .get(prefix.len())
                    .is_some_and(|&b| b == b'/')
                && path_str.len() > prefix.len() + 1;
        }
        false
    }

    /// Returns the glob as handed to the collaborator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for ScopeGlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for ScopeGlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

// ────────────────────────────────────────────
// Forbidden-import patterns
// ────────────────────────────────────────────

/// A forbidden-import pattern.
///
/// The raw form is a JS-RegExp-compatible string (the sibling-slice
/// variant uses a negative lookahead). Because the `regex` crate has no
/// lookahead, matching decomposes into a base prefix plus carve-out
/// exceptions: a path is forbidden when the base matches and no
/// exception does. Both forms encode the same predicate.
#[derive(Debug, Clone)]
pub struct ForbiddenPattern {
    raw: String,
    base: Regex,
    exceptions: Vec<Regex>,
}

impl ForbiddenPattern {
    /// Pattern forbidding anything under `<root>/<layer>/`.
    ///
    /// The trailing separator keeps `<root>/application/...` from
    /// matching a layer named `app`.
    ///
    /// # Errors
    ///
    /// Returns error if the escaped pattern fails to compile.
    pub fn layer_subtree(root: &str, layer: &str) -> Result<Self, PatternError> {
        let prefix = regex::escape(&format!("{root}/{layer}"));
        let raw = format!("^{prefix}/");
        let base = compile(&raw)?;
        Ok(Self {
            raw,
            base,
            exceptions: Vec::new(),
        })
    }

    /// Pattern forbidding sibling slices of `own_slice` inside `layer`,
    /// carving out the slice itself and the `@x/<own_slice>` escape.
    ///
    /// # Errors
    ///
    /// Returns error if any escaped part fails to compile.
    pub fn sibling_slices(root: &str, layer: &str, own_slice: &str) -> Result<Self, PatternError> {
        let prefix = regex::escape(&format!("{root}/{layer}"));
        let own = regex::escape(own_slice);
        let escape_segment = CROSS_IMPORT_SEGMENT;
        let raw =
            format!("^{prefix}/(?!{own}(?:/|$)|.+/{escape_segment}/{own}(?:/|$))");
        let base = compile(&format!("^{prefix}/"))?;
        let exceptions = vec![
            compile(&format!("^{prefix}/{own}(?:/|$)"))?,
            compile(&format!("^{prefix}/.+/{escape_segment}/{own}(?:/|$)"))?,
        ];
        Ok(Self {
            raw,
            base,
            exceptions,
        })
    }

    /// Tests whether an import path is forbidden by this pattern.
    ///
    /// Separators in the candidate are normalized first, mirroring what
    /// the enforcement collaborator does to resolved module paths.
    #[must_use]
    pub fn is_match(&self, import_path: &str) -> bool {
        let candidate = normalize_str(import_path);
        self.base.is_match(&candidate) && !self.exceptions.iter().any(|e| e.is_match(&candidate))
    }

    /// Returns the pattern string as handed to the collaborator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for ForbiddenPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ForbiddenPattern {}

impl std::fmt::Display for ForbiddenPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for ForbiddenPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|e| PatternError::Regex {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
