//! # fsd-guard-core
//!
//! Core engine for enforcing Feature-Sliced Design conventions on a
//! project tree.
//!
//! The crate models a layered source tree (`app`, `features`, `shared`,
//! and friends), discovers slices inside the middle layers, and derives
//! per-slice import restriction rules plus the build artifacts an
//! integrating host needs (aliases, auto-import directories, component
//! prefixes, directory remaps). It provides:
//!
//! - [`Config`] for the TOML-backed convention surface
//! - [`Layers`] for the validated layer model and its soft diagnostics
//! - [`RuleBuilder`] for per-slice cross-import restriction rules
//! - [`RuleRegistry`] and [`EnforcementSink`] for cycle-scoped rule
//!   publication
//! - [`SetupBuilder`] and [`Setup`] for the full planning pipeline
//! - [`ChangeWatcher`] for directory-creation driven re-setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod artifacts;
pub mod config;
pub mod host;
pub mod layers;
pub mod pattern;
pub mod registry;
pub mod rules;
pub mod scan;
pub mod setup;
pub mod watch;

pub use artifacts::{Alias, ComponentDir, DirRemap, RemapKind, SegmentLocation};
pub use config::{Config, ConfigError, ConfigIssue};
pub use host::{BuildHost, RecordingHost};
pub use layers::{Layer, Layers};
pub use pattern::{ForbiddenPattern, PatternError, ScopeGlob, CROSS_IMPORT_SEGMENT};
pub use registry::{EnforcementSink, RecordingSink, RuleBundle, RuleRegistry};
pub use rules::{RestrictionRule, RuleBuilder, SliceRules};
pub use scan::{discover_slices, Slice};
pub use setup::{Setup, SetupBuilder, SetupError, SetupPlan};
pub use watch::{ChangeWatcher, TreeEvent, WatchError};
