//! One synchronous setup cycle.
//!
//! A cycle runs the whole chain to completion: resolve the layer model,
//! scan slices, derive rules, assemble artifacts. The result is an
//! immutable [`SetupPlan`]; a fresh cycle supersedes the previous one
//! wholesale instead of mutating anything in place.

use crate::artifacts::{self, Alias, ComponentDir, DirRemap, SegmentLocation};
use crate::config::{Config, ConfigIssue};
use crate::host::BuildHost;
use crate::layers::{self, Layers};
use crate::pattern::PatternError;
use crate::registry::{EnforcementSink, RuleRegistry};
use crate::rules::{RuleBuilder, SliceRules};
use crate::scan::{self, Slice};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Errors preparing or running a setup cycle.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The project directory could not be resolved.
    #[error("failed to resolve project directory: {source}")]
    Io {
        /// Underlying IO error.
        #[from]
        source: std::io::Error,
    },
    /// A derived pattern failed to build.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A configured engine bound to one tree root.
#[derive(Debug, Clone)]
pub struct Setup {
    config: Config,
    root: PathBuf,
}

/// Builder for [`Setup`].
#[derive(Debug, Default)]
pub struct SetupBuilder {
    project_dir: Option<PathBuf>,
    config: Option<Config>,
}

impl SetupBuilder {
    /// Creates a builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project directory the configured root is joined to.
    /// Defaults to the current working directory.
    #[must_use]
    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    /// Sets the configuration. Defaults to [`Config::default`].
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Resolves the tree root and builds the engine.
    ///
    /// The root is not required to exist; a missing tree simply yields an
    /// empty plan.
    ///
    /// # Errors
    ///
    /// Returns error if no project directory was given and the current
    /// directory cannot be determined.
    pub fn build(self) -> Result<Setup, SetupError> {
        let config = self.config.unwrap_or_default();
        let project_dir = match self.project_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let root = if config.root.is_absolute() {
            config.root.clone()
        } else {
            project_dir.join(&config.root)
        };
        Ok(Setup { config, root })
    }
}

impl Setup {
    /// Starts building an engine.
    #[must_use]
    pub fn builder() -> SetupBuilder {
        SetupBuilder::new()
    }

    /// Returns the absolute layer-tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes one cycle's plan without touching any collaborator.
    ///
    /// Configuration issues are logged and carried in the plan; the
    /// cycle continues with the configuration as declared.
    ///
    /// # Errors
    ///
    /// Returns error if a derived pattern fails to compile.
    pub fn plan(&self) -> Result<SetupPlan, SetupError> {
        let (layers, mut issues) = Layers::resolve(&self.config.layers);
        issues.extend(layers::check_segments(&self.config.segments));
        for issue in &issues {
            error!(%issue, "configuration issue");
        }

        let slices = scan::discover_slices(&self.root, &layers);
        let rules = if self.config.prevent_cross_imports {
            RuleBuilder::new(&self.root, &layers).derive_all(&slices)?
        } else {
            Vec::new()
        };

        let aliases = artifacts::alias_map(&self.root, &layers, &self.config.alias_prefix);
        let import_dirs =
            artifacts::segment_locations(&self.root, &layers, &slices, &self.config.segments);
        let component_dirs = artifacts::component_dirs(&import_dirs);
        let remaps = artifacts::dir_remaps(&self.root, &layers);

        info!(
            slices = slices.len(),
            rules = rules.iter().map(|r| r.rules.len()).sum::<usize>(),
            issues = issues.len(),
            "setup cycle planned"
        );

        Ok(SetupPlan {
            root: self.root.clone(),
            issues,
            slices,
            aliases,
            import_dirs,
            component_dirs,
            remaps,
            rules,
        })
    }

    /// Runs one full cycle: plan, install artifacts, publish rules.
    ///
    /// # Errors
    ///
    /// Returns error if planning fails; installation itself is
    /// infallible on this side of the host boundary.
    pub fn run_cycle(
        &self,
        registry: &mut RuleRegistry,
        host: &mut dyn BuildHost,
        sinks: &mut [&mut dyn EnforcementSink],
    ) -> Result<SetupPlan, SetupError> {
        let plan = self.plan()?;
        plan.install(host);
        registry.publish(&plan.rules, sinks);
        Ok(plan)
    }
}

/// Everything one setup cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupPlan {
    /// The absolute tree root the plan was computed against.
    pub root: PathBuf,
    /// Soft configuration diagnostics.
    pub issues: Vec<ConfigIssue>,
    /// Slices discovered this cycle.
    pub slices: Vec<Slice>,
    /// Module-resolution aliases, one per layer.
    pub aliases: Vec<Alias>,
    /// Existing segment directories for auto-import registration.
    pub import_dirs: Vec<SegmentLocation>,
    /// Component directories with naming prefixes.
    pub component_dirs: Vec<ComponentDir>,
    /// Directory remap instructions.
    pub remaps: Vec<DirRemap>,
    /// Per-slice restriction rules.
    pub rules: Vec<SliceRules>,
}

impl SetupPlan {
    /// Hands every artifact to the host in plan order.
    pub fn install(&self, host: &mut dyn BuildHost) {
        for alias in &self.aliases {
            host.register_alias(&alias.name, &alias.path);
        }
        let dirs: Vec<PathBuf> = self.import_dirs.iter().map(|l| l.path.clone()).collect();
        host.register_import_dirs(&dirs);
        for dir in &self.component_dirs {
            host.register_component_dir(dir);
        }
        for remap in &self.remaps {
            host.remap_directory(remap);
        }
    }

    /// Total number of restriction rules across all slices.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.iter().map(|r| r.rules.len()).sum()
    }
}
