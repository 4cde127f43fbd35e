//! Plan command implementation.

use anyhow::{Context, Result};
use fsd_guard_core::Setup;
use std::path::Path;

use crate::config_resolver;
use crate::OutputFormat;

/// Runs the plan command.
pub fn run(path: &Path, format: OutputFormat, explicit_config: Option<&Path>) -> Result<()> {
    let (config, _source) = config_resolver::load(path, explicit_config)?;

    let setup = Setup::builder()
        .project_dir(path)
        .config(config)
        .build()
        .context("Failed to resolve the tree root")?;

    let plan = setup.plan().context("Setup planning failed")?;

    super::output::print(&plan, format)?;

    Ok(())
}
