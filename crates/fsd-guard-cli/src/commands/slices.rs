//! Slices command implementation.

use anyhow::{Context, Result};
use fsd_guard_core::Setup;
use std::path::Path;

use crate::config_resolver;

/// Runs the slices command.
pub fn run(path: &Path, explicit_config: Option<&Path>) -> Result<()> {
    let (config, _source) = config_resolver::load(path, explicit_config)?;

    let setup = Setup::builder()
        .project_dir(path)
        .config(config)
        .build()
        .context("Failed to resolve the tree root")?;

    let plan = setup.plan().context("Setup planning failed")?;

    if plan.slices.is_empty() {
        println!("No slices found under {}", plan.root.display());
        return Ok(());
    }

    // Scan order is layer-major, so a simple header-on-change walk
    // groups slices by layer.
    let mut current_layer = "";
    for slice in &plan.slices {
        if slice.layer().name() != current_layer {
            current_layer = slice.layer().name();
            println!("{current_layer}:");
        }
        println!("  {}", slice.name());
    }

    println!("\n{} slice(s) in {}", plan.slices.len(), plan.root.display());

    Ok(())
}
