//! Watch command implementation.
//!
//! Runs one setup cycle, then keeps watching the tree root. Every
//! qualifying directory creation triggers a full re-plan under a fresh
//! cycle number; nothing is patched incrementally.

use anyhow::{Context, Result};
use fsd_guard_core::{
    ChangeWatcher, EnforcementSink, Layers, RecordingHost, RecordingSink, RuleRegistry, Setup,
};
use std::path::Path;

use crate::config_resolver;

/// Runs the watch command.
pub fn run(path: &Path, explicit_config: Option<&Path>) -> Result<()> {
    let (config, _source) = config_resolver::load(path, explicit_config)?;

    let setup = Setup::builder()
        .project_dir(path)
        .config(config)
        .build()
        .context("Failed to resolve the tree root")?;

    let mut registry = RuleRegistry::new();
    let mut host = RecordingHost::new();
    let mut sink = RecordingSink::new();

    run_cycle(&setup, &mut registry, &mut host, &mut sink)?;

    // Config issues were already surfaced by the first cycle.
    let (layers, _) = Layers::resolve(&setup.config().layers);
    let watcher = ChangeWatcher::new(setup.root(), layers)
        .context("Failed to start the directory watcher")?;

    tracing::info!("Watching {} for new directories", setup.root().display());

    watcher.run(|event| {
        tracing::info!("Tree changed: {event:?}");
        if let Err(e) = run_cycle(&setup, &mut registry, &mut host, &mut sink) {
            tracing::error!("Re-setup failed: {e:#}");
        }
    });

    Ok(())
}

fn run_cycle(
    setup: &Setup,
    registry: &mut RuleRegistry,
    host: &mut RecordingHost,
    sink: &mut RecordingSink,
) -> Result<()> {
    host.clear();
    let mut sinks: [&mut dyn EnforcementSink; 1] = [sink];
    let plan = setup
        .run_cycle(registry, host, &mut sinks)
        .context("Setup cycle failed")?;

    tracing::info!(
        "Cycle {}: {} slice(s), {} rule(s)",
        registry.cycle(),
        plan.slices.len(),
        plan.rule_count()
    );

    Ok(())
}
