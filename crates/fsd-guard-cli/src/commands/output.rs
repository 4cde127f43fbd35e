//! Shared output formatting for setup plans.

use anyhow::Result;
use fsd_guard_core::SetupPlan;

use crate::OutputFormat;

/// Print a setup plan in the specified format.
pub fn print(plan: &SetupPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(plan),
        OutputFormat::Json => return print_json(plan),
        OutputFormat::Compact => print_compact(plan),
    }
    Ok(())
}

fn print_text(plan: &SetupPlan) {
    for issue in &plan.issues {
        println!("\x1b[33mwarning\x1b[0m: {issue}");
    }
    if !plan.issues.is_empty() {
        println!();
    }

    println!("root: {}", plan.root.display());

    println!("\naliases:");
    for alias in &plan.aliases {
        println!("  {} -> {}", alias.name, alias.path.display());
    }

    if !plan.import_dirs.is_empty() {
        println!("\nauto-import dirs:");
        for location in &plan.import_dirs {
            println!("  {}", location.path.display());
        }
    }

    if !plan.component_dirs.is_empty() {
        println!("\ncomponent dirs:");
        for dir in &plan.component_dirs {
            println!("  {} (prefix {})", dir.path.display(), dir.prefix);
        }
    }

    println!("\nremaps:");
    for remap in &plan.remaps {
        println!("  {} -> {}", remap.kind, remap.path.display());
    }

    println!("\nrules:");
    for slice_rules in &plan.rules {
        println!(
            "  {} ({} rules)",
            slice_rules.slice,
            slice_rules.rules.len()
        );
        for rule in &slice_rules.rules {
            println!("    deny {}", rule.pattern.as_str());
        }
    }

    let summary_color = if plan.issues.is_empty() {
        "\x1b[32m"
    } else {
        "\x1b[33m"
    };
    println!(
        "\n{}{} slice(s), {} rule(s), {} alias(es), {} issue(s)\x1b[0m",
        summary_color,
        plan.slices.len(),
        plan.rule_count(),
        plan.aliases.len(),
        plan.issues.len()
    );
}

fn print_json(plan: &SetupPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    println!("{json}");
    Ok(())
}

fn print_compact(plan: &SetupPlan) {
    for slice_rules in &plan.rules {
        for rule in &slice_rules.rules {
            println!("{}: deny {}", slice_rules.slice, rule.pattern.as_str());
        }
    }
}
