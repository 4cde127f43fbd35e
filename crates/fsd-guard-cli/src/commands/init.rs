//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# fsd-guard configuration
# See https://github.com/fsd-tools/fsd-guard for documentation

[fsd]
# Directory the layer tree lives under, joined to the project
# directory when relative
# root = "src"

# Ordered layers. The first and last entries are boundary layers:
# they carry segments directly and are never sliced.
layers = ["app", "pages", "widgets", "features", "entities", "shared"]

# Segment directories scanned inside slices and boundary layers
segments = ["ui", "model", "api", "lib", "config"]

# Prefix prepended to every generated alias name, e.g. "~" gives "~features"
# alias_prefix = ""

# Set to false to skip restriction-rule derivation entirely
# prevent_cross_imports = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("fsd-guard.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created fsd-guard.toml");
    println!("\nNext steps:");
    println!("  1. Edit fsd-guard.toml to match your layer and segment names");
    println!("  2. Run: fsd-guard plan");

    Ok(())
}
