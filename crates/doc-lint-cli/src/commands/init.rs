//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# doc-lint configuration

# Lowest severity that fails the run: "error", "warning" or "convention"
fail_on_severity = "warning"

# Fail when documentation coverage drops below this percentage
# min_coverage = 90.0

[all_validators]
# Options passed to yard; "--private" or "--protected" also make
# in-process validators inspect non-public objects
tool_options = []

# Glob patterns to exclude from analysis
exclude = [
    "vendor/**",
    "spec/**",
]

# Validator configurations
# Each validator can be enabled/disabled and have its severity overridden

[validators."Documentation/UndocumentedObjects"]
enabled = true
# severity = "warning"  # Override default severity
excluded_methods = ["initialize", "/^_/"]

[validators."Tags/Order"]
enabled = true
enforced_order = ["param", "option", "yield", "yieldparam", "yieldreturn", "return", "raise"]

[validators."Warnings/UnknownTag"]
enabled = true

[validators."Warnings/UnknownParameterName"]
enabled = true
"#;

/// Name of the configuration file written by `init`.
const CONFIG_FILE: &str = "doc-lint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure validators");
    println!("  2. Run: doc-lint check --registry .yardoc/registry.json");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
