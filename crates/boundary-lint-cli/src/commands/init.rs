//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# boundary-lint configuration
#
# Element types are matched top-down; the first matching pattern wins.
# `*` matches one path segment and binds the next name in `capture`,
# `**` matches any number of segments and never captures.
# Imports are denied unless the first rule naming the source type allows them.

[settings]
# Imports of paths outside these globs resolve to the `external` type.
include = ["src/**"]
parallel = true

[policy]
# "error", "warning", "info" or "off"
element-types = "error"
no-unknown = "error"
no-unknown-files = "error"
no-unrooted-files = "off"

[[elements]]
type = "shared"
patterns = [
    "src/components/**",
    "src/hooks/**",
    "src/lib/**",
    "src/server/**",
]

[[elements]]
type = "feature"
capture = ["featureName"]
patterns = ["src/features/*/**"]

[[elements]]
type = "app"
capture = ["fileName"]
patterns = ["src/app/**/*"]

[[elements]]
type = "never-import"
patterns = ["src/*", "src/tasks/**"]

[[rules]]
from = ["shared"]
allow = ["shared", "external"]

[[rules]]
from = ["feature"]
allow = [
    "shared",
    "external",
    { type = "feature", captures = { featureName = "${from.featureName}" } },
]
message = "features may only import shared code and their own files"

[[rules]]
from = ["app"]
allow = [
    "shared",
    "feature",
    "external",
    { type = "app", captures = { fileName = "*.css" } },
]

[[rules]]
from = ["never-import"]
allow = ["shared", "feature", "external"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit the element types to match your source tree");
    println!("  2. Check the result: boundary-lint list-elements");
    println!("  3. Run: boundary-lint check imports.json");

    Ok(())
}
