//! Subcommand implementations.

pub mod check;
pub mod classify;
pub mod init;
pub mod list_elements;
pub mod output;

use boundary_lint_core::{BoundaryChecker, LoadedConfig};

use crate::config_resolver::ConfigSource;

/// Exit code for configuration problems.
const CONFIG_ERROR_EXIT: i32 = 2;

/// Loads the resolved configuration, exiting with status 2 if it is
/// missing or invalid.
pub fn load_checker(source: &ConfigSource) -> BoundaryChecker {
    let Some(path) = source.path() else {
        eprintln!("error: no boundary-lint.toml found. Run `boundary-lint init` to create one.");
        std::process::exit(CONFIG_ERROR_EXIT);
    };

    tracing::debug!(config = %source, "loading configuration");
    match LoadedConfig::from_file(path) {
        Ok(config) => BoundaryChecker::new(config),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(CONFIG_ERROR_EXIT);
        }
    }
}
