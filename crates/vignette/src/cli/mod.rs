//! Command implementations.

pub mod build;
pub mod config;

use std::path::Path;
use vignette_core::Config;

/// Load configuration from `path` if given, otherwise from the default
/// location.
///
/// An explicit path must exist and parse. A broken default config only
/// warns and falls back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `vignette config path`."
                );
                Ok(Config::default())
            }
        },
    }
}
