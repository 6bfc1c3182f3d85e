//! Ledger workspace config files
//!
//! A workspace keeps its settings under `<workspace>/config/`: a shared
//! `config.toml` and an optional per-environment overlay named after
//! `EMPLEDGER_ENV` (default `development`), e.g. `config/production.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

const ENV_VAR: &str = "EMPLEDGER_ENV";
const DEFAULT_ENV: &str = "development";

/// Layer the workspace files onto `builder`, shared file first. Missing files are skipped.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
    let config_dir = workspace_root.join("config");

    let layers = [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ];
    Ok(layers
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            builder.add_source(File::from(path).required(false))
        }))
}
