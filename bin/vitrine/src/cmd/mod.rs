//! Command implementations.

pub mod asset;
pub mod page;
pub mod query;
pub mod serve;
pub mod settings;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use vitrine_content::SourceMode;
use vitrine_core::Config;

/// Load configuration for a command. A missing file means defaults.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Adapter for a command run with or without `--relay`.
pub fn source_mode(relay: bool) -> SourceMode {
    SourceMode::for_context(!relay)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to encode output")?;
    println!("{json}");
    Ok(())
}
