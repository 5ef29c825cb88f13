//! Asset command - resolve an asset reference to a URL

use std::path::Path;

use color_eyre::eyre::Result;
use serde_json::Value;
use vitrine_content::AssetResolver;

/// Run the asset command.
///
/// `input` is asset JSON or a plain URL.
pub fn run(config_path: &Path, input: &str) -> Result<()> {
    let config = super::load_config(config_path)?;
    let resolver = AssetResolver::new(&config.content);

    let url = resolver.resolve_value(&parse_input(input));
    if url.is_empty() {
        eprintln!("  ✗ Could not resolve asset");
    } else {
        println!("{url}");
    }
    Ok(())
}

/// Read `input` as JSON, falling back to a bare string.
pub fn parse_input(input: &str) -> Value {
    match serde_json::from_str::<Value>(input) {
        Ok(value) if value.is_object() || value.is_string() => value,
        _ => Value::String(input.to_string()),
    }
}
