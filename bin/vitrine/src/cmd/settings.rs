//! Settings command - resolve global site settings

use std::path::Path;

use color_eyre::eyre::Result;
use vitrine_content::{HeadTags, SettingsResolver};

/// Run the settings command.
///
/// Prints every setting with defaults applied, and optionally the head tags
/// derived from them.
pub async fn run(config_path: &Path, relay: bool, head: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let resolver = SettingsResolver::for_mode(&config, super::source_mode(relay));

    let settings = resolver.site_settings().await;
    if !settings.is_loaded() {
        eprintln!("  ⚠ No site settings document, showing defaults");
    }

    super::print_json(&settings.resolved())?;

    if head {
        let tags = HeadTags::from_settings(&settings, chrono::Utc::now());
        println!();
        println!("{}", tags.render());
    }

    Ok(())
}
