//! Page command - resolve settings for a route

use std::path::Path;

use color_eyre::eyre::Result;
use vitrine_content::{PageSlug, SettingsResolver};

/// Run the page command.
pub async fn run(config_path: &Path, path: &str, relay: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let resolver = SettingsResolver::for_mode(&config, super::source_mode(relay));

    let slug = PageSlug::from_path(path);
    match &slug {
        Some(slug) => tracing::info!(%slug, key = %slug.cache_key(), "Resolving page settings"),
        None => eprintln!("  ⚠ '{path}' is not backed by a page document, showing defaults"),
    }

    let page = resolver.page_settings(slug.as_ref()).await;
    if slug.is_some() && !page.is_loaded() {
        eprintln!("  ⚠ No page document found, showing defaults");
    }

    super::print_json(&page.resolved())
}
