//! Vitrine Content Library
//!
//! Read-only access to the headless content backend.
//!
//! # Modules
//!
//! - [`source`] - Backend clients (direct and relay) behind one trait
//! - [`assets`] - Asset reference to CDN URL resolution
//! - [`settings`] - Global site settings with read-time defaults
//! - [`page`] - Per-page settings and route slugs
//! - [`menu`] - Navigation menus referenced from site settings
//! - [`resolver`] - Cached, deduplicated settings fetching
//! - [`head`] - Favicon and analytics tags derived from settings

pub mod assets;
pub mod error;
pub mod head;
pub mod menu;
pub mod page;
pub mod resolver;
pub mod settings;
pub mod source;

pub use assets::{AssetRef, AssetResolver, ImageReference};
pub use error::{Result, SourceError};
pub use head::{AnalyticsQueue, Favicon, GtagCommand, HeadTags};
pub use menu::{Menu, MenuItem, MenuLink};
pub use page::{PageSettings, PageSlug, ResolvedPageSettings};
pub use resolver::SettingsResolver;
pub use settings::{PreloaderImage, ResolvedSiteSettings, SiteSettings};
pub use source::{ContentSource, DirectSource, RelaySource, SourceMode, build_source};
