//! Global site settings.
//!
//! [`SiteSettings`] wraps the `siteSettings` singleton exactly as the backend
//! returned it (or nothing at all, when the fetch failed). Every accessor
//! derives its value at call time and falls back to a fixed default, so
//! callers never handle a missing document.

use std::sync::Arc;

use chrono::Datelike;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use vitrine_core::ContentQuery;

use crate::{assets::AssetResolver, head::Favicon, menu::Menu};

/// Cache key for the site settings document.
pub const SITE_SETTINGS_KEY: &str = "siteSettings";

/// Token replaced with the current year in the copyright line.
pub const YEAR_TOKEN: &str = "[year]";

/// GROQ projection for the site settings singleton.
pub const SITE_SETTINGS_QUERY: &str = r#"*[_type == "siteSettings"][0] {
  maxWidth,
  logo,
  title,
  seoTitle,
  seoDescription,
  headerType,
  mobileBreakpoint,
  gutterMobile,
  gutterDesktop,
  fontSizeBodyMobile,
  fontSizeLargeMobile,
  fontSizeLogoMobile,
  fontSizeBodyDesktop,
  fontSizeLargeDesktop,
  fontSizeLogoDesktop,
  lineHeight,
  disablePreloader,
  preloaderImages[] {
    image {
      asset->
    },
    alt,
    repeatLeftRight
  },
  preloaderText,
  preloaderSvgCode,
  preloaderFontSizeMobile,
  preloaderFontSize,
  facebookShareImage {
    asset->
  },
  favicon {
    asset->
  },
  googleAnalyticsId,
  leftMenu-> {
    title,
    items[] {
      text,
      textMobile,
      link {
        type,
        page-> {
          slug {
            current
          }
        },
        url
      }
    }
  },
  rightMenu-> {
    title,
    items[] {
      text,
      textMobile,
      link {
        type,
        page-> {
          slug {
            current
          }
        },
        url
      }
    }
  },
  footerLinks,
  copyright
}"#;

/// Query for the site settings singleton.
pub fn site_settings_query() -> ContentQuery {
    ContentQuery::new(SITE_SETTINGS_QUERY)
}

/// An image shown by the preloader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloaderImage {
    /// Resolved image URL.
    pub url: String,
    /// Alternative text.
    pub alt: String,
    /// Whether the image tiles horizontally.
    pub repeat_left_right: bool,
}

/// Site settings with read-time defaults.
#[derive(Debug, Clone, Default)]
pub struct SiteSettings {
    doc: Option<Arc<Value>>,
    assets: AssetResolver,
}

impl SiteSettings {
    /// Wrap a fetched document. `None` means every accessor returns its default.
    pub fn new(doc: Option<Arc<Value>>, assets: AssetResolver) -> Self {
        Self { doc, assets }
    }

    /// Wrap a document using the default asset resolver.
    pub fn from_document(doc: Value) -> Self {
        Self::new(Some(Arc::new(doc)), AssetResolver::default())
    }

    /// The raw document, if the fetch produced one.
    pub fn document(&self) -> Option<&Arc<Value>> {
        self.doc.as_ref()
    }

    /// Whether a document was fetched.
    pub fn is_loaded(&self) -> bool {
        self.doc.is_some()
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.doc
            .as_deref()
            .and_then(|doc| doc.get(key))
            .filter(|value| !value.is_null())
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or(default).to_string()
    }

    fn number_or(&self, key: &str, default: f64) -> f64 {
        self.field(key).and_then(Value::as_f64).unwrap_or(default)
    }

    fn list(&self, key: &str) -> Vec<Value> {
        self.field(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn menu(&self, key: &str) -> Option<Menu> {
        let value = self.field(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(menu) => Some(menu),
            Err(err) => {
                debug!(key, error = %err, "ignoring malformed menu");
                None
            }
        }
    }

    pub fn max_width(&self) -> String {
        self.text_or("maxWidth", "1800px")
    }

    /// Logo as portable-text blocks.
    pub fn logo(&self) -> Vec<Value> {
        self.list("logo")
    }

    pub fn title(&self) -> String {
        self.text_or("title", "JF Design Office")
    }

    pub fn seo_title(&self) -> String {
        self.text_or("seoTitle", "JF Design Office")
    }

    pub fn seo_description(&self) -> String {
        self.text_or("seoDescription", "")
    }

    pub fn header_type(&self) -> String {
        self.text_or("headerType", "responsive")
    }

    /// Viewport width (px) below which the mobile layout applies.
    pub fn mobile_breakpoint(&self) -> f64 {
        self.number_or("mobileBreakpoint", 800.0)
    }

    pub fn gutter_mobile(&self) -> f64 {
        self.number_or("gutterMobile", 15.0)
    }

    pub fn gutter_desktop(&self) -> f64 {
        self.number_or("gutterDesktop", 20.0)
    }

    pub fn font_size_body_mobile(&self) -> f64 {
        self.number_or("fontSizeBodyMobile", 12.0)
    }

    pub fn font_size_large_mobile(&self) -> f64 {
        self.number_or("fontSizeLargeMobile", 18.0)
    }

    pub fn font_size_logo_mobile(&self) -> f64 {
        self.number_or("fontSizeLogoMobile", 14.0)
    }

    pub fn font_size_body_desktop(&self) -> f64 {
        self.number_or("fontSizeBodyDesktop", 16.0)
    }

    pub fn font_size_large_desktop(&self) -> f64 {
        self.number_or("fontSizeLargeDesktop", 22.0)
    }

    pub fn font_size_logo_desktop(&self) -> f64 {
        self.number_or("fontSizeLogoDesktop", 40.0)
    }

    pub fn line_height(&self) -> f64 {
        self.number_or("lineHeight", 1.1)
    }

    /// True only when the stored flag is exactly `true`.
    pub fn disable_preloader(&self) -> bool {
        self.field("disablePreloader").and_then(Value::as_bool) == Some(true)
    }

    /// Preloader images with resolved URLs. Entries without a usable image
    /// are skipped.
    pub fn preloader_images(&self) -> Vec<PreloaderImage> {
        self.list("preloaderImages")
            .iter()
            .filter_map(|entry| {
                let url = self.assets.resolve_optional(entry.get("image"))?;
                Some(PreloaderImage {
                    url,
                    alt: entry
                        .get("alt")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    repeat_left_right: entry
                        .get("repeatLeftRight")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                })
            })
            .collect()
    }

    pub fn preloader_text(&self) -> Vec<Value> {
        self.list("preloaderText")
    }

    /// Inline SVG markup for the preloader, if any.
    pub fn preloader_svg_code(&self) -> Option<String> {
        self.text("preloaderSvgCode").map(str::to_string)
    }

    pub fn preloader_font_size_mobile(&self) -> f64 {
        self.number_or("preloaderFontSizeMobile", 20.0)
    }

    pub fn preloader_font_size(&self) -> f64 {
        self.number_or("preloaderFontSize", 40.0)
    }

    /// Open Graph share image URL.
    pub fn facebook_share_image(&self) -> Option<String> {
        self.assets
            .resolve_optional(self.field("facebookShareImage"))
    }

    pub fn left_menu(&self) -> Option<Menu> {
        self.menu("leftMenu")
    }

    pub fn right_menu(&self) -> Option<Menu> {
        self.menu("rightMenu")
    }

    pub fn footer_links(&self) -> Vec<Value> {
        self.list("footerLinks")
    }

    /// Copyright line with `[year]` replaced by the current year.
    pub fn copyright(&self) -> String {
        self.copyright_for_year(chrono::Local::now().year())
    }

    /// Copyright line with `[year]` replaced by `year`.
    pub fn copyright_for_year(&self, year: i32) -> String {
        substitute_year(self.text("copyright").unwrap_or_default(), year)
    }

    pub fn favicon(&self) -> Option<Favicon> {
        self.field("favicon").and_then(Favicon::from_field)
    }

    /// Analytics measurement id.
    pub fn google_analytics_id(&self) -> Option<String> {
        self.text("googleAnalyticsId")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Snapshot of every accessor.
    pub fn resolved(&self) -> ResolvedSiteSettings {
        ResolvedSiteSettings {
            max_width: self.max_width(),
            logo: self.logo(),
            title: self.title(),
            seo_title: self.seo_title(),
            seo_description: self.seo_description(),
            header_type: self.header_type(),
            mobile_breakpoint: self.mobile_breakpoint(),
            gutter_mobile: self.gutter_mobile(),
            gutter_desktop: self.gutter_desktop(),
            font_size_body_mobile: self.font_size_body_mobile(),
            font_size_large_mobile: self.font_size_large_mobile(),
            font_size_logo_mobile: self.font_size_logo_mobile(),
            font_size_body_desktop: self.font_size_body_desktop(),
            font_size_large_desktop: self.font_size_large_desktop(),
            font_size_logo_desktop: self.font_size_logo_desktop(),
            line_height: self.line_height(),
            disable_preloader: self.disable_preloader(),
            preloader_images: self.preloader_images(),
            preloader_text: self.preloader_text(),
            preloader_svg_code: self.preloader_svg_code(),
            preloader_font_size_mobile: self.preloader_font_size_mobile(),
            preloader_font_size: self.preloader_font_size(),
            facebook_share_image: self.facebook_share_image(),
            left_menu: self.left_menu(),
            right_menu: self.right_menu(),
            footer_links: self.footer_links(),
            copyright: self.copyright(),
            favicon: self.favicon(),
            google_analytics_id: self.google_analytics_id(),
        }
    }
}

/// Replace every `[year]` token in `text`.
pub fn substitute_year(text: &str, year: i32) -> String {
    text.replace(YEAR_TOKEN, &year.to_string())
}

/// Every site setting, resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSiteSettings {
    pub max_width: String,
    pub logo: Vec<Value>,
    pub title: String,
    pub seo_title: String,
    pub seo_description: String,
    pub header_type: String,
    pub mobile_breakpoint: f64,
    pub gutter_mobile: f64,
    pub gutter_desktop: f64,
    pub font_size_body_mobile: f64,
    pub font_size_large_mobile: f64,
    pub font_size_logo_mobile: f64,
    pub font_size_body_desktop: f64,
    pub font_size_large_desktop: f64,
    pub font_size_logo_desktop: f64,
    pub line_height: f64,
    pub disable_preloader: bool,
    pub preloader_images: Vec<PreloaderImage>,
    pub preloader_text: Vec<Value>,
    pub preloader_svg_code: Option<String>,
    pub preloader_font_size_mobile: f64,
    pub preloader_font_size: f64,
    pub facebook_share_image: Option<String>,
    pub left_menu: Option<Menu>,
    pub right_menu: Option<Menu>,
    pub footer_links: Vec<Value>,
    pub copyright: String,
    pub favicon: Option<Favicon>,
    pub google_analytics_id: Option<String>,
}
