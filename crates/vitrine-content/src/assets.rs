//! Asset reference resolution.
//!
//! Content documents point at images in several shapes: a bare URL, a
//! dereferenced asset carrying `url`, or an opaque reference id such as
//! `image-abc123-1920x1080-jpg`. [`AssetResolver`] turns any of them into a
//! single fetchable URL and never fails; unusable input yields `""`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;
use vitrine_core::ContentConfig;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"image-([^-]+)-([0-9]+)x([0-9]+)-([A-Za-z0-9_]+)")
        .expect("asset reference pattern is valid")
});

/// Keys that may carry an opaque reference id, in lookup order.
const REFERENCE_KEYS: [&str; 4] = ["_id", "_ref", "id", "ref"];

/// Parts of an `image-<id>-<w>x<h>-<ext>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Asset hash.
    pub asset_id: String,
    /// Pixel width, as written in the reference.
    pub width: String,
    /// Pixel height, as written in the reference.
    pub height: String,
    /// File extension.
    pub extension: String,
}

impl ImageReference {
    /// Parse a reference string, returning `None` when it does not match.
    pub fn parse(reference: &str) -> Option<Self> {
        let caps = REFERENCE_PATTERN.captures(reference)?;
        Some(Self {
            asset_id: caps[1].to_string(),
            width: caps[2].to_string(),
            height: caps[3].to_string(),
            extension: caps[4].to_string(),
        })
    }
}

/// An asset reference in any of the shapes the backend produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// A URL string.
    Url(String),
    /// A dereferenced asset with a URL.
    Resolved { url: String },
    /// An opaque image reference.
    Reference(ImageReference),
    /// Nothing usable.
    Missing,
}

impl AssetRef {
    /// Classify an arbitrary JSON value.
    ///
    /// Objects are searched for `url` first, then for a reference id. Image
    /// fields that wrap the asset under an `asset` key are unwrapped.
    /// Members of the wrong JSON type count as absent.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(url) if !url.is_empty() => Self::Url(url.clone()),
            Value::Object(map) => {
                if let Some(url) = map
                    .get("url")
                    .and_then(Value::as_str)
                    .filter(|url| !url.is_empty())
                {
                    return Self::Resolved {
                        url: url.to_string(),
                    };
                }

                let reference = REFERENCE_KEYS
                    .iter()
                    .filter_map(|key| map.get(*key).and_then(Value::as_str))
                    .find_map(ImageReference::parse);
                if let Some(reference) = reference {
                    return Self::Reference(reference);
                }

                map.get("asset").map_or(Self::Missing, Self::from_value)
            }
            _ => Self::Missing,
        }
    }

    /// Whether this reference resolves to a non-empty URL.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<&Value> for AssetRef {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

/// Builds CDN URLs for asset references.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    content: ContentConfig,
}

impl AssetResolver {
    /// Create a resolver for the configured project and dataset.
    pub fn new(content: &ContentConfig) -> Self {
        Self {
            content: content.clone(),
        }
    }

    /// Resolve a reference to a URL, or `""` when there is nothing to resolve.
    pub fn resolve(&self, asset: &AssetRef) -> String {
        match asset {
            AssetRef::Url(url) | AssetRef::Resolved { url } => url.clone(),
            AssetRef::Reference(image) => self.content.image_url(
                &image.asset_id,
                &image.width,
                &image.height,
                &image.extension,
            ),
            AssetRef::Missing => String::new(),
        }
    }

    /// Classify and resolve a JSON value in one step.
    pub fn resolve_value(&self, value: &Value) -> String {
        let asset = AssetRef::from_value(value);
        if asset.is_missing() && !value.is_null() {
            warn!(%value, "could not extract image URL from asset");
        }
        self.resolve(&asset)
    }

    /// Like [`resolve_value`](Self::resolve_value), but `None` instead of `""`.
    pub fn resolve_optional(&self, value: Option<&Value>) -> Option<String> {
        value
            .map(|value| self.resolve_value(value))
            .filter(|url| !url.is_empty())
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(&ContentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolver() -> AssetResolver {
        AssetResolver::default()
    }

    #[test]
    fn test_string_passes_through() {
        assert_eq!(
            resolver().resolve_value(&json!("https://example.com/a.png")),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_url_field_wins_over_reference() {
        let asset = json!({
            "url": "https://cdn.sanity.io/images/x/y/direct.png",
            "_id": "image-abc-10x20-png"
        });
        assert_eq!(
            resolver().resolve_value(&asset),
            "https://cdn.sanity.io/images/x/y/direct.png"
        );
    }

    #[test]
    fn test_reference_builds_cdn_url() {
        let asset = json!({"_id": "image-abc123-1920x1080-jpg"});
        assert_eq!(
            resolver().resolve_value(&asset),
            "https://cdn.sanity.io/images/kpljrloc/production/abc123-1920x1080.jpg"
        );
    }

    #[test]
    fn test_reference_keys_are_all_checked() {
        for key in REFERENCE_KEYS {
            let asset = json!({ key: "image-f00-4x3-webp" });
            let url = resolver().resolve_value(&asset);
            assert!(url.ends_with("/f00-4x3.webp"), "{key} gave {url}");
        }
    }

    #[test]
    fn test_wrapped_asset_is_unwrapped() {
        let image = json!({"asset": {"_ref": "image-abc-100x50-png"}, "alt": "logo"});
        assert_eq!(
            resolver().resolve_value(&image),
            "https://cdn.sanity.io/images/kpljrloc/production/abc-100x50.png"
        );
    }

    #[test]
    fn test_empty_url_falls_through_to_reference() {
        let asset = json!({"url": "", "_id": "image-abc-1x1-gif"});
        assert!(resolver().resolve_value(&asset).ends_with("abc-1x1.gif"));
    }

    #[test]
    fn test_malformed_inputs_resolve_to_empty() {
        let inputs = [
            json!(null),
            json!(""),
            json!(42),
            json!(true),
            json!([]),
            json!({}),
            json!({"url": 7}),
            json!({"_id": "file-abc-pdf"}),
            json!({"_id": "image-abc-widexhigh-png"}),
            json!({"_ref": ["image-abc-1x1-png"]}),
        ];
        for input in inputs {
            assert_eq!(resolver().resolve_value(&input), "", "input {input}");
        }
    }

    #[test]
    fn test_parse_reference() {
        let reference = ImageReference::parse("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg")
            .expect("reference");
        assert_eq!(reference.asset_id, "Tb9Ew8CXIwaY6R1kjMvI0uRR");
        assert_eq!(reference.width, "2000");
        assert_eq!(reference.height, "3000");
        assert_eq!(reference.extension, "jpg");
    }

    #[test]
    fn test_reference_digits_are_ascii_only() {
        assert_eq!(ImageReference::parse("image-a-\u{661}\u{662}x3-png"), None);
        assert_eq!(
            resolver().resolve_value(&json!({"_ref": "image-a-\u{661}\u{662}x3-png"})),
            ""
        );
    }

    #[test]
    fn test_resolver_uses_configured_dataset() {
        let content = ContentConfig {
            project_id: "go8920y3".to_string(),
            dataset: "staging".to_string(),
            ..ContentConfig::default()
        };
        let url = AssetResolver::new(&content).resolve_value(&json!({"_id": "image-a-1x2-png"}));
        assert_eq!(url, "https://cdn.sanity.io/images/go8920y3/staging/a-1x2.png");
    }

    #[test]
    fn test_resolve_optional() {
        assert_eq!(resolver().resolve_optional(None), None);
        assert_eq!(resolver().resolve_optional(Some(&json!({}))), None);
        assert_eq!(
            resolver().resolve_optional(Some(&json!("https://x/y.png"))),
            Some("https://x/y.png".to_string())
        );
    }
}
