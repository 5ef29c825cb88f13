//! Per-page settings.

use std::{fmt, sync::Arc};

use serde::Serialize;
use serde_json::Value;
use vitrine_core::ContentQuery;

const HOME_SLUG: &str = "home";

const HOME_PAGE_QUERY: &str =
    r#"*[_type == "page" && slug.current == "home"][0] { textColor, backgroundColor }"#;

const PAGE_QUERY: &str =
    r#"*[_type == "page" && slug.current == $slug][0] { textColor, backgroundColor }"#;

/// Identifies the page document backing a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageSlug {
    /// The root path.
    Home,
    /// A top-level page.
    Slug(String),
}

impl PageSlug {
    /// Derive the slug for a route path.
    ///
    /// `/` is the home page and `/<slug>` a top-level page. Deeper paths
    /// are not backed by a page document and yield `None`. Query strings and
    /// fragments are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());

        match (segments.next(), segments.next()) {
            (None, _) => Some(Self::Home),
            (Some(slug), None) if slug == HOME_SLUG => Some(Self::Home),
            (Some(slug), None) => Some(Self::Slug(slug.to_string())),
            (Some(_), Some(_)) => None,
        }
    }

    /// The slug as stored in the backend.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => HOME_SLUG,
            Self::Slug(slug) => slug,
        }
    }

    /// Cache key for this page's settings.
    pub fn cache_key(&self) -> String {
        format!("pageSettings-{}", self.as_str())
    }

    /// Query for this page's settings.
    pub fn query(&self) -> ContentQuery {
        match self {
            Self::Home => ContentQuery::new(HOME_PAGE_QUERY),
            Self::Slug(slug) => ContentQuery::new(PAGE_QUERY).with_param("slug", slug.as_str()),
        }
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page colors with read-time defaults.
#[derive(Debug, Clone, Default)]
pub struct PageSettings {
    doc: Option<Arc<Value>>,
}

impl PageSettings {
    /// Wrap a fetched page document.
    pub fn new(doc: Option<Arc<Value>>) -> Self {
        Self { doc }
    }

    fn color(&self, key: &str, default: &str) -> String {
        self.doc
            .as_deref()
            .and_then(|doc| doc.get(key))
            .and_then(Value::as_str)
            .filter(|color| !color.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    pub fn text_color(&self) -> String {
        self.color("textColor", "#000000")
    }

    pub fn background_color(&self) -> String {
        self.color("backgroundColor", "#ffffff")
    }

    /// Whether a document was fetched.
    pub fn is_loaded(&self) -> bool {
        self.doc.is_some()
    }

    /// Snapshot of every accessor.
    pub fn resolved(&self) -> ResolvedPageSettings {
        ResolvedPageSettings {
            text_color: self.text_color(),
            background_color: self.background_color(),
        }
    }
}

/// Page settings, resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPageSettings {
    pub text_color: String,
    pub background_color: String,
}
