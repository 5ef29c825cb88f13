//! Navigation menus referenced from site settings.

use serde::{Deserialize, Deserializer, Serialize};

/// A navigation menu document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Menu title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Menu entries in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<MenuItem>,
}

/// A single menu entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Label shown on desktop.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Optional shorter label for small screens.
    #[serde(default)]
    pub text_mobile: Option<String>,

    /// Link target.
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: MenuLink,
}

impl MenuItem {
    /// Label to show for the given layout.
    pub fn label(&self, mobile: bool) -> &str {
        match &self.text_mobile {
            Some(short) if mobile && !short.is_empty() => short,
            _ => &self.text,
        }
    }

    /// Resolved `href` for this item.
    pub fn href(&self) -> Option<String> {
        self.link.href()
    }
}

/// Where a menu entry points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", from = "LinkDocument")]
pub enum MenuLink {
    /// A page on this site, by slug.
    Internal { slug: String },
    /// An absolute URL elsewhere.
    External { url: String },
    /// No usable target.
    #[default]
    None,
}

impl MenuLink {
    /// Site-relative path or absolute URL for this link.
    pub fn href(&self) -> Option<String> {
        match self {
            Self::Internal { slug } if slug == "home" => Some("/".to_string()),
            Self::Internal { slug } => Some(format!("/{slug}")),
            Self::External { url } => Some(url.clone()),
            Self::None => None,
        }
    }
}

/// Link shape as stored in the backend.
#[derive(Debug, Default, Deserialize)]
struct LinkDocument {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    page: Option<PageReference>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PageReference {
    #[serde(default)]
    slug: Option<SlugField>,
}

#[derive(Debug, Default, Deserialize)]
struct SlugField {
    #[serde(default)]
    current: Option<String>,
}

impl From<LinkDocument> for MenuLink {
    fn from(doc: LinkDocument) -> Self {
        let slug = doc
            .page
            .and_then(|page| page.slug)
            .and_then(|slug| slug.current)
            .filter(|slug| !slug.is_empty());
        let url = doc.url.filter(|url| !url.is_empty());

        let internal = slug.map(|slug| Self::Internal { slug });
        let external = url.map(|url| Self::External { url });

        let resolved = match doc.kind.as_deref() {
            Some("external") => external.or(internal),
            _ => internal.or(external),
        };
        resolved.unwrap_or_default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
