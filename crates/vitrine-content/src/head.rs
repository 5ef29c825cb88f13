//! Document head tags derived from site settings.
//!
//! Covers the favicon link and the analytics bootstrap. The analytics command
//! queue is an owned [`AnalyticsQueue`] value instead of a window global.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::settings::SiteSettings;

/// Analytics loader script base URL.
const GTAG_SCRIPT_BASE: &str = "https://www.googletagmanager.com/gtag/js";

/// A favicon link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favicon {
    /// Icon URL.
    pub url: String,
    /// MIME type for the `type` attribute.
    pub mime_type: String,
}

impl Favicon {
    /// Build from a `favicon { asset-> }` field. Requires `asset.url`.
    pub fn from_field(field: &Value) -> Option<Self> {
        let asset = field.get("asset")?;
        let url = asset
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())?;
        let extension = asset
            .get("extension")
            .and_then(Value::as_str)
            .unwrap_or("png");

        Some(Self {
            url: url.to_string(),
            mime_type: mime_for_extension(extension).to_string(),
        })
    }

    /// `<link rel="icon">` markup.
    pub fn link_tag(&self) -> String {
        format!(
            r#"<link rel="icon" type="{}" href="{}">"#,
            html_escape(&self.mime_type),
            html_escape(&self.url)
        )
    }
}

/// MIME type for an icon file extension, defaulting to PNG.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "image/png",
    }
}

/// One `gtag(...)` call.
#[derive(Debug, Clone, PartialEq)]
pub enum GtagCommand {
    /// `gtag('js', <date>)`.
    Js(DateTime<Utc>),
    /// `gtag('config', <id>)`.
    Config(String),
    /// `gtag('event', <name>, <params>)`.
    Event { name: String, params: Value },
}

impl GtagCommand {
    /// The call as a data-layer entry.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Js(at) => json!(["js", at.to_rfc3339()]),
            Self::Config(id) => json!(["config", id]),
            Self::Event { name, params } => json!(["event", name, params]),
        }
    }
}

/// Analytics command queue for one measurement id.
///
/// Constructed once per page lifetime; construction records the `js` and
/// `config` calls.
#[derive(Debug, Clone)]
pub struct AnalyticsQueue {
    measurement_id: String,
    commands: Vec<GtagCommand>,
}

impl AnalyticsQueue {
    /// Initialize the queue. Returns `None` for a blank id.
    pub fn init(measurement_id: impl Into<String>, now: DateTime<Utc>) -> Option<Self> {
        let measurement_id = measurement_id.into().trim().to_string();
        if measurement_id.is_empty() {
            return None;
        }

        tracing::debug!(%measurement_id, "initializing analytics queue");
        let commands = vec![
            GtagCommand::Js(now),
            GtagCommand::Config(measurement_id.clone()),
        ];
        Some(Self {
            measurement_id,
            commands,
        })
    }

    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    /// Queue an event.
    pub fn event(&mut self, name: impl Into<String>, params: Value) {
        self.commands.push(GtagCommand::Event {
            name: name.into(),
            params,
        });
    }

    /// Queued calls, oldest first.
    pub fn commands(&self) -> &[GtagCommand] {
        &self.commands
    }

    /// The queue as data-layer entries.
    pub fn data_layer(&self) -> Vec<Value> {
        self.commands.iter().map(GtagCommand::to_json).collect()
    }

    /// Loader script URL for this measurement id.
    pub fn script_src(&self) -> String {
        format!("{GTAG_SCRIPT_BASE}?id={}", self.measurement_id)
    }

    /// Loader `<script>` plus an inline bootstrap replaying the queue.
    pub fn script_tags(&self) -> String {
        let entries = serde_json::to_string(&self.data_layer()).unwrap_or_else(|_| "[]".into());
        format!(
            "<script async src=\"{}\"></script>\n<script>window.dataLayer=window.dataLayer||[];\
             function gtag(){{dataLayer.push(arguments);}}\
             {}.forEach(function(c){{gtag.apply(null,c);}});</script>",
            html_escape(&self.script_src()),
            entries.replace("</", "<\\/")
        )
    }
}

/// Head tags for a page.
#[derive(Debug, Clone, Default)]
pub struct HeadTags {
    pub favicon: Option<Favicon>,
    pub analytics: Option<AnalyticsQueue>,
}

impl HeadTags {
    /// Derive head tags from site settings.
    pub fn from_settings(settings: &SiteSettings, now: DateTime<Utc>) -> Self {
        let favicon = settings.favicon();
        if favicon.is_none() {
            tracing::debug!("no favicon in site settings");
        }

        Self {
            favicon,
            analytics: settings
                .google_analytics_id()
                .and_then(|id| AnalyticsQueue::init(id, now)),
        }
    }

    /// Render all tags, one per line.
    pub fn render(&self) -> String {
        let mut tags = Vec::new();
        if let Some(favicon) = &self.favicon {
            tags.push(favicon.link_tag());
        }
        if let Some(analytics) = &self.analytics {
            tags.push(analytics.script_tags());
        }
        tags.join("\n")
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
