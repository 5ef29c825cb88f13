//! Site configuration management.
//!
//! Every fallback value the site layer needs (backend project, dataset, CDN
//! host, proxy allow-list, readiness timings) lives here and nowhere else.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "VITRINE";

/// Main configuration structure for Vitrine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Content backend settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Query relay client settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SVG proxy settings.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Page load readiness timings.
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

/// Content backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Backend project identifier.
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Dataset name within the project.
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Dated API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Query the edge-cached API host instead of the live one.
    #[serde(default = "default_true")]
    pub use_cdn: bool,

    /// Base URL of the image CDN.
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,

    /// Replaces `https://<project>.api[cdn].sanity.io` when set.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Client-side relay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Absolute URL of the query relay endpoint.
    #[serde(default = "default_relay_url")]
    pub url: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// SVG proxy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Hostnames the proxy may fetch from.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// `Cache-Control` value sent with proxied bodies.
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
}

/// Timings for the font, stylesheet and window-load gates (milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Font face descriptors that must report loaded.
    #[serde(default = "default_fonts")]
    pub fonts: Vec<String>,

    #[serde(default = "default_font_max_wait")]
    pub font_max_wait_ms: u64,

    #[serde(default = "default_font_poll_interval")]
    pub font_poll_interval_ms: u64,

    #[serde(default = "default_font_max_attempts")]
    pub font_max_attempts: u32,

    #[serde(default = "default_font_failure_delay")]
    pub font_failure_delay_ms: u64,

    #[serde(default = "default_no_font_api_delay")]
    pub no_font_api_delay_ms: u64,

    #[serde(default = "default_style_poll_interval")]
    pub style_poll_interval_ms: u64,

    #[serde(default = "default_style_max_wait")]
    pub style_max_wait_ms: u64,

    #[serde(default = "default_window_load_fallback")]
    pub window_load_fallback_ms: u64,
}

// Default value functions
fn default_project_id() -> String {
    "kpljrloc".to_string()
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "v2021-10-21".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cdn_base() -> String {
    "https://cdn.sanity.io".to_string()
}

fn default_relay_url() -> String {
    "http://127.0.0.1:3000/api/sanity/query".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["cdn.sanity.io".to_string()]
}

fn default_cache_control() -> String {
    "public, max-age=300, s-maxage=600".to_string()
}

fn default_fonts() -> Vec<String> {
    vec![
        "12px \"Bagoss Standard\"".to_string(),
        "12px \"Ayer\"".to_string(),
    ]
}

fn default_font_max_wait() -> u64 {
    3000
}

fn default_font_poll_interval() -> u64 {
    50
}

fn default_font_max_attempts() -> u32 {
    20
}

fn default_font_failure_delay() -> u64 {
    200
}

fn default_no_font_api_delay() -> u64 {
    300
}

fn default_style_poll_interval() -> u64 {
    10
}

fn default_style_max_wait() -> u64 {
    3000
}

fn default_window_load_fallback() -> u64 {
    500
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            use_cdn: true,
            cdn_base: default_cdn_base(),
            endpoint: None,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
            cache_control: default_cache_control(),
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            fonts: default_fonts(),
            font_max_wait_ms: default_font_max_wait(),
            font_poll_interval_ms: default_font_poll_interval(),
            font_max_attempts: default_font_max_attempts(),
            font_failure_delay_ms: default_font_failure_delay(),
            no_font_api_delay_ms: default_no_font_api_delay(),
            style_poll_interval_ms: default_style_poll_interval(),
            style_max_wait_ms: default_style_max_wait(),
            window_load_fallback_ms: default_window_load_fallback(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to built-in
    /// defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load configuration using the config crate, layering `VITRINE__*`
    /// environment variables over an optional file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, environment())
    }

    fn load_layered(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.content.project_id.is_empty() {
            return Err(CoreError::config("content.project_id cannot be empty"));
        }

        if self.content.dataset.is_empty() {
            return Err(CoreError::config("content.dataset cannot be empty"));
        }

        if self.proxy.allowed_hosts.is_empty() {
            tracing::warn!("proxy.allowed_hosts is empty, the SVG proxy will reject every request");
        }

        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

impl ContentConfig {
    /// Base URL for API calls, honoring `endpoint` and `use_cdn`.
    pub fn api_base(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if self.use_cdn => format!("https://{}.apicdn.sanity.io", self.project_id),
            None => format!("https://{}.api.sanity.io", self.project_id),
        }
    }

    /// Full URL of the query endpoint for the configured dataset.
    pub fn query_url(&self) -> String {
        format!(
            "{}/{}/data/query/{}",
            self.api_base(),
            self.api_version,
            self.dataset
        )
    }

    /// CDN URL for an image asset.
    pub fn image_url(&self, asset_id: &str, width: &str, height: &str, extension: &str) -> String {
        format!(
            "{}/images/{}/{}/{asset_id}-{width}x{height}.{extension}",
            self.cdn_base.trim_end_matches('/'),
            self.project_id,
            self.dataset
        )
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ProxyConfig {
    /// Whether the proxy may fetch from `host`.
    pub fn is_allowed(&self, host: &str) -> bool {
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}
