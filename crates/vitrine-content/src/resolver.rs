//! Cached settings resolution.
//!
//! Each document is fetched at most once per cache key for the lifetime of a
//! [`SettingsResolver`]. Concurrent callers asking for the same key share one
//! in-flight request. Fetch failures are logged and resolve to "no
//! document", which every accessor turns into its default.

use std::sync::Arc;

use scc::HashMap;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use vitrine_core::{Config, ContentQuery};

use crate::{
    assets::AssetResolver,
    page::{PageSettings, PageSlug},
    settings::{SITE_SETTINGS_KEY, SiteSettings, site_settings_query},
    source::{ContentSource, SourceMode, build_source},
};

type DocumentCell = Arc<OnceCell<Option<Arc<Value>>>>;

/// Fetches and caches settings documents.
pub struct SettingsResolver {
    source: Arc<dyn ContentSource>,
    assets: AssetResolver,
    cells: HashMap<String, DocumentCell>,
}

impl std::fmt::Debug for SettingsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsResolver")
            .field("source", &self.source.name())
            .field("cached", &self.cells.len())
            .finish()
    }
}

impl SettingsResolver {
    /// Create a resolver over an existing source.
    pub fn new(source: Arc<dyn ContentSource>, assets: AssetResolver) -> Self {
        Self {
            source,
            assets,
            cells: HashMap::new(),
        }
    }

    /// Create a resolver with the adapter matching `mode`.
    pub fn for_mode(config: &Config, mode: SourceMode) -> Self {
        Self::new(
            build_source(config, mode),
            AssetResolver::new(&config.content),
        )
    }

    /// The underlying content source.
    pub fn source(&self) -> &Arc<dyn ContentSource> {
        &self.source
    }

    /// Global site settings.
    pub async fn site_settings(&self) -> SiteSettings {
        let doc = self
            .document(SITE_SETTINGS_KEY, site_settings_query())
            .await;
        SiteSettings::new(doc, self.assets.clone())
    }

    /// Settings for one page. `None` yields defaults without a fetch.
    pub async fn page_settings(&self, slug: Option<&PageSlug>) -> PageSettings {
        let Some(slug) = slug else {
            return PageSettings::default();
        };
        let doc = self.document(&slug.cache_key(), slug.query()).await;
        PageSettings::new(doc)
    }

    /// Fetch `query` once under `key` and return the cached document.
    pub async fn document(&self, key: &str, query: ContentQuery) -> Option<Arc<Value>> {
        let cell = self
            .cells
            .entry_async(key.to_string())
            .await
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .get()
            .clone();

        cell.get_or_init(|| async {
            match self.source.fetch(&query).await {
                Ok(doc) => {
                    debug!(key, source = self.source.name(), found = doc.is_some(), "fetched document");
                    doc.map(Arc::new)
                }
                Err(err) => {
                    warn!(
                        key,
                        source = self.source.name(),
                        error = %err,
                        "content fetch failed, using defaults"
                    );
                    None
                }
            }
        })
        .await
        .clone()
    }

    /// Number of cache keys seen so far.
    pub fn cached_keys(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::{Result, SourceError};

    /// Counts calls and answers from a fixed document.
    struct CountingSource {
        calls: AtomicUsize,
        answer: Option<Value>,
    }

    impl CountingSource {
        fn new(answer: Option<Value>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentSource for CountingSource {
        async fn query(&self, query: &ContentQuery) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            match &self.answer {
                Some(doc) => Ok(json!({ "query": query.query, "result": doc })),
                None => Err(SourceError::Status {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_site_settings_fetched_once() {
        let source = CountingSource::new(Some(json!({"title": "Studio"})));
        let resolver = SettingsResolver::new(source.clone(), AssetResolver::default());

        let first = resolver.site_settings().await;
        let second = resolver.site_settings().await;

        assert_eq!(first.title(), "Studio");
        assert_eq!(second.title(), "Studio");
        assert_eq!(source.calls(), 1);
        let (a, b) = (first.document().expect("doc"), second.document().expect("doc"));
        assert!(Arc::ptr_eq(a, b));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let source = CountingSource::new(Some(json!({"title": "Studio"})));
        let resolver = Arc::new(SettingsResolver::new(
            source.clone(),
            AssetResolver::default(),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.site_settings().await.title() })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.expect("join"), "Studio");
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_resolves_to_defaults() {
        let source = CountingSource::new(None);
        let resolver = SettingsResolver::new(source.clone(), AssetResolver::default());

        let settings = resolver.site_settings().await;
        assert!(!settings.is_loaded());
        assert_eq!(settings.title(), "JF Design Office");

        // A failed key stays resolved; no retry within the same resolver.
        resolver.site_settings().await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_page_keys_are_separate() {
        let source = CountingSource::new(Some(json!({"textColor": "#111111"})));
        let resolver = SettingsResolver::new(source.clone(), AssetResolver::default());

        let home = resolver.page_settings(Some(&PageSlug::Home)).await;
        let about = PageSlug::Slug("about".to_string());
        resolver.page_settings(Some(&about)).await;
        resolver.page_settings(Some(&about)).await;

        assert_eq!(home.text_color(), "#111111");
        assert_eq!(home.background_color(), "#ffffff");
        assert_eq!(source.calls(), 2);
        assert_eq!(resolver.cached_keys(), 2);
    }

    #[tokio::test]
    async fn test_no_slug_skips_fetch() {
        let source = CountingSource::new(Some(json!({"textColor": "#111111"})));
        let resolver = SettingsResolver::new(source.clone(), AssetResolver::default());

        let page = resolver.page_settings(None).await;
        assert_eq!(page.text_color(), "#000000");
        assert_eq!(source.calls(), 0);
    }
}
