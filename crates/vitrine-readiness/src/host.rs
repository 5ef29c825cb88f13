//! Document abstraction used by the readiness gates.

use async_trait::async_trait;
use thiserror::Error;

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// What can be learned about one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetAccess {
    /// Number of parsed rules.
    Rules(usize),
    /// Rules cannot be read (cross-origin sheet).
    CrossOrigin,
}

impl SheetAccess {
    /// Whether this sheet counts as applied. Unreadable sheets do.
    pub fn is_applied(&self) -> bool {
        match self {
            Self::Rules(count) => *count > 0,
            Self::CrossOrigin => true,
        }
    }
}

/// The font loading API rejected its ready promise.
#[derive(Debug, Clone, Error)]
#[error("font loading failed: {0}")]
pub struct FontLoadError(pub String);

/// The parts of a browser document the gates observe and mutate.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Whether the font loading API exists.
    fn has_font_api(&self) -> bool;

    /// Resolves when the font loading API reports ready.
    async fn fonts_ready(&self) -> Result<(), FontLoadError>;

    /// Whether the font described by a CSS font shorthand is loaded.
    fn check_font(&self, descriptor: &str) -> bool;

    /// Current state of every stylesheet.
    fn stylesheets(&self) -> Vec<SheetAccess>;

    fn ready_state(&self) -> ReadyState;

    /// Resolves on the window `load` event.
    async fn load_event(&self);

    /// Resolves after the next paint.
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }

    fn add_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Dispatch a custom event on the document.
    fn dispatch_event(&self, name: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_access() {
        assert!(!SheetAccess::Rules(0).is_applied());
        assert!(SheetAccess::Rules(3).is_applied());
        assert!(SheetAccess::CrossOrigin.is_applied());
    }
}
