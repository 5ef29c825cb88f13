//! Preloader-gated animation scheduling.
//!
//! Animations must not start before the preloader finishes. After that an
//! animation either runs at once or waits until its element scrolls into
//! view. [`AnimationGate`] is the single owner of the "preloader complete"
//! state for a page.

use tracing::debug;

use crate::{host::DocumentHost, latch::ReadyLatch};

/// Class and event name announcing the end of the preloader.
pub const PRELOADER_COMPLETE: &str = "preloader-complete";

/// Scroll trigger start position.
pub const SCROLL_TRIGGER_START: &str = "top 80%";

/// Fraction of the viewport height an element's top must be above.
const IN_VIEW_THRESHOLD: f64 = 0.8;

/// Caller preferences for one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationOptions {
    /// Wait for the element to scroll into view.
    pub wait_for_scroll: bool,
    /// Run at once if the element is already in view.
    pub immediate_if_in_view: bool,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            wait_for_scroll: true,
            immediate_if_in_view: false,
        }
    }
}

/// Element bounds relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub bottom: f64,
}

/// Viewport facts needed to place an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f64,
    /// Whether a scroll-trigger facility is available.
    pub scroll_triggers: bool,
}

impl ElementRect {
    /// Whether the element's top is within the upper 80% of the viewport
    /// and its bottom is below the top edge.
    pub fn is_in_view(&self, viewport: &Viewport) -> bool {
        self.top < viewport.height * IN_VIEW_THRESHOLD && self.bottom > 0.0
    }
}

/// What the trigger watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Element,
    Body,
}

/// When to run an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPlan {
    RunNow,
    /// Run once when `target` reaches `start`, then drop the trigger.
    OnScrollEnter {
        target: ScrollTarget,
        start: &'static str,
    },
}

impl AnimationPlan {
    /// Decide how to run an animation once the preloader is done.
    pub fn decide(
        options: AnimationOptions,
        element: Option<ElementRect>,
        viewport: Viewport,
    ) -> Self {
        let in_view = element.is_some_and(|rect| rect.is_in_view(&viewport));

        if options.immediate_if_in_view && in_view {
            return Self::RunNow;
        }
        if !options.wait_for_scroll || !viewport.scroll_triggers || in_view {
            return Self::RunNow;
        }

        Self::OnScrollEnter {
            target: if element.is_some() {
                ScrollTarget::Element
            } else {
                ScrollTarget::Body
            },
            start: SCROLL_TRIGGER_START,
        }
    }
}

/// Holds animations back until the preloader completes.
#[derive(Debug, Default)]
pub struct AnimationGate {
    preloader: ReadyLatch,
}

impl AnimationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_preloader_complete(&self) -> bool {
        self.preloader.is_ready()
    }

    /// Record the end of the preloader and announce it on the document.
    ///
    /// Only the first call has an effect.
    pub fn mark_preloader_complete(&self, host: &dyn DocumentHost) -> bool {
        if !self.preloader.fire() {
            return false;
        }
        debug!("preloader complete");
        host.add_class(PRELOADER_COMPLETE);
        host.dispatch_event(PRELOADER_COMPLETE);
        true
    }

    /// Wait for the preloader, then plan the animation.
    ///
    /// `measure` runs after the wait so the layout it sees is current.
    pub async fn schedule<M>(&self, options: AnimationOptions, measure: M) -> AnimationPlan
    where
        M: FnOnce() -> (Option<ElementRect>, Viewport),
    {
        self.preloader.wait().await;
        let (element, viewport) = measure();
        AnimationPlan::decide(options, element, viewport)
    }
}
