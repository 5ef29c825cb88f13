//! Font, stylesheet and window-load gates.
//!
//! Every gate terminates. When the condition it waits for never holds, a
//! bounded fallback lets the page through anyway.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};
use vitrine_core::ReadinessConfig;

use crate::{
    host::{DocumentHost, ReadyState, SheetAccess},
    poll::{BoundedPoll, PollOutcome},
};

/// Why a gate let the page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The awaited condition held.
    Loaded,
    /// The condition could not be confirmed; a fallback path was taken.
    Fallback,
    /// The gate's deadline passed.
    TimedOut,
}

/// Gate timings, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateTimings {
    pub fonts: Vec<String>,
    pub font_max_wait: Duration,
    pub font_poll_interval: Duration,
    pub font_max_attempts: u32,
    pub font_failure_delay: Duration,
    pub no_font_api_delay: Duration,
    pub style_poll_interval: Duration,
    pub style_max_wait: Duration,
    pub window_load_fallback: Duration,
}

impl From<&ReadinessConfig> for GateTimings {
    fn from(config: &ReadinessConfig) -> Self {
        Self {
            fonts: config.fonts.clone(),
            font_max_wait: Duration::from_millis(config.font_max_wait_ms),
            font_poll_interval: Duration::from_millis(config.font_poll_interval_ms),
            font_max_attempts: config.font_max_attempts,
            font_failure_delay: Duration::from_millis(config.font_failure_delay_ms),
            no_font_api_delay: Duration::from_millis(config.no_font_api_delay_ms),
            style_poll_interval: Duration::from_millis(config.style_poll_interval_ms),
            style_max_wait: Duration::from_millis(config.style_max_wait_ms),
            window_load_fallback: Duration::from_millis(config.window_load_fallback_ms),
        }
    }
}

impl Default for GateTimings {
    fn default() -> Self {
        Self::from(&ReadinessConfig::default())
    }
}

/// Waits for the configured font faces.
#[derive(Debug, Clone)]
pub struct FontGate {
    fonts: Vec<String>,
    max_wait: Duration,
    poll: BoundedPoll,
    failure_delay: Duration,
    no_api_delay: Duration,
}

impl FontGate {
    pub fn new(timings: &GateTimings) -> Self {
        Self {
            fonts: timings.fonts.clone(),
            max_wait: timings.font_max_wait,
            poll: BoundedPoll::every(timings.font_poll_interval)
                .max_attempts(timings.font_max_attempts),
            failure_delay: timings.font_failure_delay,
            no_api_delay: timings.no_font_api_delay,
        }
    }

    fn fonts_loaded(&self, host: &dyn DocumentHost) -> bool {
        self.fonts.iter().all(|font| host.check_font(font))
    }

    /// Wait for fonts, bounded by the gate's maximum wait.
    pub async fn wait(&self, host: &dyn DocumentHost) -> GateOutcome {
        if !host.has_font_api() {
            sleep(self.no_api_delay).await;
            paint(host).await;
            return GateOutcome::Fallback;
        }

        let verify = async {
            match host.fonts_ready().await {
                Ok(()) => {
                    let outcome = self.poll.run(|| self.fonts_loaded(host)).await;
                    paint(host).await;
                    match outcome {
                        PollOutcome::Satisfied { attempts } => {
                            debug!(attempts, "fonts loaded");
                            GateOutcome::Loaded
                        }
                        _ => {
                            debug!(fonts = ?self.fonts, "fonts not confirmed, continuing");
                            GateOutcome::Fallback
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "font loading failed, showing content anyway");
                    sleep(self.failure_delay).await;
                    GateOutcome::Fallback
                }
            }
        };

        match timeout(self.max_wait, verify).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("font loading timeout, showing content anyway");
                GateOutcome::TimedOut
            }
        }
    }
}

/// Waits until at least one stylesheet is applied.
#[derive(Debug, Clone)]
pub struct StyleGate {
    poll: BoundedPoll,
}

impl StyleGate {
    pub fn new(timings: &GateTimings) -> Self {
        Self {
            poll: BoundedPoll::every(timings.style_poll_interval).deadline(timings.style_max_wait),
        }
    }

    pub async fn wait(&self, host: &dyn DocumentHost) -> GateOutcome {
        match self.poll.run(|| stylesheets_applied(&host.stylesheets())).await {
            PollOutcome::Satisfied { .. } => GateOutcome::Loaded,
            _ => {
                warn!("no stylesheet applied before deadline");
                GateOutcome::TimedOut
            }
        }
    }
}

/// Whether any sheet has rules. Unreadable sheets count as applied.
pub fn stylesheets_applied(sheets: &[SheetAccess]) -> bool {
    sheets.iter().any(SheetAccess::is_applied)
}

/// Waits for the window `load` event.
#[derive(Debug, Clone)]
pub struct WindowLoadGate {
    fallback: Duration,
}

impl WindowLoadGate {
    pub fn new(timings: &GateTimings) -> Self {
        Self {
            fallback: timings.window_load_fallback,
        }
    }

    pub async fn wait(&self, host: &dyn DocumentHost) -> GateOutcome {
        if host.ready_state() == ReadyState::Complete {
            return GateOutcome::Loaded;
        }

        match timeout(self.fallback, host.load_event()).await {
            Ok(()) => GateOutcome::Loaded,
            Err(_) => {
                debug!("window load event not seen, continuing");
                GateOutcome::TimedOut
            }
        }
    }
}

/// Two frames, so styles are painted before anything becomes visible.
async fn paint(host: &dyn DocumentHost) {
    host.next_frame().await;
    host.next_frame().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_from_config() {
        let timings = GateTimings::default();
        assert_eq!(timings.font_max_wait, Duration::from_secs(3));
        assert_eq!(timings.font_poll_interval, Duration::from_millis(50));
        assert_eq!(timings.font_max_attempts, 20);
        assert_eq!(timings.style_poll_interval, Duration::from_millis(10));
        assert_eq!(timings.window_load_fallback, Duration::from_millis(500));
        assert_eq!(timings.fonts.len(), 2);
    }

    #[test]
    fn test_stylesheets_applied() {
        assert!(!stylesheets_applied(&[]));
        assert!(!stylesheets_applied(&[SheetAccess::Rules(0)]));
        assert!(stylesheets_applied(&[
            SheetAccess::Rules(0),
            SheetAccess::CrossOrigin
        ]));
        assert!(stylesheets_applied(&[SheetAccess::Rules(12)]));
    }
}
