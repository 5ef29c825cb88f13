//! Page reveal.
//!
//! The page stays hidden until stylesheets are applied, the window has
//! loaded and the fonts are in. Then [`REVEAL_CLASS`] is added to the
//! document, once.

use tracing::{debug, info};

use crate::{
    gates::{FontGate, GateOutcome, GateTimings, StyleGate, WindowLoadGate},
    host::DocumentHost,
    latch::ReadyLatch,
};

/// Class that makes the page visible.
pub const REVEAL_CLASS: &str = "css-loaded";

/// How each gate was passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealReport {
    pub style: GateOutcome,
    pub window: GateOutcome,
    pub font: GateOutcome,
}

/// Runs the gates in order and reveals the page.
#[derive(Debug)]
pub struct PageReveal {
    style: StyleGate,
    window: WindowLoadGate,
    font: FontGate,
    revealed: ReadyLatch,
}

impl PageReveal {
    pub fn new(timings: &GateTimings) -> Self {
        Self {
            style: StyleGate::new(timings),
            window: WindowLoadGate::new(timings),
            font: FontGate::new(timings),
            revealed: ReadyLatch::new(),
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.is_ready()
    }

    /// Wait until the page has been revealed by any caller.
    pub async fn revealed(&self) {
        self.revealed.wait().await;
    }

    /// Pass every gate, then reveal.
    ///
    /// Returns `None` when the page was already revealed.
    pub async fn run(&self, host: &dyn DocumentHost) -> Option<RevealReport> {
        if self.is_revealed() {
            debug!("page already revealed");
            return None;
        }

        let report = RevealReport {
            style: self.style.wait(host).await,
            window: self.window.wait(host).await,
            font: self.font.wait(host).await,
        };

        if !self.revealed.fire() {
            return None;
        }
        if !host.has_class(REVEAL_CLASS) {
            host.add_class(REVEAL_CLASS);
        }
        info!(?report, "page revealed");
        Some(report)
    }
}

impl Default for PageReveal {
    fn default() -> Self {
        Self::new(&GateTimings::default())
    }
}
