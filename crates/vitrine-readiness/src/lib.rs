//! Vitrine Readiness Library
//!
//! Decides when a page may become visible and when preloader-gated
//! animations may start. The document itself is abstracted behind
//! [`DocumentHost`], so every gate can run against a real browser binding or
//! a test double.
//!
//! # Modules
//!
//! - [`poll`] - Bounded polling with attempt and deadline limits
//! - [`latch`] - One-way `Pending → Ready` latch
//! - [`host`] - Document abstraction
//! - [`gates`] - Font, stylesheet and window-load gates
//! - [`reveal`] - Page reveal once every gate has passed
//! - [`animation`] - Preloader-gated animation scheduling

pub mod animation;
pub mod gates;
pub mod host;
pub mod latch;
pub mod poll;
pub mod reveal;

pub use animation::{
    AnimationGate, AnimationOptions, AnimationPlan, ElementRect, ScrollTarget, Viewport,
};
pub use gates::{FontGate, GateOutcome, GateTimings, StyleGate, WindowLoadGate};
pub use host::{DocumentHost, FontLoadError, ReadyState, SheetAccess};
pub use latch::ReadyLatch;
pub use poll::{BoundedPoll, PollOutcome};
pub use reveal::{PageReveal, REVEAL_CLASS, RevealReport};
