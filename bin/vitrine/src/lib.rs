//! Vitrine CLI Library
//!
//! Server and command implementations behind the `vitrine` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, query, settings, page, asset)
//! - [`server`] - Query relay and SVG proxy endpoints
//!
//! # Example
//!
//! ```no_run
//! use vitrine::server::{AppState, create_router};
//! use vitrine_core::Config;
//!
//! let app = create_router(AppState::new(&Config::default()));
//! ```

pub mod cmd;
pub mod server;

pub use vitrine_content::{SettingsResolver, SourceMode};
pub use vitrine_core::Config;

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
