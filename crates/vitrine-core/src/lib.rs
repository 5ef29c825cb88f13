//! Vitrine Core Library
//!
//! Configuration, error handling and the content query data model shared by
//! every Vitrine crate.

pub mod config;
pub mod error;
pub mod query;

pub use config::{Config, ContentConfig, ProxyConfig, ReadinessConfig, RelayConfig, ServerConfig};
pub use error::{CoreError, Result};
pub use query::{ContentQuery, QueryResult};
