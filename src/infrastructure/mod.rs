//! Infrastructure
//!
//! Everything around the core cache:
//! - HTTP API server
//! - Configuration management
//! - Logging and metrics

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;

pub use api::{router, start_server};
pub use metrics::MetricsCollector;
