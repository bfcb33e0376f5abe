//! Centralized file-based logging system
//!
//! Writes logs to files under a logs directory, separated by log type:
//! - main/    - all events, JSON lines
//! - error/   - warnings and errors only
//! - provider/ - market-data client traffic
//! - refresh/ - background refresher ticks
//! - api/     - HTTP façade
//!
//! Console output mirrors everything for development. Level filtering comes
//! from `RUST_LOG`, defaulting to `info`.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Target names used by the `log_*!` macros and the per-type file filters
pub const TARGET_PROVIDER: &str = "provider";
pub const TARGET_REFRESH: &str = "refresh";
pub const TARGET_API: &str = "api";

const LOG_TYPES: [&str; 5] = ["main", "error", TARGET_PROVIDER, TARGET_REFRESH, TARGET_API];

/// Initialize centralized file logging under `logs_dir`
///
/// Returns the appender guards; they must be kept alive for the duration
/// of the program or buffered lines are lost.
pub fn init_logging(logs_dir: &Path) -> io::Result<Vec<WorkerGuard>> {
    for log_type in &LOG_TYPES {
        fs::create_dir_all(logs_dir.join(log_type))?;
    }

    let mut guards = Vec::new();
    let mut appender = |name: &str| {
        let (writer, guard) = create_appender(&logs_dir.join(name), name);
        guards.push(guard);
        writer
    };

    let main_appender = appender("main");
    let error_appender = appender("error");
    let provider_appender = appender(TARGET_PROVIDER);
    let refresh_appender = appender(TARGET_REFRESH);
    let api_appender = appender(TARGET_API);

    // Main log - all logs
    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json();

    // Error log - ERROR and WARN only
    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let provider_layer = tracing_subscriber::fmt::layer()
        .with_writer(provider_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(target_filter(TARGET_PROVIDER));

    let refresh_layer = tracing_subscriber::fmt::layer()
        .with_writer(refresh_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(target_filter(TARGET_REFRESH));

    let api_layer = tracing_subscriber::fmt::layer()
        .with_writer(api_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(target_filter(TARGET_API));

    // Console layer for development
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(main_layer)
        .with(error_layer)
        .with(provider_layer)
        .with(refresh_layer)
        .with(api_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    tracing::info!("Logging system initialized. Log files in {}", logs_dir.display());

    Ok(guards)
}

fn target_filter(
    target: &'static str,
) -> tracing_subscriber::filter::FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool> {
    tracing_subscriber::filter::filter_fn(move |metadata| metadata.target() == target)
}

/// Create a rolling file appender
fn create_appender(dir: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);

    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_provider {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "provider", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_refresh {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "refresh", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_api {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "api", $level, $($arg)+)
    };
}
