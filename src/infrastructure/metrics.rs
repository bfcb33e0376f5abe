//! Metrics collection for system monitoring
//!
//! Lock-free counters using atomic operations.
//! Updated by the refresher and registration path, exported via the API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

/// Refresh and registration counters
pub struct MetricsCollector {
    /// Price refreshes written to the cache
    refresh_success: AtomicU64,
    /// Price fetches that failed (symbol skipped for the round)
    refresh_failure: AtomicU64,
    /// Fetched prices dropped because the symbol had no cache entry
    refresh_missing: AtomicU64,
    /// Symbols added through registration
    registrations: AtomicU64,
    /// Last successful refresh (Unix millis, 0 = never)
    last_refresh_time: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

/// Metrics snapshot for API export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub refresh_success: u64,
    pub refresh_failure: u64,
    pub refresh_missing: u64,
    pub registrations: u64,
    pub last_refresh_ms: u64,
    pub refresh_rate: f64, // successful refreshes per second
    pub uptime_seconds: u64,
}

impl MetricsCollector {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            refresh_success: AtomicU64::new(0),
            refresh_failure: AtomicU64::new(0),
            refresh_missing: AtomicU64::new(0),
            registrations: AtomicU64::new(0),
            last_refresh_time: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn record_refresh_success(&self) {
        self.refresh_success.fetch_add(1, Ordering::Relaxed);
        self.last_refresh_time.store(now_millis(), Ordering::Relaxed);
    }

    #[inline]
    pub fn record_refresh_failure(&self) {
        self.refresh_failure.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_refresh_missing(&self) {
        self.refresh_missing.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let success = self.refresh_success.load(Ordering::Relaxed);

        let uptime = self.start_time.elapsed().as_secs();
        let rate = if uptime > 0 {
            success as f64 / uptime as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            refresh_success: success,
            refresh_failure: self.refresh_failure.load(Ordering::Relaxed),
            refresh_missing: self.refresh_missing.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            last_refresh_ms: self.last_refresh_time.load(Ordering::Relaxed),
            refresh_rate: rate,
            uptime_seconds: uptime,
        }
    }

    /// Milliseconds since the last successful refresh, capped at 60s.
    /// Returns the cap when nothing has been refreshed yet.
    pub fn staleness_ms(&self) -> u64 {
        const CAP: u64 = 60_000;
        let last = self.last_refresh_time.load(Ordering::Relaxed);
        if last == 0 {
            return CAP;
        }
        now_millis().saturating_sub(last).min(CAP)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
