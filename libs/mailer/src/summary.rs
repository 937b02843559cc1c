//! Run result aggregation
//!
//! The aggregator is the only structure besides the dedup ledger that is
//! mutated from concurrent send tasks: counters are atomic and the error
//! log is mutex-guarded, preserving append order. One instance is
//! constructed fresh per run; there is no cross-run state.

use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Snapshot of a finished (or aborted) run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub sent: usize,
    pub skipped: usize,
    /// Error lines in the order they were appended
    pub errors: Vec<String>,
}

/// Shared mutable counters and error log for one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    sent: AtomicUsize,
    skipped: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear counters and the error log. New runs normally construct a
    /// fresh aggregator instead; this exists for callers that reuse one.
    pub fn reset(&self) {
        self.sent.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.errors.lock().expect("error log lock poisoned").clear();
    }

    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self, line: impl Into<String>) {
        self.errors
            .lock()
            .expect("error log lock poisoned")
            .push(line.into());
    }

    pub fn snapshot(&self) -> RunSummary {
        RunSummary {
            sent: self.sent.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            errors: self.errors.lock().expect("error log lock poisoned").clone(),
        }
    }
}

/// Current UTC time in the error-line format.
pub(crate) fn current_time() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Error line for a recipient that failed syntactic validation.
pub fn invalid_address_line(to_address: &str) -> String {
    format!("\"{to_address}\" is an invalid address")
}

/// Error line for a failed send attempt (provider rejection or
/// transport failure).
pub fn send_failure_line(to_address: &str, detail: &str) -> String {
    format!("{}, {}, {}", current_time(), to_address, detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_snapshot() {
        let aggregator = Aggregator::new();
        aggregator.record_sent();
        aggregator.record_sent();
        aggregator.record_skipped();
        aggregator.record_error("first");
        aggregator.record_error("second");

        let summary = aggregator.snapshot();
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, vec!["first", "second"]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let aggregator = Aggregator::new();
        aggregator.record_sent();
        aggregator.record_error("boom");
        aggregator.reset();

        assert_eq!(aggregator.snapshot(), RunSummary::default());
    }

    #[test]
    fn test_invalid_address_line_format() {
        assert_eq!(
            invalid_address_line("bad-address"),
            "\"bad-address\" is an invalid address"
        );
    }

    #[test]
    fn test_send_failure_line_format() {
        let line = send_failure_line("rcpt@example.com", "code=Throttling, message=slow down");
        assert!(line.contains(" UTC, rcpt@example.com, code=Throttling, message=slow down"));
    }
}
