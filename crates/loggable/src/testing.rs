//! Testing utilities for intercepted calls.
//!
//! [`TestSink`] records every entry the interceptor emits so tests can
//! assert on levels, sources and exact messages without installing a
//! global logger.

use std::sync::{Arc, Mutex};

use loggable_core::{AtomicLevel, Failure, FailureReport, LogLevel};

use crate::sink::Sink;

/// One captured entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEntry {
    /// Level the entry was emitted at.
    pub level: LogLevel,
    /// Owning type of the intercepted method.
    pub source: String,
    /// Rendered message.
    pub message: String,
    /// Failure report, present only for failures that were not ignored.
    pub failure_detail: Option<String>,
}

/// A [`Sink`] that captures entries in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// interceptor and inspect another.
#[derive(Clone, Default)]
pub struct TestSink {
    entries: Arc<Mutex<Vec<CapturedEntry>>>,
    min_level: Arc<AtomicLevel>,
}

impl TestSink {
    /// A sink that captures every level except `Off`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that drops entries below `level`.
    #[must_use]
    pub fn with_min_level(level: LogLevel) -> Self {
        let sink = Self::new();
        sink.set_min_level(level);
        sink
    }

    /// Replaces the minimum level.
    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level);
    }

    /// All captured entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<CapturedEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Captured messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Messages joined by newlines.
    #[must_use]
    pub fn output_string(&self) -> String {
        self.messages().join("\n")
    }

    /// Check if any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }

    /// Check if any message matches a regex pattern.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => self.entries().iter().any(|e| re.is_match(&e.message)),
            Err(_) => false,
        }
    }

    /// Assert that some message contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if no message contains the needle.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "No entry contained '{}'. Captured:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that no message contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if a message contains the needle.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "An entry unexpectedly contained '{}'. Captured:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert the number of captured entries.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    pub fn assert_entry_count(&self, expected: usize) {
        let actual = self.entries().len();
        assert_eq!(
            actual, expected,
            "Expected {} entries but got {}. Captured:\n{}",
            expected, actual, self.output_string()
        );
    }

    /// Drops all captured entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn push(&self, entry: CapturedEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

impl std::fmt::Debug for TestSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSink")
            .field("min_level", &self.min_level.load())
            .field("entry_count", &self.entries().len())
            .finish()
    }
}

impl Sink for TestSink {
    fn enabled(&self, level: LogLevel) -> bool {
        !level.is_off() && self.min_level.load().admits(level)
    }

    fn emit(&self, level: LogLevel, source: &str, message: &str) {
        if !self.enabled(level) {
            return;
        }
        self.push(CapturedEntry {
            level,
            source: source.to_string(),
            message: message.to_string(),
            failure_detail: None,
        });
    }

    fn emit_failure(&self, source: &str, message: &str, failure: &dyn Failure) {
        if !self.enabled(LogLevel::Error) {
            return;
        }
        self.push(CapturedEntry {
            level: LogLevel::Error,
            source: source.to_string(),
            message: message.to_string(),
            failure_detail: Some(FailureReport(failure).to_string()),
        });
    }
}
