//! TestConsole for capturing output in tests
//!
//! Provides a logger that captures every line for assertion instead of
//! writing to stderr.

use std::io::Write;
use std::sync::{Arc, Mutex};

use log::LevelFilter;
use strip_ansi_escapes::strip;

use crate::detection::DisplayContext;
use crate::logger::{ConsoleLogger, ConsoleLoggerBuilder};

/// Captures [`ConsoleLogger`] output for testing
///
/// Build a logger with `logger()` (or install one with `install_global()`),
/// then use `output()`, `contains()`, and assertion methods to verify the
/// output. Timestamps are off so lines are deterministic.
pub struct TestConsole {
    buffer: Arc<Mutex<TestBuffer>>,
    /// Whether loggers render styled level labels
    styled: bool,
}

#[derive(Debug, Default)]
struct TestBuffer {
    /// Lines with ANSI codes stripped
    lines: Vec<String>,
    /// Lines with ANSI codes preserved
    raw_lines: Vec<String>,
}

impl TestConsole {
    /// Create a test console that captures plain output
    #[must_use]
    pub fn new() -> Self {
        Self::new_inner(false)
    }

    /// Create a test console whose loggers emit styled level labels
    #[must_use]
    pub fn new_styled() -> Self {
        Self::new_inner(true)
    }

    fn new_inner(styled: bool) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(TestBuffer::default())),
            styled,
        }
    }

    /// A logger builder writing into this console
    #[must_use]
    pub fn logger_builder(&self) -> ConsoleLoggerBuilder {
        let context = if self.styled {
            DisplayContext::Human
        } else {
            DisplayContext::Agent
        };
        ConsoleLoggerBuilder::new()
            .with_timestamps(false)
            .with_context(context)
            .writer(BufferWriter(self.buffer.clone()))
    }

    /// A logger writing into this console at `level`
    #[must_use]
    pub fn logger(&self, level: LevelFilter) -> ConsoleLogger {
        self.logger_builder().level_filter(level).build()
    }

    /// Install a capturing logger as the process-wide `log` backend.
    ///
    /// Only one logger can ever be installed per process, so each test
    /// binary should call this at most once.
    pub fn install_global(&self, level: LevelFilter) -> Result<(), log::SetLoggerError> {
        self.logger_builder().level_filter(level).init()
    }

    /// Get all captured output (ANSI codes stripped)
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.lines.clone())
            .unwrap_or_default()
    }

    /// Get all captured output (with ANSI codes)
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.raw_lines.clone())
            .unwrap_or_default()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual, expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected, actual, self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.lines.clear();
            buf.raw_lines.clear();
        }
    }

    /// Check if loggers built from this console style their output
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.styled
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TestConsole {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            styled: self.styled,
        }
    }
}

impl std::fmt::Debug for TestConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConsole")
            .field("is_styled", &self.is_styled())
            .field("line_count", &self.output().len())
            .finish()
    }
}

/// Writer that captures to a buffer
struct BufferWriter(Arc<Mutex<TestBuffer>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = String::from_utf8_lossy(buf);

        if let Ok(mut buffer) = self.0.lock() {
            // Store raw (with ANSI)
            buffer.raw_lines.extend(s.lines().map(String::from));

            // Store stripped (without ANSI)
            let stripped = strip(buf);
            let stripped_str = String::from_utf8_lossy(&stripped);
            buffer.lines.extend(stripped_str.lines().map(String::from));
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
