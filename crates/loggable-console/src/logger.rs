//! Console log output.
//!
//! Provides a `log` crate compatible logger that writes one line per record:
//!
//! ```text
//! 12:04:31 INFO app::Ledger - #deposit([10]): 110 in 3ms
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use loggable_console::ConsoleLogger;
//! use log::Level;
//!
//! // Simple initialization
//! ConsoleLogger::init(Level::Info)?;
//!
//! // Or use the builder for more control
//! ConsoleLogger::builder()
//!     .level(Level::Debug)
//!     .with_timestamps(false)
//!     .init()?;
//! ```

use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::detection::DisplayContext;

/// Logger that writes formatted lines to stderr or any writer.
///
/// Level labels are coloured in human context and plain in agent context.
pub struct ConsoleLogger {
    min_level: LevelFilter,
    show_timestamps: bool,
    show_targets: bool,
    context: DisplayContext,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleLogger {
    /// Create a stderr logger with the given minimum level.
    #[must_use]
    pub fn new(min_level: Level) -> Self {
        ConsoleLoggerBuilder::new().level(min_level).build()
    }

    /// Create a logger using the builder pattern.
    #[must_use]
    pub fn builder() -> ConsoleLoggerBuilder {
        ConsoleLoggerBuilder::new()
    }

    /// Initialize as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(min_level: Level) -> Result<(), log::SetLoggerError> {
        ConsoleLoggerBuilder::new().level(min_level).init()
    }

    /// Initialize as the global logger, ignoring errors if already set.
    pub fn try_init(min_level: Level) {
        let _ = Self::init(min_level);
    }

    /// The minimum level this logger writes.
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        self.min_level
    }

    /// Renders one record as it would be written, without the newline.
    #[must_use]
    pub fn format_line(&self, record: &Record<'_>) -> String {
        let mut line = String::new();
        if self.show_timestamps {
            if let Ok(ts) = OffsetDateTime::now_utc()
                .format(format_description!("[hour]:[minute]:[second].[subsecond digits:3]"))
            {
                line.push_str(&ts);
                line.push(' ');
            }
        }
        line.push_str(&self.level_label(record.level()));
        if self.show_targets {
            line.push(' ');
            line.push_str(record.target());
        }
        line.push_str(" - ");
        line.push_str(&record.args().to_string());
        line
    }

    fn level_label(&self, level: Level) -> String {
        let label = level.as_str();
        if self.context.is_agent() {
            return label.to_string();
        }
        let styled = console::style(label).force_styling(true).bold();
        let styled = match level {
            Level::Error => styled.red(),
            Level::Warn => styled.yellow(),
            Level::Info => styled.green(),
            Level::Debug => styled.blue(),
            Level::Trace => styled.dim(),
        };
        styled.to_string()
    }
}

impl std::fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("min_level", &self.min_level)
            .field("show_timestamps", &self.show_timestamps)
            .field("show_targets", &self.show_targets)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring the console logger.
pub struct ConsoleLoggerBuilder {
    min_level: LevelFilter,
    show_timestamps: bool,
    show_targets: bool,
    context: Option<DisplayContext>,
    writer: Option<Box<dyn Write + Send>>,
}

impl Default for ConsoleLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConsoleLoggerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLoggerBuilder")
            .field("min_level", &self.min_level)
            .field("show_timestamps", &self.show_timestamps)
            .field("show_targets", &self.show_targets)
            .field("context", &self.context)
            .field("custom_writer", &self.writer.is_some())
            .finish()
    }
}

impl ConsoleLoggerBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: LevelFilter::Info,
            show_timestamps: true,
            show_targets: true,
            context: None,
            writer: None,
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.min_level = level.to_level_filter();
        self
    }

    /// Set the minimum log level from a LevelFilter.
    #[must_use]
    pub fn level_filter(mut self, filter: LevelFilter) -> Self {
        self.min_level = filter;
        self
    }

    /// Set whether to show timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// Set whether to show targets.
    #[must_use]
    pub fn with_targets(mut self, show: bool) -> Self {
        self.show_targets = show;
        self
    }

    /// Set display context explicitly (None = auto-detect)
    #[must_use]
    pub fn with_context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Write to `writer` instead of stderr.
    #[must_use]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Build the logger without installing it.
    #[must_use]
    pub fn build(self) -> ConsoleLogger {
        ConsoleLogger {
            min_level: self.min_level,
            show_timestamps: self.show_timestamps,
            show_targets: self.show_targets,
            context: self.context.unwrap_or_else(DisplayContext::detect),
            writer: Mutex::new(
                self.writer
                    .unwrap_or_else(|| Box::new(std::io::stderr())),
            ),
        }
    }

    /// Build and install as the global logger.
    ///
    /// Also sets `log::set_max_level` to this logger's level, replacing any
    /// facade maximum set earlier. Thresholds kept outside the facade (such
    /// as an interceptor's process minimum) are unaffected.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.min_level;
        log::set_boxed_logger(Box::new(self.build()))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Build and install, ignoring errors if already set.
    pub fn try_init(self) {
        let _ = self.init();
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = self.format_line(record);
        line.push('\n');
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("test").build()
    }

    fn plain() -> ConsoleLoggerBuilder {
        ConsoleLoggerBuilder::new()
            .with_context(DisplayContext::Agent)
            .with_timestamps(false)
    }

    #[test]
    fn test_console_logger_enabled() {
        let logger = plain().level(Level::Info).build();
        assert!(logger.enabled(&meta(Level::Error)));
        assert!(logger.enabled(&meta(Level::Warn)));
        assert!(logger.enabled(&meta(Level::Info)));
        assert!(!logger.enabled(&meta(Level::Debug)));
        assert!(!logger.enabled(&meta(Level::Trace)));
    }

    #[test]
    fn test_builder_default() {
        let builder = ConsoleLoggerBuilder::default();
        assert_eq!(builder.min_level, LevelFilter::Info);
        assert!(builder.show_timestamps);
        assert!(builder.show_targets);
        assert!(builder.context.is_none());
    }

    #[test]
    fn test_builder_level_filter() {
        let logger = plain().level_filter(LevelFilter::Off).build();
        assert_eq!(logger.level_filter(), LevelFilter::Off);
        assert!(!logger.enabled(&meta(Level::Error)));
    }

    #[test]
    fn test_plain_line_format() {
        let logger = plain().build();
        let line = logger.format_line(
            &Record::builder()
                .level(Level::Info)
                .target("app::Ledger")
                .args(format_args!("#deposit([10]): 110 in 3ms"))
                .build(),
        );
        assert_eq!(line, "INFO app::Ledger - #deposit([10]): 110 in 3ms");
    }

    #[test]
    fn test_without_targets() {
        let logger = plain().with_targets(false).build();
        let line = logger.format_line(
            &Record::builder()
                .level(Level::Warn)
                .target("app")
                .args(format_args!("careful"))
                .build(),
        );
        assert_eq!(line, "WARN - careful");
    }

    #[test]
    fn test_human_label_is_styled() {
        let logger = plain().with_context(DisplayContext::Human).build();
        let line = logger.format_line(
            &Record::builder()
                .level(Level::Error)
                .target("app")
                .args(format_args!("boom"))
                .build(),
        );
        assert!(line.contains('\u{1b}'));
        assert!(line.ends_with("app - boom"));
    }

    #[test]
    fn test_timestamp_prefix() {
        let logger = ConsoleLoggerBuilder::new()
            .with_context(DisplayContext::Agent)
            .build();
        let line = logger.format_line(
            &Record::builder()
                .level(Level::Info)
                .target("app")
                .args(format_args!("tick"))
                .build(),
        );
        let re = regex::Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3} INFO app - tick$").unwrap();
        assert!(re.is_match(&line), "unexpected line: {line}");
    }
}
