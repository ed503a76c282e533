//! Configuration for console log output.
//!
//! `ConsoleConfig` supports both programmatic and environment
//! variable-based configuration.

use log::Level;

use crate::detection::DisplayContext;
use crate::logger::{ConsoleLogger, ConsoleLoggerBuilder};

/// Configuration for console log output
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    // Display mode
    /// Override display context (None = auto-detect)
    pub context: Option<DisplayContext>,
    /// Force coloured output even in non-TTY
    pub force_color: Option<bool>,
    /// Force plain text mode (no styling)
    pub force_plain: bool,

    // Logging
    /// Log level filter (None = Info)
    pub log_level: Option<Level>,
    /// Show timestamps in logs
    pub log_timestamps: bool,
    /// Show target in logs
    pub log_targets: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            context: None,
            force_color: None,
            force_plain: false,
            log_level: None,
            log_timestamps: true,
            log_targets: true,
        }
    }
}

impl ConsoleConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `LOGGABLE_COLOR` | (set) | Force coloured output |
    /// | `LOGGABLE_PLAIN` | (set) | Force plain output |
    /// | `NO_COLOR` | (set) | Disable colors (standard) |
    /// | `LOGGABLE_LOG` | trace/debug/info/warn/error | Log level |
    /// | `LOGGABLE_LOG_TIMESTAMPS` | 0/1 | Show timestamps |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Display mode
        if lookup("LOGGABLE_COLOR").is_some() {
            config.force_color = Some(true);
        }
        if lookup("LOGGABLE_PLAIN").is_some() || lookup("NO_COLOR").is_some() {
            config.force_plain = true;
        }

        // Logging
        if let Some(level) = lookup("LOGGABLE_LOG") {
            config.log_level = match level.to_lowercase().as_str() {
                "trace" => Some(Level::Trace),
                "debug" => Some(Level::Debug),
                "info" => Some(Level::Info),
                "warn" | "warning" => Some(Level::Warn),
                "error" => Some(Level::Error),
                _ => None,
            };
        }
        if lookup("LOGGABLE_LOG_TIMESTAMPS")
            .map(|v| v == "0" || v.to_lowercase() == "false")
            .unwrap_or(false)
        {
            config.log_timestamps = false;
        }

        config
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Force coloured output
    #[must_use]
    pub fn force_color(mut self, force: bool) -> Self {
        self.force_color = Some(force);
        self
    }

    /// Enable plain text mode (no styling)
    #[must_use]
    pub fn plain_mode(mut self) -> Self {
        self.force_plain = true;
        self
    }

    /// Set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set whether to show timestamps
    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.log_timestamps = show;
        self
    }

    /// Set display context explicitly
    #[must_use]
    pub fn with_context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    // ─────────────────────────────────────────────────
    // Accessor Methods
    // ─────────────────────────────────────────────────

    /// Resolve the display context
    ///
    /// Plain mode wins over forced colour, which wins over an explicit
    /// context, which wins over detection.
    #[must_use]
    pub fn display_context(&self) -> DisplayContext {
        if self.force_plain {
            return DisplayContext::Agent;
        }
        if self.force_color == Some(true) {
            return DisplayContext::Human;
        }
        self.context.unwrap_or_else(DisplayContext::detect)
    }

    /// Whether styled output will be produced
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.display_context().is_human()
    }

    /// The effective log level
    #[must_use]
    pub fn level(&self) -> Level {
        self.log_level.unwrap_or(Level::Info)
    }

    /// A logger builder carrying this configuration
    #[must_use]
    pub fn logger_builder(&self) -> ConsoleLoggerBuilder {
        ConsoleLoggerBuilder::new()
            .level(self.level())
            .with_timestamps(self.log_timestamps)
            .with_targets(self.log_targets)
            .with_context(self.display_context())
    }

    /// Build a stderr logger from this configuration
    #[must_use]
    pub fn logger(&self) -> ConsoleLogger {
        self.logger_builder().build()
    }

    /// Install a stderr logger from this configuration as the global logger
    ///
    /// The facade maximum becomes [`level`](Self::level); see
    /// [`ConsoleLoggerBuilder::init`].
    pub fn init(&self) -> Result<(), log::SetLoggerError> {
        self.logger_builder().init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::new();
        assert_eq!(config.level(), Level::Info);
        assert!(config.log_timestamps);
        assert!(config.log_targets);
        assert!(!config.force_plain);
    }

    #[test]
    fn test_from_lookup_level() {
        let config = ConsoleConfig::from_lookup(lookup(&[("LOGGABLE_LOG", "Warning")]));
        assert_eq!(config.log_level, Some(Level::Warn));

        let config = ConsoleConfig::from_lookup(lookup(&[("LOGGABLE_LOG", "verbose")]));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_from_lookup_plain_and_timestamps() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("NO_COLOR", "1"),
            ("LOGGABLE_LOG_TIMESTAMPS", "false"),
        ]));
        assert!(config.force_plain);
        assert!(!config.log_timestamps);
        assert_eq!(config.display_context(), DisplayContext::Agent);
    }

    #[test]
    fn test_plain_wins_over_color() {
        let config = ConsoleConfig::new().force_color(true).plain_mode();
        assert!(!config.is_styled());
        let config = ConsoleConfig::new()
            .with_context(DisplayContext::Agent)
            .force_color(true);
        assert!(config.is_styled());
    }

    #[test]
    fn test_logger_uses_level() {
        let logger = ConsoleConfig::new()
            .with_log_level(Level::Debug)
            .with_context(DisplayContext::Agent)
            .logger();
        assert_eq!(logger.level_filter(), log::LevelFilter::Debug);
    }
}
