//! Sink adapter: hands finished messages to a logging backend.
//!
//! The interceptor produces `(level, source, message)` entries, or
//! `(source, message, failure)` for failures that were not ignored. A
//! [`Sink`] decides whether a level is enabled and forwards entries; it
//! never decides *what* to log.
//!
//! [`LogSink`] forwards to the [`log`] facade, using the owning type's name
//! as the record target. Two thresholds apply:
//!
//! - the process-wide minimum, published through [`set_min_level`]. It is
//!   held as a [`LogLevel`] so `Fatal` stays distinct from `Error`, and is
//!   mirrored onto `log::set_max_level` so the facade skips work early.
//! - an optional per-sink minimum ([`LogSink::with_min_level`])
//!
//! `Off` never passes either threshold.

use loggable_core::logging::{debug, targets};
use loggable_core::{AtomicLevel, Failure, FailureReport, LogLevel};

/// Destination for interceptor messages.
pub trait Sink: Send + Sync {
    /// Whether an entry at `level` would be emitted.
    fn enabled(&self, level: LogLevel) -> bool;

    /// Emits a message without failure detail.
    fn emit(&self, level: LogLevel, source: &str, message: &str);

    /// Emits a message at the `Error` tier with the failure's full
    /// diagnostic report.
    fn emit_failure(&self, source: &str, message: &str, failure: &dyn Failure);
}

/// Publishes the process-wide minimum level.
///
/// Entries below `level` are dropped by every [`LogSink`]. `Off` suppresses
/// everything.
pub fn set_min_level(level: LogLevel) {
    PROCESS_MIN.store(level);
    log::set_max_level(level.to_level_filter());
    debug!(target: targets::SINK, "process minimum level set to {}", level);
}

/// The current process-wide minimum level.
#[must_use]
pub fn min_level() -> LogLevel {
    PROCESS_MIN.load()
}

static PROCESS_MIN: AtomicLevel = AtomicLevel::new(LogLevel::All);

/// [`Sink`] backed by the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink {
    min_level: AtomicLevel,
}

impl LogSink {
    /// A sink governed only by the process-wide minimum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that additionally drops entries below `level`.
    #[must_use]
    pub fn with_min_level(level: LogLevel) -> Self {
        Self {
            min_level: AtomicLevel::new(level),
        }
    }

    /// This sink's own minimum level.
    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        self.min_level.load()
    }

    /// Replaces this sink's own minimum level.
    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level);
        debug!(target: targets::SINK, "sink minimum level set to {}", level);
    }

    fn log_record(level: log::Level, source: &str, message: &str) {
        let logger = log::logger();
        let metadata = log::Metadata::builder().level(level).target(source).build();
        if !logger.enabled(&metadata) {
            return;
        }
        logger.log(
            &log::Record::builder()
                .metadata(metadata)
                .args(format_args!("{message}"))
                .build(),
        );
    }
}

impl Sink for LogSink {
    fn enabled(&self, level: LogLevel) -> bool {
        let Some(facade_level) = level.to_log_level() else {
            return false;
        };
        PROCESS_MIN.load().admits(level)
            && self.min_level.load().admits(level)
            && facade_level <= log::max_level()
    }

    fn emit(&self, level: LogLevel, source: &str, message: &str) {
        if !self.enabled(level) {
            return;
        }
        if let Some(facade_level) = level.to_log_level() {
            Self::log_record(facade_level, source, message);
        }
    }

    fn emit_failure(&self, source: &str, message: &str, failure: &dyn Failure) {
        if !self.enabled(LogLevel::Error) {
            return;
        }
        let detailed = format!("{message}\n{}", FailureReport(failure));
        Self::log_record(log::Level::Error, source, &detailed);
    }
}

impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    fn enabled(&self, level: LogLevel) -> bool {
        (**self).enabled(level)
    }

    fn emit(&self, level: LogLevel, source: &str, message: &str) {
        (**self).emit(level, source, message);
    }

    fn emit_failure(&self, source: &str, message: &str, failure: &dyn Failure) {
        (**self).emit_failure(source, message, failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_is_never_enabled() {
        let sink = LogSink::new();
        assert!(!sink.enabled(LogLevel::Off));
    }

    #[test]
    fn own_minimum_filters() {
        let sink = LogSink::with_min_level(LogLevel::Off);
        assert_eq!(sink.min_level(), LogLevel::Off);
        assert!(!sink.enabled(LogLevel::Fatal));

        sink.set_min_level(LogLevel::Warn);
        assert_eq!(sink.min_level(), LogLevel::Warn);
    }

    #[test]
    fn default_sink_has_no_own_minimum() {
        assert_eq!(LogSink::new().min_level(), LogLevel::All);
    }
}
