//! Directive severity levels.
//!
//! [`LogLevel`] is the ordered severity a directive logs at. It extends the
//! five `log` facade levels with three sentinels:
//!
//! - `All`: lowest level; as a threshold it admits everything
//! - `Fatal`: above `Error`; emitted at the facade's `Error` tier
//! - `Off`: never logs, whether used by a directive or as a threshold

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Severity level attached to a directive.
///
/// Ordering runs from least to most severe, with `Off` greatest:
/// `All < Trace < Debug < Info < Warn < Error < Fatal < Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Lowest sentinel.
    All,
    /// Very fine-grained diagnostics.
    Trace,
    /// Debugging detail.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Something unexpected but recoverable.
    Warn,
    /// A failed operation.
    Error,
    /// Emitted at the `Error` tier.
    Fatal,
    /// Logging disabled.
    Off,
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected all, trace, debug, info, warn, error, fatal or off)")]
pub struct ParseLevelError(pub String);

impl LogLevel {
    /// All levels in ascending order.
    pub const ALL_LEVELS: [LogLevel; 8] = [
        LogLevel::All,
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Off,
    ];

    /// Upper-case name of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::All => "ALL",
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Off => "OFF",
        }
    }

    /// The facade level an entry at this level is emitted at.
    ///
    /// Returns `None` for `Off`.
    #[must_use]
    pub fn to_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::All | LogLevel::Trace => Some(log::Level::Trace),
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Error | LogLevel::Fatal => Some(log::Level::Error),
            LogLevel::Off => None,
        }
    }

    /// The facade filter equivalent to using this level as a threshold.
    #[must_use]
    pub fn to_level_filter(self) -> log::LevelFilter {
        self.to_log_level()
            .map_or(log::LevelFilter::Off, |level| level.to_level_filter())
    }

    /// Converts a facade filter back into a threshold level.
    #[must_use]
    pub fn from_level_filter(filter: log::LevelFilter) -> Self {
        match filter {
            log::LevelFilter::Off => LogLevel::Off,
            log::LevelFilter::Error => LogLevel::Error,
            log::LevelFilter::Warn => LogLevel::Warn,
            log::LevelFilter::Info => LogLevel::Info,
            log::LevelFilter::Debug => LogLevel::Debug,
            log::LevelFilter::Trace => LogLevel::Trace,
        }
    }

    /// Whether an entry at `level` passes when `self` is the threshold.
    ///
    /// `Off` on either side never passes.
    #[must_use]
    pub fn admits(self, level: LogLevel) -> bool {
        self != LogLevel::Off && level != LogLevel::Off && level >= self
    }

    /// Returns true for the `Off` sentinel.
    #[must_use]
    pub fn is_off(self) -> bool {
        self == LogLevel::Off
    }

    pub(crate) const fn to_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        Self::ALL_LEVELS
            .get(usize::from(raw))
            .copied()
            .unwrap_or(LogLevel::Off)
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LogLevel::All),
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "off" | "none" => Ok(LogLevel::Off),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str().to_lowercase())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lock-free cell holding a [`LogLevel`].
///
/// Used for thresholds that may be changed at runtime while other threads
/// read them.
#[derive(Debug)]
pub struct AtomicLevel(std::sync::atomic::AtomicU8);

impl AtomicLevel {
    /// Creates a cell holding `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self(std::sync::atomic::AtomicU8::new(level.to_u8()))
    }

    /// Reads the current level.
    #[must_use]
    pub fn load(&self) -> LogLevel {
        LogLevel::from_u8(self.0.load(std::sync::atomic::Ordering::Acquire))
    }

    /// Publishes a new level.
    pub fn store(&self, level: LogLevel) {
        self.0
            .store(level.to_u8(), std::sync::atomic::Ordering::Release);
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(LogLevel::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(LogLevel::All < LogLevel::Trace);
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert!(LogLevel::Fatal < LogLevel::Off);
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn fatal_is_emitted_as_error() {
        assert_eq!(LogLevel::Fatal.to_log_level(), Some(log::Level::Error));
        assert_eq!(LogLevel::Off.to_log_level(), None);
        assert_eq!(LogLevel::All.to_log_level(), Some(log::Level::Trace));
    }

    #[test]
    fn admits_respects_threshold() {
        assert!(LogLevel::Error.admits(LogLevel::Fatal));
        assert!(LogLevel::Error.admits(LogLevel::Error));
        assert!(!LogLevel::Error.admits(LogLevel::Info));
        assert!(LogLevel::All.admits(LogLevel::Trace));
    }

    #[test]
    fn off_never_admits() {
        for level in LogLevel::ALL_LEVELS {
            assert!(!LogLevel::Off.admits(level));
            assert!(!level.admits(LogLevel::Off));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" fatal ".parse::<LogLevel>().unwrap(), LogLevel::Fatal);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn filter_round_trip() {
        assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(
            LogLevel::from_level_filter(log::LevelFilter::Debug),
            LogLevel::Debug
        );
        assert_eq!(LogLevel::Fatal.to_level_filter(), log::LevelFilter::Error);
    }

    #[test]
    fn atomic_level_store_load() {
        let cell = AtomicLevel::default();
        assert_eq!(cell.load(), LogLevel::All);
        cell.store(LogLevel::Warn);
        assert_eq!(cell.load(), LogLevel::Warn);
    }

    #[test]
    fn deserializes_from_string() {
        #[derive(Deserialize)]
        struct Holder {
            level: LogLevel,
        }
        let holder: Holder = toml::from_str("level = \"DEBUG\"").unwrap();
        assert_eq!(holder.level, LogLevel::Debug);
    }
}
