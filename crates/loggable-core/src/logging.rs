//! Internal logging for loggable.
//!
//! This module covers the library's *own* diagnostics (configuration
//! warnings, registration, global installation), not the method messages the
//! interceptor produces. Both go through the standard [`log`] facade.
//!
//! # Log Levels
//!
//! - **error**: configuration that cannot be applied
//! - **warn**: suspicious configuration (unknown placeholders, excluded methods)
//! - **info**: global interceptor installed, configuration loaded
//! - **debug**: directive registration, format replacement
//! - **trace**: per-call pass-through decisions
//!
//! # Initialization
//!
//! loggable does not install a logger. Applications pick a backend:
//!
//! ```ignore
//! // The bundled console backend
//! loggable_console::ConsoleLogger::init(log::Level::Info)?;
//!
//! // Or any other `log` implementation
//! env_logger::init();
//! ```
//!
//! # Log Targets
//!
//! - `loggable`: root target for internal diagnostics
//! - `loggable::interceptor`: pass-through decisions
//! - `loggable::registry`: directive registration
//! - `loggable::config`: configuration loading and validation
//! - `loggable::sink`: sink threshold changes
//!
//! Method messages are logged with the owning type's name as target, so
//! they can be filtered per type: `RUST_LOG=app::accounts::Ledger=debug`.

// Re-export log macros for ergonomic use
pub use log::{debug, error, info, trace, warn};

// Re-export log level types for programmatic use
pub use log::{Level, LevelFilter};

/// Log targets used by loggable's internal diagnostics.
pub mod targets {
    /// Root target for all internal diagnostics.
    pub const LOGGABLE: &str = "loggable";

    /// Interception decisions.
    pub const INTERCEPTOR: &str = "loggable::interceptor";

    /// Directive registration.
    pub const REGISTRY: &str = "loggable::registry";

    /// Configuration loading and validation.
    pub const CONFIG: &str = "loggable::config";

    /// Sink threshold changes.
    pub const SINK: &str = "loggable::sink";
}

/// Returns whether logging is enabled at the given level for the given target.
#[inline]
#[must_use]
pub fn is_enabled(level: Level, target: &str) -> bool {
    log::log_enabled!(target: target, level)
}
