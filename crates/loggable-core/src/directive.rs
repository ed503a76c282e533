//! The [`Loggable`] directive.

use serde::{Deserialize, Serialize};

use crate::classifier;
use crate::failure::FailureKind;
use crate::level::LogLevel;

/// How calls to one method, or to every method of one type, are logged.
///
/// A directive is immutable once registered. When both a method and its
/// owning type carry one, the method's directive replaces the type's
/// entirely; fields are never merged.
///
/// # Example
///
/// ```ignore
/// use loggable_core::{Loggable, LogLevel, kinds};
///
/// let directive = Loggable::at(LogLevel::Debug)
///     .log_on_entry()
///     .skip_result()
///     .ignore(&kinds::NOT_FOUND);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Loggable {
    /// Level of the enter and after messages.
    pub level: LogLevel,
    /// Emit the enter message before the operation runs.
    #[serde(alias = "entered")]
    pub log_on_entry: bool,
    /// Render `..` instead of the argument list.
    #[serde(alias = "skip_arguments")]
    pub skip_args: bool,
    /// Render `..` instead of the result.
    pub skip_result: bool,
    /// Failure kind names logged without failure detail.
    #[serde(alias = "ignored")]
    pub ignore: Vec<String>,
}

impl Loggable {
    /// A directive with default settings (`Info`, nothing skipped).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A default directive at `level`.
    #[must_use]
    pub fn at(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Sets the level.
    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Emits the enter message.
    #[must_use]
    pub fn log_on_entry(mut self) -> Self {
        self.log_on_entry = true;
        self
    }

    /// Hides argument values.
    #[must_use]
    pub fn skip_args(mut self) -> Self {
        self.skip_args = true;
        self
    }

    /// Hides the result value.
    #[must_use]
    pub fn skip_result(mut self) -> Self {
        self.skip_result = true;
        self
    }

    /// Adds `kind` to the ignore set.
    #[must_use]
    pub fn ignore(self, kind: &FailureKind) -> Self {
        self.ignore_named(kind.name())
    }

    /// Adds a kind to the ignore set by name.
    #[must_use]
    pub fn ignore_named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.ignore.contains(&name) {
            self.ignore.push(name);
        }
        self
    }

    /// Whether a failure of `kind` is in this directive's ignore set.
    #[must_use]
    pub fn ignores(&self, kind: &FailureKind) -> bool {
        classifier::is_ignored(&self.ignore, kind)
    }

    /// Whether this directive disables logging entirely.
    #[must_use]
    pub fn is_off(&self) -> bool {
        self.level.is_off()
    }
}
