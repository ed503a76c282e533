//! Failure kinds and the [`Failure`] trait.
//!
//! A [`FailureKind`] is static metadata describing what an operation failed
//! with: a unique name, an optional parent kind and a set of capability
//! kinds. Directives list kind names in their ignore set and the classifier
//! walks this graph to decide whether a failure matches.
//!
//! ```ignore
//! use loggable_core::failure::{FailureKind, kinds};
//!
//! static LEDGER: FailureKind = FailureKind::extends("app::Ledger", &kinds::FAILURE);
//! static RETRYABLE: [&FailureKind; 1] = [&kinds::TRANSIENT];
//! static OVERDRAWN: FailureKind =
//!     FailureKind::extends("app::Overdrawn", &LEDGER).with_capabilities(&RETRYABLE);
//! ```

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

/// Static description of a failure type.
///
/// Two kinds are equal when their names are equal, so names must be unique
/// across the process (module-qualified names are recommended).
pub struct FailureKind {
    name: &'static str,
    parent: Option<&'static FailureKind>,
    capabilities: &'static [&'static FailureKind],
}

impl FailureKind {
    /// A kind with no parent.
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            capabilities: &[],
        }
    }

    /// A kind whose parent is `parent`.
    #[must_use]
    pub const fn extends(name: &'static str, parent: &'static FailureKind) -> Self {
        Self {
            name,
            parent: Some(parent),
            capabilities: &[],
        }
    }

    /// Declares the capabilities this kind implements directly.
    #[must_use]
    pub const fn with_capabilities(self, capabilities: &'static [&'static FailureKind]) -> Self {
        Self {
            name: self.name,
            parent: self.parent,
            capabilities,
        }
    }

    /// The unique name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The parent kind, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&'static FailureKind> {
        self.parent
    }

    /// Capabilities implemented directly by this kind.
    #[must_use]
    pub fn capabilities(&self) -> &'static [&'static FailureKind] {
        self.capabilities
    }

    /// Iterates the parent chain, starting with this kind's parent.
    pub fn ancestors(&self) -> impl Iterator<Item = &'static FailureKind> {
        std::iter::successors(self.parent, |kind| kind.parent)
    }

    /// Whether this kind is `name`, or descends from it through parents or
    /// capabilities.
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        crate::classifier::descends_from(self, name)
    }
}

impl PartialEq for FailureKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FailureKind {}

impl fmt::Debug for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureKind")
            .field("name", &self.name)
            .field("parent", &self.parent.map(FailureKind::name))
            .field(
                "capabilities",
                &self
                    .capabilities
                    .iter()
                    .map(|c| c.name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Built-in failure kinds.
pub mod kinds {
    use super::FailureKind;

    /// Root of every built-in kind.
    pub static FAILURE: FailureKind = FailureKind::root("Failure");

    /// Capability of failures that may succeed on a later attempt.
    pub static TRANSIENT: FailureKind = FailureKind::root("Transient");

    static TRANSIENT_ONLY: [&FailureKind; 1] = [&TRANSIENT];

    /// A panic raised by the wrapped operation.
    pub static PANIC: FailureKind = FailureKind::extends("Panic", &FAILURE);

    /// Any `std::io::Error` without a more specific kind.
    pub static IO: FailureKind = FailureKind::extends("io::Error", &FAILURE);

    pub static NOT_FOUND: FailureKind = FailureKind::extends("io::NotFound", &IO);
    pub static PERMISSION_DENIED: FailureKind =
        FailureKind::extends("io::PermissionDenied", &IO);
    pub static ALREADY_EXISTS: FailureKind = FailureKind::extends("io::AlreadyExists", &IO);
    pub static INVALID_INPUT: FailureKind = FailureKind::extends("io::InvalidInput", &IO);
    pub static INVALID_DATA: FailureKind = FailureKind::extends("io::InvalidData", &IO);
    pub static UNEXPECTED_EOF: FailureKind = FailureKind::extends("io::UnexpectedEof", &IO);
    pub static CONNECTION_REFUSED: FailureKind =
        FailureKind::extends("io::ConnectionRefused", &IO).with_capabilities(&TRANSIENT_ONLY);
    pub static CONNECTION_RESET: FailureKind =
        FailureKind::extends("io::ConnectionReset", &IO).with_capabilities(&TRANSIENT_ONLY);
    pub static TIMED_OUT: FailureKind =
        FailureKind::extends("io::TimedOut", &IO).with_capabilities(&TRANSIENT_ONLY);
    pub static INTERRUPTED: FailureKind =
        FailureKind::extends("io::Interrupted", &IO).with_capabilities(&TRANSIENT_ONLY);
    pub static WOULD_BLOCK: FailureKind =
        FailureKind::extends("io::WouldBlock", &IO).with_capabilities(&TRANSIENT_ONLY);

    /// Maps an `std::io::ErrorKind` to its built-in kind.
    #[must_use]
    pub fn io(kind: std::io::ErrorKind) -> &'static FailureKind {
        use std::io::ErrorKind;
        match kind {
            ErrorKind::NotFound => &NOT_FOUND,
            ErrorKind::PermissionDenied => &PERMISSION_DENIED,
            ErrorKind::AlreadyExists => &ALREADY_EXISTS,
            ErrorKind::InvalidInput => &INVALID_INPUT,
            ErrorKind::InvalidData => &INVALID_DATA,
            ErrorKind::UnexpectedEof => &UNEXPECTED_EOF,
            ErrorKind::ConnectionRefused => &CONNECTION_REFUSED,
            ErrorKind::ConnectionReset => &CONNECTION_RESET,
            ErrorKind::TimedOut => &TIMED_OUT,
            ErrorKind::Interrupted => &INTERRUPTED,
            ErrorKind::WouldBlock => &WOULD_BLOCK,
            _ => &IO,
        }
    }
}

/// Where a failure was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    /// Module path, or the source file when the module is unknown.
    pub module: &'static str,
    /// Source file.
    pub file: &'static str,
    /// Line number within `file`.
    pub line: u32,
}

impl Origin {
    /// The origin of the caller of the enclosing `#[track_caller]` function.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            module: location.file(),
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.module, self.file, self.line)
    }
}

/// Anything a wrapped operation can fail with.
pub trait Failure: Error {
    /// The kind used for ignore-set matching and `error.class.name`.
    fn kind(&self) -> &'static FailureKind;

    /// Where the failure was raised, if known.
    fn origin(&self) -> Option<Origin> {
        None
    }

    /// Captured backtrace, if any.
    fn backtrace(&self) -> Option<&Backtrace> {
        None
    }
}

impl Failure for std::io::Error {
    fn kind(&self) -> &'static FailureKind {
        kinds::io(std::io::Error::kind(self))
    }
}

impl Failure for std::convert::Infallible {
    fn kind(&self) -> &'static FailureKind {
        match *self {}
    }
}

impl<F: Failure + ?Sized> Failure for &F {
    fn kind(&self) -> &'static FailureKind {
        (**self).kind()
    }

    fn origin(&self) -> Option<Origin> {
        (**self).origin()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        (**self).backtrace()
    }
}

/// General-purpose failure carrying a kind, message, origin and backtrace.
///
/// The backtrace is captured according to `RUST_BACKTRACE` /
/// `RUST_LIB_BACKTRACE`, exactly like [`Backtrace::capture`].
pub struct OperationError {
    kind: &'static FailureKind,
    message: String,
    origin: Origin,
    backtrace: Backtrace,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl OperationError {
    /// Creates a failure raised at the caller's location.
    ///
    /// Only the file and line are known here, so the origin's module is the
    /// file path until [`in_module`](Self::in_module) sets it. Prefer
    /// [`failure!`](crate::failure!), which does both.
    #[track_caller]
    #[must_use]
    pub fn new(kind: &'static FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            origin: Origin::caller(),
            backtrace: Backtrace::capture(),
            source: None,
        }
    }

    /// Records the module path the failure was raised in.
    #[must_use]
    pub fn in_module(mut self, module: &'static str) -> Self {
        self.origin.module = module;
        self
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationError")
            .field("kind", &self.kind.name())
            .field("message", &self.message)
            .field("origin", &self.origin)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl Failure for OperationError {
    fn kind(&self) -> &'static FailureKind {
        self.kind
    }

    fn origin(&self) -> Option<Origin> {
        Some(self.origin)
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        Some(&self.backtrace)
    }
}

/// Creates an [`OperationError`] with a formatted message, recording the
/// current module and line.
///
/// ```ignore
/// return Err(failure!(kinds::INVALID_INPUT, "amount {} is negative", amount));
/// ```
#[macro_export]
macro_rules! failure {
    ($kind:expr, $($arg:tt)+) => {
        $crate::failure::OperationError::new(&$kind, format!($($arg)+)).in_module(module_path!())
    };
}

/// A panic payload seen by the interceptor.
#[derive(Debug)]
pub struct PanicFailure {
    message: String,
}

impl PanicFailure {
    /// Extracts the message from a panic payload.
    ///
    /// Payloads that are neither `&str` nor `String` render as
    /// `Box<dyn Any>`.
    #[must_use]
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self { message }
    }
}

impl fmt::Display for PanicFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for PanicFailure {}

impl Failure for PanicFailure {
    fn kind(&self) -> &'static FailureKind {
        &kinds::PANIC
    }
}

/// Multi-line diagnostic report for a failure.
///
/// Renders the kind and message, the origin, every `source()` in the chain
/// and the backtrace when one was captured.
pub struct FailureReport<'a>(pub &'a dyn Failure);

impl fmt::Display for FailureReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failure = self.0;
        write!(f, "{}: {}", failure.kind(), failure)?;
        if let Some(origin) = failure.origin() {
            write!(f, "\n\tat {origin}")?;
        }
        let mut cause = failure.source();
        while let Some(err) = cause {
            write!(f, "\nCaused by: {err}")?;
            cause = err.source();
        }
        if let Some(backtrace) = failure.backtrace() {
            if backtrace.status() == BacktraceStatus::Captured {
                write!(f, "\n{backtrace}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LEDGER: FailureKind = FailureKind::extends("test::Ledger", &kinds::FAILURE);

    #[test]
    fn kind_equality_is_by_name() {
        static OTHER: FailureKind = FailureKind::root("test::Ledger");
        assert_eq!(LEDGER, OTHER);
        assert_ne!(LEDGER, kinds::FAILURE);
    }

    #[test]
    fn ancestors_walk_parent_chain() {
        let names: Vec<_> = kinds::NOT_FOUND.ancestors().map(FailureKind::name).collect();
        assert_eq!(names, vec!["io::Error", "Failure"]);
    }

    #[test]
    fn io_errors_map_to_kinds() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Failure::kind(&err).name(), "io::NotFound");

        let err = std::io::Error::other("boom");
        assert_eq!(Failure::kind(&err).name(), "io::Error");
    }

    #[test]
    fn operation_error_records_origin() {
        let line = line!() + 1;
        let err = OperationError::new(&LEDGER, "overdrawn");
        let origin = err.origin().unwrap();
        assert_eq!(origin.line, line);
        assert!(origin.file.ends_with("failure.rs"));
        assert_eq!(origin.module, origin.file);
        assert_eq!(err.to_string(), "overdrawn");

        let err = err.in_module(module_path!());
        assert_eq!(err.origin().unwrap().module, module_path!());
    }

    #[test]
    fn failure_macro_records_module() {
        let err = failure!(LEDGER, "balance {} too low", 5);
        assert_eq!(err.message(), "balance 5 too low");
        assert_eq!(err.origin().unwrap().module, module_path!());
    }

    #[test]
    fn panic_payloads_are_described() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(PanicFailure::from_payload(payload.as_ref()).to_string(), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(PanicFailure::from_payload(payload.as_ref()).to_string(), "owned");

        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(PanicFailure::from_payload(payload.as_ref()).to_string(), "Box<dyn Any>");
    }

    #[test]
    fn report_includes_cause_chain() {
        let cause = std::io::Error::other("disk full");
        let err = OperationError::new(&LEDGER, "write failed").with_source(cause);
        let report = FailureReport(&err).to_string();
        assert!(report.starts_with("test::Ledger: write failed"));
        assert!(report.contains("\n\tat "));
        assert!(report.contains("Caused by: disk full"));
    }
}
