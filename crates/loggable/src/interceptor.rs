//! The interception policy.
//!
//! [`Interceptor`] wraps one call at a time: it decides whether the call is
//! eligible, resolves the directive that governs it, times it and emits the
//! enter, after or error message through a [`Sink`]. The wrapped operation
//! runs exactly once and its value, error or panic reaches the caller
//! unchanged.
//!
//! # Example
//!
//! ```ignore
//! use loggable::{DirectiveRegistry, Interceptor, Loggable, LogLevel, MethodSignature, args};
//!
//! let registry = DirectiveRegistry::new()
//!     .with_type("app::Ledger", Loggable::at(LogLevel::Debug));
//! let interceptor = Interceptor::builder().registry(registry).build();
//!
//! let sig = MethodSignature::new("app::Ledger", "deposit");
//! let balance = interceptor.invoke(&sig, args![10], || ledger.deposit(10))?;
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use arc_swap::ArcSwap;
use loggable_core::logging::{debug, info, targets, trace, warn};
use loggable_core::{Failure, LogLevel, LogValue, Loggable, MessageFormats, PanicFailure, Value};

use crate::formatter::MessageFormatter;
use crate::invocation::Invocation;
use crate::registry::DirectiveRegistry;
use crate::signature::MethodSignature;
use crate::sink::{LogSink, Sink};

static GLOBAL: OnceLock<Interceptor> = OnceLock::new();

/// The process-wide interceptor, if one was installed with
/// [`Interceptor::install_global`].
#[must_use]
pub fn global() -> Option<&'static Interceptor> {
    GLOBAL.get()
}

/// Returned when a global interceptor is already installed.
#[derive(Debug, thiserror::Error)]
#[error("a global interceptor is already installed")]
pub struct AlreadyInstalled;

/// Wraps calls with directive-driven logging.
///
/// Cloning is cheap: clones share the registry, the sink and the published
/// message formats.
#[derive(Clone)]
pub struct Interceptor {
    registry: Arc<DirectiveRegistry>,
    sink: Arc<dyn Sink>,
    formats: Arc<ArcSwap<MessageFormats>>,
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("directives", &self.registry.len())
            .field("formats", &*self.formats.load_full())
            .finish_non_exhaustive()
    }
}

impl Interceptor {
    /// An interceptor over `registry` that emits through `sink` with the
    /// default message formats.
    #[must_use]
    pub fn new(registry: DirectiveRegistry, sink: impl Sink + 'static) -> Self {
        Self::builder().registry(registry).sink(sink).build()
    }

    /// Starts building an interceptor.
    #[must_use]
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::default()
    }

    /// The directive table.
    #[must_use]
    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// The currently published message formats.
    #[must_use]
    pub fn formats(&self) -> Arc<MessageFormats> {
        self.formats.load_full()
    }

    /// Publishes new message formats.
    ///
    /// Calls already in flight finish with the formats they started with.
    pub fn set_formats(&self, formats: MessageFormats) {
        for key in formats.unknown_placeholders() {
            warn!(target: targets::INTERCEPTOR, "message format uses unknown placeholder ${{{}}}", key);
        }
        self.formats.store(Arc::new(formats));
        debug!(target: targets::INTERCEPTOR, "message formats replaced");
    }

    /// Makes this interceptor reachable through [`global`].
    pub fn install_global(self) -> Result<(), AlreadyInstalled> {
        GLOBAL.set(self).map_err(|_| AlreadyInstalled)?;
        info!(target: targets::LOGGABLE, "global interceptor installed");
        Ok(())
    }

    /// Runs a fallible operation, rendering its result through [`LogValue`].
    pub fn invoke<T, E, F>(&self, signature: &MethodSignature, args: Vec<Value>, op: F) -> Result<T, E>
    where
        T: LogValue,
        E: Failure,
        F: FnOnce() -> Result<T, E>,
    {
        self.invoke_with(signature, args, |value: &T| value.log_value(), op)
    }

    /// Runs an infallible operation.
    pub fn call<T, F>(&self, signature: &MethodSignature, args: Vec<Value>, op: F) -> T
    where
        T: LogValue,
        F: FnOnce() -> T,
    {
        match self.invoke::<T, std::convert::Infallible, _>(signature, args, || Ok(op())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Runs a fallible operation, rendering its result with `render`.
    ///
    /// `render` is only called when the after message is actually emitted
    /// and the directive does not skip the result.
    pub fn invoke_with<T, E, F, R>(
        &self,
        signature: &MethodSignature,
        args: Vec<Value>,
        render: R,
        op: F,
    ) -> Result<T, E>
    where
        E: Failure,
        F: FnOnce() -> Result<T, E>,
        R: FnOnce(&T) -> Value,
    {
        if !signature.is_interceptable() {
            trace!(target: targets::INTERCEPTOR, "{} is not interceptable", signature);
            return op();
        }
        let Some(resolution) = self.registry.resolve(signature) else {
            return op();
        };
        self.intercept(resolution.directive, signature, args, render, op)
    }

    /// Runs a fallible operation under a directive the caller resolved.
    ///
    /// Eligibility still applies; the registry is not consulted.
    pub fn invoke_resolved<T, E, F, R>(
        &self,
        directive: &Loggable,
        signature: &MethodSignature,
        args: Vec<Value>,
        render: R,
        op: F,
    ) -> Result<T, E>
    where
        E: Failure,
        F: FnOnce() -> Result<T, E>,
        R: FnOnce(&T) -> Value,
    {
        if !signature.is_interceptable() {
            return op();
        }
        self.intercept(directive, signature, args, render, op)
    }

    fn intercept<T, E, F, R>(
        &self,
        directive: &Loggable,
        signature: &MethodSignature,
        args: Vec<Value>,
        render: R,
        op: F,
    ) -> Result<T, E>
    where
        E: Failure,
        F: FnOnce() -> Result<T, E>,
        R: FnOnce(&T) -> Value,
    {
        if directive.is_off() || !self.sink.enabled(directive.level) {
            return op();
        }

        let formats = self.formats.load_full();
        let formatter = MessageFormatter::new(&formats);
        let source = signature.owner();
        let invocation = Invocation::start(signature, args);

        if directive.log_on_entry {
            self.sink
                .emit(directive.level, source, &formatter.enter(&invocation, directive));
        }

        match panic::catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => {
                let elapsed = invocation.elapsed();
                let result = if directive.skip_result {
                    Value::Null
                } else {
                    Self::render_result(signature, render, &value)
                };
                let message = formatter.after(&invocation, directive, &result, elapsed);
                self.sink.emit(directive.level, source, &message);
                Ok(value)
            }
            Ok(Err(err)) => {
                let elapsed = invocation.elapsed();
                self.report(&formatter, &invocation, directive, elapsed, &err);
                Err(err)
            }
            Err(payload) => {
                let elapsed = invocation.elapsed();
                let failure = PanicFailure::from_payload(&*payload);
                self.report(&formatter, &invocation, directive, elapsed, &failure);
                panic::resume_unwind(payload)
            }
        }
    }

    fn render_result<T, R>(signature: &MethodSignature, render: R, value: &T) -> Value
    where
        R: FnOnce(&T) -> Value,
    {
        panic::catch_unwind(AssertUnwindSafe(|| render(value))).unwrap_or_else(|_| {
            warn!(target: targets::INTERCEPTOR, "rendering the result of {} panicked", signature);
            Value::unrenderable::<T>()
        })
    }

    fn report(
        &self,
        formatter: &MessageFormatter<'_>,
        invocation: &Invocation<'_>,
        directive: &Loggable,
        elapsed: Duration,
        failure: &dyn Failure,
    ) {
        let source = invocation.signature().owner();
        let message = formatter.error(invocation, directive, elapsed, failure);
        if directive.ignores(failure.kind()) {
            self.sink.emit(LogLevel::Error, source, &message);
        } else {
            self.sink.emit_failure(source, &message, failure);
        }
    }
}

/// Builder for [`Interceptor`].
#[derive(Default)]
pub struct InterceptorBuilder {
    registry: DirectiveRegistry,
    sink: Option<Arc<dyn Sink>>,
    formats: MessageFormats,
}

impl InterceptorBuilder {
    /// Sets the directive table.
    #[must_use]
    pub fn registry(mut self, registry: DirectiveRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the sink. Defaults to a [`LogSink`].
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Sets the initial message formats.
    #[must_use]
    pub fn formats(mut self, formats: MessageFormats) -> Self {
        self.formats = formats;
        self
    }

    /// Builds the interceptor.
    #[must_use]
    pub fn build(self) -> Interceptor {
        for key in self.formats.unknown_placeholders() {
            warn!(target: targets::INTERCEPTOR, "message format uses unknown placeholder ${{{}}}", key);
        }
        Interceptor {
            registry: Arc::new(self.registry),
            sink: self.sink.unwrap_or_else(|| Arc::new(LogSink::new())),
            formats: Arc::new(ArcSwap::from_pointee(self.formats)),
        }
    }
}
