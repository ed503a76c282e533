//! Declarative method logging.
//!
//! Attach a [`Loggable`] directive to a type or to one of its methods, then
//! route calls through an [`Interceptor`]. Each call is logged on entry
//! (optionally), on success with its result and duration, or on failure
//! with the error's kind, message and origin. The interceptor only decides
//! whether and what to log; a [`Sink`] (by default the `log` facade)
//! decides where it goes.
//!
//! This crate provides:
//! - Method eligibility and directive resolution ([`MethodSignature`],
//!   [`DirectiveRegistry`])
//! - The interception policy ([`Interceptor`])
//! - The sink adapter ([`Sink`], [`LogSink`], [`set_min_level`])
//! - File and environment configuration ([`LoggableConfig`])
//! - Test capture ([`testing::TestSink`])
//!
//! # Example
//!
//! ```ignore
//! use loggable::{DirectiveRegistry, Interceptor, LogLevel, Loggable, MethodSignature, args, kinds};
//!
//! let registry = DirectiveRegistry::new()
//!     .with_type("app::Store", Loggable::new())
//!     .with_method("app::Store", "load", Loggable::at(LogLevel::Debug).ignore(&kinds::NOT_FOUND));
//! let interceptor = Interceptor::builder().registry(registry).build();
//!
//! let sig = MethodSignature::new("app::Store", "load");
//! let bytes = interceptor.invoke(&sig, args![path], || std::fs::read(path))?;
//! ```

#![forbid(unsafe_code)]

pub mod config;
mod formatter;
mod interceptor;
mod invocation;
mod registry;
mod signature;
pub mod sink;
pub mod testing;

pub use config::{ConfigError, DirectiveEntry, LoggableConfig};
pub use formatter::{MessageFormatter, format_duration};
pub use interceptor::{AlreadyInstalled, Interceptor, InterceptorBuilder, global};
pub use invocation::Invocation;
pub use registry::{DirectiveRegistry, DirectiveSource, Resolution};
pub use signature::{MethodSignature, OBJECT_PROTOCOL, Visibility};
pub use sink::{LogSink, Sink, min_level, set_min_level};

pub use loggable_core::{
    Bindings, Failure, FailureKind, FailureReport, LogLevel, LogValue, Loggable, MessageFormats,
    OperationError, Origin, PanicFailure, ParseLevelError, Value, args, failure, kinds,
};
pub use loggable_core::{classifier, logging, template, value};
