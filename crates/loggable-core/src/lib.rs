//! Core types for loggable.
//!
//! This crate provides the building blocks the interceptor is made of:
//! - [`LogLevel`] and the [`Loggable`] directive
//! - [`FailureKind`] metadata, the [`Failure`] trait and the ignore-set
//!   [`classifier`]
//! - [`Value`] display forms for arguments and results
//! - The `${key}` [`template`] engine and [`MessageFormats`]
//!
//! # Design Principles
//!
//! - No runtime reflection: failure ancestry is declared as static metadata
//! - Rendering never fails; broken `Display` impls degrade to a placeholder
//! - All types are `Send + Sync`

#![forbid(unsafe_code)]

pub mod classifier;
mod directive;
pub mod failure;
mod level;
pub mod logging;
pub mod template;
pub mod value;

pub use directive::Loggable;
pub use failure::{Failure, FailureKind, FailureReport, OperationError, Origin, PanicFailure, kinds};
pub use level::{AtomicLevel, LogLevel, ParseLevelError};
pub use template::{Bindings, MessageFormats};
pub use value::{LogValue, Value};
