//! Console log backend for loggable.
//!
//! This crate provides:
//! - [`ConsoleLogger`] - a `log` crate logger writing
//!   `LEVEL target - message` lines, optionally timestamped
//! - [`DisplayContext`] detection: coloured level labels for humans, plain
//!   text for agents and CI
//! - [`ConsoleConfig`] - programmatic and environment configuration
//! - [`testing::TestConsole`] - output capture for tests

#![forbid(unsafe_code)]

pub mod config;
pub mod detection;
pub mod logger;
pub mod testing;

pub use config::ConsoleConfig;
pub use detection::{DisplayContext, is_agent_context, should_enable_styling};
pub use logger::{ConsoleLogger, ConsoleLoggerBuilder};
