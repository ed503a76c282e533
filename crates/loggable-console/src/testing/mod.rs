//! Testing utilities for loggable console output
//!
//! Provides `TestConsole` for capturing and asserting on log lines in tests.

mod test_console;

pub use test_console::TestConsole;
