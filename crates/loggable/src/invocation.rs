//! Per-call invocation context.

use std::time::{Duration, Instant};

use loggable_core::Value;

use crate::signature::MethodSignature;

/// State of one intercepted call: what was called, with which arguments,
/// and when it started. Dropped when the call returns.
#[derive(Debug)]
pub struct Invocation<'a> {
    signature: &'a MethodSignature,
    args: Vec<Value>,
    started: Instant,
}

impl<'a> Invocation<'a> {
    /// Starts timing a call to `signature`.
    #[must_use]
    pub fn start(signature: &'a MethodSignature, args: Vec<Value>) -> Self {
        Self {
            signature,
            args,
            started: Instant::now(),
        }
    }

    /// The called method.
    #[must_use]
    pub fn signature(&self) -> &MethodSignature {
        self.signature
    }

    /// Argument values in declaration order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// When the call started.
    #[must_use]
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Time since the call started, on the monotonic clock.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
