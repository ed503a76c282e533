//! Builds the enter, after and error messages for one invocation.

use std::time::Duration;

use loggable_core::template::{self, Bindings, placeholders};
use loggable_core::value::{ELLIPSIS, NULL, render_args};
use loggable_core::{Failure, Loggable, MessageFormats, Value};

use crate::invocation::Invocation;

/// Renders invocation messages from a set of [`MessageFormats`].
#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter<'a> {
    formats: &'a MessageFormats,
}

impl<'a> MessageFormatter<'a> {
    /// A formatter over `formats`.
    #[must_use]
    pub fn new(formats: &'a MessageFormats) -> Self {
        Self { formats }
    }

    /// The message emitted before the operation runs.
    #[must_use]
    pub fn enter(&self, invocation: &Invocation<'_>, directive: &Loggable) -> String {
        template::render(&self.formats.enter, &method_bindings(invocation, directive))
    }

    /// The message emitted after a successful return.
    #[must_use]
    pub fn after(
        &self,
        invocation: &Invocation<'_>,
        directive: &Loggable,
        result: &Value,
        elapsed: Duration,
    ) -> String {
        let result = if directive.skip_result {
            ELLIPSIS.to_string()
        } else {
            result.to_string()
        };
        let bindings = method_bindings(invocation, directive)
            .bind(placeholders::METHOD_RESULT, result)
            .bind(placeholders::METHOD_DURATION, format_duration(elapsed));
        template::render(&self.formats.after, &bindings)
    }

    /// The message emitted after a failure.
    #[must_use]
    pub fn error(
        &self,
        invocation: &Invocation<'_>,
        directive: &Loggable,
        elapsed: Duration,
        failure: &dyn Failure,
    ) -> String {
        let origin = failure.origin();
        let bindings = method_bindings(invocation, directive)
            .bind(placeholders::METHOD_DURATION, format_duration(elapsed))
            .bind(placeholders::ERROR_CLASS_NAME, failure.kind().name())
            .bind(placeholders::ERROR_MESSAGE, Value::display(failure).to_string())
            .bind(
                placeholders::ERROR_SOURCE_CLASS_NAME,
                origin.map_or(NULL, |o| o.module),
            )
            .bind(
                placeholders::ERROR_SOURCE_LINE,
                origin.map_or_else(|| NULL.to_string(), |o| o.line.to_string()),
            );
        template::render(&self.formats.error, &bindings)
    }
}

fn method_bindings(invocation: &Invocation<'_>, directive: &Loggable) -> Bindings {
    let args = if directive.skip_args {
        ELLIPSIS.to_string()
    } else {
        render_args(invocation.args())
    };
    Bindings::new()
        .bind(placeholders::METHOD_NAME, invocation.signature().name().to_string())
        .bind(placeholders::METHOD_ARGS, args)
}

/// Renders a duration for humans: `850ns`, `12µs`, `3ms`, `1.50s`, `2m 5s`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    if d.as_micros() < 1 {
        format!("{}ns", d.as_nanos())
    } else if d.as_millis() < 1 {
        format!("{}µs", d.as_micros())
    } else if d.as_millis() < 1000 {
        format!("{}ms", d.as_millis())
    } else if d.as_secs() < 60 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::MethodSignature;
    use loggable_core::{OperationError, args, kinds};

    #[test]
    fn duration_units() {
        assert_eq!(format_duration(Duration::from_nanos(850)), "850ns");
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_millis(3)), "3ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn after_message_with_args_and_result() {
        let sig = MethodSignature::new("app::Svc", "withParamsReturn");
        let inv = Invocation::start(&sig, args!["str", 10]);
        let formats = MessageFormats::default();
        let msg = MessageFormatter::new(&formats).after(
            &inv,
            &Loggable::new(),
            &Value::Scalar("10".into()),
            Duration::from_millis(2),
        );
        assert_eq!(msg, "#withParamsReturn(['str', 10]): 10 in 2ms");
    }

    #[test]
    fn skipped_args_and_result_render_ellipsis() {
        let sig = MethodSignature::new("app::Svc", "secret");
        let inv = Invocation::start(&sig, args!["password", 1234]);
        let formats = MessageFormats::default();
        let msg = MessageFormatter::new(&formats).after(
            &inv,
            &Loggable::new().skip_args().skip_result(),
            &Value::Text("token".into()),
            Duration::from_millis(1),
        );
        assert_eq!(msg, "#secret(..): .. in 1ms");
        assert!(!msg.contains("password"));
        assert!(!msg.contains("token"));
    }

    #[test]
    fn enter_message() {
        let sig = MethodSignature::new("app::Svc", "withEnter");
        let inv = Invocation::start(&sig, Vec::new());
        let formats = MessageFormats::default();
        let msg = MessageFormatter::new(&formats).enter(&inv, &Loggable::new());
        assert_eq!(msg, "#withEnter([]): entered");
    }

    #[test]
    fn error_message_names_kind_and_origin() {
        let sig = MethodSignature::new("app::Svc", "withThrow");
        let inv = Invocation::start(&sig, Vec::new());
        let line = line!() + 1;
        let err = OperationError::new(&kinds::FAILURE, "withThrow").in_module("app::svc");
        let formats = MessageFormats::default();
        let msg = MessageFormatter::new(&formats).error(
            &inv,
            &Loggable::new(),
            Duration::from_millis(4),
            &err,
        );
        assert_eq!(
            msg,
            format!("#withThrow([]): thrown Failure(withThrow) from app::svc[{line}] in 4ms")
        );
    }

    #[test]
    fn error_without_origin_uses_null() {
        let sig = MethodSignature::new("app::Svc", "read");
        let inv = Invocation::start(&sig, Vec::new());
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let formats = MessageFormats::default();
        let msg = MessageFormatter::new(&formats).error(
            &inv,
            &Loggable::new(),
            Duration::from_millis(1),
            &err,
        );
        assert_eq!(msg, "#read([]): thrown io::NotFound(gone) from NULL[NULL] in 1ms");
    }
}
