//! Message templates.
//!
//! Templates are plain strings with `${key}` placeholders. Rendering is a
//! single left-to-right substitution pass: no loops, conditionals or nested
//! templates. Keys without a binding and unterminated `${` are copied
//! through verbatim.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Placeholder keys bound by the interceptor.
pub mod placeholders {
    pub const METHOD_NAME: &str = "method.name";
    pub const METHOD_ARGS: &str = "method.args";
    pub const METHOD_RESULT: &str = "method.result";
    pub const METHOD_DURATION: &str = "method.duration";
    pub const ERROR_CLASS_NAME: &str = "error.class.name";
    pub const ERROR_MESSAGE: &str = "error.message";
    /// Module path of the failure's origin.
    ///
    /// Failures built with [`failure!`](crate::failure!) or
    /// `OperationError::in_module` carry a module path; a bare
    /// `OperationError::new` only knows its source file, which is rendered
    /// here instead. `NULL` when the failure has no origin.
    pub const ERROR_SOURCE_CLASS_NAME: &str = "error.source.class.name";
    pub const ERROR_SOURCE_LINE: &str = "error.source.line";

    /// Every key the interceptor may bind.
    pub const ALL: [&str; 8] = [
        METHOD_NAME,
        METHOD_ARGS,
        METHOD_RESULT,
        METHOD_DURATION,
        ERROR_CLASS_NAME,
        ERROR_MESSAGE,
        ERROR_SOURCE_CLASS_NAME,
        ERROR_SOURCE_LINE,
    ];
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<(Cow<'static, str>, String)>,
}

impl Bindings {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `value`, replacing an earlier binding of the same key.
    #[must_use]
    pub fn bind(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Binds `key` to `value` in place.
    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of bound keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Substitutes `${key}` placeholders in `template`.
#[must_use]
pub fn render(template: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after_open[..end];
        match bindings.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after_open[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Lists the placeholder keys used in `template`, in order of appearance.
#[must_use]
pub fn placeholders_in(template: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find('}') else {
            break;
        };
        keys.push(&after_open[..end]);
        rest = &after_open[end + 1..];
    }
    keys
}

/// The three message templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageFormats {
    /// Emitted before the operation runs, when the directive asks for it.
    pub enter: String,
    /// Emitted after a successful return.
    pub after: String,
    /// Emitted after a failure.
    pub error: String,
}

impl Default for MessageFormats {
    fn default() -> Self {
        Self {
            enter: "#${method.name}(${method.args}): entered".to_string(),
            after: "#${method.name}(${method.args}): ${method.result} in ${method.duration}"
                .to_string(),
            error: "#${method.name}(${method.args}): thrown ${error.class.name}(${error.message}) \
                    from ${error.source.class.name}[${error.source.line}] in ${method.duration}"
                .to_string(),
        }
    }
}

impl MessageFormats {
    /// Creates the default formats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the enter template.
    #[must_use]
    pub fn with_enter(mut self, template: impl Into<String>) -> Self {
        self.enter = template.into();
        self
    }

    /// Replaces the after template.
    #[must_use]
    pub fn with_after(mut self, template: impl Into<String>) -> Self {
        self.after = template.into();
        self
    }

    /// Replaces the error template.
    #[must_use]
    pub fn with_error(mut self, template: impl Into<String>) -> Self {
        self.error = template.into();
        self
    }

    /// Placeholder keys that no message kind ever binds.
    ///
    /// The enter and after templates only receive `method.*` keys; the
    /// error template receives every key except `method.result`.
    #[must_use]
    pub fn unknown_placeholders(&self) -> Vec<String> {
        use placeholders::{
            ERROR_CLASS_NAME, ERROR_MESSAGE, ERROR_SOURCE_CLASS_NAME, ERROR_SOURCE_LINE,
            METHOD_ARGS, METHOD_DURATION, METHOD_NAME, METHOD_RESULT,
        };

        let enter: &[&str] = &[METHOD_NAME, METHOD_ARGS];
        let after: &[&str] = &[METHOD_NAME, METHOD_ARGS, METHOD_RESULT, METHOD_DURATION];
        let error: &[&str] = &[
            METHOD_NAME,
            METHOD_ARGS,
            METHOD_DURATION,
            ERROR_CLASS_NAME,
            ERROR_MESSAGE,
            ERROR_SOURCE_CLASS_NAME,
            ERROR_SOURCE_LINE,
        ];

        let mut unknown = Vec::new();
        for (template, known) in [(&self.enter, enter), (&self.after, after), (&self.error, error)]
        {
            for key in placeholders_in(template) {
                if !known.contains(&key) && !unknown.iter().any(|k| k == key) {
                    unknown.push(key.to_string());
                }
            }
        }
        unknown
    }
}
