//! Display forms for arguments and results.
//!
//! Every argument and result is turned into a [`Value`] before it reaches a
//! template. Rendering rules:
//!
//! | value | rendered as |
//! |-------|-------------|
//! | `"str"` / `String` | `'str'` |
//! | numbers, `bool`, `char` | their `Display` form (`1.2f32` → `1.2`) |
//! | slices, arrays, `Vec` | `[a, b, c]` |
//! | `()`, `None` | `NULL` |
//! | objects | `Display`, `Debug` or JSON, chosen by the caller |
//!
//! Rendering never fails: a `Display` impl that returns an error degrades to
//! `<unrenderable TypeName>`.

use std::fmt::{self, Write as _};

/// Rendered for `()`, `None` and other absent values.
pub const NULL: &str = "NULL";

/// Rendered in place of skipped arguments or results.
pub const ELLIPSIS: &str = "..";

/// A renderable argument or result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent value.
    Null,
    /// Text, rendered quoted.
    Text(String),
    /// Number, boolean or character, rendered as-is.
    Scalar(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Pre-rendered object representation.
    Object(String),
}

impl Value {
    /// Renders `value` through its `Display` impl.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Value::Object(render_best_effort::<T>(format_args!("{value}")))
    }

    /// Renders `value` through its `Debug` impl.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Value::Object(render_best_effort::<T>(format_args!("{value:?}")))
    }

    /// Renders `value` as compact JSON.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => Value::Object(json),
            Err(_) => Value::Object(unrenderable::<T>()),
        }
    }

    /// The placeholder shown when a `T` could not be rendered.
    #[must_use]
    pub fn unrenderable<T: ?Sized>() -> Self {
        Value::Object(unrenderable::<T>())
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(NULL),
            Value::Text(text) => write!(f, "'{text}'"),
            Value::Scalar(raw) | Value::Object(raw) => f.write_str(raw),
            Value::List(items) => write_list(f, items),
        }
    }
}

/// Renders an argument list: `[a, b]`, or `[]` when empty.
#[must_use]
pub fn render_args(args: &[Value]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_list(&mut out, args);
    out
}

fn write_list(out: &mut impl fmt::Write, items: &[Value]) -> fmt::Result {
    out.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{item}")?;
    }
    out.write_char(']')
}

fn render_best_effort<T: ?Sized>(args: fmt::Arguments<'_>) -> String {
    let mut out = String::new();
    match out.write_fmt(args) {
        Ok(()) => out,
        Err(_) => unrenderable::<T>(),
    }
}

fn unrenderable<T: ?Sized>() -> String {
    format!("<unrenderable {}>", std::any::type_name::<T>())
}

/// Conversion into a [`Value`] for logging.
///
/// Implemented for primitives, strings, sequences, `Option` and `()`. Other
/// types can implement it directly or be wrapped with [`Value::display`],
/// [`Value::debug`] or [`Value::json`].
pub trait LogValue {
    /// The display form of `self`.
    fn log_value(&self) -> Value;
}

macro_rules! scalar_log_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LogValue for $ty {
                fn log_value(&self) -> Value {
                    Value::Scalar(self.to_string())
                }
            }
        )*
    };
}

scalar_log_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl LogValue for str {
    fn log_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl LogValue for String {
    fn log_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl LogValue for () {
    fn log_value(&self) -> Value {
        Value::Null
    }
}

impl LogValue for Value {
    fn log_value(&self) -> Value {
        self.clone()
    }
}

impl<T: LogValue> LogValue for Option<T> {
    fn log_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, LogValue::log_value)
    }
}

impl<T: LogValue> LogValue for [T] {
    fn log_value(&self) -> Value {
        Value::List(self.iter().map(LogValue::log_value).collect())
    }
}

impl<T: LogValue, const N: usize> LogValue for [T; N] {
    fn log_value(&self) -> Value {
        self.as_slice().log_value()
    }
}

impl<T: LogValue> LogValue for Vec<T> {
    fn log_value(&self) -> Value {
        self.as_slice().log_value()
    }
}

impl<T: LogValue + ?Sized> LogValue for &T {
    fn log_value(&self) -> Value {
        (**self).log_value()
    }
}

impl<T: LogValue + ?Sized> LogValue for Box<T> {
    fn log_value(&self) -> Value {
        (**self).log_value()
    }
}

impl<T: LogValue + ?Sized> LogValue for std::sync::Arc<T> {
    fn log_value(&self) -> Value {
        (**self).log_value()
    }
}

impl LogValue for std::time::Duration {
    fn log_value(&self) -> Value {
        Value::debug(self)
    }
}

/// Builds an argument list from expressions implementing [`LogValue`].
///
/// ```ignore
/// let args = args!["alice", 10, [1.5_f32, 2.5]];
/// assert_eq!(render_args(&args), "['alice', 10, [1.5, 2.5]]");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::value::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::value::LogValue::log_value(&$arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn strings_are_quoted() {
        assert_eq!("str".log_value().to_string(), "'str'");
        assert_eq!(String::from("x").log_value().to_string(), "'x'");
    }

    #[test]
    fn scalars_use_display() {
        assert_eq!(10_i32.log_value().to_string(), "10");
        assert_eq!(true.log_value().to_string(), "true");
        assert_eq!(1.2_f32.log_value().to_string(), "1.2");
    }

    #[test]
    fn arrays_render_as_lists() {
        assert_eq!([1, 2, 3].log_value().to_string(), "[1, 2, 3]");
        assert_eq!(
            vec![true, false, true].log_value().to_string(),
            "[true, false, true]"
        );
        assert_eq!([1.2_f32, 3.4, 5.6].log_value().to_string(), "[1.2, 3.4, 5.6]");
    }

    #[test]
    fn absent_values_render_null() {
        assert_eq!(().log_value().to_string(), NULL);
        assert_eq!(None::<i32>.log_value().to_string(), NULL);
        assert_eq!(Some(4).log_value().to_string(), "4");
    }

    #[test]
    fn args_macro_builds_list() {
        let args = crate::args!["str", 10];
        assert_eq!(render_args(&args), "['str', 10]");
        assert_eq!(render_args(&crate::args![]), "[]");
    }

    #[test]
    fn nested_array_argument() {
        let args = crate::args![[1, 2, 3]];
        assert_eq!(render_args(&args), "[[1, 2, 3]]");
    }

    #[test]
    fn object_renderings() {
        assert_eq!(Value::display(&42).to_string(), "42");
        assert_eq!(Value::debug("q").to_string(), "\"q\"");
        assert_eq!(
            Value::json(&serde_json::json!({"a": 1})).to_string(),
            "{\"a\":1}"
        );
    }

    #[test]
    fn broken_display_degrades() {
        let rendered = Value::display(&Broken).to_string();
        assert!(rendered.starts_with("<unrenderable "));
        assert!(rendered.contains("Broken"));
    }
}
