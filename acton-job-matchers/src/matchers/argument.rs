//! Expected-argument matchers
//!
//! Every expected argument of [`have_enqueued_job`](super::have_enqueued_job)
//! is an [`ArgumentMatcher`]. Plain values convert into literal matchers, so
//! most expectations never name this type:
//!
//! ```rust
//! use acton_job_matchers::matchers::argument::{a_string, an_integer, ArgumentMatcher};
//! use serde_json::json;
//!
//! assert!(ArgumentMatcher::from("string").matches(&json!("string")));
//! assert!(a_string().matches(&json!("anything textual")));
//! assert!(!an_integer().matches(&json!(1.5)));
//! ```

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// JSON kind accepted by a kind-of matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// JSON string
    String,
    /// Number without a fractional part
    Integer,
    /// Number stored as floating point
    Float,
    /// Any number
    Number,
    /// `true` or `false`
    Boolean,
    /// JSON object
    Hash,
    /// JSON array
    Array,
    /// `null`
    Null,
}

impl Kind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_f64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Hash => value.is_object(),
            Self::Array => value.is_array(),
            Self::Null => value.is_null(),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Number => "Numeric",
            Self::Boolean => "Boolean",
            Self::Hash => "Hash",
            Self::Array => "Array",
            Self::Null => "Null",
        }
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// One expected job argument
#[derive(Clone)]
pub enum ArgumentMatcher {
    /// Equal to this JSON value
    Eq(Value),
    /// Any value
    Anything,
    /// Any value of this kind
    KindOf(Kind),
    /// An object containing at least these keys, each accepted by its matcher
    HashIncluding(BTreeMap<String, ArgumentMatcher>),
    /// A value accepted by a custom predicate
    Predicate {
        /// Text shown in matcher messages
        description: String,
        /// Test applied to the actual value
        predicate: Predicate,
    },
}

impl ArgumentMatcher {
    /// Whether `actual` satisfies this matcher
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Eq(expected) => expected == actual,
            Self::Anything => true,
            Self::KindOf(kind) => kind.accepts(actual),
            Self::HashIncluding(expected) => actual.as_object().is_some_and(|actual| {
                expected
                    .iter()
                    .all(|(key, matcher)| actual.get(key).is_some_and(|value| matcher.matches(value)))
            }),
            Self::Predicate { predicate, .. } => predicate(actual),
        }
    }
}

impl fmt::Display for ArgumentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(value) => write!(f, "{value}"),
            Self::Anything => f.write_str("anything"),
            Self::KindOf(Kind::Null) => f.write_str("null"),
            Self::KindOf(kind) => write!(f, "a kind of {}", kind.name()),
            Self::HashIncluding(expected) => {
                f.write_str("hash_including({")?;
                for (index, (key, matcher)) in expected.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {matcher}", Value::from(key.as_str()))?;
                }
                f.write_str("})")
            }
            Self::Predicate { description, .. } => f.write_str(description),
        }
    }
}

impl fmt::Debug for ArgumentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgumentMatcher({self})")
    }
}

/// Matches any value
#[must_use]
pub const fn anything() -> ArgumentMatcher {
    ArgumentMatcher::Anything
}

/// Matches any string
#[must_use]
pub const fn a_string() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::String)
}

/// Matches any integral number
#[must_use]
pub const fn an_integer() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Integer)
}

/// Matches any floating point number
#[must_use]
pub const fn a_float() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Float)
}

/// Matches any number
#[must_use]
pub const fn a_number() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Number)
}

/// Matches `true` or `false`
#[must_use]
pub const fn a_boolean() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Boolean)
}

/// Matches any object
#[must_use]
pub const fn a_hash() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Hash)
}

/// Matches any array
#[must_use]
pub const fn an_array() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Array)
}

/// Matches `null`
#[must_use]
pub const fn null() -> ArgumentMatcher {
    ArgumentMatcher::KindOf(Kind::Null)
}

/// Matches an object that contains every given key
///
/// Values may be literals or other matchers. Extra keys on the actual object
/// are ignored.
///
/// ```rust
/// use acton_job_matchers::matchers::argument::{a_string, hash_including};
/// use serde_json::json;
///
/// let matcher = hash_including([("key", a_string())]);
/// assert!(matcher.matches(&json!({ "key": "value", "bar": "foo" })));
/// assert!(!matcher.matches(&json!({ "bar": "foo" })));
/// ```
#[must_use]
pub fn hash_including<K, M>(entries: impl IntoIterator<Item = (K, M)>) -> ArgumentMatcher
where
    K: Into<String>,
    M: Into<ArgumentMatcher>,
{
    ArgumentMatcher::HashIncluding(
        entries
            .into_iter()
            .map(|(key, matcher)| (key.into(), matcher.into()))
            .collect(),
    )
}

/// Matches values accepted by `predicate`
///
/// `description` is what matcher messages print for this argument.
#[must_use]
pub fn satisfying<F>(description: impl Into<String>, predicate: F) -> ArgumentMatcher
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    ArgumentMatcher::Predicate {
        description: description.into(),
        predicate: Arc::new(predicate),
    }
}

impl From<Value> for ArgumentMatcher {
    fn from(value: Value) -> Self {
        Self::Eq(value)
    }
}

impl From<Map<String, Value>> for ArgumentMatcher {
    fn from(map: Map<String, Value>) -> Self {
        Self::Eq(Value::Object(map))
    }
}

impl From<&str> for ArgumentMatcher {
    fn from(value: &str) -> Self {
        Self::Eq(Value::from(value))
    }
}

impl From<String> for ArgumentMatcher {
    fn from(value: String) -> Self {
        Self::Eq(Value::from(value))
    }
}

impl From<i32> for ArgumentMatcher {
    fn from(value: i32) -> Self {
        Self::Eq(Value::from(value))
    }
}

impl From<i64> for ArgumentMatcher {
    fn from(value: i64) -> Self {
        Self::Eq(Value::from(value))
    }
}

impl From<u64> for ArgumentMatcher {
    fn from(value: u64) -> Self {
        Self::Eq(Value::from(value))
    }
}

impl From<f64> for ArgumentMatcher {
    fn from(value: f64) -> Self {
        Self::Eq(Value::from(value))
    }
}

impl From<bool> for ArgumentMatcher {
    fn from(value: bool) -> Self {
        Self::Eq(Value::from(value))
    }
}
