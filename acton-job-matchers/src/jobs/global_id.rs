//! Global identifiers for resources passed as job arguments.
//!
//! Application jobs never carry a persisted resource by value. The adapter
//! replaces it with a reference of the form
//! `{"_aj_globalid": "gid://<app>/<model>/<id>"}` which the worker resolves
//! again at perform time.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use super::{JobError, JobResult};

/// Key under which a serialized resource reference stores its URI.
pub const GLOBAL_ID_KEY: &str = "_aj_globalid";

static GLOBAL_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^gid://([^/]+)/([^/]+)/([^/]+)$").expect("Invalid regex"));

/// Reference to a persisted resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    app: String,
    model: String,
    id: String,
}

impl GlobalId {
    /// Build a global id from its parts.
    #[must_use]
    pub fn new(app: impl Into<String>, model: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            model: model.into(),
            id: id.into(),
        }
    }

    /// Application segment.
    #[must_use]
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Model name segment.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Resource id segment.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// URI form, `gid://<app>/<model>/<id>`.
    #[must_use]
    pub fn uri(&self) -> String {
        self.to_string()
    }

    /// Serialized reference as it appears in job arguments.
    #[must_use]
    pub fn to_argument(&self) -> Value {
        json!({ GLOBAL_ID_KEY: self.uri() })
    }

    /// Read a serialized reference back out of a job argument.
    ///
    /// Returns `None` when `value` is not a reference object.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::InvalidGlobalId`] when the object carries a
    /// malformed URI.
    pub fn from_argument(value: &Value) -> JobResult<Option<Self>> {
        value
            .get(GLOBAL_ID_KEY)
            .and_then(Value::as_str)
            .map(str::parse)
            .transpose()
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gid://{}/{}/{}", self.app, self.model, self.id)
    }
}

impl FromStr for GlobalId {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = GLOBAL_ID_PATTERN
            .captures(s)
            .ok_or_else(|| JobError::InvalidGlobalId(s.to_string()))?;

        Ok(Self::new(&captures[1], &captures[2], &captures[3]))
    }
}

/// A resource that can be referenced by a [`GlobalId`].
///
/// # Example
///
/// ```rust
/// use acton_job_matchers::jobs::GlobalIdentifiable;
///
/// struct User {
///     id: i64,
/// }
///
/// impl GlobalIdentifiable for User {
///     const MODEL_NAME: &'static str = "User";
///
///     fn global_key(&self) -> String {
///         self.id.to_string()
///     }
/// }
///
/// let gid = User { id: 7 }.to_global_id("acton");
/// assert_eq!(gid.uri(), "gid://acton/User/7");
/// ```
pub trait GlobalIdentifiable {
    /// Model segment of the global id.
    const MODEL_NAME: &'static str;

    /// Id segment of the global id.
    fn global_key(&self) -> String;

    /// Global id of this resource within `app`.
    fn to_global_id(&self, app: &str) -> GlobalId {
        GlobalId::new(app, Self::MODEL_NAME, self.global_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Invoice(u32);

    impl GlobalIdentifiable for Invoice {
        const MODEL_NAME: &'static str = "Billing::Invoice";

        fn global_key(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_uri_format() {
        let gid = GlobalId::new("acton", "User", "42");
        assert_eq!(gid.uri(), "gid://acton/User/42");
    }

    #[test]
    fn test_parse_uri() {
        let gid: GlobalId = "gid://shop/Billing::Invoice/9".parse().unwrap();
        assert_eq!(gid.app(), "shop");
        assert_eq!(gid.model(), "Billing::Invoice");
        assert_eq!(gid.id(), "9");
    }

    #[test]
    fn test_parse_rejects_malformed_uri() {
        for input in ["", "gid://acton/User", "http://acton/User/1", "gid://acton/User/1/extra"] {
            let err = input.parse::<GlobalId>().unwrap_err();
            assert!(matches!(err, JobError::InvalidGlobalId(_)), "{input}");
        }
    }

    #[test]
    fn test_argument_round_trip() {
        let gid = Invoice(12).to_global_id("acton");
        let argument = gid.to_argument();
        assert_eq!(argument, json!({ "_aj_globalid": "gid://acton/Billing::Invoice/12" }));
        assert_eq!(GlobalId::from_argument(&argument).unwrap(), Some(gid));
    }

    #[test]
    fn test_from_argument_ignores_plain_values() {
        assert_eq!(GlobalId::from_argument(&json!("someResource")).unwrap(), None);
        assert_eq!(GlobalId::from_argument(&json!({ "key": "value" })).unwrap(), None);
    }

    #[test]
    fn test_from_argument_rejects_bad_uri() {
        let result = GlobalId::from_argument(&json!({ "_aj_globalid": "nope" }));
        assert!(matches!(result, Err(JobError::InvalidGlobalId(_))));
    }
}
