//! Values published to the downstream handler after a successful verification.
//!
//! [`FacebookContext`] is a flat map keyed by namespaced strings
//! (`facebook.in_canvas`, `facebook.original_method`, ...). Absence of a key
//! means "unset"; there are no null placeholders.

use std::collections::BTreeMap;

use crate::value::{TypedValue, coerce};

/// Namespace prepended to every published key.
pub const CONTEXT_NAMESPACE: &str = "facebook";

/// Key holding the HTTP method the request arrived with.
pub const ORIGINAL_METHOD_KEY: &str = "facebook.original_method";

/// Key holding the configured application name.
pub const APP_NAME_KEY: &str = "facebook.app_name";

/// Key holding the configured API key.
pub const API_KEY_KEY: &str = "facebook.api_key";

/// Key holding the configured application secret.
pub const SECRET_KEY: &str = "facebook.secret";

/// Typed vendor parameters for a single request.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct FacebookContext {
    entries: BTreeMap<String, TypedValue>,
}

impl FacebookContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaced key for a vendor field.
    #[must_use]
    pub fn key(field: &str) -> String {
        format!("{CONTEXT_NAMESPACE}.{field}")
    }

    /// Store an already-typed value under the namespaced key of `field`.
    pub fn publish(&mut self, field: &str, value: TypedValue) {
        self.entries.insert(Self::key(field), value);
    }

    /// Coerce `raw` and store it. Returns `false` when the value coerced to
    /// nothing and the field was omitted.
    pub fn publish_raw(&mut self, field: &str, raw: &str) -> bool {
        match coerce(field, raw) {
            Some(value) => {
                self.publish(field, value);
                true
            }
            None => false,
        }
    }

    /// Store a string under a fully qualified key.
    pub fn insert_text(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(key.to_owned(), TypedValue::Text(value.into()));
    }

    /// Value stored under a fully qualified key such as `facebook.time`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.entries.get(key)
    }

    /// Value published for an unprefixed field name such as `time`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&TypedValue> {
        self.entries.get(&Self::key(field))
    }

    /// The method the request arrived with, before it was rewritten.
    #[must_use]
    pub fn original_method(&self) -> Option<&str> {
        self.get(ORIGINAL_METHOD_KEY).and_then(TypedValue::as_text)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all published entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of published entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
