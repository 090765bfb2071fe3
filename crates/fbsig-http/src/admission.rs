//! Admission predicates deciding whether the interceptor inspects a request.
//!
//! A request that is not admitted reaches the handler untouched, signed or not.

use http::request::Parts;

/// Gate evaluated once per request before any signature handling.
pub trait Admission: Send + Sync {
    /// Return `true` to inspect the request.
    fn admit(&self, parts: &Parts) -> bool;
}

impl<F> Admission for F
where
    F: Fn(&Parts) -> bool + Send + Sync,
{
    fn admit(&self, parts: &Parts) -> bool {
        self(parts)
    }
}

/// Inspect every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmitAll;

impl Admission for AdmitAll {
    fn admit(&self, _parts: &Parts) -> bool {
        true
    }
}

/// Inspect only requests whose path starts with a fixed prefix, for
/// applications that serve canvas pages under a dedicated subtree.
///
/// # Examples
///
/// ```
/// use fbsig_http::admission::{Admission, PathPrefix};
///
/// let gate = PathPrefix::new("/facebook_only");
/// let (parts, ()) = http::Request::get("/facebook_only/home").body(()).unwrap().into_parts();
/// assert!(gate.admit(&parts));
/// ```
#[derive(Debug, Clone)]
pub struct PathPrefix {
    prefix: String,
}

impl PathPrefix {
    /// Create a predicate admitting paths under `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Admission for PathPrefix {
    fn admit(&self, parts: &Parts) -> bool {
        parts.uri.path().starts_with(&self.prefix)
    }
}
