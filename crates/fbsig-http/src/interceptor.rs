//! Request interception: admission, trust-path verification and publishing.
//!
//! The interceptor runs synchronously on an already decoded
//! [`SignedRequest`] and either lets it through (possibly rewritten) or asks
//! the caller to reject it. It holds nothing but immutable configuration.

use std::fmt;
use std::sync::Arc;

use fbsig_auth::{AuthError, Partition, TrustAnchors, TrustPath, Verification, evaluate};
use fbsig_core::context::{API_KEY_KEY, APP_NAME_KEY, ORIGINAL_METHOD_KEY, SECRET_KEY};
use fbsig_core::value::REQUEST_METHOD_FIELD;
use fbsig_core::{FacebookConfig, FacebookContext};
use tracing::{debug, warn};

use crate::admission::{AdmitAll, Admission};
use crate::request::SignedRequest;

/// What the caller should do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not admitted, or carried no vendor assertion. Forwarded unchanged.
    PassThrough,
    /// Signature verified. Forwarded, rewritten if it came through params.
    Authenticated(TrustPath),
    /// Signature present but wrong. Must not reach the handler.
    Rejected {
        /// Path the failing signature arrived on.
        path: TrustPath,
        /// Why verification failed.
        error: AuthError,
    },
}

/// Verifies signed requests and publishes their vendor fields.
#[derive(Clone)]
pub struct Interceptor {
    config: Arc<FacebookConfig>,
    admission: Arc<dyn Admission>,
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("config", &self.config)
            .field("admission", &"...")
            .finish()
    }
}

impl Interceptor {
    /// Create an interceptor that inspects every request.
    #[must_use]
    pub fn new(config: FacebookConfig) -> Self {
        Self {
            config: Arc::new(config),
            admission: Arc::new(AdmitAll),
        }
    }

    /// Replace the admission predicate.
    #[must_use]
    pub fn with_admission(mut self, admission: impl Admission + 'static) -> Self {
        self.admission = Arc::new(admission);
        self
    }

    /// Replace the admission predicate with a closure.
    #[must_use]
    pub fn with_admission_fn<F>(self, admission: F) -> Self
    where
        F: Fn(&http::request::Parts) -> bool + Send + Sync + 'static,
    {
        self.with_admission(admission)
    }

    /// The configuration this interceptor verifies against.
    #[must_use]
    pub fn config(&self) -> &FacebookConfig {
        &self.config
    }

    /// Whether the admission predicate lets the interceptor inspect a request.
    #[must_use]
    pub fn admits(&self, parts: &http::request::Parts) -> bool {
        self.admission.admit(parts)
    }

    /// Run the interceptor over a request.
    ///
    /// On a params-path success the request is rewritten in place: the method
    /// becomes the signed `request_method`, the form loses the signature and
    /// every vendor field, and a [`FacebookContext`] is inserted into the
    /// extensions. Every other outcome leaves the request untouched.
    pub fn intercept(&self, req: &mut SignedRequest) -> Outcome {
        if !self.admits(&req.parts) {
            debug!(path = %req.parts.uri.path(), "request not admitted, skipping verification");
            return Outcome::PassThrough;
        }

        let anchors = TrustAnchors {
            secret: &self.config.application_secret,
            signature_prefix: &self.config.signature_prefix,
            api_key: self.config.api_key.as_deref(),
        };

        match evaluate(&req.form, &req.cookies, anchors) {
            Verification::NotApplicable => Outcome::PassThrough,
            Verification::Params(split) => {
                self.apply_params(req, split);
                Outcome::Authenticated(TrustPath::Params)
            }
            Verification::Cookies(fields) => {
                debug!(fields = fields.len(), "signed cookies verified");
                Outcome::Authenticated(TrustPath::Cookies)
            }
            Verification::Invalid { path, error } => {
                debug!(path = %path, error = %error, "rejecting request with invalid signature");
                Outcome::Rejected { path, error }
            }
        }
    }

    fn apply_params(&self, req: &mut SignedRequest, split: Partition) {
        let Partition {
            mut vendor,
            remaining,
        } = split;
        let mut ctx = FacebookContext::new();

        ctx.insert_text(ORIGINAL_METHOD_KEY, req.parts.method.as_str());
        if let Some(method) = vendor.remove(REQUEST_METHOD_FIELD) {
            match http::Method::from_bytes(method.as_bytes()) {
                Ok(method) => req.parts.method = method,
                Err(_) => warn!(method = %method, "ignoring unusable signed request method"),
            }
        }

        for (field, raw) in &vendor {
            if !ctx.publish_raw(field, raw) {
                debug!(field = %field, "vendor field has no value, omitting");
            }
        }

        if self.config.publish_metadata {
            if let Some(name) = &self.config.application_name {
                ctx.insert_text(APP_NAME_KEY, name.as_str());
            }
            if let Some(api_key) = &self.config.api_key {
                ctx.insert_text(API_KEY_KEY, api_key.as_str());
            }
            ctx.insert_text(SECRET_KEY, self.config.application_secret.as_str());
        }

        debug!(
            method = %req.parts.method,
            published = ctx.len(),
            "signed parameters verified"
        );

        req.form = remaining;
        req.parts.extensions.insert(ctx);
    }
}
