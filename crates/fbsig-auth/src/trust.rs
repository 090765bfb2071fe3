//! Trust-path selection and verification.
//!
//! A request can assert authenticity in one of two ways:
//!
//! - **Params**: a POST field named after the bare prefix (`fb_sig`) signs every
//!   `fb_sig_*` field of the same form.
//! - **Cookies**: a cookie named after the API key signs every `<api_key>_*`
//!   cookie.
//!
//! The params path wins when both are present. A request carrying neither is
//! not a signed request at all, which is different from carrying a bad one.

use std::fmt;

use tracing::debug;

use crate::error::AuthError;
use crate::extract::{Partition, RawParams, partition, vendor_fields};
use crate::signature::{compute_signature, verify_signature};

/// Which mechanism a request used to assert authenticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustPath {
    /// Signed POST parameters.
    Params,
    /// Signed cookies.
    Cookies,
}

impl fmt::Display for TrustPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Params => "params",
            Self::Cookies => "cookies",
        })
    }
}

/// Outcome of evaluating a request's vendor assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// No signature field and no signature cookie.
    NotApplicable,
    /// The POST parameters carried a valid signature.
    ///
    /// `remaining` holds the form without the signature and without any
    /// vendor field.
    Params(Partition),
    /// The cookies carried a valid signature. Holds the verified cookie fields.
    Cookies(RawParams),
    /// A signature was present but did not verify.
    Invalid {
        /// Path the failing signature arrived on.
        path: TrustPath,
        /// Why verification failed.
        error: AuthError,
    },
}

impl Verification {
    /// Whether the request must be rejected.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

/// Settings needed to evaluate a request.
#[derive(Clone, Copy)]
pub struct TrustAnchors<'a> {
    /// Shared secret.
    pub secret: &'a str,
    /// Prefix of the signed POST fields.
    pub signature_prefix: &'a str,
    /// API key naming the signature cookie; `None` disables the cookie path.
    pub api_key: Option<&'a str>,
}

impl fmt::Debug for TrustAnchors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustAnchors")
            .field("secret", &"...")
            .field("signature_prefix", &self.signature_prefix)
            .field("api_key", &self.api_key)
            .finish()
    }
}

/// Select the trust path for a request and verify it.
///
/// Extraction runs once, for the selected path only.
#[must_use]
pub fn evaluate(form: &RawParams, cookies: &RawParams, anchors: TrustAnchors<'_>) -> Verification {
    if let Some(signature) = form.get(anchors.signature_prefix) {
        return verify_params(form, signature, anchors);
    }

    if let Some(api_key) = anchors.api_key {
        if let Some(signature) = cookies.get(api_key) {
            return verify_cookies(cookies, signature, api_key, anchors.secret);
        }
    }

    debug!("no vendor signature present");
    Verification::NotApplicable
}

fn verify_params(form: &RawParams, signature: &str, anchors: TrustAnchors<'_>) -> Verification {
    let mut split = partition(form, anchors.signature_prefix);
    split.remaining.remove(anchors.signature_prefix);

    debug!(
        path = %TrustPath::Params,
        fields = split.vendor.len(),
        "verifying signed parameters"
    );

    match verify_signature(&split.vendor, signature, anchors.secret) {
        Ok(()) => Verification::Params(split),
        Err(error) => Verification::Invalid {
            path: TrustPath::Params,
            error,
        },
    }
}

fn verify_cookies(cookies: &RawParams, signature: &str, api_key: &str, secret: &str) -> Verification {
    let fields = vendor_fields(cookies, api_key);

    debug!(
        path = %TrustPath::Cookies,
        fields = fields.len(),
        "verifying signed cookies"
    );

    match verify_signature(&fields, signature, secret) {
        Ok(()) => Verification::Cookies(fields),
        Err(error) => Verification::Invalid {
            path: TrustPath::Cookies,
            error,
        },
    }
}

/// Sign every `prefix_*` entry of `params` and add the signature under the bare
/// prefix, replacing any previous one.
///
/// Produces exactly what a well-behaved signer sends: the same map can be
/// used as a POST form (prefix `fb_sig`) or a cookie jar (prefix = API key).
///
/// # Examples
///
/// ```
/// use fbsig_auth::{RawParams, sign_params};
///
/// let mut form = RawParams::new();
/// form.insert("fb_sig_user".to_owned(), "22".to_owned());
/// let signed = sign_params(&form, "fb_sig", "secret");
/// assert_eq!(signed["fb_sig"].len(), 32);
/// ```
#[must_use]
pub fn sign_params(params: &RawParams, prefix: &str, secret: &str) -> RawParams {
    let signature = compute_signature(vendor_fields(params, prefix), secret);
    let mut signed = params.clone();
    signed.insert(prefix.to_owned(), signature);
    signed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "123456789";
    const API_KEY: &str = "616313";

    fn params(pairs: &[(&str, &str)]) -> RawParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn anchors() -> TrustAnchors<'static> {
        TrustAnchors {
            secret: SECRET,
            signature_prefix: "fb_sig",
            api_key: Some(API_KEY),
        }
    }

    #[test]
    fn test_should_be_not_applicable_without_signature() {
        let form = params(&[("foo", "bar"), ("fb_sig_user", "1")]);
        let cookies = params(&[("session", "x")]);
        assert_eq!(evaluate(&form, &cookies, anchors()), Verification::NotApplicable);
    }

    #[test]
    fn test_should_verify_signed_params() {
        let form = sign_params(
            &params(&[("fb_sig_in_canvas", "1"), ("fb_sig_time", "1"), ("foo", "bar")]),
            "fb_sig",
            SECRET,
        );

        match evaluate(&form, &RawParams::new(), anchors()) {
            Verification::Params(split) => {
                assert_eq!(split.vendor, params(&[("in_canvas", "1"), ("time", "1")]));
                assert_eq!(split.remaining, params(&[("foo", "bar")]));
            }
            other => panic!("expected params verification, got {other:?}"),
        }
    }

    #[test]
    fn test_should_reject_invalid_param_signature() {
        let form = params(&[("fb_sig", "INVALID")]);
        let outcome = evaluate(&form, &RawParams::new(), anchors());
        assert_eq!(
            outcome,
            Verification::Invalid {
                path: TrustPath::Params,
                error: AuthError::SignatureDoesNotMatch,
            }
        );
        assert!(outcome.is_invalid());
    }

    #[test]
    fn test_should_reject_tampered_params() {
        let mut form = sign_params(&params(&[("fb_sig_user", "234433")]), "fb_sig", SECRET);
        form.insert("fb_sig_user".to_owned(), "234434".to_owned());
        assert!(evaluate(&form, &RawParams::new(), anchors()).is_invalid());
    }

    #[test]
    fn test_should_reject_injected_vendor_field() {
        let mut form = sign_params(&params(&[("fb_sig_user", "234433")]), "fb_sig", SECRET);
        form.insert("fb_sig_added".to_owned(), "1".to_owned());
        assert!(evaluate(&form, &RawParams::new(), anchors()).is_invalid());
    }

    #[test]
    fn test_should_verify_signed_cookies() {
        let cookies = sign_params(
            &params(&[("616313_user", "22"), ("616313_ss", "SEKRIT")]),
            API_KEY,
            SECRET,
        );

        match evaluate(&RawParams::new(), &cookies, anchors()) {
            Verification::Cookies(fields) => {
                assert_eq!(fields, params(&[("user", "22"), ("ss", "SEKRIT")]));
            }
            other => panic!("expected cookie verification, got {other:?}"),
        }
    }

    #[test]
    fn test_should_reject_invalid_cookie_signature() {
        let cookies = params(&[(API_KEY, "INVALID"), ("616313_ss", "SEKRIT")]);
        assert_eq!(
            evaluate(&RawParams::new(), &cookies, anchors()),
            Verification::Invalid {
                path: TrustPath::Cookies,
                error: AuthError::SignatureDoesNotMatch,
            }
        );
    }

    #[test]
    fn test_should_ignore_cookies_without_api_key() {
        let cookies = params(&[(API_KEY, "INVALID")]);
        let anchors = TrustAnchors {
            api_key: None,
            ..anchors()
        };
        assert_eq!(
            evaluate(&RawParams::new(), &cookies, anchors),
            Verification::NotApplicable
        );
    }

    #[test]
    fn test_should_prefer_params_over_cookies() {
        let form = sign_params(&params(&[("fb_sig_user", "1")]), "fb_sig", SECRET);
        let cookies = params(&[(API_KEY, "INVALID")]);
        assert!(matches!(
            evaluate(&form, &cookies, anchors()),
            Verification::Params(_)
        ));
    }

    #[test]
    fn test_should_replace_existing_signature_when_signing() {
        let form = params(&[("fb_sig", "stale"), ("fb_sig_user", "1")]);
        let signed = sign_params(&form, "fb_sig", SECRET);
        assert_ne!(signed["fb_sig"], "stale");
        assert_eq!(signed["fb_sig"], compute_signature([("user", "1")], SECRET));
    }
}
