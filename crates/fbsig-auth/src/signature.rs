//! MD5 parameter signatures.
//!
//! ```text
//! Signature = lowercase_hex(MD5(CanonicalString + Secret))
//! ```
//!
//! The secret is appended to the canonical string as plain text; this is not
//! an HMAC. MD5 is kept for wire compatibility with existing signers.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::canonical_string;
use crate::error::AuthError;

/// Compute the signature of a field set.
///
/// # Examples
///
/// ```
/// use fbsig_auth::signature::compute_signature;
///
/// let sig = compute_signature([("user", "22")], "secret");
/// assert_eq!(sig.len(), 32);
/// assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
#[must_use]
pub fn compute_signature<I, K, V>(fields: I, secret: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut payload = canonical_string(fields);
    payload.push_str(secret);
    hex::encode(Md5::digest(payload.as_bytes()))
}

/// Verify a supplied signature against a field set.
///
/// The comparison runs in constant time with respect to the signature bytes.
/// A mismatch is logged with the supplied value only; the expected digest is
/// a valid signature for the submitted fields and never leaves this function.
///
/// # Errors
///
/// Returns [`AuthError::MissingSecret`] when `secret` is empty and
/// [`AuthError::SignatureDoesNotMatch`] when the signature is wrong.
pub fn verify_signature<I, K, V>(fields: I, supplied: &str, secret: &str) -> Result<(), AuthError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let fields: Vec<(K, V)> = fields.into_iter().collect();
    let field_count = fields.len();
    let expected = compute_signature(fields, secret);

    if signatures_match(supplied, &expected) {
        debug!(fields = field_count, "signature verification succeeded");
        Ok(())
    } else {
        debug!(
            provided = %supplied,
            fields = field_count,
            "signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Constant-time string equality for signatures.
#[must_use]
pub fn signatures_match(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}
