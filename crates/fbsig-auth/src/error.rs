//! Authentication error types.

/// Errors raised while verifying a signed parameter set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The supplied signature does not match the one computed locally.
    #[error("the request signature does not match the signed parameters")]
    SignatureDoesNotMatch,

    /// No secret is available to compute the expected signature.
    #[error("no application secret is configured")]
    MissingSecret,
}
