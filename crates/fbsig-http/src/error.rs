//! Errors raised by the HTTP layer around the interceptor.

/// Transport-level failures. Signature failures are not errors here; they
/// become the fixed rejection response.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),
}

impl HttpError {
    /// Status code sent for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::Body(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
