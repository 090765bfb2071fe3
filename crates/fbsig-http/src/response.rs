//! Fixed responses produced by the HTTP layer itself.

use crate::body::FbSigResponseBody;
use crate::error::HttpError;

/// Content type of the signature rejection.
pub const REJECTION_CONTENT_TYPE: &str = "text/html";

/// Body of the signature rejection.
pub const REJECTION_BODY: &str = "Invalid Facebook signature";

/// The response sent when a signature fails to verify.
///
/// Always `400` with a fixed `text/html` body, whichever trust path failed.
#[must_use]
pub fn invalid_signature_response() -> http::Response<FbSigResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::BAD_REQUEST)
        .header(http::header::CONTENT_TYPE, REJECTION_CONTENT_TYPE)
        .body(FbSigResponseBody::from_string(REJECTION_BODY))
        .expect("static rejection response should be valid")
}

/// Convert a transport error into a plain-text response.
#[must_use]
pub fn error_to_response(error: &HttpError) -> http::Response<FbSigResponseBody> {
    http::Response::builder()
        .status(error.status_code())
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body(FbSigResponseBody::from_string(error.to_string()))
        .expect("valid error response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_rejection_response() {
        let resp = invalid_signature_response();
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/html"),
        );
    }

    #[test]
    fn test_should_map_body_errors_to_server_errors() {
        let resp = error_to_response(&HttpError::Body("connection reset".to_owned()));
        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
