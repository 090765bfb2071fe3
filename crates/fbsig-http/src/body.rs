//! Response body returned through the interceptor.
//!
//! Both the rejection and every handler response are small and produced in
//! one piece, so the body is always fully buffered.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// A buffered response body.
#[derive(Debug, Default)]
pub struct FbSigResponseBody(Full<Bytes>);

impl FbSigResponseBody {
    /// Body holding `data`.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self(Full::new(data.into()))
    }

    /// Body holding the UTF-8 bytes of `s`.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::from_bytes(s.into())
    }
}

impl From<String> for FbSigResponseBody {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl From<&'static str> for FbSigResponseBody {
    fn from(s: &'static str) -> Self {
        Self::from_bytes(s)
    }
}

impl http_body::Body for FbSigResponseBody {
    type Data = Bytes;
    type Error = std::convert::Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().0).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.0.is_end_stream()
    }

    fn size_hint(&self) -> http_body::SizeHint {
        self.0.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use http_body::Body as _;
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn test_should_yield_buffered_bytes() {
        let body = FbSigResponseBody::from_string("Invalid Facebook signature");
        assert_eq!(body.size_hint().exact(), Some(26));
        assert!(!body.is_end_stream());

        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(bytes, Bytes::from_static(b"Invalid Facebook signature"));
    }

    #[tokio::test]
    async fn test_should_default_to_empty_body() {
        let body = FbSigResponseBody::default();
        assert!(body.is_end_stream());
        assert!(body.collect().await.unwrap().to_bytes().is_empty());
    }

    #[test]
    fn test_should_convert_from_strings() {
        assert_eq!(FbSigResponseBody::from("ok").size_hint().exact(), Some(2));
        assert_eq!(
            FbSigResponseBody::from(String::from("{}")).size_hint().exact(),
            Some(2)
        );
    }
}
