//! Hyper `Service` wrapping a handler with the signature interceptor.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use tracing::Instrument;

use crate::body::FbSigResponseBody;
use crate::dispatch::{FacebookHandler, dispatch};
use crate::error::HttpError;
use crate::interceptor::{Interceptor, Outcome};
use crate::request::SignedRequest;
use crate::response::{error_to_response, invalid_signature_response};

/// Header carrying the per-request id on responses from the handler.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Hyper `Service` implementation guarding a [`FacebookHandler`].
///
/// Every request is decoded, run through the [`Interceptor`], and either
/// rejected with the fixed 400 response or handed to the handler. Handler
/// responses carry [`REQUEST_ID_HEADER`], matching the `request_id` field of
/// the request's log span; the rejection carries nothing beyond its fixed
/// shape. Cloning is
/// cheap; all clones share the handler and the configuration.
pub struct FacebookHttpService<H: FacebookHandler> {
    handler: Arc<H>,
    interceptor: Arc<Interceptor>,
}

impl<H: FacebookHandler> FacebookHttpService<H> {
    /// Create a new `FacebookHttpService`.
    pub fn new(handler: Arc<H>, interceptor: Interceptor) -> Self {
        Self {
            handler,
            interceptor: Arc::new(interceptor),
        }
    }

    /// The interceptor guarding the handler.
    #[must_use]
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

impl<H: FacebookHandler> Clone for FacebookHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            interceptor: Arc::clone(&self.interceptor),
        }
    }
}

impl<H: FacebookHandler> fmt::Debug for FacebookHttpService<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacebookHttpService")
            .field("interceptor", &self.interceptor)
            .finish_non_exhaustive()
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for FacebookHttpService<H>
where
    H: FacebookHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: fmt::Display + Send,
{
    type Response = http::Response<FbSigResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let interceptor = Arc::clone(&self.interceptor);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let span = tracing::debug_span!("request", request_id = %request_id);
            let response = process_request(req, handler.as_ref(), &interceptor, &request_id)
                .instrument(span)
                .await;
            Ok(response)
        })
    }
}

/// Process a single request through decoding, interception and dispatch.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    interceptor: &Interceptor,
    request_id: &str,
) -> http::Response<FbSigResponseBody>
where
    H: FacebookHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: fmt::Display,
{
    let (parts, body) = req.into_parts();

    // 1. Collect body.
    let body = match collect_body(body).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err),
    };

    // 2. Decode form and cookies.
    let mut request = SignedRequest::from_parts(parts, body);

    // 3. Intercept. The rejection goes out exactly as built.
    match interceptor.intercept(&mut request) {
        Outcome::Rejected { .. } => invalid_signature_response(),
        Outcome::PassThrough | Outcome::Authenticated(_) => {
            // 4. Dispatch to handler.
            let response = dispatch(handler, request).await;
            with_request_id(response, request_id)
        }
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(body: B) -> Result<Bytes, HttpError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: fmt::Display,
{
    body.collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| HttpError::Body(e.to_string()))
}

/// Tag a handler response with the id of the span it was produced in.
///
/// A handler that sets `x-request-id` itself keeps its own value.
fn with_request_id(
    mut response: http::Response<FbSigResponseBody>,
    request_id: &str,
) -> http::Response<FbSigResponseBody> {
    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        response
            .headers_mut()
            .entry(REQUEST_ID_HEADER)
            .or_insert(hv);
    }
    response
}
