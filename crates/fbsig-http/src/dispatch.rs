//! Downstream handler trait and dispatch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::body::FbSigResponseBody;
use crate::request::SignedRequest;

/// Boxed future returned by [`FacebookHandler::handle`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = http::Response<FbSigResponseBody>> + Send>>;

/// The application sitting behind the interceptor.
///
/// The handler receives the request after interception: when a signed form
/// was verified, the method is already rewritten, the vendor fields are gone
/// from the form, and [`SignedRequest::facebook`] returns the published
/// values. It is called exactly once for every request that is not rejected.
pub trait FacebookHandler: Send + Sync + 'static {
    /// Handle a request and produce an HTTP response.
    fn handle(&self, req: SignedRequest) -> HandlerFuture;
}

/// Dispatch a request to the handler.
pub async fn dispatch<H: FacebookHandler>(
    handler: &H,
    req: SignedRequest,
) -> http::Response<FbSigResponseBody> {
    tracing::debug!(method = %req.parts.method, path = %req.parts.uri.path(), "dispatching request");
    handler.handle(req).await
}

/// Handler built from an async closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Wrap an async closure as a [`FacebookHandler`].
///
/// # Examples
///
/// ```
/// use fbsig_http::{FbSigResponseBody, handler_fn};
///
/// let handler = handler_fn(|_req| async {
///     http::Response::new(FbSigResponseBody::from_string("hello"))
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(SignedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = http::Response<FbSigResponseBody>> + Send + 'static,
{
    HandlerFn { f }
}

impl<F, Fut> FacebookHandler for HandlerFn<F>
where
    F: Fn(SignedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = http::Response<FbSigResponseBody>> + Send + 'static,
{
    fn handle(&self, req: SignedRequest) -> HandlerFuture {
        Box::pin((self.f)(req))
    }
}
