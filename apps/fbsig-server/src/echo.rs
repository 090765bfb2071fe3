//! Echo handler reporting what the interceptor left on the request.

use fbsig_http::dispatch::HandlerFuture;
use fbsig_http::{FacebookHandler, FbSigResponseBody, SignedRequest};
use serde_json::json;

/// Handler answering every request with a JSON description of itself.
///
/// The body carries the effective method, the path, the forwarded form and
/// the published `facebook.*` entries (`null` when nothing was published).
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl FacebookHandler for EchoHandler {
    fn handle(&self, req: SignedRequest) -> HandlerFuture {
        let body = json!({
            "method": req.method().as_str(),
            "path": req.uri().path(),
            "form": &req.form,
            "facebook": req.facebook(),
        });

        Box::pin(async move { json_response(http::StatusCode::OK, &body) })
    }
}

fn json_response(
    status: http::StatusCode,
    body: &serde_json::Value,
) -> http::Response<FbSigResponseBody> {
    let mut response = http::Response::new(FbSigResponseBody::from_string(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}
