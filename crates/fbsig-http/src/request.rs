//! Decoded request handed to the interceptor and the downstream handler.
//!
//! The transport delivers headers and a raw body. Before the interceptor runs,
//! the body is decoded into a form map (for `application/x-www-form-urlencoded`
//! payloads) and the `Cookie` header into a cookie map.

use bytes::Bytes;
use fbsig_auth::RawParams;
use fbsig_core::FacebookContext;
use percent_encoding::percent_decode_str;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request with its form parameters and cookies decoded.
#[derive(Debug)]
pub struct SignedRequest {
    /// Method, URI, headers and extensions. The interceptor rewrites the
    /// method and publishes a [`FacebookContext`] into the extensions.
    pub parts: http::request::Parts,
    /// Decoded form parameters. After a successful params-path verification
    /// the signature and every vendor field have been removed.
    pub form: RawParams,
    /// Decoded cookies. Never modified.
    pub cookies: RawParams,
    /// The raw request body exactly as received.
    ///
    /// It is not stripped: it still holds the signature and every vendor
    /// field, verified or not. Read parameters from [`SignedRequest::form`]
    /// and typed values from [`SignedRequest::facebook`] rather than
    /// re-parsing this.
    pub body: Bytes,
}

impl SignedRequest {
    /// Decode form parameters and cookies from the request.
    #[must_use]
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        let form = if is_form_request(&parts) {
            parse_form(&body)
        } else {
            RawParams::new()
        };
        let cookies = parse_cookies(&parts.headers);

        Self {
            parts,
            form,
            cookies,
            body,
        }
    }

    /// The effective request method.
    #[must_use]
    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    /// The request URI.
    #[must_use]
    pub fn uri(&self) -> &http::Uri {
        &self.parts.uri
    }

    /// Values published by a successful params-path verification.
    #[must_use]
    pub fn facebook(&self) -> Option<&FacebookContext> {
        self.parts.extensions.get::<FacebookContext>()
    }

    /// A form parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }

    /// A cookie value.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// Whether the body should be read as a form.
///
/// Form content types are always decoded; a POST with no content type at all
/// is treated as a form too.
fn is_form_request(parts: &http::request::Parts) -> bool {
    match parts.headers.get(http::header::CONTENT_TYPE) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE)),
        None => parts.method == http::Method::POST,
    }
}

/// Decode an urlencoded body. Later duplicates replace earlier ones.
#[must_use]
pub fn parse_form(body: &[u8]) -> RawParams {
    form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Decode every `Cookie` header into a map, the way Rack reads cookies.
///
/// Pairs are separated by `;` or `,`. Names and values are trimmed and then
/// decoded like form components (`+` is a space, `%XX` an escaped byte), so a
/// signed cookie compares equal to the signer's copy. Quotes are kept as part
/// of the value. Pairs without `=` are skipped and the first occurrence of a
/// name wins.
#[must_use]
pub fn parse_cookies(headers: &http::HeaderMap) -> RawParams {
    let mut cookies = RawParams::new();

    for header in headers.get_all(http::header::COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for pair in header.split([';', ',']) {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = decode_component(name.trim());
            if name.is_empty() {
                continue;
            }
            cookies
                .entry(name)
                .or_insert_with(|| decode_component(value.trim()));
        }
    }

    cookies
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
