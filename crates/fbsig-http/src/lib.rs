//! HTTP layer for fbsig.
//!
//! This crate puts the signature interceptor in front of an application:
//!
//! - **Request decoding**: form bodies and the `Cookie` header become maps
//! - **Admission**: predicates deciding which requests are inspected at all
//! - **Interceptor**: trust-path verification, method rewriting and publishing
//!   of typed vendor fields
//! - **Service**: Hyper `Service` implementation tying it together
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fbsig_core::FacebookConfig;
//! use fbsig_http::{FacebookHttpService, FbSigResponseBody, Interceptor, handler_fn};
//!
//! let interceptor = Interceptor::new(FacebookConfig::new("secret").with_api_key("616313"));
//! let handler = handler_fn(|req| async move {
//!     let in_canvas = req
//!         .facebook()
//!         .and_then(|ctx| ctx.field("in_canvas"))
//!         .and_then(|v| v.as_bool())
//!         .unwrap_or(false);
//!     http::Response::new(FbSigResponseBody::from_string(format!("in canvas: {in_canvas}")))
//! });
//! let service = FacebookHttpService::new(Arc::new(handler), interceptor);
//! # let _ = service;
//! ```

pub mod admission;
pub mod body;
pub mod dispatch;
pub mod error;
pub mod interceptor;
pub mod request;
pub mod response;
pub mod service;

pub use admission::{AdmitAll, Admission, PathPrefix};
pub use body::FbSigResponseBody;
pub use dispatch::{FacebookHandler, HandlerFn, handler_fn};
pub use error::HttpError;
pub use interceptor::{Interceptor, Outcome};
pub use request::SignedRequest;
pub use service::{FacebookHttpService, REQUEST_ID_HEADER};
