//! Core types and configuration for fbsig.
//!
//! This crate holds the pieces shared by the verifier and the HTTP layer:
//! interceptor configuration, the typed coercion of vendor fields, and the
//! [`FacebookContext`] that carries the coerced values to the downstream
//! handler.

mod config;
pub mod context;
mod error;
pub mod value;

pub use config::{DEFAULT_SIGNATURE_PREFIX, FacebookConfig, ServerConfig};
pub use context::FacebookContext;
pub use error::{FbSigError, FbSigResult};
pub use value::{FieldKind, TypedValue, VendorField, coerce};
