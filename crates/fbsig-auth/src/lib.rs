//! Signing and verification of vendor-prefixed request parameters.
//!
//! Canvas requests carry their vendor data as `fb_sig_*` POST fields (or
//! `<api_key>_*` cookies) together with an MD5 signature over those fields.
//! This crate implements the verification side.
//!
//! # Usage
//!
//! ```rust
//! use fbsig_auth::{RawParams, TrustAnchors, Verification, evaluate, sign_params};
//!
//! let mut form = RawParams::new();
//! form.insert("fb_sig_in_canvas".to_owned(), "1".to_owned());
//! let form = sign_params(&form, "fb_sig", "secret");
//!
//! let anchors = TrustAnchors {
//!     secret: "secret",
//!     signature_prefix: "fb_sig",
//!     api_key: None,
//! };
//! assert!(matches!(
//!     evaluate(&form, &RawParams::new(), anchors),
//!     Verification::Params(_)
//! ));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Order-independent canonical string of a field set
//! - [`signature`] - MD5 signature computation and constant-time verification
//! - [`extract`] - Splitting raw parameters by namespace prefix
//! - [`trust`] - Trust-path selection (params or cookies)
//! - [`error`] - Authentication error types

pub mod canonical;
pub mod error;
pub mod extract;
pub mod signature;
pub mod trust;

pub use error::AuthError;
pub use extract::{Partition, RawParams, partition, vendor_fields};
pub use signature::{compute_signature, verify_signature};
pub use trust::{TrustAnchors, TrustPath, Verification, evaluate, sign_params};
