//! Extraction of vendor-prefixed fields from raw parameter maps.
//!
//! A vendor field is any key starting with `prefix + "_"`. The bare prefix is
//! the signature itself and is never a vendor field.

use std::collections::BTreeMap;

/// Decoded form parameters or cookies.
pub type RawParams = BTreeMap<String, String>;

/// Result of splitting a parameter map by namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Vendor fields with the prefix and underscore stripped.
    pub vendor: RawParams,
    /// Everything else, untouched.
    pub remaining: RawParams,
}

/// Strip `prefix_` from the start of `key`.
///
/// # Examples
///
/// ```
/// use fbsig_auth::extract::strip_vendor_prefix;
///
/// assert_eq!(strip_vendor_prefix("fb_sig_user", "fb_sig"), Some("user"));
/// assert_eq!(strip_vendor_prefix("fb_sig", "fb_sig"), None);
/// assert_eq!(strip_vendor_prefix("x_fb_sig_user", "fb_sig"), None);
/// ```
#[must_use]
pub fn strip_vendor_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix)?.strip_prefix('_')
}

/// Split `source` into vendor fields and the rest.
///
/// Returns fresh containers; `source` is left as it was. Callers that forward
/// the parameters downstream forward [`Partition::remaining`].
#[must_use]
pub fn partition(source: &RawParams, prefix: &str) -> Partition {
    let mut out = Partition::default();

    for (key, value) in source {
        match strip_vendor_prefix(key, prefix) {
            Some(field) => {
                out.vendor.insert(field.to_owned(), value.clone());
            }
            None => {
                out.remaining.insert(key.clone(), value.clone());
            }
        }
    }

    out
}

/// Collect the vendor fields of a read-only source such as the cookie jar.
#[must_use]
pub fn vendor_fields(source: &RawParams, prefix: &str) -> RawParams {
    source
        .iter()
        .filter_map(|(key, value)| {
            strip_vendor_prefix(key, prefix).map(|field| (field.to_owned(), value.clone()))
        })
        .collect()
}
