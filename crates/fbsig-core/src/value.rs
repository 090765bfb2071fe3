//! Typed coercion of vendor fields.
//!
//! The set of fields with a non-string representation is closed: booleans,
//! timestamps and the friends list. Everything else passes through as the raw
//! string. Coercion never fails loudly; a value that cannot be represented
//! yields `None` and the caller omits the field.

use std::fmt;

use chrono::{DateTime, Utc};

/// Vendor field carrying the client's original HTTP method.
///
/// Consumed by the interceptor before coercion and never published as a field.
pub const REQUEST_METHOD_FIELD: &str = "request_method";

/// Vendor fields with a known typed representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorField {
    /// `added`: the user has added the application.
    Added,
    /// `in_canvas`: the request comes from a canvas page.
    InCanvas,
    /// `in_new_facebook`: the user is on the redesigned site.
    InNewFacebook,
    /// `position_fix`
    PositionFix,
    /// `page_added`
    PageAdded,
    /// `in_profile_tab`
    InProfileTab,
    /// `logged_out_facebook`
    LoggedOutFacebook,
    /// `expires`: session expiry.
    Expires,
    /// `profile_update_time`
    ProfileUpdateTime,
    /// `time`: signing time.
    Time,
    /// `friends`: comma-separated friend IDs.
    Friends,
}

/// Representation a [`VendorField`] is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `"1"` is true, anything else false.
    Boolean,
    /// Floating seconds since the Unix epoch, `"0"` meaning unset.
    Timestamp,
    /// Comma-separated list.
    List,
}

impl VendorField {
    /// Every known field.
    pub const ALL: [Self; 11] = [
        Self::Added,
        Self::InCanvas,
        Self::InNewFacebook,
        Self::PositionFix,
        Self::PageAdded,
        Self::InProfileTab,
        Self::LoggedOutFacebook,
        Self::Expires,
        Self::ProfileUpdateTime,
        Self::Time,
        Self::Friends,
    ];

    /// Look up a field by its unprefixed wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Unprefixed wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::InCanvas => "in_canvas",
            Self::InNewFacebook => "in_new_facebook",
            Self::PositionFix => "position_fix",
            Self::PageAdded => "page_added",
            Self::InProfileTab => "in_profile_tab",
            Self::LoggedOutFacebook => "logged_out_facebook",
            Self::Expires => "expires",
            Self::ProfileUpdateTime => "profile_update_time",
            Self::Time => "time",
            Self::Friends => "friends",
        }
    }

    /// How the raw value of this field is interpreted.
    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Added
            | Self::InCanvas
            | Self::InNewFacebook
            | Self::PositionFix
            | Self::PageAdded
            | Self::InProfileTab
            | Self::LoggedOutFacebook => FieldKind::Boolean,
            Self::Expires | Self::ProfileUpdateTime | Self::Time => FieldKind::Timestamp,
            Self::Friends => FieldKind::List,
        }
    }

    /// Coerce a raw value of this field.
    #[must_use]
    pub fn coerce(self, raw: &str) -> Option<TypedValue> {
        match self.kind() {
            FieldKind::Boolean => Some(TypedValue::Bool(raw == "1")),
            FieldKind::Timestamp => parse_timestamp(raw).map(TypedValue::Timestamp),
            FieldKind::List => Some(TypedValue::List(split_list(raw))),
        }
    }
}

impl fmt::Display for VendorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced vendor value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// Boolean flag.
    Bool(bool),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// List of strings.
    List(Vec<String>),
    /// Raw string, for fields without a typed representation.
    Text(String),
}

impl TypedValue {
    /// The boolean, if this is a [`TypedValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The timestamp, if this is a [`TypedValue::Timestamp`].
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// The list, if this is a [`TypedValue::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The string, if this is a [`TypedValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Coerce a vendor field by name.
///
/// Unknown names pass through as [`TypedValue::Text`]. Returns `None` only for
/// timestamp fields whose value is `"0"` or not a finite number.
///
/// # Examples
///
/// ```
/// use fbsig_core::value::{TypedValue, coerce};
///
/// assert_eq!(coerce("in_canvas", "1"), Some(TypedValue::Bool(true)));
/// assert_eq!(coerce("user", "234433"), Some(TypedValue::Text("234433".to_owned())));
/// assert_eq!(coerce("expires", "0"), None);
/// ```
#[must_use]
pub fn coerce(name: &str, raw: &str) -> Option<TypedValue> {
    match VendorField::from_name(name) {
        Some(field) => field.coerce(raw),
        None => Some(TypedValue::Text(raw.to_owned())),
    }
}

/// Parse floating seconds since the epoch. `"0"` is the protocol's "unset".
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw == "0" {
        return None;
    }

    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }

    let whole = seconds.floor();
    // i64 bounds as f64; anything outside is beyond chrono's range anyway.
    if whole < -9.2e18 || whole > 9.2e18 {
        return None;
    }
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);

    DateTime::from_timestamp(whole as i64, nanos)
}

fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_owned).collect()
}
