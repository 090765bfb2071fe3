//! Canonical string construction for signed parameter sets.
//!
//! The canonical form of a field set is:
//!
//! ```text
//! sort([key1=value1, key2=value2, ...]).concat()
//! ```
//!
//! Each pair is joined with a literal `=` and no escaping, and the *joined*
//! strings are sorted in ascending byte order. Sorting by key first and joining
//! afterwards gives a different order whenever a key contains a byte that sorts
//! below `=` (for example `a!` versus `a`), so the two must not be confused.

/// Build the canonical string for a set of `(key, value)` pairs.
///
/// Insertion order of the input is irrelevant. An empty input yields an empty
/// string.
///
/// # Examples
///
/// ```
/// use fbsig_auth::canonical::canonical_string;
///
/// assert_eq!(
///     canonical_string([("time", "1"), ("in_canvas", "1")]),
///     "in_canvas=1time=1"
/// );
/// assert_eq!(canonical_string::<_, &str, &str>([]), "");
/// ```
#[must_use]
pub fn canonical_string<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<String> = fields
        .into_iter()
        .map(|(k, v)| join_pair(k.as_ref(), v.as_ref()))
        .collect();

    pairs.sort_unstable();
    pairs.concat()
}

fn join_pair(key: &str, value: &str) -> String {
    let mut pair = String::with_capacity(key.len() + value.len() + 1);
    pair.push_str(key);
    pair.push('=');
    pair.push_str(value);
    pair
}
