//! Property tests for canonicalization, signing and extraction.

use std::collections::BTreeMap;

use fbsig_auth::canonical::canonical_string;
use fbsig_auth::extract::strip_vendor_prefix;
use fbsig_auth::{
    RawParams, TrustAnchors, Verification, compute_signature, evaluate, partition, sign_params,
    verify_signature,
};
use proptest::prelude::*;

// Strategy: field names as signers produce them
fn arb_field_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_]{1,12}").unwrap()
}

// Strategy: field values, including separators that must not be escaped
fn arb_field_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9,=. ]{0,16}").unwrap()
}

fn arb_fields() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(arb_field_name(), arb_field_value(), 0..10)
}

fn arb_secret() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{1,32}").unwrap()
}

// Strategy: raw form keys, some prefixed, some not
fn arb_form_key() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_field_name().prop_map(|k| format!("fb_sig_{k}")),
        arb_field_name(),
        arb_field_name().prop_map(|k| format!("{k}_fb_sig_")),
        Just("fb_sig".to_owned()),
    ]
}

proptest! {
    /// Property: the canonical string does not depend on input order.
    #[test]
    fn proptest_canonical_is_order_independent(
        (ordered, shuffled) in arb_fields().prop_flat_map(|fields| {
            let pairs: Vec<(String, String)> = fields.into_iter().collect();
            (Just(pairs.clone()), Just(pairs).prop_shuffle())
        })
    ) {
        prop_assert_eq!(canonical_string(ordered), canonical_string(shuffled));
    }

    /// Property: verification gives the same answer every time.
    #[test]
    fn proptest_verify_is_deterministic(
        fields in arb_fields(),
        secret in arb_secret(),
        supplied in "[0-9a-f]{32}",
    ) {
        let first = verify_signature(&fields, &supplied, &secret);
        let second = verify_signature(&fields, &supplied, &secret);
        prop_assert_eq!(first, second);
    }

    /// Property: a signature verifies against the fields it was computed over.
    #[test]
    fn proptest_sign_then_verify(fields in arb_fields(), secret in arb_secret()) {
        let signature = compute_signature(&fields, &secret);
        prop_assert!(verify_signature(&fields, &signature, &secret).is_ok());
    }

    /// Property: changing one character of one signed value breaks the signature.
    #[test]
    fn proptest_tampering_breaks_signature(
        fields in prop::collection::btree_map(
            arb_field_name(),
            prop::string::string_regex("[a-z0-9]{1,12}").unwrap(),
            1..8,
        ),
        secret in arb_secret(),
        field_index in any::<prop::sample::Index>(),
        char_index in any::<prop::sample::Index>(),
    ) {
        let signature = compute_signature(&fields, &secret);

        let mut tampered = fields.clone();
        let key = field_index.get(&fields.keys().cloned().collect::<Vec<_>>()).clone();
        let value = tampered.get_mut(&key).unwrap();
        let mut chars: Vec<char> = value.chars().collect();
        let pos = char_index.index(chars.len());
        chars[pos] = if chars[pos] == 'a' { 'b' } else { 'a' };
        *value = chars.into_iter().collect();

        prop_assert!(verify_signature(&tampered, &signature, &secret).is_err());
    }

    /// Property: partition moves every prefixed key out of the forwarded map
    /// and keeps every other key as it was.
    #[test]
    fn proptest_partition_is_exhaustive(
        form in prop::collection::btree_map(arb_form_key(), arb_field_value(), 0..12)
    ) {
        let split = partition(&form, "fb_sig");

        for key in split.remaining.keys() {
            prop_assert!(strip_vendor_prefix(key, "fb_sig").is_none());
        }
        for (key, value) in &form {
            match strip_vendor_prefix(key, "fb_sig") {
                Some(field) => prop_assert_eq!(split.vendor.get(field), Some(value)),
                None => prop_assert_eq!(split.remaining.get(key), Some(value)),
            }
        }
        prop_assert_eq!(split.vendor.len() + split.remaining.len(), form.len());
    }

    /// Property: a form signed by a well-behaved signer always verifies.
    #[test]
    fn proptest_signed_form_verifies(fields in arb_fields(), secret in arb_secret()) {
        let form: RawParams = fields
            .into_iter()
            .map(|(k, v)| (format!("fb_sig_{k}"), v))
            .collect();
        let signed = sign_params(&form, "fb_sig", &secret);
        let anchors = TrustAnchors {
            secret: &secret,
            signature_prefix: "fb_sig",
            api_key: None,
        };

        let outcome = evaluate(&signed, &RawParams::new(), anchors);
        prop_assert!(matches!(outcome, Verification::Params(_)));
    }
}
