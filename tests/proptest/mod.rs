// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for sql-size-policy.
//!
//! Uses proptest to generate random inputs and verify invariants.

#[path = "../common/mod.rs"]
mod common;

use proptest::prelude::*;

use common::fixtures::{SqlBuilder, build_validation_request, decode_response};
use sql_size_policy::Settings;
use sql_size_policy::policy::{ValidationResponse, validate};

/// Strategy for generating size identifiers.
fn any_size() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("small".to_string()),
        Just("medium".to_string()),
        Just("large".to_string()),
        Just("Medium".to_string()),
        Just(String::new()),
        "[a-zA-Z0-9 ._-]{0,12}",
    ]
}

/// Strategy for generating non-empty allow-lists.
fn any_allow_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(any_size(), 1..6)
}

/// Strategy for generating resource names.
fn any_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}"
}

proptest! {
    /// Property: An empty allow-list permits every size.
    #[test]
    fn test_empty_allow_list_permits_everything(size in any_size()) {
        prop_assert!(Settings::default().is_size_allowed(&size));
    }

    /// Property: A non-empty allow-list permits exactly its members.
    #[test]
    fn test_allow_list_membership(allowed in any_allow_list(), size in any_size()) {
        let expected = allowed.contains(&size);
        let settings = Settings { allowed_sizes: allowed };
        prop_assert_eq!(settings.is_size_allowed(&size), expected);
    }

    /// Property: Parsing the same settings bytes twice yields equal settings.
    #[test]
    fn test_settings_parsing_idempotent(allowed in prop::collection::vec(any_size(), 0..6)) {
        let payload = serde_json::to_vec(&serde_json::json!({"allowed_sizes": allowed})).unwrap();
        let first = Settings::parse(&payload).unwrap();
        let second = Settings::parse(&payload).unwrap();
        prop_assert_eq!(&first.allowed_sizes, &allowed);
        prop_assert_eq!(first, second);
    }

    /// Property: Encoding then decoding a response preserves it.
    #[test]
    fn test_response_roundtrip(
        accepted in any::<bool>(),
        message in proptest::option::of(".{0,40}"),
        code in proptest::option::of(any::<u16>())
    ) {
        let response = ValidationResponse { accepted, message, code };
        let decoded: ValidationResponse =
            serde_json::from_slice(&response.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(decoded, response);
    }

    /// Property: The decision follows the allow-list and never carries a code.
    #[test]
    fn test_decision_matches_allow_list(
        name in any_name(),
        allowed in any_allow_list(),
        size in any_size()
    ) {
        let sql = SqlBuilder::new(name.clone()).namespace("default").size(size.clone()).build();
        let settings = Settings { allowed_sizes: allowed.clone() };
        let payload = build_validation_request(&sql, &settings);

        let response = decode_response(&validate(&payload).unwrap());
        prop_assert_eq!(response.accepted, allowed.contains(&size));
        prop_assert_eq!(response.code, None);
        if !response.accepted {
            let expected = format!(
                "The '{}' name is on the deny list. The spec.parameters.size cannot be '{}'",
                name, size
            );
            prop_assert_eq!(response.message, Some(expected));
        }
    }

    /// Property: Same input bytes always yield the same decision bytes.
    #[test]
    fn test_validation_deterministic(allowed in any_allow_list(), size in any_size()) {
        let sql = SqlBuilder::new("my-db").size(size).build();
        let payload = build_validation_request(&sql, &Settings { allowed_sizes: allowed });
        prop_assert_eq!(validate(&payload).unwrap(), validate(&payload).unwrap());
    }

    /// Property: Arbitrary bytes never panic and are never accepted.
    #[test]
    fn test_garbage_is_rejected(payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let response = decode_response(&validate(&payload).unwrap());
        prop_assert!(!response.accepted);
        prop_assert!(response.message.is_some());
    }
}
