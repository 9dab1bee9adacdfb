// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for sql-size-policy.
//!
//! These tests drive the public entry points with complete validation
//! request envelopes, the way the policy host does.

#[path = "../common/mod.rs"]
mod common;

mod request_validation_tests {
    use crate::common::fixtures::{
        SqlBuilder, allow, build_validation_request, build_validation_request_from_fixture,
        decode_response,
    };
    use serde_json::json;
    use sql_size_policy::{Settings, validate};

    #[test]
    fn test_empty_size_leads_to_approval() {
        let sql = SqlBuilder::new("my-db").namespace("production").build();
        let payload = build_validation_request(&sql, &Settings::default());

        let response = decode_response(&validate(&payload).unwrap());
        assert!(response.accepted);
        assert_eq!(response.message, None);
        assert_eq!(response.code, None);
    }

    #[test]
    fn test_empty_settings_object_leads_to_approval() {
        let sql = SqlBuilder::new("my-db").size("gigantic").build();
        let payload = build_validation_request(&sql, &json!({}));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(response.accepted);
    }

    #[test]
    fn test_approval() {
        let sql = SqlBuilder::new("my-db")
            .namespace("production")
            .size("medium")
            .build();
        let payload = build_validation_request(&sql, &allow(&["medium", "large"]));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(response.accepted);
    }

    #[test]
    fn test_fixture_denied() {
        let payload =
            build_validation_request_from_fixture("tests/data/sql.json", &allow(&["medium", "large"]));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
        assert_eq!(response.code, None);
    }

    #[test]
    fn test_rejection_because_size_is_denied() {
        let sql = SqlBuilder::new("my-db")
            .namespace("production")
            .size("small")
            .build();
        let payload = build_validation_request(&sql, &allow(&["medium", "large"]));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
        assert_eq!(
            response.message.as_deref(),
            Some("The 'my-db' name is on the deny list. The spec.parameters.size cannot be 'small'")
        );
        assert_eq!(response.code, None);
    }

    #[test]
    fn test_rejection_is_case_sensitive() {
        let sql = SqlBuilder::new("my-db").size("Medium").build();
        let payload = build_validation_request(&sql, &allow(&["medium"]));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
    }

    #[test]
    fn test_undecodable_object() {
        let payload = build_validation_request(&json!({"spec": 42}), &allow(&["medium"]));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
        assert_eq!(response.code, Some(400));
        assert!(response.message.unwrap().contains("Cannot decode SQL object:"));
    }

    #[test]
    fn test_object_without_spec() {
        let payload =
            build_validation_request(&json!({"metadata": {"name": "my-db"}}), &allow(&["medium"]));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
        assert_eq!(response.code, Some(400));
        assert_eq!(
            response.message.as_deref(),
            Some("Cannot decode SQL object: missing field `spec`")
        );
    }

    #[test]
    fn test_empty_object() {
        let payload = build_validation_request(&json!({}), &Settings::default());

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
        assert_eq!(response.code, Some(400));
    }

    #[test]
    fn test_invalid_settings_in_request() {
        let sql = SqlBuilder::new("my-db").build();
        let payload = build_validation_request(&sql, &json!({"allowed_sizes": [1, 2]}));

        let response = decode_response(&validate(&payload).unwrap());
        assert!(!response.accepted);
        assert_eq!(response.code, Some(400));
    }

    #[test]
    fn test_invalid_envelope() {
        let response = decode_response(&validate(b"\x00\x01").unwrap());
        assert!(!response.accepted);
        assert_eq!(response.code, Some(400));
    }
}

mod settings_validation_tests {
    use crate::common::fixtures::decode_settings_response;
    use sql_size_policy::validate_settings;

    #[test]
    fn test_parsing_settings_with_no_value_provided() {
        let response = decode_settings_response(&validate_settings(b"{}").unwrap());
        assert!(response.valid);
        assert_eq!(response.message, None);
    }

    #[test]
    fn test_valid_allow_list() {
        let payload = br#"{"allowed_sizes": ["small", "medium", "large"]}"#;
        let response = decode_settings_response(&validate_settings(payload).unwrap());
        assert!(response.valid);
    }

    #[test]
    fn test_wrong_type() {
        let payload = br#"{"allowed_sizes": "medium"}"#;
        let response = decode_settings_response(&validate_settings(payload).unwrap());
        assert!(!response.valid);
        assert!(
            response
                .message
                .unwrap()
                .contains("Provided settings are not valid:")
        );
    }

    #[test]
    fn test_not_an_object() {
        let response = decode_settings_response(&validate_settings(b"42").unwrap());
        assert!(!response.valid);
        assert_eq!(
            response.message.as_deref(),
            Some("Provided settings are not valid: settings must be a JSON object")
        );
    }
}
