//! Integration tests for common rulebook workflows.
//!
//! These tests drive validation through the facade crate the way an
//! application handling a form post would.

use rulebook::prelude::*;
use std::io::Write;

// =============================================================================
// Form Fields
// =============================================================================

#[test]
fn test_signup_form() {
    let fields = json!({
        "firstname": "john",
        "lastname": "",
        "email": "john.doe@example.com",
        "password": "secret",
        "password_confirmation": "secret",
        "age": 17,
    });

    let result = validate(
        &fields,
        &json!({}),
        rules! {
            "firstname" => "required|string|max:50",
            "lastname" => "required|string",
            "email" => "required|email",
            "password" => "required|confirmed|strong_password",
            "age" => "required|integer|min:18",
        },
    )
    .unwrap();

    assert!(result.fails());
    assert_eq!(
        result.messages().iter().map(|(k, _)| k).collect::<Vec<_>>(),
        ["lastname", "password", "age"]
    );
    assert_eq!(result.first("lastname"), Some("The lastname is required"));
    assert_eq!(result.first("age"), Some("The age must be atleast minimum of 18"));
}

#[test]
fn test_optional_fields() {
    let fields = json!({"name": "Ann", "website": "", "bio": null});

    let result = validate(
        &fields,
        &json!({}),
        rules! {
            "name" => "required",
            "website" => "nullable|url",
            "bio" => "string|max:200|nullable",
        },
    )
    .unwrap();

    assert!(result.passes());
}

#[test]
fn test_repeated_inputs() {
    let fields = json!({
        "emails": ["a@example.com", "broken", "c@example.com"],
    });

    let result = validate(&fields, &json!({}), [("emails.*", "required|email")]).unwrap();

    assert_eq!(result.messages().len(), 1);
    assert_eq!(result.first("emails.1"), Some("The emails.1 must be a valid email"));
}

#[test]
fn test_nested_rows() {
    let fields = json!({
        "contacts": [
            {"name": "Ann", "phone": "123"},
            {"name": "", "phone": "abc"},
        ]
    });

    let result = validate(
        &fields,
        &json!({}),
        rules! {
            "contacts.*.phone" => "number",
        },
    )
    .unwrap();

    assert!(!result.messages().has("contacts.0.phone"));
    assert_eq!(
        result.first("contacts.1.phone"),
        Some("The contacts.1.phone must be a number")
    );
}

// =============================================================================
// Uploads
// =============================================================================

#[test]
fn test_profile_with_avatar() {
    let mut avatar = tempfile::NamedTempFile::new().unwrap();
    avatar.write_all(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR").unwrap();

    let files = json!({
        "avatar": {
            "name": "me.png",
            "type": "image/png",
            "tmp_name": avatar.path().to_string_lossy(),
            "error": 0,
            "size": 16,
        }
    });

    let result = validate(
        &json!({"username": "ann"}),
        &files,
        rules! {
            "username" => "required",
            "avatar" => "required|image|mimes:png",
        },
    )
    .unwrap();

    assert!(result.passes());
}

#[test]
fn test_upload_only_request() {
    let files = json!({
        "avatar": {"name": "", "tmp_name": "", "size": 0, "error": 4}
    });

    // An empty upload slot leaves nothing to validate.
    let err = validate(&json!({}), &files, [("avatar", "required")]).unwrap_err();
    assert!(matches!(err, ValidatorError::NoDataToValidate));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_custom_messages() {
    let messages = MessageCatalog::from_json(
        r#"{"required": ":attribute ist erforderlich", "min": ":attribute: mindestens :extras"}"#,
    )
    .unwrap();
    let validator = Validator::with_config(ValidatorConfig::new().with_messages(messages));

    let result = validator
        .validate(
            &json!({"vorname": "", "plz": "12"}),
            &json!({}),
            rules! {
                "vorname" => "required",
                "plz" => "min:5",
            },
        )
        .unwrap();

    assert_eq!(result.first("vorname"), Some("vorname ist erforderlich"));
    assert_eq!(result.first("plz"), Some("plz: mindestens 5"));
}

#[test]
fn test_result_json_shape() {
    let result = validate(&json!({"email": "nope"}), &json!({}), [("email", "email")]).unwrap();

    assert_eq!(
        result.to_json(),
        json!({"errors": [{"field": "email", "message": "The email must be a valid email"}]})
    );
}

#[test]
fn test_rules_from_json_declarations() {
    let declarations: serde_json::Map<String, serde_json::Value> = serde_json::from_str(
        r#"{"title": "required|max:5", "tags.*": "string"}"#,
    )
    .unwrap();
    let rules = declarations
        .iter()
        .map(|(attribute, rules)| (attribute.clone(), rules.as_str().unwrap_or_default().to_string()));

    let result = validate(&json!({"title": "too long", "tags": ["a"]}), &json!({}), rules).unwrap();
    assert_eq!(result.first("title"), Some("The title must be maximum of 5"));
    assert!(!result.messages().has("tags.0"));
}
