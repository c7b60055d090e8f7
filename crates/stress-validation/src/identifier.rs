use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Value, json};
use stress_core::{AppError, Details};

/// Check that a value is a UUID in canonical 8-4-4-4-12 form
///
/// Format check only, case-insensitive. Returns the input unchanged.
///
/// # Errors
///
/// Fails when the value is absent, not a string, or not a UUID.
pub fn validate_uuid(value: Option<&Value>, field: &str) -> Result<String, AppError> {
    fn uuid_shape() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
                .expect("must be valid regex")
        })
    }

    match value {
        None | Some(Value::Null) => Err(AppError::validation(format!("{field} is required"))),
        Some(Value::String(s)) if uuid_shape().is_match(s) => Ok(s.clone()),
        Some(other) => {
            let mut details = Details::new();
            details.insert("field".to_owned(), json!(field));
            details.insert("received".to_owned(), other.clone());

            Err(AppError::validation(format!("{field} must be a valid UUID")).with_details(details))
        }
    }
}

#[cfg(test)]
mod tests {
    use stress_core::HttpError;

    use super::*;

    #[test]
    fn canonical_uuid_passes_unchanged() {
        let id = "123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(validate_uuid(Some(&json!(id)), "id").unwrap(), id);
    }

    #[test]
    fn uppercase_uuid_passes_unchanged() {
        let id = "123E4567-E89B-12D3-A456-426614174000";
        assert_eq!(validate_uuid(Some(&json!(id)), "id").unwrap(), id);
    }

    #[test]
    fn malformed_uuid_fails() {
        let err = validate_uuid(Some(&json!("not-a-uuid")), "id").unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.client_message(), "id must be a valid UUID");
        assert_eq!(err.details().unwrap()["received"], json!("not-a-uuid"));
    }

    #[test]
    fn wrong_grouping_fails() {
        for bad in [
            "123e4567e89b12d3a456426614174000",
            "123e4567-e89b-12d3-a456-42661417400",
            "{123e4567-e89b-12d3-a456-426614174000}",
            "g23e4567-e89b-12d3-a456-426614174000",
        ] {
            assert!(validate_uuid(Some(&json!(bad)), "id").is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn non_string_fails() {
        assert!(validate_uuid(Some(&json!(42)), "id").is_err());
        assert_eq!(
            validate_uuid(None, "id").unwrap_err().client_message(),
            "id is required"
        );
    }
}
