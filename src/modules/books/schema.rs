//! Schema validation glue for inbound book payloads.

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use bookstore_http::error::AppError;

/// The field contract for book payloads, kept in `schemas/book.schema.json`.
/// Compiled once; both are static so a failure here is a programmer error.
static BOOK_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/schemas/book.schema.json"
    )))
    .expect("book schema is valid JSON");

    jsonschema::validator_for(&schema).expect("book schema compiles")
});

/// Validate a candidate payload against the book contract. Returns the full
/// ordered error list on failure so callers can surface every violation at
/// once. Unknown extra fields are permitted.
pub fn validate_book_payload(payload: &Value) -> Result<(), AppError> {
    let details: Vec<Value> = BOOK_SCHEMA
        .iter_errors(payload)
        .map(|error| {
            json!({
                "field": error.instance_path.to_string(),
                "error": error.to_string(),
            })
        })
        .collect();

    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(
            details,
            "book payload failed schema validation",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "isbn": "2222",
            "amazon_url": "http://a.co/eobPtX2",
            "author": "John Wick",
            "language": "english",
            "pages": 10,
            "publisher": "Wick Publishing",
            "title": "The Baba Yaga",
            "year": 2023
        })
    }

    #[test]
    fn full_payload_is_valid() {
        assert!(validate_book_payload(&full_payload()).is_ok());
    }

    #[test]
    fn extra_fields_are_permitted() {
        let mut payload = full_payload();
        payload["edition"] = json!("first");
        assert!(validate_book_payload(&payload).is_ok());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let payload = json!({
            "language": "english",
            "pages": 10,
            "publisher": "Wick Publishing",
            "title": "The Baba Yaga",
            "year": 2023
        });

        let error = validate_book_payload(&payload).unwrap_err();
        match error {
            AppError::Validation { details, .. } => {
                // One error per missing field: isbn, amazon_url, author.
                assert_eq!(details.len(), 3);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_primitive_type_is_rejected() {
        let mut payload = full_payload();
        payload["pages"] = json!("ten");
        assert!(validate_book_payload(&payload).is_err());
    }

    #[test]
    fn zero_pages_is_rejected() {
        let mut payload = full_payload();
        payload["pages"] = json!(0);
        assert!(validate_book_payload(&payload).is_err());
    }
}
