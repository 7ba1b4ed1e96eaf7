//! Validation Utilities

use validator::{Validate, ValidationErrors};

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

/// Validate a request body, mapping failures to `AppError::Validation`.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(validation_error)
}

/// Parse a numeric path identifier.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Position {
        #[validate(range(min = -90.0, max = 90.0, message = "out of range"))]
        latitude: f64,
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = validate_body(&Position { latitude: 120.0 }).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "latitude: out of range"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "tour").unwrap(), 42);
        assert!(matches!(parse_id("abc", "tour"), Err(AppError::BadRequest(m)) if m == "Invalid tour ID"));
    }
}
