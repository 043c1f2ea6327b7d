//! Application error type with HTTP response conversion.
//!
//! Every handler and service returns `Result<T, AppError>`. The error carries
//! the HTTP status to respond with, the underlying cause, and optionally a map
//! of field-level validation messages.
//!
//! Responses always use the envelope:
//!
//! ```json
//! { "success": false, "error": "Validation failed", "errors": { "fatherEmail": "..." } }
//! ```
//!
//! Server errors (5xx) are logged with their full cause and answered with a
//! generic message so internals never leak to clients.

use std::collections::BTreeMap;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Field name to human readable message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub errors: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            errors: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, anyhow!(message.into()))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    /// 400 "Validation failed" with per-field messages.
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow!("Validation failed"),
            errors: Some(errors),
        }
    }

    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        Self::validation(collect_field_errors(errors))
    }

    /// Message sent to the client. 5xx causes are replaced with a generic text.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let mut body = json!({
            "success": false,
            "error": self.public_message(),
        });

        if let Some(errors) = &self.errors {
            body["errors"] = json!(errors);
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

/// Flattens nested `validator` errors into `{ "parent.fatherEmail": "message" }`.
///
/// Only the first message per field is kept. Schema level errors (reported by
/// `validator` under `__all__`) are keyed by their error code instead.
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_into(errors, None, &mut out);
    out
}

fn collect_into(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let field = field.as_ref();
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let name = if field == "__all__" {
                        error.code.as_ref()
                    } else {
                        field
                    };
                    let key = join_key(prefix, &to_camel_case(name));
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", to_camel_case(name)));
                    out.entry(key).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                let key = join_key(prefix, &to_camel_case(field));
                collect_into(nested, Some(&key), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let key = join_key(prefix, &format!("{}[{}]", to_camel_case(field), index));
                    collect_into(nested, Some(&key), out);
                }
            }
        }
    }
}

fn join_key(prefix: Option<&str>, field: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, field),
        None => field.to_string(),
    }
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_server_errors_hide_cause() {
        let err = AppError::internal(anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::not_found(anyhow!("Registration not found"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Registration not found");
    }

    #[test]
    fn test_blanket_from_is_internal() {
        let err: AppError = std::io::Error::other("disk").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("father_first_name"), "fatherFirstName");
        assert_eq!(to_camel_case("classId"), "classId");
        assert_eq!(to_camel_case("age"), "age");
    }

    #[test]
    fn test_collect_field_errors_nested_and_schema() {
        let mut parent = ValidationErrors::new();
        parent.add(
            "father_email",
            ValidationError::new("email").with_message("Valid father email is required".into()),
        );

        let mut root = ValidationErrors::new();
        root.add(
            "__all__",
            ValidationError::new("age_range").with_message("ageMin must not exceed ageMax".into()),
        );
        root.errors_mut()
            .insert("parent".into(), ValidationErrorsKind::Struct(Box::new(parent)));

        let fields = collect_field_errors(&root);
        assert_eq!(
            fields.get("parent.fatherEmail").map(String::as_str),
            Some("Valid father email is required")
        );
        assert_eq!(
            fields.get("ageRange").map(String::as_str),
            Some("ageMin must not exceed ageMax")
        );
    }

    #[test]
    fn test_validation_error_shape() {
        let mut fields = FieldErrors::new();
        fields.insert("status".to_string(), "Invalid status".to_string());
        let err = AppError::validation(fields);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Validation failed");
        assert_eq!(err.errors.as_ref().map(|e| e.len()), Some(1));
    }
}
