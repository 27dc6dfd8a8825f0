use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::store::StoreError;

/// One offending input field, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(Vec<FieldError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient capacity: {0}")]
    InsufficientCapacity(String),

    // Detail is logged, never rendered
    #[error("Internal server error")]
    UpstreamStoreError(String),

    /// A piece of server state the request needs was never set up.
    #[error("Internal server error")]
    Misconfigured(String),
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: &str, message: &str, code: &str) -> Self {
        AppError::ValidationError(vec![FieldError::new(field, message, code)])
    }

    pub fn status(&self) -> Status {
        match self {
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::Unauthorized(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::NotFound(_) => Status::NotFound,
            AppError::InsufficientCapacity(_) => Status::BadRequest,
            AppError::UpstreamStoreError(_) | AppError::Misconfigured(_) => Status::InternalServerError,
        }
    }

    pub fn body(&self) -> serde_json::Value {
        match self {
            AppError::ValidationError(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

// Convert store failures (database down, schema drift that was not handled) to UpstreamStoreError
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::UpstreamStoreError(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        flatten_validation_errors("", &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(details)
    }
}

/// Flatten `errors` into field errors whose paths start with `prefix`.
pub fn field_errors(prefix: &str, errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details = Vec::new();
    flatten_validation_errors(prefix, errors, &mut details);
    details
}

// Walk nested struct/list errors, joining the path with dots the way clients expect
fn flatten_validation_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", path));
                    out.push(FieldError::new(path.clone(), message, error.code.to_string()));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

// Format all errors from the route level into a JSON HTTP response
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();

        match &self {
            AppError::UpstreamStoreError(detail) => {
                tracing::error!(uri = %request.uri(), error = %detail, "store failure");
            }
            AppError::Misconfigured(detail) => {
                tracing::error!(uri = %request.uri(), error = %detail, "server misconfigured");
            }
            other => {
                tracing::debug!(uri = %request.uri(), status = status.code, error = %other, "request rejected");
            }
        }

        let body = self.body().to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
