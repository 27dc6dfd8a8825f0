pub mod admin_route;
pub mod booking_request_route;
pub mod booking_route;
pub mod draft_route;
pub mod hotel_route;
pub mod profile_route;
pub mod provider_application_route;

use rocket::serde::json::{Error as JsonError, Json};
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::parse_uuid;

/// Unwrap a JSON body, turning a malformed payload into a validation error.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonError<'_>>) -> AppResult<T> {
    match body {
        Ok(json) => Ok(json.into_inner()),
        Err(JsonError::Parse(_, e)) => Err(AppError::invalid_field("body", &e.to_string(), "invalid_json")),
        Err(JsonError::Io(e)) => Err(AppError::invalid_field("body", &e.to_string(), "invalid_body")),
    }
}

pub(crate) fn path_uuid(field: &str, raw: &str) -> AppResult<Uuid> {
    let mut errors = Vec::new();
    parse_uuid(field, raw, &mut errors).ok_or(AppError::ValidationError(errors))
}
