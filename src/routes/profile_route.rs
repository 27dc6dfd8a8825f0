use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::profile::{ProfileLookupRequest, ProfileResponse};
use crate::routes::json_body;
use crate::services::profile_service::ProfileService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// Fetch a profile, creating the caller's own on first use
#[openapi(tag = "Profiles")]
#[post("/profile", format = "json", data = "<request>")]
pub async fn fetch_profile(
    auth: AuthenticatedUser,
    request: Result<Json<ProfileLookupRequest>, JsonError<'_>>,
    profile_service: &State<ProfileService>,
) -> Result<Json<ProfileResponse>, AppError> {
    let request = json_body(request)?;
    let profile = profile_service.fetch_or_create(&auth, request.user_id).await?;
    Ok(Json(profile))
}
