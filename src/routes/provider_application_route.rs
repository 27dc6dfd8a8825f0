use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::provider_application::{
    ProviderApplicationListResponse, ProviderApplicationResponse, SubmitProviderApplication,
};
use crate::routes::json_body;
use crate::services::provider_application_service::ProviderApplicationService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// List the caller's provider applications
#[openapi(tag = "Provider Applications")]
#[get("/provider-applications")]
pub async fn list_provider_applications(
    auth: AuthenticatedUser,
    application_service: &State<ProviderApplicationService>,
) -> Result<Json<ProviderApplicationListResponse>, AppError> {
    let applications = application_service.list(auth.user_id).await?;
    Ok(Json(applications))
}

/// Submit a hotel onboarding application for review
#[openapi(tag = "Provider Applications")]
#[post("/provider-applications", format = "json", data = "<request>")]
pub async fn submit_provider_application(
    auth: AuthenticatedUser,
    request: Result<Json<SubmitProviderApplication>, JsonError<'_>>,
    application_service: &State<ProviderApplicationService>,
) -> Result<status::Custom<Json<ProviderApplicationResponse>>, AppError> {
    let response = application_service
        .submit(auth.user_id, json_body(request)?)
        .await?;
    Ok(status::Custom(Status::Created, Json(response)))
}
