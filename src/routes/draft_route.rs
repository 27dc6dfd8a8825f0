use rocket::response::status;
use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::draft::{DraftResponse, SaveDraft};
use crate::routes::json_body;
use crate::services::draft_service::DraftService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// Load a saved draft
#[openapi(tag = "Drafts")]
#[get("/drafts/<kind>")]
pub async fn get_draft(
    kind: String,
    auth: AuthenticatedUser,
    draft_service: &State<DraftService>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = draft_service.get(auth.user_id, &kind).await?;
    Ok(Json(draft))
}

/// Save (create or replace) a draft
#[openapi(tag = "Drafts")]
#[put("/drafts/<kind>", format = "json", data = "<request>")]
pub async fn save_draft(
    kind: String,
    auth: AuthenticatedUser,
    request: Result<Json<SaveDraft>, JsonError<'_>>,
    draft_service: &State<DraftService>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = draft_service
        .save(auth.user_id, &kind, json_body(request)?)
        .await?;
    Ok(Json(draft))
}

/// Discard a draft
#[openapi(tag = "Drafts")]
#[delete("/drafts/<kind>")]
pub async fn delete_draft(
    kind: String,
    auth: AuthenticatedUser,
    draft_service: &State<DraftService>,
) -> Result<status::NoContent, AppError> {
    draft_service.delete(auth.user_id, &kind).await?;
    Ok(status::NoContent)
}
