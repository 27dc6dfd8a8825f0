use rocket::serde::json::{json, Json, Value};
use rocket::Request;

// Guard failures and unmatched routes answer in the same JSON shape as AppError

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Bad request" }))
}

#[catch(401)]
pub fn unauthorized(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Unauthorized: Invalid or missing token" }))
}

#[catch(403)]
pub fn forbidden(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Forbidden: Admin access required" }))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Not found" }))
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Validation failed" }))
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<Value> {
    Json(json!({ "error": "Internal server error" }))
}
