use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::booking::{BookingRequestListResponse, BookingRequestResponse, CreateBookingRequest};
use crate::routes::json_body;
use crate::services::booking_request_service::BookingRequestService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// List the caller's seat requests
#[openapi(tag = "Booking Requests")]
#[get("/booking-requests")]
pub async fn list_booking_requests(
    auth: AuthenticatedUser,
    request_service: &State<BookingRequestService>,
) -> Result<Json<BookingRequestListResponse>, AppError> {
    let requests = request_service.list(auth.user_id).await?;
    Ok(Json(requests))
}

/// Request seats on a booking slot
#[openapi(tag = "Booking Requests")]
#[post("/booking-requests", format = "json", data = "<request>")]
pub async fn create_booking_request(
    auth: AuthenticatedUser,
    request: Result<Json<CreateBookingRequest>, JsonError<'_>>,
    request_service: &State<BookingRequestService>,
) -> Result<status::Custom<Json<BookingRequestResponse>>, AppError> {
    let response = request_service
        .create(auth.user_id, json_body(request)?)
        .await?;
    Ok(status::Custom(Status::Created, Json(response)))
}
