use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::booking::{BookingListResponse, BookingResponse, CreateBooking};
use crate::routes::json_body;
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;

/// List open booking slots
#[openapi(tag = "Bookings")]
#[get("/bookings")]
pub async fn list_bookings(
    booking_service: &State<BookingService>,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = booking_service.list_available().await?;
    Ok(Json(bookings))
}

/// Create a booking slot (admin)
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    admin: AdminUser,
    request: Result<Json<CreateBooking>, JsonError<'_>>,
    booking_service: &State<BookingService>,
) -> Result<status::Custom<Json<BookingResponse>>, AppError> {
    let response = booking_service
        .create(admin.user.user_id, json_body(request)?)
        .await?;
    Ok(status::Custom(Status::Created, Json(response)))
}
