use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::booking::{AdminUpdateBooking, BookingListResponse, BookingResponse};
use crate::routes::json_body;
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;

/// List every booking slot, newest first
#[openapi(tag = "Admin")]
#[get("/admin/bookings")]
pub async fn admin_list_bookings(
    _admin: AdminUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = booking_service.admin_list().await?;
    Ok(Json(bookings))
}

/// Update a booking slot's status or seats
#[openapi(tag = "Admin")]
#[put("/admin/bookings", format = "json", data = "<request>")]
pub async fn admin_update_booking(
    admin: AdminUser,
    request: Result<Json<AdminUpdateBooking>, JsonError<'_>>,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    let request = json_body(request)?;
    tracing::info!(admin = %admin.user.user_id, booking_id = %request.id, "admin booking update");
    let booking = booking_service.admin_update(request).await?;
    Ok(Json(booking))
}
