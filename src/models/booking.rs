use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

// Booking slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum BookingStatus {
    Available,
    Booked,
    Cancelled,
}

// Booking request status; transitions out of Pending happen outside this service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub price: Decimal,
    pub max_seats: i32,
    pub available_seats: i32,
    pub status: BookingStatus,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct BookingRequest {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub seats: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct BookingRequestWithBooking {
    #[serde(flatten)]
    pub request: BookingRequest,
    pub booking: Booking,
}

/// Outcome of the guarded "insert request + decrement seats" unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatReservation {
    Reserved(BookingRequest),
    BookingNotFound,
    InsufficientSeats { available: i32 },
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateBookingRequest {
    pub booking_id: Uuid,
    #[validate(range(min = 1, max = 20, message = "Seats must be between 1 and 20"))]
    pub seats: i32,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateBooking {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,
    #[validate(custom(function = "crate::utils::validation::non_negative_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, max = 500, message = "Max seats must be between 1 and 500"))]
    pub max_seats: i32,
}

/// Admin update; `available_seats` is bounded by the slot's `max_seats` in the service.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct AdminUpdateBooking {
    pub id: Uuid,
    pub status: BookingStatus,
    #[validate(range(min = 0, message = "Available seats cannot be negative"))]
    pub available_seats: Option<i32>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    pub booking: Booking,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingRequestResponse {
    pub request: BookingRequest,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingRequestListResponse {
    pub requests: Vec<BookingRequestWithBooking>,
}
