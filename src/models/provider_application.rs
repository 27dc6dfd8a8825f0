use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "ENUM", rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

// Onboarding payload, shaped the way the wizard posts it (camelCase)

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelBasicInfo {
    #[validate(length(min = 1, max = 200, message = "Hotel name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSetup {
    #[validate(range(min = 1, message = "At least one room type is required"))]
    pub number_of_room_types: i32,
    #[validate(range(min = 1, message = "At least one room is required"))]
    pub total_number_of_rooms: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeDetail {
    #[validate(length(min = 1, max = 100, message = "Room type name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Number of rooms must be at least 1"))]
    pub number_of_rooms: i32,
    #[validate(custom(function = "crate::utils::validation::positive_price"))]
    pub price_per_night: Decimal,
    #[validate(range(min = 1, max = 20, message = "Max occupancy must be between 1 and 20"))]
    pub max_occupancy: i32,
    /// Uploaded files arrive as opaque objects; only their count is kept
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Every section is optional at the serde level so a missing one is reported
/// as a field error instead of a parse failure.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProviderApplication {
    pub user_id: Option<Uuid>,
    pub basic_info: Option<HotelBasicInfo>,
    pub room_setup: Option<RoomSetup>,
    pub room_types: Option<Vec<RoomTypeDetail>>,
}

/// Compact per-room-type entry kept on the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoomTypeSummary {
    pub name: String,
    pub number_of_rooms: i32,
    pub price_per_night: Decimal,
    pub max_occupancy: i32,
    pub amenities: Vec<String>,
    pub images_count: i32,
}

/// Denormalized snapshot of one submission. This is also the shape written to
/// the JSON fallback column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationSnapshot {
    pub hotel_name: String,
    pub hotel_description: String,
    pub hotel_street: String,
    pub hotel_city: String,
    pub hotel_state: String,
    pub hotel_country: String,
    pub hotel_zip_code: String,
    pub hotel_phone: String,
    pub hotel_email: String,
    pub number_of_room_types: i32,
    pub total_number_of_rooms: i32,
    pub hotel_amenities: Vec<String>,
    pub room_types: Vec<RoomTypeSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProviderApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub snapshot: ApplicationSnapshot,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ProviderApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub review_note: Option<String>,
    #[serde(flatten)]
    pub snapshot: ApplicationSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ProviderApplicationResponse {
    pub success: bool,
    pub message: String,
    pub application: ProviderApplication,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ProviderApplicationListResponse {
    pub success: bool,
    pub applications: Vec<ProviderApplication>,
}
