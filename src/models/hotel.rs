use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub country_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CityWithCountry {
    #[serde(flatten)]
    pub city: City,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 0 to 5, unrated hotels carry no value
    pub star_rating: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
    pub is_active: bool,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image attached to a hotel or a room type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Image {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct RoomType {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub max_occupancy: i32,
    pub bed_type: Option<String>,
    pub size_sqm: Option<i32>,
    pub base_price_per_night: Decimal,
    /// Physical rooms of this type; the ledger is checked against it
    pub total_rooms: i32,
    pub is_active: bool,
}

/// Rooms held for one room type on one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct InventoryEntry {
    pub room_type_id: Uuid,
    pub stay_date: NaiveDate,
    pub rooms_held: i32,
}

/// A room type as the store returns it, joined with its images and amenities.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTypeRecord {
    pub room_type: RoomType,
    pub images: Vec<Image>,
    pub amenities: Vec<Amenity>,
}

/// A hotel as the store returns it, with every join resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelRecord {
    pub hotel: Hotel,
    pub city: City,
    pub country: Country,
    pub images: Vec<Image>,
    pub amenities: Vec<Amenity>,
    pub room_types: Vec<RoomTypeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RoomTypeWithDetails {
    #[serde(flatten)]
    pub room_type: RoomType,
    pub images: Vec<Image>,
    pub amenities: Vec<Amenity>,
    pub current_price: Option<Decimal>,
    pub available_rooms: i32,
    /// Only present when the search carried stay dates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nights: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HotelWithDetails {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub city: CityWithCountry,
    pub images: Vec<Image>,
    pub amenities: Vec<Amenity>,
    pub room_types: Vec<RoomTypeWithDetails>,
}

/// Longest stay a single search or quote may span.
pub const MAX_STAY_NIGHTS: i64 = 30;

/// Check-in/check-out pair with `check_in < check_out <= check_in + MAX_STAY_NIGHTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<Self> {
        if check_out <= check_in {
            return Err(AppError::invalid_field(
                "check_out_date",
                "Check-out date must be after check-in date",
                "invalid_range",
            ));
        }
        if (check_out - check_in).num_days() > MAX_STAY_NIGHTS {
            return Err(AppError::invalid_field(
                "check_out_date",
                &format!("Stays are limited to {} nights", MAX_STAY_NIGHTS),
                "range",
            ));
        }
        Ok(StayDates { check_in, check_out })
    }

    /// The single night starting on `date`.
    pub fn single_night(date: NaiveDate) -> Self {
        StayDates {
            check_in: date,
            check_out: date.succ_opt().unwrap_or(date),
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Every night of the stay, `[check_in, check_out)`.
    pub fn nights_iter(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < check_out)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelSearchQuery {
    pub destination: Option<String>,
    pub country_id: Option<Uuid>,
    pub stay: Option<StayDates>,
    pub num_guests: Option<i32>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct HotelSearchResponse {
    pub hotels: Vec<HotelWithDetails>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct HotelDetailResponse {
    pub hotel: HotelWithDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AvailabilityQuote {
    pub room_type_id: Uuid,
    pub available: bool,
    pub available_rooms: i32,
    pub nights: i64,
    pub nightly_rate: Decimal,
    pub total_cost: Decimal,
}
