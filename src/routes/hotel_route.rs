use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::hotel::{
    AvailabilityQuote, HotelDetailResponse, HotelSearchQuery, HotelSearchResponse, StayDates,
};
use crate::routes::path_uuid;
use crate::services::availability::AvailabilityService;
use crate::services::hotel_service::HotelService;
use crate::utils::error::{AppError, AppResult, FieldError};
use crate::utils::validation::{parse_date, parse_positive_int, parse_uuid};

/// Search hotels
///
/// `city_id` is accepted as an alias of `destination` for older clients that
/// sent the city name under that key.
#[openapi(tag = "Hotels")]
#[get("/hotels?<destination>&<city_id>&<country_id>&<check_in_date>&<check_out_date>&<num_guests>")]
pub async fn search_hotels(
    destination: Option<String>,
    city_id: Option<String>,
    country_id: Option<String>,
    check_in_date: Option<String>,
    check_out_date: Option<String>,
    num_guests: Option<String>,
    hotel_service: &State<HotelService>,
) -> Result<Json<HotelSearchResponse>, AppError> {
    let mut errors = Vec::new();

    let country_id = country_id
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| parse_uuid("country_id", &raw, &mut errors));
    let stay = parse_stay(check_in_date, check_out_date, &mut errors);
    let num_guests = num_guests.and_then(|raw| parse_positive_int("num_guests", &raw, &mut errors));

    let query = HotelSearchQuery {
        destination: destination.or(city_id),
        country_id,
        stay: finish(errors, stay)?,
        num_guests,
    };

    let hotels = hotel_service.search(query).await?;
    Ok(Json(hotels))
}

/// Get one hotel with its room types
#[openapi(tag = "Hotels")]
#[get("/hotels/<id>?<check_in_date>&<check_out_date>&<num_guests>")]
pub async fn get_hotel(
    id: String,
    check_in_date: Option<String>,
    check_out_date: Option<String>,
    num_guests: Option<String>,
    hotel_service: &State<HotelService>,
) -> Result<Json<HotelDetailResponse>, AppError> {
    let hotel_id = path_uuid("id", &id)?;

    let mut errors = Vec::new();
    let stay = parse_stay(check_in_date, check_out_date, &mut errors);
    let num_guests = num_guests.and_then(|raw| parse_positive_int("num_guests", &raw, &mut errors));
    let stay = finish(errors, stay)?;

    let hotel = hotel_service.get_hotel(hotel_id, stay, num_guests).await?;
    Ok(Json(hotel))
}

/// Quote a stay for one room type
#[openapi(tag = "Hotels")]
#[get("/room-types/<id>/availability?<check_in_date>&<check_out_date>&<rooms>")]
pub async fn room_type_availability(
    id: String,
    check_in_date: Option<String>,
    check_out_date: Option<String>,
    rooms: Option<String>,
    availability: &State<AvailabilityService>,
) -> Result<Json<AvailabilityQuote>, AppError> {
    let room_type_id = path_uuid("id", &id)?;

    let mut errors = Vec::new();
    if check_in_date.is_none() && check_out_date.is_none() {
        errors.push(FieldError::new("check_in_date", "Check-in date is required", "required"));
        errors.push(FieldError::new("check_out_date", "Check-out date is required", "required"));
    }
    let stay = parse_stay(check_in_date, check_out_date, &mut errors);
    let rooms = match rooms {
        Some(raw) => parse_positive_int("rooms", &raw, &mut errors),
        None => Some(1),
    };

    let stay = finish(errors, stay)?;
    match (stay, rooms) {
        (Some(stay), Some(rooms)) => Ok(Json(availability.quote(room_type_id, &stay, rooms).await?)),
        _ => Err(AppError::invalid_field("check_in_date", "Check-in date is required", "required")),
    }
}

// Both dates or neither; a lone date is reported against the missing one
fn parse_stay(
    check_in: Option<String>,
    check_out: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<Result<StayDates, AppError>> {
    match (check_in, check_out) {
        (None, None) => None,
        (Some(_), None) => {
            errors.push(FieldError::new("check_out_date", "Check-out date is required", "required"));
            None
        }
        (None, Some(_)) => {
            errors.push(FieldError::new("check_in_date", "Check-in date is required", "required"));
            None
        }
        (Some(check_in), Some(check_out)) => {
            let check_in = parse_date("check_in_date", &check_in, errors);
            let check_out = parse_date("check_out_date", &check_out, errors);
            match (check_in, check_out) {
                (Some(check_in), Some(check_out)) => Some(StayDates::new(check_in, check_out)),
                _ => None,
            }
        }
    }
}

// Merge collected parameter errors with the date-range check
fn finish(mut errors: Vec<FieldError>, stay: Option<Result<StayDates, AppError>>) -> AppResult<Option<StayDates>> {
    let stay = match stay {
        None => None,
        Some(Ok(stay)) => Some(stay),
        Some(Err(AppError::ValidationError(details))) => {
            errors.extend(details);
            None
        }
        Some(Err(other)) => return Err(other),
    };

    if errors.is_empty() {
        Ok(stay)
    } else {
        Err(AppError::ValidationError(errors))
    }
}
