use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::hotel::{
    CityWithCountry, HotelDetailResponse, HotelRecord, HotelSearchQuery, HotelSearchResponse,
    HotelWithDetails, Image, RoomTypeWithDetails, StayDates,
};
use crate::services::availability::{self, AvailabilityService};
use crate::store::EntityStore;
use crate::utils::error::{AppError, AppResult};

pub struct HotelService {
    store: Arc<dyn EntityStore>,
    availability: AvailabilityService,
}

impl HotelService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        HotelService {
            availability: AvailabilityService::new(store.clone()),
            store,
        }
    }

    // Search active hotels
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: HotelSearchQuery) -> AppResult<HotelSearchResponse> {
        let destination = query
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_lowercase);

        // The country predicate only goes to the store when no destination is given
        let country_id = match destination {
            Some(_) => None,
            None => query.country_id,
        };

        let mut records = self.store.list_active_hotels(country_id).await?;

        if let Some(destination) = &destination {
            records.retain(|r| r.city.name.trim().to_lowercase() == *destination);
        }

        // Stable: equal ratings keep arrival order, unrated (None) sorts last
        records.sort_by(|a, b| b.hotel.star_rating.cmp(&a.hotel.star_rating));

        let hotels = self
            .with_details(records, query.stay, query.num_guests)
            .await?
            .into_iter()
            .filter(|hotel| query.num_guests.is_none() || !hotel.room_types.is_empty())
            .collect::<Vec<_>>();

        tracing::info!(count = hotels.len(), "hotel search completed");
        Ok(HotelSearchResponse { hotels })
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_hotel(
        &self,
        hotel_id: Uuid,
        stay: Option<StayDates>,
        num_guests: Option<i32>,
    ) -> AppResult<HotelDetailResponse> {
        let record = self
            .store
            .find_active_hotel(hotel_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hotel not found".into()))?;

        let hotel = self
            .with_details(vec![record], stay, num_guests)
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Hotel not found".into()))?;

        Ok(HotelDetailResponse { hotel })
    }

    // Attach pricing and availability to every active room type, one ledger read for the whole page
    async fn with_details(
        &self,
        records: Vec<HotelRecord>,
        stay: Option<StayDates>,
        num_guests: Option<i32>,
    ) -> AppResult<Vec<HotelWithDetails>> {
        let ledger_stay = stay.unwrap_or_else(|| StayDates::single_night(Utc::now().date_naive()));
        let nights = stay.as_ref().map(availability::stay_nights);

        let active_room_types: Vec<_> = records
            .iter()
            .flat_map(|r| r.room_types.iter())
            .map(|rt| &rt.room_type)
            .filter(|rt| rt.is_active)
            .collect();
        let rooms_left: HashMap<Uuid, i32> = self
            .availability
            .available_rooms_for(&active_room_types, &ledger_stay)
            .await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let room_types = record
                    .room_types
                    .into_iter()
                    .filter(|rt| rt.room_type.is_active)
                    .filter(|rt| num_guests.map_or(true, |guests| rt.room_type.max_occupancy >= guests))
                    .map(|rt| {
                        let price = availability::current_price(&rt.room_type);
                        RoomTypeWithDetails {
                            available_rooms: rooms_left.get(&rt.room_type.id).copied().unwrap_or(0),
                            current_price: Some(price),
                            total_price: nights.map(|n| availability::total_cost(price, n)),
                            nights,
                            images: normalize_images(rt.images),
                            amenities: rt.amenities,
                            room_type: rt.room_type,
                        }
                    })
                    .collect();

                HotelWithDetails {
                    hotel: record.hotel,
                    city: CityWithCountry {
                        city: record.city,
                        country: record.country,
                    },
                    images: normalize_images(record.images),
                    amenities: record.amenities,
                    room_types,
                }
            })
            .collect())
    }
}

/// Order images by `sort_order` and keep exactly one primary: the first flagged
/// one, or the first image when none is flagged.
pub fn normalize_images(mut images: Vec<Image>) -> Vec<Image> {
    images.sort_by_key(|i| i.sort_order);
    let primary = images.iter().position(|i| i.is_primary).unwrap_or(0);
    for (index, image) in images.iter_mut().enumerate() {
        image.is_primary = index == primary;
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(sort_order: i32, is_primary: bool) -> Image {
        Image {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            image_url: format!("https://cdn.example.com/{}.jpg", sort_order),
            alt_text: None,
            is_primary,
            sort_order,
        }
    }

    #[test]
    fn first_flagged_image_stays_primary() {
        let images = normalize_images(vec![image(3, true), image(1, false), image(2, true)]);
        let flags: Vec<(i32, bool)> = images.iter().map(|i| (i.sort_order, i.is_primary)).collect();
        assert_eq!(flags, vec![(1, false), (2, true), (3, false)]);
    }

    #[test]
    fn first_image_is_promoted_when_none_is_flagged() {
        let images = normalize_images(vec![image(2, false), image(0, false)]);
        assert!(images[0].is_primary);
        assert_eq!(images[0].sort_order, 0);
        assert!(!images[1].is_primary);
        assert!(normalize_images(Vec::new()).is_empty());
    }
}
