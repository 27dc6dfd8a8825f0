use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::booking::{
    Booking, BookingRequest, BookingRequestWithBooking, BookingStatus, RequestStatus, SeatReservation,
};
use crate::models::draft::Draft;
use crate::models::hotel::{
    Amenity, City, Country, Hotel, HotelRecord, Image, InventoryEntry, RoomType, RoomTypeRecord,
};
use crate::models::profile::Profile;
use crate::models::provider_application::{
    ApplicationStatus, NewProviderApplication, ProviderApplication,
};
use crate::store::{BookingUpdate, EntityStore, StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoredAs {
    Typed,
    Blob,
}

#[derive(Default)]
struct MemoryState {
    countries: Vec<Country>,
    cities: Vec<City>,
    hotels: Vec<Hotel>,
    hotel_images: Vec<Image>,
    amenities: Vec<Amenity>,
    hotel_amenities: Vec<(Uuid, Uuid)>,
    room_types: Vec<RoomType>,
    room_type_images: Vec<Image>,
    room_type_amenities: Vec<(Uuid, Uuid)>,
    inventory: BTreeMap<(Uuid, NaiveDate), i32>,
    bookings: Vec<Booking>,
    booking_requests: Vec<BookingRequest>,
    applications: Vec<(ProviderApplication, StoredAs)>,
    profiles: HashMap<Uuid, Profile>,
    drafts: HashMap<(Uuid, String), Draft>,
}

impl MemoryState {
    fn hotel_record(&self, hotel: &Hotel) -> StoreResult<HotelRecord> {
        let city = self
            .cities
            .iter()
            .find(|c| c.id == hotel.city_id)
            .cloned()
            .ok_or_else(|| StoreError::Corrupt(format!("hotel {} references a missing city", hotel.id)))?;
        let country = self
            .countries
            .iter()
            .find(|c| c.id == city.country_id)
            .cloned()
            .ok_or_else(|| StoreError::Corrupt(format!("city {} references a missing country", city.id)))?;

        let images = self
            .hotel_images
            .iter()
            .filter(|i| i.owner_id == hotel.id)
            .cloned()
            .collect();
        let amenities = self.linked_amenities(&self.hotel_amenities, hotel.id);

        let room_types = self
            .room_types
            .iter()
            .filter(|rt| rt.hotel_id == hotel.id)
            .map(|rt| RoomTypeRecord {
                room_type: rt.clone(),
                images: self
                    .room_type_images
                    .iter()
                    .filter(|i| i.owner_id == rt.id)
                    .cloned()
                    .collect(),
                amenities: self.linked_amenities(&self.room_type_amenities, rt.id),
            })
            .collect();

        Ok(HotelRecord {
            hotel: hotel.clone(),
            city,
            country,
            images,
            amenities,
            room_types,
        })
    }

    fn linked_amenities(&self, links: &[(Uuid, Uuid)], owner_id: Uuid) -> Vec<Amenity> {
        links
            .iter()
            .filter(|(owner, _)| *owner == owner_id)
            .filter_map(|(_, amenity_id)| self.amenities.iter().find(|a| a.id == *amenity_id).cloned())
            .collect()
    }
}

/// In-process store. Backs the test suite and `STORE_BACKEND=memory` runs.
///
/// A single mutex guards all state, so every trait call is atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    pending_failures: AtomicU32,
    typed_applications_disabled: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` store calls fail as if the database were down.
    pub fn fail_next(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Simulate a provider_applications table that lacks the typed columns.
    pub fn drop_typed_application_columns(&self) {
        self.typed_applications_disabled.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        let consumed = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match consumed {
            Ok(_) => Err(StoreError::Unavailable("injected failure".into())),
            Err(_) => Ok(()),
        }
    }

    pub async fn insert_country(&self, country: Country) {
        self.state.lock().await.countries.push(country);
    }

    pub async fn insert_city(&self, city: City) {
        self.state.lock().await.cities.push(city);
    }

    pub async fn insert_hotel(&self, hotel: Hotel) {
        self.state.lock().await.hotels.push(hotel);
    }

    pub async fn insert_hotel_image(&self, image: Image) {
        self.state.lock().await.hotel_images.push(image);
    }

    pub async fn insert_amenity(&self, amenity: Amenity) {
        self.state.lock().await.amenities.push(amenity);
    }

    pub async fn link_hotel_amenity(&self, hotel_id: Uuid, amenity_id: Uuid) {
        self.state.lock().await.hotel_amenities.push((hotel_id, amenity_id));
    }

    pub async fn insert_room_type(&self, room_type: RoomType) {
        self.state.lock().await.room_types.push(room_type);
    }

    pub async fn insert_room_type_image(&self, image: Image) {
        self.state.lock().await.room_type_images.push(image);
    }

    pub async fn link_room_type_amenity(&self, room_type_id: Uuid, amenity_id: Uuid) {
        self.state.lock().await.room_type_amenities.push((room_type_id, amenity_id));
    }

    /// Add `rooms` to the ledger for one room type and night.
    pub async fn hold_rooms(&self, room_type_id: Uuid, stay_date: NaiveDate, rooms: i32) {
        *self
            .state
            .lock()
            .await
            .inventory
            .entry((room_type_id, stay_date))
            .or_insert(0) += rooms;
    }

    pub async fn booking_request_count(&self) -> usize {
        self.state.lock().await.booking_requests.len()
    }

    pub async fn application_count(&self) -> usize {
        self.state.lock().await.applications.len()
    }

    pub async fn blob_application_count(&self) -> usize {
        self.state
            .lock()
            .await
            .applications
            .iter()
            .filter(|(_, stored)| *stored == StoredAs::Blob)
            .count()
    }

    async fn insert_application(
        &self,
        application: &NewProviderApplication,
        stored: StoredAs,
    ) -> StoreResult<ProviderApplication> {
        let record = ProviderApplication {
            id: application.id,
            user_id: application.user_id,
            status: ApplicationStatus::Pending,
            review_note: None,
            snapshot: application.snapshot.clone(),
            created_at: application.created_at,
            updated_at: application.created_at,
        };
        self.state.lock().await.applications.push((record.clone(), stored));
        Ok(record)
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_active_hotels(&self, country_id: Option<Uuid>) -> StoreResult<Vec<HotelRecord>> {
        self.check_available()?;
        let state = self.state.lock().await;

        let mut records = Vec::new();
        for hotel in state.hotels.iter().filter(|h| h.is_active) {
            let record = state.hotel_record(hotel)?;
            if country_id.map_or(true, |id| record.city.country_id == id) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn find_active_hotel(&self, hotel_id: Uuid) -> StoreResult<Option<HotelRecord>> {
        self.check_available()?;
        let state = self.state.lock().await;

        match state.hotels.iter().find(|h| h.id == hotel_id && h.is_active) {
            Some(hotel) => Ok(Some(state.hotel_record(hotel)?)),
            None => Ok(None),
        }
    }

    async fn find_room_type(&self, room_type_id: Uuid) -> StoreResult<Option<RoomType>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.room_types.iter().find(|rt| rt.id == room_type_id).cloned())
    }

    async fn inventory(
        &self,
        room_type_ids: &[Uuid],
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<InventoryEntry>> {
        self.check_available()?;
        let state = self.state.lock().await;

        Ok(state
            .inventory
            .iter()
            .filter(|((room_type_id, date), _)| {
                room_type_ids.contains(room_type_id) && *date >= from && *date < to
            })
            .map(|((room_type_id, date), held)| InventoryEntry {
                room_type_id: *room_type_id,
                stay_date: *date,
                rooms_held: *held,
            })
            .collect())
    }

    async fn list_bookings(&self, status: Option<BookingStatus>) -> StoreResult<Vec<Booking>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect())
    }

    async fn find_booking(&self, booking_id: Uuid) -> StoreResult<Option<Booking>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.bookings.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        self.check_available()?;
        self.state.lock().await.bookings.push(booking.clone());
        Ok(())
    }

    async fn update_booking(&self, booking_id: Uuid, update: &BookingUpdate) -> StoreResult<Option<Booking>> {
        self.check_available()?;
        let mut state = self.state.lock().await;

        let Some(booking) = state.bookings.iter_mut().find(|b| b.id == booking_id) else {
            return Ok(None);
        };
        booking.status = update.status;
        if let Some(seats) = update.available_seats {
            booking.available_seats = seats;
        }
        booking.updated_at = update.updated_at;
        Ok(Some(booking.clone()))
    }

    async fn reserve_seats(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        seats: i32,
    ) -> StoreResult<SeatReservation> {
        self.check_available()?;
        let mut state = self.state.lock().await;

        let Some(booking) = state.bookings.iter_mut().find(|b| b.id == booking_id) else {
            return Ok(SeatReservation::BookingNotFound);
        };
        if booking.available_seats < seats {
            return Ok(SeatReservation::InsufficientSeats {
                available: booking.available_seats,
            });
        }

        let now = Utc::now();
        booking.available_seats -= seats;
        booking.updated_at = now;

        let request = BookingRequest {
            id: Uuid::new_v4(),
            booking_id,
            user_id,
            seats,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.booking_requests.push(request.clone());

        Ok(SeatReservation::Reserved(request))
    }

    async fn list_booking_requests(&self, user_id: Uuid) -> StoreResult<Vec<BookingRequestWithBooking>> {
        self.check_available()?;
        let state = self.state.lock().await;

        let mut requests = Vec::new();
        for request in state.booking_requests.iter().rev().filter(|r| r.user_id == user_id) {
            let booking = state
                .bookings
                .iter()
                .find(|b| b.id == request.booking_id)
                .cloned()
                .ok_or_else(|| {
                    StoreError::Corrupt(format!("request {} references a missing booking", request.id))
                })?;
            requests.push(BookingRequestWithBooking {
                request: request.clone(),
                booking,
            });
        }
        Ok(requests)
    }

    async fn insert_provider_application(
        &self,
        application: &NewProviderApplication,
    ) -> StoreResult<ProviderApplication> {
        self.check_available()?;
        if self.typed_applications_disabled.load(Ordering::SeqCst) {
            return Err(StoreError::SchemaMismatch(
                "provider_applications has no column hotel_name".into(),
            ));
        }
        self.insert_application(application, StoredAs::Typed).await
    }

    async fn insert_provider_application_blob(
        &self,
        application: &NewProviderApplication,
    ) -> StoreResult<ProviderApplication> {
        self.check_available()?;
        self.insert_application(application, StoredAs::Blob).await
    }

    async fn list_provider_applications(&self, user_id: Uuid) -> StoreResult<Vec<ProviderApplication>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .applications
            .iter()
            .rev()
            .filter(|(a, _)| a.user_id == user_id)
            .map(|(a, _)| a.clone())
            .collect())
    }

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        self.check_available()?;
        Ok(self.state.lock().await.profiles.get(&user_id).cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> StoreResult<bool> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.profiles.contains_key(&profile.id) {
            return Ok(false);
        }
        state.profiles.insert(profile.id, profile.clone());
        Ok(true)
    }

    async fn find_draft(&self, user_id: Uuid, kind: &str) -> StoreResult<Option<Draft>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.drafts.get(&(user_id, kind.to_string())).cloned())
    }

    async fn save_draft(&self, draft: &Draft) -> StoreResult<()> {
        self.check_available()?;
        self.state
            .lock()
            .await
            .drafts
            .insert((draft.user_id, draft.kind.clone()), draft.clone());
        Ok(())
    }

    async fn delete_draft(&self, user_id: Uuid, kind: &str) -> StoreResult<bool> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .drafts
            .remove(&(user_id, kind.to_string()))
            .is_some())
    }
}
