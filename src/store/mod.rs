//! Entity store: every read and write the services make goes through
//! [`EntityStore`]. [`mysql::MySqlStore`] talks to the relational database,
//! [`memory::MemoryStore`] keeps everything in process.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingRequestWithBooking, BookingStatus, SeatReservation};
use crate::models::draft::Draft;
use crate::models::hotel::{HotelRecord, InventoryEntry, RoomType};
use crate::models::profile::Profile;
use crate::models::provider_application::{NewProviderApplication, ProviderApplication};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The target table does not have the columns we write to.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields an admin may change on a booking slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingUpdate {
    pub status: BookingStatus,
    pub available_seats: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Active hotels with all joins resolved, in the store's arrival order.
    /// `country_id` is applied store-side.
    async fn list_active_hotels(&self, country_id: Option<Uuid>) -> StoreResult<Vec<HotelRecord>>;

    async fn find_active_hotel(&self, hotel_id: Uuid) -> StoreResult<Option<HotelRecord>>;

    async fn find_room_type(&self, room_type_id: Uuid) -> StoreResult<Option<RoomType>>;

    /// Ledger rows for the given room types with `from <= stay_date < to`.
    async fn inventory(
        &self,
        room_type_ids: &[Uuid],
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<InventoryEntry>>;

    async fn list_bookings(&self, status: Option<BookingStatus>) -> StoreResult<Vec<Booking>>;

    async fn find_booking(&self, booking_id: Uuid) -> StoreResult<Option<Booking>>;

    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()>;

    async fn update_booking(&self, booking_id: Uuid, update: &BookingUpdate) -> StoreResult<Option<Booking>>;

    /// Load the slot, check capacity, insert a pending request and decrement
    /// `available_seats`, all as one unit of work.
    async fn reserve_seats(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        seats: i32,
    ) -> StoreResult<SeatReservation>;

    async fn list_booking_requests(&self, user_id: Uuid) -> StoreResult<Vec<BookingRequestWithBooking>>;

    /// Typed insert. Returns `StoreError::SchemaMismatch` when the table
    /// cannot take the typed columns.
    async fn insert_provider_application(
        &self,
        application: &NewProviderApplication,
    ) -> StoreResult<ProviderApplication>;

    /// Insert the whole snapshot into the JSON `application_data` column.
    async fn insert_provider_application_blob(
        &self,
        application: &NewProviderApplication,
    ) -> StoreResult<ProviderApplication>;

    async fn list_provider_applications(&self, user_id: Uuid) -> StoreResult<Vec<ProviderApplication>>;

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    /// Insert unless a profile with the same id exists, in which case the
    /// stored one is kept. Returns whether a row was written.
    async fn insert_profile(&self, profile: &Profile) -> StoreResult<bool>;

    async fn find_draft(&self, user_id: Uuid, kind: &str) -> StoreResult<Option<Draft>>;

    async fn save_draft(&self, draft: &Draft) -> StoreResult<()>;

    async fn delete_draft(&self, user_id: Uuid, kind: &str) -> StoreResult<bool>;
}
