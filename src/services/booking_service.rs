use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{
    AdminUpdateBooking, Booking, BookingListResponse, BookingResponse, BookingStatus, CreateBooking,
};
use crate::store::{BookingUpdate, EntityStore};
use crate::utils::error::{AppError, AppResult};

/// Legacy seat-based booking slots and their admin management.
pub struct BookingService {
    store: Arc<dyn EntityStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        BookingService { store }
    }

    // Open slots in calendar order
    pub async fn list_available(&self) -> AppResult<BookingListResponse> {
        let mut bookings = self.store.list_bookings(Some(BookingStatus::Available)).await?;
        bookings.sort_by_key(|b| (b.date, b.time));
        Ok(BookingListResponse { bookings })
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn create(&self, admin_id: Uuid, request: CreateBooking) -> AppResult<BookingResponse> {
        request.validate()?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            description: request.description,
            date: request.date,
            time: request.time,
            location: request.location.trim().to_string(),
            price: request.price,
            max_seats: request.max_seats,
            available_seats: request.max_seats,
            status: BookingStatus::Available,
            user_id: Some(admin_id),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_booking(&booking).await?;

        tracing::info!(booking_id = %booking.id, seats = booking.max_seats, "created booking slot");
        Ok(BookingResponse { booking })
    }

    // Every slot regardless of status, newest first
    pub async fn admin_list(&self) -> AppResult<BookingListResponse> {
        let mut bookings = self.store.list_bookings(None).await?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(BookingListResponse { bookings })
    }

    #[tracing::instrument(skip(self, request), fields(booking_id = %request.id))]
    pub async fn admin_update(&self, request: AdminUpdateBooking) -> AppResult<BookingResponse> {
        request.validate()?;

        let existing = self
            .store
            .find_booking(request.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if let Some(seats) = request.available_seats {
            if seats > existing.max_seats {
                return Err(AppError::invalid_field(
                    "available_seats",
                    &format!("Available seats cannot exceed max seats ({})", existing.max_seats),
                    "range",
                ));
            }
        }

        let update = BookingUpdate {
            status: request.status,
            available_seats: request.available_seats,
            updated_at: Utc::now(),
        };
        let booking = self
            .store
            .update_booking(request.id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        tracing::info!(status = %booking.status, available_seats = booking.available_seats, "updated booking");
        Ok(BookingResponse { booking })
    }
}
