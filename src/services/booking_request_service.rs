use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{
    BookingRequestListResponse, BookingRequestResponse, CreateBookingRequest, SeatReservation,
};
use crate::store::EntityStore;
use crate::utils::error::{AppError, AppResult};

pub struct BookingRequestService {
    store: Arc<dyn EntityStore>,
}

impl BookingRequestService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        BookingRequestService { store }
    }

    /// Request seats on a booking slot. The capacity check, the request insert
    /// and the seat decrement happen in one store transaction.
    #[tracing::instrument(skip(self, request), fields(booking_id = %request.booking_id, seats = request.seats))]
    pub async fn create(&self, user_id: Uuid, request: CreateBookingRequest) -> AppResult<BookingRequestResponse> {
        request.validate()?;

        match self
            .store
            .reserve_seats(request.booking_id, user_id, request.seats)
            .await?
        {
            SeatReservation::Reserved(created) => {
                tracing::info!(request_id = %created.id, "seats reserved");
                Ok(BookingRequestResponse { request: created })
            }
            SeatReservation::BookingNotFound => Err(AppError::NotFound("Booking not found".into())),
            SeatReservation::InsufficientSeats { available } => {
                tracing::info!(available, "not enough seats");
                Err(AppError::InsufficientCapacity(format!(
                    "Not enough seats available ({} left)",
                    available
                )))
            }
        }
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<BookingRequestListResponse> {
        let requests = self.store.list_booking_requests(user_id).await?;
        Ok(BookingRequestListResponse { requests })
    }
}
