use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_context::{test_context, AsyncTestContext};
use uuid::Uuid;

use hotel_booking_service::models::booking::CreateBookingRequest;
use hotel_booking_service::services::booking_request_service::BookingRequestService;
use hotel_booking_service::store::memory::MemoryStore;
use hotel_booking_service::store::EntityStore;
use hotel_booking_service::utils::error::AppError;

mod common {
    pub mod fixtures;
}
use common::fixtures::booking;

struct BookingRequestContext {
    store: Arc<MemoryStore>,
    request_service: Arc<BookingRequestService>,
    user_id: Uuid,
}

#[async_trait]
impl AsyncTestContext for BookingRequestContext {
    async fn setup() -> Self {
        let store = Arc::new(MemoryStore::new());
        BookingRequestContext {
            request_service: Arc::new(BookingRequestService::new(store.clone())),
            store,
            user_id: Uuid::new_v4(),
        }
    }
}

impl BookingRequestContext {
    async fn create_booking(&self, seats: i32) -> Uuid {
        let booking = booking(seats, seats);
        self.store.insert_booking(&booking).await.unwrap();
        booking.id
    }

    async fn available_seats(&self, booking_id: Uuid) -> i32 {
        self.store.find_booking(booking_id).await.unwrap().unwrap().available_seats
    }
}

#[test_context(BookingRequestContext)]
#[tokio::test]
async fn test_request_decrements_available_seats(ctx: &mut BookingRequestContext) {
    let booking_id = ctx.create_booking(10).await;

    let response = ctx
        .request_service
        .create(ctx.user_id, CreateBookingRequest { booking_id, seats: 4 })
        .await
        .unwrap();

    assert_eq!(response.request.seats, 4);
    assert_eq!(response.request.user_id, ctx.user_id);
    assert_eq!(response.request.status.to_string(), "pending");
    assert_eq!(ctx.available_seats(booking_id).await, 6);
}

#[test_context(BookingRequestContext)]
#[tokio::test]
async fn test_too_many_seats_is_rejected_without_changes(ctx: &mut BookingRequestContext) {
    let booking_id = ctx.create_booking(3).await;

    let result = ctx
        .request_service
        .create(ctx.user_id, CreateBookingRequest { booking_id, seats: 4 })
        .await;

    assert!(matches!(result, Err(AppError::InsufficientCapacity(_))));
    assert_eq!(ctx.available_seats(booking_id).await, 3);
    assert_eq!(ctx.store.booking_request_count().await, 0);
}

#[test_context(BookingRequestContext)]
#[tokio::test]
async fn test_unknown_booking_is_not_found(ctx: &mut BookingRequestContext) {
    let result = ctx
        .request_service
        .create(ctx.user_id, CreateBookingRequest { booking_id: Uuid::new_v4(), seats: 1 })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(ctx.store.booking_request_count().await, 0);
}

#[test_context(BookingRequestContext)]
#[tokio::test]
async fn test_seat_count_must_be_between_1_and_20(ctx: &mut BookingRequestContext) {
    let booking_id = ctx.create_booking(50).await;

    for seats in [0, 21, -3] {
        let result = ctx
            .request_service
            .create(ctx.user_id, CreateBookingRequest { booking_id, seats })
            .await;
        let Err(AppError::ValidationError(details)) = result else {
            panic!("seats = {} should fail validation", seats);
        };
        assert_eq!(details[0].field, "seats");
    }
    assert_eq!(ctx.available_seats(booking_id).await, 50);
}

#[test_context(BookingRequestContext)]
#[tokio::test]
async fn test_random_sequences_never_oversell(ctx: &mut BookingRequestContext) {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let capacity = rng.gen_range(1..=40);
        let booking_id = ctx.create_booking(capacity).await;
        let mut accepted = 0;

        for _ in 0..30 {
            let seats = rng.gen_range(1..=20);
            match ctx
                .request_service
                .create(ctx.user_id, CreateBookingRequest { booking_id, seats })
                .await
            {
                Ok(_) => accepted += seats,
                Err(AppError::InsufficientCapacity(_)) => {}
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }

        assert!(accepted <= capacity);
        assert_eq!(ctx.available_seats(booking_id).await, capacity - accepted);
    }
}

#[test_context(BookingRequestContext)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_never_oversell(ctx: &mut BookingRequestContext) {
    let booking_id = ctx.create_booking(25).await;

    let mut handles = Vec::new();
    for _ in 0..40 {
        let service = ctx.request_service.clone();
        let user_id = Uuid::new_v4();
        handles.push(tokio::spawn(async move {
            service
                .create(user_id, CreateBookingRequest { booking_id, seats: 2 })
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(response) => accepted += response.request.seats,
            Err(AppError::InsufficientCapacity(_)) => {}
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    // 12 requests of 2 fit into 25 seats
    assert_eq!(accepted, 24);
    assert_eq!(ctx.available_seats(booking_id).await, 1);
    assert_eq!(ctx.store.booking_request_count().await, 12);
}

#[test_context(BookingRequestContext)]
#[tokio::test]
async fn test_listing_embeds_bookings_newest_first(ctx: &mut BookingRequestContext) {
    let first = ctx.create_booking(10).await;
    let second = ctx.create_booking(10).await;

    for booking_id in [first, second] {
        ctx.request_service
            .create(ctx.user_id, CreateBookingRequest { booking_id, seats: 1 })
            .await
            .unwrap();
    }
    // someone else's request stays out of the list
    ctx.request_service
        .create(Uuid::new_v4(), CreateBookingRequest { booking_id: first, seats: 1 })
        .await
        .unwrap();

    let list = ctx.request_service.list(ctx.user_id).await.unwrap();
    let booking_ids: Vec<Uuid> = list.requests.iter().map(|r| r.booking.id).collect();
    assert_eq!(booking_ids, vec![second, first]);
}
