use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use test_context::{test_context, AsyncTestContext};
use uuid::Uuid;

use hotel_booking_service::models::booking::{AdminUpdateBooking, BookingStatus, CreateBooking};
use hotel_booking_service::services::booking_service::BookingService;
use hotel_booking_service::store::memory::MemoryStore;
use hotel_booking_service::store::EntityStore;
use hotel_booking_service::utils::error::AppError;

mod common {
    pub mod fixtures;
}
use common::fixtures::booking;

struct BookingServiceContext {
    store: Arc<MemoryStore>,
    booking_service: BookingService,
    admin_id: Uuid,
}

#[async_trait]
impl AsyncTestContext for BookingServiceContext {
    async fn setup() -> Self {
        let store = Arc::new(MemoryStore::new());
        BookingServiceContext {
            booking_service: BookingService::new(store.clone()),
            store,
            admin_id: Uuid::new_v4(),
        }
    }
}

fn new_slot(day: u32, max_seats: i32) -> CreateBooking {
    CreateBooking {
        title: "  Temple walking tour ".into(),
        description: Some("Morning tour".into()),
        date: NaiveDate::from_ymd_opt(2030, 5, day).unwrap(),
        time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        location: "Wat Pho".into(),
        price: Decimal::new(1999, 2),
        max_seats,
    }
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_created_slot_starts_full(ctx: &mut BookingServiceContext) {
    let response = ctx
        .booking_service
        .create(ctx.admin_id, new_slot(3, 12))
        .await
        .unwrap();

    let booking = response.booking;
    assert_eq!(booking.title, "Temple walking tour");
    assert_eq!(booking.available_seats, 12);
    assert_eq!(booking.status, BookingStatus::Available);
    assert_eq!(booking.user_id, Some(ctx.admin_id));
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_create_validates_input(ctx: &mut BookingServiceContext) {
    let mut slot = new_slot(3, 0);
    slot.price = Decimal::new(-1, 0);

    let result = ctx.booking_service.create(ctx.admin_id, slot).await;
    let Err(AppError::ValidationError(details)) = result else {
        panic!("expected a validation error");
    };
    let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["max_seats", "price"]);
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_available_list_is_in_calendar_order(ctx: &mut BookingServiceContext) {
    let later = ctx.booking_service.create(ctx.admin_id, new_slot(20, 5)).await.unwrap();
    let sooner = ctx.booking_service.create(ctx.admin_id, new_slot(2, 5)).await.unwrap();

    let mut cancelled = booking(5, 5);
    cancelled.status = BookingStatus::Cancelled;
    ctx.store.insert_booking(&cancelled).await.unwrap();

    let list = ctx.booking_service.list_available().await.unwrap();
    let ids: Vec<Uuid> = list.bookings.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![sooner.booking.id, later.booking.id]);

    let all = ctx.booking_service.admin_list().await.unwrap();
    assert_eq!(all.bookings.len(), 3);
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_admin_update_changes_status_and_seats(ctx: &mut BookingServiceContext) {
    let slot = booking(10, 10);
    ctx.store.insert_booking(&slot).await.unwrap();

    let updated = ctx
        .booking_service
        .admin_update(AdminUpdateBooking {
            id: slot.id,
            status: BookingStatus::Booked,
            available_seats: Some(0),
        })
        .await
        .unwrap()
        .booking;

    assert_eq!(updated.status, BookingStatus::Booked);
    assert_eq!(updated.available_seats, 0);
    assert!(updated.updated_at >= slot.updated_at);

    // seats are left alone when not given
    let updated = ctx
        .booking_service
        .admin_update(AdminUpdateBooking {
            id: slot.id,
            status: BookingStatus::Cancelled,
            available_seats: None,
        })
        .await
        .unwrap()
        .booking;
    assert_eq!(updated.available_seats, 0);
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_admin_update_keeps_seats_within_bounds(ctx: &mut BookingServiceContext) {
    let slot = booking(10, 4);
    ctx.store.insert_booking(&slot).await.unwrap();

    for seats in [11, -1] {
        let result = ctx
            .booking_service
            .admin_update(AdminUpdateBooking {
                id: slot.id,
                status: BookingStatus::Available,
                available_seats: Some(seats),
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))), "seats = {}", seats);
    }

    let stored = ctx.store.find_booking(slot.id).await.unwrap().unwrap();
    assert_eq!(stored.available_seats, 4);
}

#[test_context(BookingServiceContext)]
#[tokio::test]
async fn test_admin_update_of_unknown_booking_is_not_found(ctx: &mut BookingServiceContext) {
    let result = ctx
        .booking_service
        .admin_update(AdminUpdateBooking {
            id: Uuid::new_v4(),
            status: BookingStatus::Cancelled,
            available_seats: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
