use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::hotel::{AvailabilityQuote, InventoryEntry, RoomType, StayDates};
use crate::store::EntityStore;
use crate::utils::error::{AppError, AppResult};

/// Whole nights between the two dates. Absent dates mean no stay, so 0.
pub fn nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> AppResult<i64> {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => Ok(stay_nights(&StayDates::new(check_in, check_out)?)),
        _ => Ok(0),
    }
}

pub fn stay_nights(stay: &StayDates) -> i64 {
    (stay.check_out() - stay.check_in()).num_days()
}

/// Rate times nights; a stay without nights costs one night's rate.
pub fn total_cost(rate: Decimal, nights: i64) -> Decimal {
    if nights > 0 {
        rate * Decimal::from(nights)
    } else {
        rate
    }
}

/// Nightly rate currently charged. There is no seasonal pricing, so this is
/// the base rate.
pub fn current_price(room_type: &RoomType) -> Decimal {
    room_type.base_price_per_night
}

/// Minimum over the stay's nights of `total_rooms - rooms_held`, floored at 0.
pub fn available_rooms(room_type: &RoomType, stay: &StayDates, ledger: &[InventoryEntry]) -> i32 {
    let held: HashMap<NaiveDate, i32> = ledger
        .iter()
        .filter(|e| e.room_type_id == room_type.id)
        .map(|e| (e.stay_date, e.rooms_held))
        .collect();

    stay.nights_iter()
        .map(|night| room_type.total_rooms - held.get(&night).copied().unwrap_or(0))
        .min()
        .unwrap_or(room_type.total_rooms)
        .max(0)
}

/// Resolves room availability and stay pricing against the inventory ledger.
#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn EntityStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        AvailabilityService { store }
    }

    /// Rooms left for each room type over `stay`, fetched with one ledger read.
    pub async fn available_rooms_for(
        &self,
        room_types: &[&RoomType],
        stay: &StayDates,
    ) -> AppResult<HashMap<Uuid, i32>> {
        if room_types.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = room_types.iter().map(|rt| rt.id).collect();
        let ledger = self
            .store
            .inventory(&ids, stay.check_in(), stay.check_out())
            .await?;

        Ok(room_types
            .iter()
            .map(|rt| (rt.id, available_rooms(rt, stay, &ledger)))
            .collect())
    }

    pub async fn is_available(
        &self,
        room_type_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        rooms_needed: i32,
    ) -> AppResult<bool> {
        let stay = StayDates::new(check_in, check_out)?;
        let quote = self.quote(room_type_id, &stay, rooms_needed).await?;
        Ok(quote.available)
    }

    #[tracing::instrument(skip(self, stay), fields(check_in = %stay.check_in(), check_out = %stay.check_out()))]
    pub async fn quote(&self, room_type_id: Uuid, stay: &StayDates, rooms_needed: i32) -> AppResult<AvailabilityQuote> {
        if rooms_needed < 1 {
            return Err(AppError::invalid_field(
                "rooms",
                "At least one room must be requested",
                "range",
            ));
        }

        let room_type = self
            .store
            .find_room_type(room_type_id)
            .await?
            .filter(|rt| rt.is_active)
            .ok_or_else(|| AppError::NotFound("Room type not found".into()))?;

        let ledger = self
            .store
            .inventory(&[room_type.id], stay.check_in(), stay.check_out())
            .await?;
        let available_rooms = available_rooms(&room_type, stay, &ledger);

        let nights = stay_nights(stay);
        let nightly_rate = current_price(&room_type);

        Ok(AvailabilityQuote {
            room_type_id,
            available: available_rooms >= rooms_needed,
            available_rooms,
            nights,
            nightly_rate,
            total_cost: total_cost(nightly_rate, nights) * Decimal::from(rooms_needed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn room_type(total_rooms: i32) -> RoomType {
        RoomType {
            id: Uuid::new_v4(),
            hotel_id: Uuid::new_v4(),
            name: "Deluxe King".into(),
            description: None,
            max_occupancy: 2,
            bed_type: Some("King".into()),
            size_sqm: Some(32),
            base_price_per_night: Decimal::from(120),
            total_rooms,
            is_active: true,
        }
    }

    #[test]
    fn total_cost_multiplies_by_nights() {
        assert_eq!(total_cost(Decimal::from(100), 3), Decimal::from(300));
        assert_eq!(total_cost(Decimal::new(8950, 2), 0), Decimal::new(8950, 2));
    }

    #[test]
    fn nights_require_both_dates_in_order() {
        assert_eq!(nights(None, None).unwrap(), 0);
        assert_eq!(nights(Some(date(1)), None).unwrap(), 0);
        assert_eq!(nights(Some(date(1)), Some(date(4))).unwrap(), 3);
        assert!(matches!(
            nights(Some(date(4)), Some(date(4))),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn stays_longer_than_the_cap_are_rejected() {
        let check_in = date(1);
        let longest = check_in + chrono::Duration::days(crate::models::hotel::MAX_STAY_NIGHTS);
        assert_eq!(nights(Some(check_in), Some(longest)).unwrap(), 30);

        let Err(AppError::ValidationError(details)) = StayDates::new(check_in, longest + chrono::Duration::days(1))
        else {
            panic!("expected a validation error");
        };
        assert_eq!(details[0].field, "check_out_date");
        assert_eq!(details[0].code, "range");
    }

    #[test]
    fn current_price_is_the_base_rate() {
        let rt = room_type(3);
        assert_eq!(current_price(&rt), Decimal::from(120));
    }

    #[test]
    fn available_rooms_is_the_tightest_night() {
        let rt = room_type(5);
        let stay = StayDates::new(date(10), date(13)).unwrap();
        let ledger = vec![
            InventoryEntry { room_type_id: rt.id, stay_date: date(10), rooms_held: 1 },
            InventoryEntry { room_type_id: rt.id, stay_date: date(11), rooms_held: 4 },
            // checkout night is not part of the stay
            InventoryEntry { room_type_id: rt.id, stay_date: date(13), rooms_held: 5 },
            InventoryEntry { room_type_id: Uuid::new_v4(), stay_date: date(12), rooms_held: 5 },
        ];

        assert_eq!(available_rooms(&rt, &stay, &ledger), 1);
    }

    #[test]
    fn overbooked_nights_floor_at_zero() {
        let rt = room_type(2);
        let stay = StayDates::single_night(date(5));
        let ledger = vec![InventoryEntry { room_type_id: rt.id, stay_date: date(5), rooms_held: 3 }];
        assert_eq!(available_rooms(&rt, &stay, &ledger), 0);
    }
}
