use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::types::Json;
use sqlx::{MySql, QueryBuilder};
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
    ApplicationSnapshot, ApplicationStatus, NewProviderApplication, ProviderApplication, RoomTypeSummary,
};
use crate::store::{BookingUpdate, EntityStore, StoreError, StoreResult};

// SQLSTATE for "unknown column" and "table does not exist"
const SCHEMA_MISMATCH_STATES: &[&str] = &["42S22", "42S02"];

const HOTEL_SELECT: &str = r#"
    SELECT
        h.id, h.name, h.description, h.address, h.city_id, h.latitude, h.longitude,
        h.star_rating, h.phone, h.email, h.website, h.check_in_time, h.check_out_time,
        h.is_active, h.manager_id, h.created_at, h.updated_at,
        c.name AS city_name, c.country_id, c.latitude AS city_latitude, c.longitude AS city_longitude,
        co.name AS country_name, co.code AS country_code
    FROM hotels h
    JOIN cities c ON c.id = h.city_id
    JOIN countries co ON co.id = c.country_id
"#;

const BOOKING_COLUMNS: &str = r#"
    id, title, description, `date`, `time`, location, price, max_seats,
    available_seats, status, user_id, created_at, updated_at
"#;

const APPLICATION_TYPED_SELECT: &str = r#"
    SELECT id, user_id, status, review_note, hotel_name, hotel_description, hotel_street,
           hotel_city, hotel_state, hotel_country, hotel_zip_code, hotel_phone, hotel_email,
           number_of_room_types, total_number_of_rooms, hotel_amenities, room_types,
           application_data, created_at, updated_at
    FROM provider_applications
    WHERE user_id = ?
    ORDER BY created_at DESC
"#;

const APPLICATION_BLOB_SELECT: &str = r#"
    SELECT id, user_id, status, review_note, application_data, created_at, updated_at
    FROM provider_applications
    WHERE user_id = ?
    ORDER BY created_at DESC
"#;

const PROFILE_COLUMNS: &str = "id, email, full_name, phone, role, is_verified, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct HotelJoinRow {
    #[sqlx(flatten)]
    hotel: Hotel,
    city_name: String,
    country_id: Uuid,
    city_latitude: Option<f64>,
    city_longitude: Option<f64>,
    country_name: String,
    country_code: String,
}

#[derive(sqlx::FromRow)]
struct AmenityLinkRow {
    owner_id: Uuid,
    #[sqlx(flatten)]
    amenity: Amenity,
}

// Typed columns default to NULL so rows can also be read from a table that only
// has the JSON column
#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    user_id: Uuid,
    status: ApplicationStatus,
    review_note: Option<String>,
    #[sqlx(default)]
    hotel_name: Option<String>,
    #[sqlx(default)]
    hotel_description: Option<String>,
    #[sqlx(default)]
    hotel_street: Option<String>,
    #[sqlx(default)]
    hotel_city: Option<String>,
    #[sqlx(default)]
    hotel_state: Option<String>,
    #[sqlx(default)]
    hotel_country: Option<String>,
    #[sqlx(default)]
    hotel_zip_code: Option<String>,
    #[sqlx(default)]
    hotel_phone: Option<String>,
    #[sqlx(default)]
    hotel_email: Option<String>,
    #[sqlx(default)]
    number_of_room_types: Option<i32>,
    #[sqlx(default)]
    total_number_of_rooms: Option<i32>,
    #[sqlx(default)]
    hotel_amenities: Option<Json<Vec<String>>>,
    #[sqlx(default)]
    room_types: Option<Json<Vec<RoomTypeSummary>>>,
    application_data: Option<Json<ApplicationSnapshot>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    // Rows written through the fallback path only carry application_data
    fn into_application(self) -> StoreResult<ProviderApplication> {
        let snapshot = match self.application_data {
            Some(Json(snapshot)) => snapshot,
            None => {
                let hotel_name = self
                    .hotel_name
                    .ok_or_else(|| StoreError::Corrupt(format!("application {} has no hotel data", self.id)))?;
                ApplicationSnapshot {
                    hotel_name,
                    hotel_description: self.hotel_description.unwrap_or_default(),
                    hotel_street: self.hotel_street.unwrap_or_default(),
                    hotel_city: self.hotel_city.unwrap_or_default(),
                    hotel_state: self.hotel_state.unwrap_or_default(),
                    hotel_country: self.hotel_country.unwrap_or_default(),
                    hotel_zip_code: self.hotel_zip_code.unwrap_or_default(),
                    hotel_phone: self.hotel_phone.unwrap_or_default(),
                    hotel_email: self.hotel_email.unwrap_or_default(),
                    number_of_room_types: self.number_of_room_types.unwrap_or_default(),
                    total_number_of_rooms: self.total_number_of_rooms.unwrap_or_default(),
                    hotel_amenities: self.hotel_amenities.map(|Json(a)| a).unwrap_or_default(),
                    room_types: self.room_types.map(|Json(r)| r).unwrap_or_default(),
                }
            }
        };

        Ok(ProviderApplication {
            id: self.id,
            user_id: self.user_id,
            status: self.status,
            review_note: self.review_note,
            snapshot,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DraftRow {
    user_id: Uuid,
    kind: String,
    step: i32,
    completed_steps: Json<Vec<i32>>,
    data: Json<serde_json::Value>,
    updated_at: DateTime<Utc>,
}

impl From<DraftRow> for Draft {
    fn from(row: DraftRow) -> Self {
        Draft {
            user_id: row.user_id,
            kind: row.kind,
            step: row.step,
            completed_steps: row.completed_steps.0,
            data: row.data.0,
            updated_at: row.updated_at,
        }
    }
}

fn push_id_list(builder: &mut QueryBuilder<'_, MySql>, ids: &[Uuid]) {
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

fn group_by_owner<T>(rows: Vec<(Uuid, T)>) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for (owner, value) in rows {
        grouped.entry(owner).or_default().push(value);
    }
    grouped
}

fn map_schema_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            if SCHEMA_MISMATCH_STATES.contains(&&*code) {
                return StoreError::SchemaMismatch(db_err.message().to_string());
            }
        }
    }
    StoreError::Database(err)
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlStore { pool }
    }

    async fn images(&self, table: &str, owner_column: &str, owner_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<Image>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT id, {owner} AS owner_id, image_url, alt_text, is_primary, sort_order FROM {table} WHERE {owner} IN (",
            owner = owner_column,
            table = table,
        ));
        push_id_list(&mut builder, owner_ids);
        builder.push(" ORDER BY sort_order");

        let images: Vec<Image> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(group_by_owner(images.into_iter().map(|i| (i.owner_id, i)).collect()))
    }

    async fn amenities(&self, link_table: &str, owner_column: &str, owner_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<Amenity>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT l.{owner} AS owner_id, a.id, a.name, a.icon, a.category \
             FROM {link} l JOIN amenities a ON a.id = l.amenity_id WHERE l.{owner} IN (",
            owner = owner_column,
            link = link_table,
        ));
        push_id_list(&mut builder, owner_ids);
        builder.push(" ORDER BY a.name");

        let rows: Vec<AmenityLinkRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(group_by_owner(rows.into_iter().map(|r| (r.owner_id, r.amenity)).collect()))
    }

    async fn room_types(&self, hotel_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<RoomTypeRecord>>> {
        if hotel_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT id, hotel_id, name, description, max_occupancy, bed_type, size_sqm, \
             base_price_per_night, total_rooms, is_active FROM room_types WHERE hotel_id IN (",
        );
        push_id_list(&mut builder, hotel_ids);
        builder.push(" ORDER BY base_price_per_night, name");
        let room_types: Vec<RoomType> = builder.build_query_as().fetch_all(&self.pool).await?;

        let room_type_ids: Vec<Uuid> = room_types.iter().map(|rt| rt.id).collect();
        let mut images = self.images("room_type_images", "room_type_id", &room_type_ids).await?;
        let mut amenities = self
            .amenities("room_type_amenities", "room_type_id", &room_type_ids)
            .await?;

        Ok(group_by_owner(
            room_types
                .into_iter()
                .map(|room_type| {
                    let record = RoomTypeRecord {
                        images: images.remove(&room_type.id).unwrap_or_default(),
                        amenities: amenities.remove(&room_type.id).unwrap_or_default(),
                        room_type,
                    };
                    (record.room_type.hotel_id, record)
                })
                .collect(),
        ))
    }

    // Resolve images, amenities and room types for a page of hotel rows, keeping row order
    async fn hotel_records(&self, rows: Vec<HotelJoinRow>) -> StoreResult<Vec<HotelRecord>> {
        let hotel_ids: Vec<Uuid> = rows.iter().map(|r| r.hotel.id).collect();
        let mut images = self.images("hotel_images", "hotel_id", &hotel_ids).await?;
        let mut amenities = self.amenities("hotel_amenities", "hotel_id", &hotel_ids).await?;
        let mut room_types = self.room_types(&hotel_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.hotel.id;
                HotelRecord {
                    city: City {
                        id: row.hotel.city_id,
                        name: row.city_name,
                        country_id: row.country_id,
                        latitude: row.city_latitude,
                        longitude: row.city_longitude,
                    },
                    country: Country {
                        id: row.country_id,
                        name: row.country_name,
                        code: row.country_code,
                    },
                    images: images.remove(&id).unwrap_or_default(),
                    amenities: amenities.remove(&id).unwrap_or_default(),
                    room_types: room_types.remove(&id).unwrap_or_default(),
                    hotel: row.hotel,
                }
            })
            .collect())
    }
}

#[async_trait]
impl EntityStore for MySqlStore {
    async fn list_active_hotels(&self, country_id: Option<Uuid>) -> StoreResult<Vec<HotelRecord>> {
        let sql = format!(
            "{} WHERE h.is_active = TRUE AND (? IS NULL OR c.country_id = ?) \
             ORDER BY h.star_rating DESC, h.name, h.id",
            HOTEL_SELECT
        );
        let rows: Vec<HotelJoinRow> = sqlx::query_as(&sql)
            .bind(country_id)
            .bind(country_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = rows.len(), "loaded active hotels");
        self.hotel_records(rows).await
    }

    async fn find_active_hotel(&self, hotel_id: Uuid) -> StoreResult<Option<HotelRecord>> {
        let sql = format!("{} WHERE h.is_active = TRUE AND h.id = ?", HOTEL_SELECT);
        let row: Option<HotelJoinRow> = sqlx::query_as(&sql)
            .bind(hotel_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hotel_records(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_room_type(&self, room_type_id: Uuid) -> StoreResult<Option<RoomType>> {
        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            SELECT id, hotel_id, name, description, max_occupancy, bed_type, size_sqm,
                   base_price_per_night, total_rooms, is_active
            FROM room_types
            WHERE id = ?
            "#,
        )
        .bind(room_type_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room_type)
    }

    async fn inventory(
        &self,
        room_type_ids: &[Uuid],
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<InventoryEntry>> {
        if room_type_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT room_type_id, stay_date, rooms_held FROM room_inventory WHERE stay_date >= ",
        );
        builder.push_bind(from);
        builder.push(" AND stay_date < ");
        builder.push_bind(to);
        builder.push(" AND room_type_id IN (");
        push_id_list(&mut builder, room_type_ids);

        Ok(builder.build_query_as().fetch_all(&self.pool).await?)
    }

    async fn list_bookings(&self, status: Option<BookingStatus>) -> StoreResult<Vec<Booking>> {
        let bookings = match status {
            // Open slots read in calendar order
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM bookings WHERE status = ? ORDER BY `date`, `time`",
                    BOOKING_COLUMNS
                );
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            // Admin listing, newest first
            None => {
                let sql = format!("SELECT {} FROM bookings ORDER BY created_at DESC", BOOKING_COLUMNS);
                sqlx::query_as::<_, Booking>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(bookings)
    }

    async fn find_booking(&self, booking_id: Uuid) -> StoreResult<Option<Booking>> {
        let sql = format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS);
        Ok(sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings
            (id, title, description, `date`, `time`, location, price, max_seats,
                available_seats, status, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id)
        .bind(&booking.title)
        .bind(&booking.description)
        .bind(booking.date)
        .bind(booking.time)
        .bind(&booking.location)
        .bind(booking.price)
        .bind(booking.max_seats)
        .bind(booking.available_seats)
        .bind(booking.status)
        .bind(booking.user_id)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_booking(&self, booking_id: Uuid, update: &BookingUpdate) -> StoreResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {} FROM bookings WHERE id = ? FOR UPDATE", BOOKING_COLUMNS);
        let existing = sqlx::query_as::<_, Booking>(&select)
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut booking) = existing else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?,
                available_seats = COALESCE(?, available_seats),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.status)
        .bind(update.available_seats)
        .bind(update.updated_at)
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        booking.status = update.status;
        if let Some(seats) = update.available_seats {
            booking.available_seats = seats;
        }
        booking.updated_at = update.updated_at;
        Ok(Some(booking))
    }

    async fn reserve_seats(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        seats: i32,
    ) -> StoreResult<SeatReservation> {
        let mut tx = self.pool.begin().await?;

        // lock the slot row for the rest of the transaction
        let select = format!("SELECT {} FROM bookings WHERE id = ? FOR UPDATE", BOOKING_COLUMNS);
        let booking = sqlx::query_as::<_, Booking>(&select)
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(booking) = booking else {
            tx.rollback().await?;
            return Ok(SeatReservation::BookingNotFound);
        };

        if booking.available_seats < seats {
            tx.rollback().await?;
            return Ok(SeatReservation::InsufficientSeats {
                available: booking.available_seats,
            });
        }

        let now = Utc::now();
        let request = BookingRequest {
            id: Uuid::new_v4(),
            booking_id,
            user_id,
            seats,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO booking_requests (id, booking_id, user_id, seats, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.id)
        .bind(request.booking_id)
        .bind(request.user_id)
        .bind(request.seats)
        .bind(request.status)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await?;

        let update_result = sqlx::query(
            r#"
            UPDATE bookings
            SET available_seats = available_seats - ?,
                updated_at = ?
            WHERE id = ?
            AND available_seats >= ?
            "#,
        )
        .bind(seats)
        .bind(now)
        .bind(booking_id)
        .bind(seats)
        .execute(&mut *tx)
        .await?;

        if update_result.rows_affected() == 0 {
            // the request row goes away with the rollback
            tx.rollback().await?;
            return Ok(SeatReservation::InsufficientSeats {
                available: booking.available_seats,
            });
        }

        tx.commit().await?;
        Ok(SeatReservation::Reserved(request))
    }

    async fn list_booking_requests(&self, user_id: Uuid) -> StoreResult<Vec<BookingRequestWithBooking>> {
        let requests = sqlx::query_as::<_, BookingRequest>(
            r#"
            SELECT id, booking_id, user_id, seats, status, created_at, updated_at
            FROM booking_requests
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let mut booking_ids: Vec<Uuid> = requests.iter().map(|r| r.booking_id).collect();
        booking_ids.sort();
        booking_ids.dedup();

        let mut builder = QueryBuilder::<MySql>::new(format!("SELECT {} FROM bookings WHERE id IN (", BOOKING_COLUMNS));
        push_id_list(&mut builder, &booking_ids);
        let bookings: Vec<Booking> = builder.build_query_as().fetch_all(&self.pool).await?;
        let bookings: HashMap<Uuid, Booking> = bookings.into_iter().map(|b| (b.id, b)).collect();

        requests
            .into_iter()
            .map(|request| {
                let booking = bookings.get(&request.booking_id).cloned().ok_or_else(|| {
                    StoreError::Corrupt(format!("request {} references a missing booking", request.id))
                })?;
                Ok(BookingRequestWithBooking { request, booking })
            })
            .collect()
    }

    async fn insert_provider_application(
        &self,
        application: &NewProviderApplication,
    ) -> StoreResult<ProviderApplication> {
        let snapshot = &application.snapshot;
        sqlx::query(
            r#"
            INSERT INTO provider_applications
            (id, user_id, status, hotel_name, hotel_description, hotel_street, hotel_city,
                hotel_state, hotel_country, hotel_zip_code, hotel_phone, hotel_email,
                number_of_room_types, total_number_of_rooms, hotel_amenities, room_types,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(application.id)
        .bind(application.user_id)
        .bind(ApplicationStatus::Pending)
        .bind(&snapshot.hotel_name)
        .bind(&snapshot.hotel_description)
        .bind(&snapshot.hotel_street)
        .bind(&snapshot.hotel_city)
        .bind(&snapshot.hotel_state)
        .bind(&snapshot.hotel_country)
        .bind(&snapshot.hotel_zip_code)
        .bind(&snapshot.hotel_phone)
        .bind(&snapshot.hotel_email)
        .bind(snapshot.number_of_room_types)
        .bind(snapshot.total_number_of_rooms)
        .bind(Json(&snapshot.hotel_amenities))
        .bind(Json(&snapshot.room_types))
        .bind(application.created_at)
        .bind(application.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_schema_error)?;

        Ok(pending_application(application))
    }

    async fn insert_provider_application_blob(
        &self,
        application: &NewProviderApplication,
    ) -> StoreResult<ProviderApplication> {
        sqlx::query(
            r#"
            INSERT INTO provider_applications (id, user_id, status, application_data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(application.id)
        .bind(application.user_id)
        .bind(ApplicationStatus::Pending)
        .bind(Json(&application.snapshot))
        .bind(application.created_at)
        .bind(application.created_at)
        .execute(&self.pool)
        .await?;

        Ok(pending_application(application))
    }

    async fn list_provider_applications(&self, user_id: Uuid) -> StoreResult<Vec<ProviderApplication>> {
        let typed = sqlx::query_as::<_, ApplicationRow>(APPLICATION_TYPED_SELECT)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_schema_error);

        let rows = match typed {
            Ok(rows) => rows,
            Err(StoreError::SchemaMismatch(detail)) => {
                tracing::warn!(%detail, "typed application columns unavailable, reading JSON snapshots");
                sqlx::query_as::<_, ApplicationRow>(APPLICATION_BLOB_SELECT)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            Err(e) => return Err(e),
        };

        rows.into_iter().map(ApplicationRow::into_application).collect()
    }

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS);
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_profile(&self, profile: &Profile) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (id, email, full_name, phone, role, is_verified, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(profile.role)
        .bind(profile.is_verified)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            // a concurrent first login created the row already
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_draft(&self, user_id: Uuid, kind: &str) -> StoreResult<Option<Draft>> {
        let row = sqlx::query_as::<_, DraftRow>(
            r#"
            SELECT user_id, kind, step, completed_steps, data, updated_at
            FROM drafts
            WHERE user_id = ? AND kind = ?
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Draft::from))
    }

    async fn save_draft(&self, draft: &Draft) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO drafts (user_id, kind, step, completed_steps, data, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                step = VALUES(step),
                completed_steps = VALUES(completed_steps),
                data = VALUES(data),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(draft.user_id)
        .bind(&draft.kind)
        .bind(draft.step)
        .bind(Json(&draft.completed_steps))
        .bind(Json(&draft.data))
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_draft(&self, user_id: Uuid, kind: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM drafts WHERE user_id = ? AND kind = ?")
            .bind(user_id)
            .bind(kind)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn pending_application(application: &NewProviderApplication) -> ProviderApplication {
    ProviderApplication {
        id: application.id,
        user_id: application.user_id,
        status: ApplicationStatus::Pending,
        review_note: None,
        snapshot: application.snapshot.clone(),
        created_at: application.created_at,
        updated_at: application.created_at,
    }
}
