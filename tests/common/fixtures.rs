#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use hotel_booking_service::models::booking::{Booking, BookingStatus};
use hotel_booking_service::models::hotel::{Amenity, City, Country, Hotel, Image, RoomType};
use hotel_booking_service::models::profile::{Profile, Role};
use hotel_booking_service::models::provider_application::{
    HotelBasicInfo, RoomSetup, RoomTypeDetail, SubmitProviderApplication,
};
use hotel_booking_service::store::memory::MemoryStore;

pub struct Catalog {
    pub thailand: Uuid,
    pub japan: Uuid,
    pub bangkok: Uuid,
    pub tokyo: Uuid,
    /// Bangkok, 5 stars
    pub riverside: Uuid,
    /// Bangkok, 3 stars
    pub sukhumvit: Uuid,
    /// Bangkok, unrated
    pub khao_san: Uuid,
    /// Tokyo, 4 stars
    pub shinjuku: Uuid,
    /// Tokyo, 5 stars, inactive
    pub closed: Uuid,
    /// "Bangkok Noi" district: must not match a "Bangkok" search
    pub noi: Uuid,
    pub riverside_suite: Uuid,
    pub riverside_twin: Uuid,
    pub wifi: Uuid,
}

pub fn country(name: &str, code: &str) -> Country {
    Country {
        id: Uuid::new_v4(),
        name: name.to_string(),
        code: code.to_string(),
    }
}

pub fn city(name: &str, country_id: Uuid) -> City {
    City {
        id: Uuid::new_v4(),
        name: name.to_string(),
        country_id,
        latitude: None,
        longitude: None,
    }
}

pub fn hotel(name: &str, city_id: Uuid, star_rating: Option<i32>) -> Hotel {
    let now = Utc::now();
    Hotel {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        address: format!("1 {} Road", name),
        city_id,
        latitude: None,
        longitude: None,
        star_rating,
        phone: None,
        email: None,
        website: None,
        check_in_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        check_out_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        is_active: true,
        manager_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn room_type(hotel_id: Uuid, name: &str, max_occupancy: i32, price: i64, total_rooms: i32) -> RoomType {
    RoomType {
        id: Uuid::new_v4(),
        hotel_id,
        name: name.to_string(),
        description: None,
        max_occupancy,
        bed_type: None,
        size_sqm: None,
        base_price_per_night: Decimal::from(price),
        total_rooms,
        is_active: true,
    }
}

pub fn image(owner_id: Uuid, sort_order: i32, is_primary: bool) -> Image {
    Image {
        id: Uuid::new_v4(),
        owner_id,
        image_url: format!("https://images.example.com/{}/{}.jpg", owner_id, sort_order),
        alt_text: None,
        is_primary,
        sort_order,
    }
}

pub async fn seed_catalog(store: &MemoryStore) -> Catalog {
    let thailand = country("Thailand", "TH");
    let japan = country("Japan", "JP");
    let bangkok = city("Bangkok", thailand.id);
    let noi_city = city("Bangkok Noi", thailand.id);
    let tokyo = city("Tokyo", japan.id);

    // Arrival order matters for the tie-break checks
    let sukhumvit = hotel("Sukhumvit Inn", bangkok.id, Some(3));
    let khao_san = hotel("Khao San Hostel", bangkok.id, None);
    let riverside = hotel("Riverside Palace", bangkok.id, Some(5));
    let shinjuku = hotel("Shinjuku Tower", tokyo.id, Some(4));
    let mut closed = hotel("Closed Ryokan", tokyo.id, Some(5));
    closed.is_active = false;
    let noi = hotel("Noi Riverside", noi_city.id, Some(4));

    let riverside_suite = room_type(riverside.id, "Suite", 4, 300, 2);
    let riverside_twin = room_type(riverside.id, "Twin", 2, 120, 10);
    let sukhumvit_double = room_type(sukhumvit.id, "Double", 2, 80, 5);
    let khao_san_dorm = room_type(khao_san.id, "Dorm Bed", 1, 15, 20);
    let shinjuku_family = room_type(shinjuku.id, "Family", 5, 250, 3);
    let mut retired = room_type(riverside.id, "Retired Wing", 6, 90, 4);
    retired.is_active = false;

    let wifi = Amenity {
        id: Uuid::new_v4(),
        name: "Free WiFi".into(),
        icon: Some("wifi".into()),
        category: Some("general".into()),
    };

    let catalog = Catalog {
        thailand: thailand.id,
        japan: japan.id,
        bangkok: bangkok.id,
        tokyo: tokyo.id,
        riverside: riverside.id,
        sukhumvit: sukhumvit.id,
        khao_san: khao_san.id,
        shinjuku: shinjuku.id,
        closed: closed.id,
        noi: noi.id,
        riverside_suite: riverside_suite.id,
        riverside_twin: riverside_twin.id,
        wifi: wifi.id,
    };

    for country in [thailand, japan] {
        store.insert_country(country).await;
    }
    for city in [bangkok, noi_city, tokyo] {
        store.insert_city(city).await;
    }
    store.insert_amenity(wifi).await;
    for hotel in [sukhumvit, khao_san, riverside, shinjuku, closed, noi] {
        store.insert_hotel(hotel).await;
    }
    for room_type in [
        riverside_suite,
        riverside_twin,
        sukhumvit_double,
        khao_san_dorm,
        shinjuku_family,
        retired,
    ] {
        store.insert_room_type(room_type).await;
    }

    store.link_hotel_amenity(catalog.riverside, catalog.wifi).await;
    store.link_room_type_amenity(catalog.riverside_suite, catalog.wifi).await;
    store.insert_hotel_image(image(catalog.riverside, 2, true)).await;
    store.insert_hotel_image(image(catalog.riverside, 1, false)).await;
    store.insert_hotel_image(image(catalog.riverside, 3, true)).await;

    catalog
}

pub fn booking(max_seats: i32, available_seats: i32) -> Booking {
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        title: "River dinner cruise".into(),
        description: None,
        date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        location: "Pier 1".into(),
        price: Decimal::new(4500, 2),
        max_seats,
        available_seats,
        status: BookingStatus::Available,
        user_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn profile(id: Uuid, role: Role) -> Profile {
    let now = Utc::now();
    Profile {
        id,
        email: format!("{}@example.com", id.simple()),
        full_name: Some("Test User".into()),
        phone: None,
        role,
        is_verified: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn room_type_detail(name: &str, price: i64, max_occupancy: i32, images: usize) -> RoomTypeDetail {
    RoomTypeDetail {
        name: name.to_string(),
        number_of_rooms: 4,
        price_per_night: Decimal::from(price),
        max_occupancy,
        images: vec![serde_json::json!({ "name": "photo.jpg" }); images],
        amenities: vec!["Air conditioning".into()],
    }
}

pub fn application(user_id: Option<Uuid>, room_types: Vec<RoomTypeDetail>) -> SubmitProviderApplication {
    SubmitProviderApplication {
        user_id,
        basic_info: Some(HotelBasicInfo {
            name: "Lotus Garden".into(),
            street: "99 Charoen Krung".into(),
            city: "Bangkok".into(),
            state: String::new(),
            country: "Thailand".into(),
            zip_code: "10500".into(),
            phone: "+66 2 000 0000".into(),
            email: "owner@lotus.example".into(),
            description: "Boutique hotel".into(),
        }),
        room_setup: Some(RoomSetup {
            number_of_room_types: room_types.len() as i32,
            total_number_of_rooms: 12,
            amenities: vec!["Pool".into()],
        }),
        room_types: Some(room_types),
    }
}
