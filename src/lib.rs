#[macro_use]
extern crate rocket;
extern crate rocket_okapi;

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod swagger;
pub mod utils;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;

use crate::config::AppConfig;
use crate::services::availability::AvailabilityService;
use crate::services::booking_request_service::BookingRequestService;
use crate::services::booking_service::BookingService;
use crate::services::draft_service::DraftService;
use crate::services::hotel_service::HotelService;
use crate::services::profile_service::ProfileService;
use crate::services::provider_application_service::ProviderApplicationService;
use crate::store::EntityStore;
use crate::swagger::swagger_ui;
use crate::utils::fairings::RequestLogger;
use crate::utils::jwt::AuthConfig;

/// Assemble the Rocket instance over the given store.
pub fn build_rocket(config: &AppConfig, store: Arc<dyn EntityStore>) -> Rocket<Build> {
    // tracing owns logging, Rocket's own logger stays quiet
    let figment = rocket::Config::figment()
        .merge(("address", config.bind_address.clone()))
        .merge(("port", config.port))
        .merge(("log_level", "off"));

    rocket::custom(figment)
        .manage(AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
        })
        .manage(HotelService::new(store.clone()))
        .manage(AvailabilityService::new(store.clone()))
        .manage(BookingService::new(store.clone()))
        .manage(BookingRequestService::new(store.clone()))
        .manage(ProviderApplicationService::new(store.clone()))
        .manage(ProfileService::new(
            store.clone(),
            config.profile_retry_attempts,
            config.profile_retry_delay(),
        ))
        .manage(DraftService::new(store))
        .mount(
            "/api",
            openapi_get_routes![
                routes::hotel_route::search_hotels,
                routes::hotel_route::get_hotel,
                routes::hotel_route::room_type_availability,
                routes::booking_route::list_bookings,
                routes::booking_route::create_booking,
                routes::admin_route::admin_list_bookings,
                routes::admin_route::admin_update_booking,
                routes::booking_request_route::list_booking_requests,
                routes::booking_request_route::create_booking_request,
                routes::provider_application_route::list_provider_applications,
                routes::provider_application_route::submit_provider_application,
                routes::profile_route::fetch_profile,
                routes::draft_route::get_draft,
                routes::draft_route::save_draft,
                routes::draft_route::delete_draft,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register(
            "/",
            catchers![
                utils::catchers::bad_request,
                utils::catchers::unauthorized,
                utils::catchers::forbidden,
                utils::catchers::not_found,
                utils::catchers::unprocessable,
                utils::catchers::internal_error,
            ],
        )
        .attach(RequestLogger)
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
