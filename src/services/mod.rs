pub mod availability;
pub mod booking_request_service;
pub mod booking_service;
pub mod draft_service;
pub mod hotel_service;
pub mod profile_service;
pub mod provider_application_service;
