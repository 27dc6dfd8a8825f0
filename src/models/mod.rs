pub mod booking;
pub mod draft;
pub mod hotel;
pub mod profile;
pub mod provider_application;
