use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::models::draft::PROVIDER_APPLICATION_DRAFT;
use crate::models::provider_application::{
    ApplicationSnapshot, HotelBasicInfo, NewProviderApplication, ProviderApplicationListResponse,
    ProviderApplicationResponse, RoomSetup, RoomTypeDetail, RoomTypeSummary, SubmitProviderApplication,
};
use crate::store::{EntityStore, StoreError};
use crate::utils::error::{field_errors, AppError, AppResult, FieldError};

pub struct ProviderApplicationService {
    store: Arc<dyn EntityStore>,
}

impl ProviderApplicationService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        ProviderApplicationService { store }
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn submit(
        &self,
        user_id: Uuid,
        payload: SubmitProviderApplication,
    ) -> AppResult<ProviderApplicationResponse> {
        if payload.user_id.is_some_and(|id| id != user_id) {
            return Err(AppError::Forbidden("Cannot submit an application for another user".into()));
        }

        let (basic_info, room_setup, room_types) = validate_sections(payload)?;
        let snapshot = snapshot(basic_info, room_setup, room_types);

        let application = NewProviderApplication {
            id: Uuid::new_v4(),
            user_id,
            snapshot,
            created_at: Utc::now(),
        };

        let stored = match self.store.insert_provider_application(&application).await {
            Ok(stored) => stored,
            Err(StoreError::SchemaMismatch(detail)) => {
                tracing::warn!(%detail, "typed application columns unavailable, storing JSON snapshot");
                self.store.insert_provider_application_blob(&application).await?
            }
            Err(e) => return Err(e.into()),
        };

        // The application is already stored; a stale draft is only an inconvenience
        if let Err(e) = self.store.delete_draft(user_id, PROVIDER_APPLICATION_DRAFT).await {
            tracing::warn!(error = %e, "could not clear onboarding draft");
        }

        tracing::info!(application_id = %stored.id, room_types = stored.snapshot.room_types.len(), "application submitted");
        Ok(ProviderApplicationResponse {
            success: true,
            message: "Application submitted successfully".to_string(),
            application: stored,
        })
    }

    // Newest first
    pub async fn list(&self, user_id: Uuid) -> AppResult<ProviderApplicationListResponse> {
        let mut applications = self.store.list_provider_applications(user_id).await?;
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ProviderApplicationListResponse {
            success: true,
            applications,
        })
    }
}

// Every section must be present and valid; all problems are reported together
fn validate_sections(
    payload: SubmitProviderApplication,
) -> AppResult<(HotelBasicInfo, RoomSetup, Vec<RoomTypeDetail>)> {
    let mut details = Vec::new();

    match &payload.basic_info {
        Some(info) => collect("basicInfo", info.validate(), &mut details),
        None => details.push(FieldError::new("basicInfo", "Hotel basic information is required", "required")),
    }
    match &payload.room_setup {
        Some(setup) => collect("roomSetup", setup.validate(), &mut details),
        None => details.push(FieldError::new("roomSetup", "Room setup is required", "required")),
    }
    match &payload.room_types {
        Some(room_types) if room_types.is_empty() => {
            details.push(FieldError::new("roomTypes", "At least one room type is required", "length"))
        }
        Some(room_types) => {
            for (index, room_type) in room_types.iter().enumerate() {
                collect(&format!("roomTypes[{}]", index), room_type.validate(), &mut details);
            }
        }
        None => details.push(FieldError::new("roomTypes", "Room types are required", "required")),
    }

    match (payload.basic_info, payload.room_setup, payload.room_types) {
        (Some(info), Some(setup), Some(room_types)) if details.is_empty() => Ok((info, setup, room_types)),
        _ => {
            details.sort_by(|a, b| a.field.cmp(&b.field));
            Err(AppError::ValidationError(details))
        }
    }
}

fn collect(prefix: &str, result: Result<(), validator::ValidationErrors>, out: &mut Vec<FieldError>) {
    if let Err(errors) = result {
        out.extend(field_errors(prefix, &errors).into_iter().map(|mut e| {
            e.field = camel_case_path(&e.field);
            e
        }));
    }
}

// Field paths are reported in the payload's camelCase: basicInfo.zip_code -> basicInfo.zipCode
fn camel_case_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut upper_next = false;
    for c in path.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn snapshot(basic_info: HotelBasicInfo, room_setup: RoomSetup, room_types: Vec<RoomTypeDetail>) -> ApplicationSnapshot {
    ApplicationSnapshot {
        hotel_name: basic_info.name.trim().to_string(),
        hotel_description: basic_info.description,
        hotel_street: basic_info.street,
        hotel_city: basic_info.city,
        hotel_state: basic_info.state,
        hotel_country: basic_info.country,
        hotel_zip_code: basic_info.zip_code,
        hotel_phone: basic_info.phone,
        hotel_email: basic_info.email,
        number_of_room_types: room_setup.number_of_room_types,
        total_number_of_rooms: room_setup.total_number_of_rooms,
        hotel_amenities: room_setup.amenities,
        room_types: room_types
            .into_iter()
            .map(|rt| RoomTypeSummary {
                name: rt.name.trim().to_string(),
                number_of_rooms: rt.number_of_rooms,
                price_per_night: rt.price_per_night,
                max_occupancy: rt.max_occupancy,
                amenities: rt.amenities,
                images_count: rt.images.len() as i32,
            })
            .collect(),
    }
}
