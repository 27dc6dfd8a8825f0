use crate::utils::error::{AppError, FieldError};
use okapi::openapi3::SchemaObject;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::okapi::Map;
use rocket_okapi::response::OpenApiResponderInner;

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        // One documented example per status the handlers can produce
        let error_responses = [
            (
                "Bad Request",
                AppError::ValidationError(vec![FieldError::new(
                    "seats",
                    "Seats must be between 1 and 20",
                    "range",
                )]),
            ),
            ("Unauthorized", AppError::Unauthorized("Invalid or expired token".to_string())),
            ("Forbidden", AppError::Forbidden("Admin access required".to_string())),
            ("Not Found", AppError::NotFound("Booking not found".to_string())),
            (
                "Internal Server Error",
                AppError::UpstreamStoreError("store unavailable".to_string()),
            ),
        ];

        for (description, error) in error_responses {
            responses.responses.insert(
                error.status().code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content: {
                        let mut content = Map::new();
                        content.insert(
                            "application/json".to_string(),
                            MediaType {
                                schema: Some(SchemaObject::default()),
                                example: Some(error.body()),
                                ..Default::default()
                            },
                        );
                        content
                    },
                    ..Default::default()
                }),
            );
        }

        Ok(responses)
    }
}
