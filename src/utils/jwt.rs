use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::profile_service::ProfileService;
use crate::utils::error::AppError;

/// Shared secret the identity provider signs bearer tokens with (HS256).
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// An authenticated caller whose profile carries the ADMIN role.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct AdminUser {
    pub user: AuthenticatedUser,
}

pub fn generate_token(
    secret: &str,
    user_id: Uuid,
    email: Option<String>,
    name: Option<String>,
) -> Result<String, jsonwebtoken::errors::Error> {
    // Set expiration time to 24 hours
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        email,
        name,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("Authorization") {
            Some(header) if header.starts_with("Bearer ") => header[7..].trim(),
            _ => {
                return Outcome::Error((
                    Status::Unauthorized,
                    AppError::Unauthorized("Missing bearer token".into()),
                ))
            }
        };

        let Some(auth) = request.rocket().state::<AuthConfig>() else {
            tracing::error!("configuration error: AuthConfig is not managed");
            return Outcome::Error((
                Status::InternalServerError,
                AppError::Misconfigured("AuthConfig is not managed".into()),
            ));
        };

        match verify_token(&auth.jwt_secret, token) {
            Ok(claims) => Outcome::Success(AuthenticatedUser {
                user_id: claims.sub,
                email: claims.email,
                name: claims.name,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer token");
                Outcome::Error((
                    Status::Unauthorized,
                    AppError::Unauthorized("Invalid or expired token".into()),
                ))
            }
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user = match AuthenticatedUser::from_request(request).await {
            Outcome::Success(user) => user,
            Outcome::Error(e) => return Outcome::Error(e),
            Outcome::Forward(status) => return Outcome::Forward(status),
        };

        let Some(profiles) = request.rocket().state::<ProfileService>() else {
            tracing::error!("configuration error: ProfileService is not managed");
            return Outcome::Error((
                Status::InternalServerError,
                AppError::Misconfigured("ProfileService is not managed".into()),
            ));
        };

        match profiles.require_admin(user.user_id).await {
            Ok(_) => Outcome::Success(AdminUser { user }),
            Err(e) => Outcome::Error((e.status(), e)),
        }
    }
}
