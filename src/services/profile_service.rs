use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::models::profile::{Profile, ProfileResponse, Role};
use crate::store::EntityStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AuthenticatedUser;

pub struct ProfileService {
    store: Arc<dyn EntityStore>,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl ProfileService {
    pub fn new(store: Arc<dyn EntityStore>, retry_attempts: u32, retry_delay: Duration) -> Self {
        ProfileService {
            store,
            retry_attempts,
            retry_delay,
        }
    }

    /// Return the target profile, creating the caller's own profile from the
    /// token claims when it does not exist yet.
    #[tracing::instrument(skip(self, caller), fields(caller = %caller.user_id))]
    pub async fn fetch_or_create(
        &self,
        caller: &AuthenticatedUser,
        user_id: Option<Uuid>,
    ) -> AppResult<ProfileResponse> {
        let target = user_id.unwrap_or(caller.user_id);

        if target != caller.user_id {
            self.require_admin(caller.user_id).await?;
            let profile = self
                .find_with_retry(target)
                .await?
                .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;
            return Ok(ProfileResponse {
                success: true,
                profile,
                created: false,
            });
        }

        if let Some(profile) = self.find_with_retry(target).await? {
            return Ok(ProfileResponse {
                success: true,
                profile,
                created: false,
            });
        }

        let email = caller
            .email
            .clone()
            .ok_or_else(|| AppError::invalid_field("email", "Token carries no email address", "required"))?;
        let now = Utc::now();
        let profile = Profile {
            id: target,
            email,
            full_name: caller.name.clone(),
            phone: None,
            role: Role::User,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        if !self.store.insert_profile(&profile).await? {
            // lost a race with another first request; answer with the stored row
            let existing = self
                .store
                .find_profile(target)
                .await?
                .ok_or_else(|| AppError::UpstreamStoreError(format!("profile {} vanished after insert", target)))?;
            return Ok(ProfileResponse {
                success: true,
                profile: existing,
                created: false,
            });
        }

        tracing::info!(user_id = %target, "created profile");
        Ok(ProfileResponse {
            success: true,
            profile,
            created: true,
        })
    }

    /// The caller's profile, provided its role is ADMIN.
    pub async fn require_admin(&self, user_id: Uuid) -> AppResult<Profile> {
        match self.find_with_retry(user_id).await? {
            Some(profile) if profile.role == Role::Admin => Ok(profile),
            _ => Err(AppError::Forbidden("Admin access required".into())),
        }
    }

    // Store lookups retry on failure with a fixed delay
    async fn find_with_retry(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let mut attempt = 0;
        loop {
            match self.store.find_profile(user_id).await {
                Ok(profile) => return Ok(profile),
                Err(e) if attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(%user_id, attempt, error = %e, "profile lookup failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
