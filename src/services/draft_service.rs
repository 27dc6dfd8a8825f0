use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::models::draft::{Draft, DraftResponse, SaveDraft};
use crate::store::EntityStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::is_valid_draft_kind;

/// Resumable form state, one draft per user and kind.
pub struct DraftService {
    store: Arc<dyn EntityStore>,
}

impl DraftService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        DraftService { store }
    }

    pub async fn get(&self, user_id: Uuid, kind: &str) -> AppResult<DraftResponse> {
        check_kind(kind)?;
        let draft = self
            .store
            .find_draft(user_id, kind)
            .await?
            .ok_or_else(|| AppError::NotFound("Draft not found".into()))?;
        Ok(DraftResponse { draft })
    }

    pub async fn save(&self, user_id: Uuid, kind: &str, request: SaveDraft) -> AppResult<DraftResponse> {
        check_kind(kind)?;
        request.validate()?;

        let mut completed_steps = request.completed_steps;
        completed_steps.sort_unstable();
        completed_steps.dedup();

        let draft = Draft {
            user_id,
            kind: kind.to_string(),
            step: request.step,
            completed_steps,
            data: request.data,
            updated_at: Utc::now(),
        };
        self.store.save_draft(&draft).await?;

        tracing::debug!(%user_id, kind, step = draft.step, "saved draft");
        Ok(DraftResponse { draft })
    }

    // Deleting a draft that does not exist is not an error
    pub async fn delete(&self, user_id: Uuid, kind: &str) -> AppResult<()> {
        check_kind(kind)?;
        self.store.delete_draft(user_id, kind).await?;
        Ok(())
    }
}

fn check_kind(kind: &str) -> AppResult<()> {
    if is_valid_draft_kind(kind) {
        Ok(())
    } else {
        Err(AppError::invalid_field(
            "kind",
            "Draft kind must be 1-64 lowercase letters, digits or dashes",
            "invalid_kind",
        ))
    }
}
