use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use test_context::{test_context, AsyncTestContext};
use uuid::Uuid;

use hotel_booking_service::models::draft::SaveDraft;
use hotel_booking_service::services::draft_service::DraftService;
use hotel_booking_service::store::memory::MemoryStore;
use hotel_booking_service::utils::error::AppError;

struct DraftContext {
    draft_service: DraftService,
    user_id: Uuid,
}

#[async_trait]
impl AsyncTestContext for DraftContext {
    async fn setup() -> Self {
        DraftContext {
            draft_service: DraftService::new(Arc::new(MemoryStore::new())),
            user_id: Uuid::new_v4(),
        }
    }
}

fn wizard_state(step: i32) -> SaveDraft {
    SaveDraft {
        step,
        completed_steps: vec![1, 0, 1],
        data: json!({ "basicInfo": { "name": "Lotus Garden" } }),
    }
}

#[test_context(DraftContext)]
#[tokio::test]
async fn test_saved_draft_can_be_resumed(ctx: &mut DraftContext) {
    ctx.draft_service
        .save(ctx.user_id, "provider-application", wizard_state(2))
        .await
        .unwrap();

    let draft = ctx
        .draft_service
        .get(ctx.user_id, "provider-application")
        .await
        .unwrap()
        .draft;
    assert_eq!(draft.step, 2);
    assert_eq!(draft.completed_steps, vec![0, 1]);
    assert_eq!(draft.data["basicInfo"]["name"], "Lotus Garden");

    // drafts are per user
    let other = ctx.draft_service.get(Uuid::new_v4(), "provider-application").await;
    assert!(matches!(other, Err(AppError::NotFound(_))));
}

#[test_context(DraftContext)]
#[tokio::test]
async fn test_saving_again_replaces_the_draft(ctx: &mut DraftContext) {
    for step in [1, 3] {
        ctx.draft_service
            .save(ctx.user_id, "provider-application", wizard_state(step))
            .await
            .unwrap();
    }
    let draft = ctx.draft_service.get(ctx.user_id, "provider-application").await.unwrap().draft;
    assert_eq!(draft.step, 3);
}

#[test_context(DraftContext)]
#[tokio::test]
async fn test_delete_is_idempotent(ctx: &mut DraftContext) {
    ctx.draft_service
        .save(ctx.user_id, "search-filters", wizard_state(0))
        .await
        .unwrap();

    ctx.draft_service.delete(ctx.user_id, "search-filters").await.unwrap();
    ctx.draft_service.delete(ctx.user_id, "search-filters").await.unwrap();

    let result = ctx.draft_service.get(ctx.user_id, "search-filters").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test_context(DraftContext)]
#[tokio::test]
async fn test_invalid_kind_or_step_is_rejected(ctx: &mut DraftContext) {
    let bad_kind = ctx
        .draft_service
        .save(ctx.user_id, "Provider Application", wizard_state(1))
        .await;
    let Err(AppError::ValidationError(details)) = bad_kind else {
        panic!("expected a validation error");
    };
    assert_eq!(details[0].field, "kind");

    let bad_step = ctx
        .draft_service
        .save(ctx.user_id, "provider-application", wizard_state(99))
        .await;
    assert!(matches!(bad_step, Err(AppError::ValidationError(_))));
}
