use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Draft kind used by the provider onboarding wizard.
pub const PROVIDER_APPLICATION_DRAFT: &str = "provider-application";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Draft {
    pub user_id: Uuid,
    pub kind: String,
    pub step: i32,
    pub completed_steps: Vec<i32>,
    pub data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct SaveDraft {
    #[validate(range(min = 0, max = 50, message = "Step out of range"))]
    pub step: i32,
    #[serde(default)]
    pub completed_steps: Vec<i32>,
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DraftResponse {
    pub draft: Draft,
}
