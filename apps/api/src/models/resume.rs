use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored resume. `json_data` holds either the client-built payload
/// (template "manual") or the generated sections (template "ai").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_description_id: Option<Uuid>,
    pub template: String,
    pub output_format: String,
    pub json_data: Value,
    pub created_at: DateTime<Utc>,
}
