use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored job description with its structured LLM extraction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub source: Option<String>,
    pub parsed_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}
