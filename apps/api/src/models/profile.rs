use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Aggregate profile row, one per user, section columns are JSON arrays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub skills: Value,
    pub experience: Value,
    pub education: Value,
    pub projects: Value,
    pub achievements: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized experience row used by AI generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    /// JSON array of strings.
    pub responsibilities: Value,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl ExperienceRow {
    pub fn responsibilities_list(&self) -> Vec<String> {
        self.responsibilities
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Normalized education row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Categorized skill map, one row per user.
/// `metadata` maps category name to a string array.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub user_id: Uuid,
    pub metadata: Value,
    pub updated_at: DateTime<Utc>,
}

impl SkillRow {
    /// Flattens all categories into a single skill list.
    pub fn flattened(&self) -> Vec<String> {
        self.metadata
            .as_object()
            .map(|map| {
                map.values()
                    .filter_map(|v| v.as_array())
                    .flatten()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
