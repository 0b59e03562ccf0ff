//! Categorized skill map: one row per user, `{"technical": ["rust"], ...}`.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Map, Value};

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::profile::SkillRow;
use crate::state::AppState;

fn is_category_map(value: &Value) -> bool {
    value
        .as_object()
        .map(|map| map.values().all(|v| v.is_array()))
        .unwrap_or(false)
}

const SHAPE_ERROR: &str =
    "Skills must be an object with arrays as values, e.g. { \"technical\": [\"html\"] }";

/// Merges incoming categories into the existing map, deduplicating while
/// preserving first-seen order.
fn merge_categories(existing: &Value, incoming: &Value) -> Value {
    let empty = Map::new();
    let existing = existing.as_object().unwrap_or(&empty);
    let incoming = incoming.as_object().unwrap_or(&empty);

    let mut merged = Map::new();
    let categories: Vec<&String> = existing.keys().chain(incoming.keys()).collect();
    for category in categories {
        if merged.contains_key(category) {
            continue;
        }
        let mut seen: Vec<String> = Vec::new();
        for source in [existing.get(category), incoming.get(category)]
            .into_iter()
            .flatten()
        {
            for v in source.as_array().into_iter().flatten() {
                if let Some(s) = v.as_str() {
                    if !seen.iter().any(|x| x == s) {
                        seen.push(s.to_string());
                    }
                }
            }
        }
        merged.insert(category.clone(), Value::from(seen));
    }
    Value::Object(merged)
}

/// Removes one skill from one category; empty categories are dropped.
fn remove_skill(metadata: &Value, category: &str, name: &str) -> Option<Value> {
    let map = metadata.as_object()?;
    let list = map.get(category)?.as_array()?;
    if !list.iter().any(|v| v.as_str() == Some(name)) {
        return None;
    }
    let remaining: Vec<Value> = list
        .iter()
        .filter(|v| v.as_str() != Some(name))
        .cloned()
        .collect();
    let mut updated = map.clone();
    if remaining.is_empty() {
        updated.remove(category);
    } else {
        updated.insert(category.to_string(), Value::Array(remaining));
    }
    Some(Value::Object(updated))
}

async fn save_metadata(
    db: &sqlx::PgPool,
    user_id: uuid::Uuid,
    metadata: Value,
) -> Result<SkillRow, AppError> {
    let row = sqlx::query_as::<_, SkillRow>(
        r#"
        INSERT INTO skills (user_id, metadata) VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET metadata = $2, updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(metadata)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// GET /api/resume/skills
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let row = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE user_id = $1")
        .bind(current.id)
        .fetch_optional(&state.db)
        .await?;

    let skills = row.map(|r| r.metadata).unwrap_or_else(|| json!({}));
    Ok(Json(json!({
        "message": "Skills fetched successfully",
        "skills": skills,
    })))
}

/// POST /api/resume/skills: merge categories into the existing map.
pub async fn merge(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(incoming): AppJson<Value>,
) -> Result<Json<Value>, AppError> {
    if !is_category_map(&incoming) {
        return Err(AppError::Validation(SHAPE_ERROR.to_string()));
    }

    let existing = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE user_id = $1")
        .bind(current.id)
        .fetch_optional(&state.db)
        .await?
        .map(|r| r.metadata)
        .unwrap_or_else(|| json!({}));

    let merged = merge_categories(&existing, &incoming);
    save_metadata(&state.db, current.id, merged).await?;

    Ok(Json(json!({ "message": "Skills updated successfully." })))
}

/// PUT /api/resume/skills: replace the whole map.
pub async fn replace(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(incoming): AppJson<Value>,
) -> Result<Json<Value>, AppError> {
    if !is_category_map(&incoming) {
        return Err(AppError::Validation(SHAPE_ERROR.to_string()));
    }

    save_metadata(&state.db, current.id, incoming).await?;
    Ok(Json(json!({ "message": "Skills replaced successfully." })))
}

/// DELETE /api/resume/skills/:category/:name
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let row = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE user_id = $1")
        .bind(current.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Skills not found".to_string()))?;

    let updated = remove_skill(&row.metadata, &category, &name)
        .ok_or_else(|| AppError::NotFound("Skill not found".to_string()))?;
    save_metadata(&state.db, current.id, updated).await?;

    Ok(Json(json!({ "message": "Skill deleted successfully." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_category_map() {
        assert!(is_category_map(&json!({"technical": ["rust"]})));
        assert!(!is_category_map(&json!(["rust"])));
        assert!(!is_category_map(&json!({"technical": "rust"})));
    }

    #[test]
    fn test_merge_dedups_within_category() {
        let merged = merge_categories(
            &json!({"technical": ["rust", "sql"]}),
            &json!({"technical": ["sql", "go"]}),
        );
        assert_eq!(merged, json!({"technical": ["rust", "sql", "go"]}));
    }

    #[test]
    fn test_merge_unions_categories() {
        let merged = merge_categories(
            &json!({"technical": ["rust"]}),
            &json!({"soft": ["mentoring"]}),
        );
        assert_eq!(merged["technical"], json!(["rust"]));
        assert_eq!(merged["soft"], json!(["mentoring"]));
    }

    #[test]
    fn test_merge_with_empty_existing() {
        let merged = merge_categories(&json!({}), &json!({"soft": ["writing"]}));
        assert_eq!(merged, json!({"soft": ["writing"]}));
    }

    #[test]
    fn test_remove_skill_drops_empty_category() {
        let updated = remove_skill(&json!({"soft": ["writing"]}), "soft", "writing").unwrap();
        assert_eq!(updated, json!({}));
    }

    #[test]
    fn test_remove_skill_keeps_others() {
        let updated =
            remove_skill(&json!({"technical": ["rust", "sql"]}), "technical", "sql").unwrap();
        assert_eq!(updated, json!({"technical": ["rust"]}));
    }

    #[test]
    fn test_remove_missing_skill_is_none() {
        assert!(remove_skill(&json!({"technical": ["rust"]}), "technical", "go").is_none());
        assert!(remove_skill(&json!({}), "technical", "rust").is_none());
    }
}
