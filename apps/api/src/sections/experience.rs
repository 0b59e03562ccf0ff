use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extract::{AppJson, ValidatedJson};
use crate::models::profile::ExperienceRow;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ExperienceInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddExperiencesRequest {
    pub experiences: Vec<ExperienceInput>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))
}

/// GET /api/resume/experience
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let experiences = sqlx::query_as::<_, ExperienceRow>(
        "SELECT * FROM experiences WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(current.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "message": "Experiences fetched successfully",
        "experiences": experiences,
    })))
}

/// POST /api/resume/experience, batch insert.
pub async fn add(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(req): AppJson<AddExperiencesRequest>,
) -> Result<Json<Value>, AppError> {
    if req.experiences.is_empty() {
        return Err(AppError::Validation("Experiences must be a non-empty array".to_string()));
    }
    for exp in &req.experiences {
        exp.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let mut tx = state.db.begin().await?;
    for exp in &req.experiences {
        sqlx::query(
            r#"
            INSERT INTO experiences
                (user_id, title, company, description, responsibilities, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(current.id)
        .bind(&exp.title)
        .bind(&exp.company)
        .bind(&exp.description)
        .bind(Value::from(exp.responsibilities.clone()))
        .bind(parse_date(&exp.start_date)?)
        .bind(exp.end_date.as_deref().map(parse_date).transpose()?)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(Json(json!({ "message": "Experiences added successfully" })))
}

/// PATCH /api/resume/experience/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(exp): ValidatedJson<ExperienceInput>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE experiences
        SET title = $1, company = $2, description = $3,
            responsibilities = $4, start_date = $5, end_date = $6
        WHERE id = $7 AND user_id = $8
        "#,
    )
    .bind(&exp.title)
    .bind(&exp.company)
    .bind(&exp.description)
    .bind(Value::from(exp.responsibilities.clone()))
    .bind(parse_date(&exp.start_date)?)
    .bind(exp.end_date.as_deref().map(parse_date).transpose()?)
    .bind(id)
    .bind(current.id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Experience not found".to_string()));
    }

    Ok(Json(json!({ "message": "Experience updated successfully" })))
}

/// DELETE /api/resume/experience/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM experiences WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(current.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Experience not found".to_string()));
    }

    Ok(Json(json!({ "message": "Experience deleted successfully" })))
}
