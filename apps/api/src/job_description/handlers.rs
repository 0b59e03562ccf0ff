//! Axum route handlers for the job-description API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::job_description::parser::parse_job_description;
use crate::models::job::JobDescriptionRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobDescriptionRequest {
    pub content: String,
    pub source: Option<String>,
}

/// POST /api/job-description
///
/// Stores the posting together with its structured extraction. A failed
/// LLM call stores fallback defaults instead of erroring.
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(req): AppJson<CreateJobDescriptionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Content is required and must be a string".to_string(),
        ));
    }

    let parsed = parse_job_description(&req.content, &state.llm).await;
    if parsed.is_fallback() {
        tracing::debug!("job description stored with fallback extraction");
    }
    let parsed_value = serde_json::to_value(&parsed).map_err(|e| AppError::Internal(e.into()))?;

    let job: JobDescriptionRow = sqlx::query_as(
        r#"
        INSERT INTO job_descriptions (user_id, content, source, parsed_data)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(&req.content)
    .bind(&req.source)
    .bind(parsed_value)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Job description created successfully",
            "jobDescription": job,
        })),
    ))
}

/// GET /api/job-description
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let jobs = sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(current.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "message": "Job descriptions fetched successfully",
        "jobDescriptions": jobs,
    })))
}

/// GET /api/job-description/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = find_owned(&state.db, id, current.id).await?;
    Ok(Json(json!({
        "message": "Job description fetched successfully",
        "jobDescription": job,
    })))
}

/// DELETE /api/job-description/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    // Ownership check first so a foreign id reads as missing, not forbidden.
    find_owned(&state.db, id, current.id).await?;

    sqlx::query("DELETE FROM job_descriptions WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "message": "Job description deleted successfully" })))
}

pub async fn find_owned(
    db: &sqlx::PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<JobDescriptionRow, AppError> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Job description not found".to_string()))
}
