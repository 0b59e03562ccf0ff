//! Resume CRUD, AI generation and PDF upload endpoints.

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume::ResumeRow;
use crate::resume::{generator, parser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    #[serde(default)]
    pub job_description_id: Option<Uuid>,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    pub json_data: Value,
}

fn default_template() -> String {
    "manual".to_string()
}

fn default_output_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize)]
pub struct GenerateResumeRequest {
    pub job_description_id: Uuid,
}

/// POST /api/resumes
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(req): AppJson<CreateResumeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.json_data.is_null() {
        return Err(AppError::Validation(
            "Resume content is required".to_string(),
        ));
    }

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (user_id, job_description_id, template, output_format, json_data)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(req.job_description_id)
    .bind(&req.template)
    .bind(&req.output_format)
    .bind(&req.json_data)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Resume created", "resume": resume })),
    ))
}

/// GET /api/resumes
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let resumes: Vec<ResumeRow> = sqlx::query_as(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({ "resumes": resumes })))
}

/// GET /api/resumes/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resume = find_owned(&state.db, id, user.id).await?;
    Ok(Json(json!({ "resume": resume })))
}

/// DELETE /api/resumes/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Resume not found".to_string()));
    }
    Ok(Json(json!({ "message": "Resume deleted" })))
}

/// POST /api/resumes/generate
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    AppJson(req): AppJson<GenerateResumeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let resume =
        generator::generate_resume(&state.db, &state.llm, user.id, req.job_description_id)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Resume generated", "resume": resume })),
    ))
}

/// POST /api/resumes/parse
///
/// Accepts a multipart upload with a single `resume` field holding a PDF.
/// Returns the extracted text plus the structured sections; structuring is
/// best-effort, so the sections may be empty when the model is unavailable.
pub async fn parse(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("resume") {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            file = Some((bytes.to_vec(), content_type));
        }
    }

    let (bytes, content_type) =
        file.ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;

    let text = parser::extract_pdf_text(&bytes, content_type.as_deref())?;
    let structured = parser::structure_resume_text(&text, &state.llm).await;

    Ok(Json(json!({
        "message": "Resume parsed",
        "text": text,
        "parsed": structured,
    })))
}

async fn find_owned(db: &sqlx::PgPool, id: Uuid, user_id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateResumeRequest =
            serde_json::from_str(r#"{"json_data": {"sections": []}}"#).unwrap();
        assert_eq!(req.template, "manual");
        assert_eq!(req.output_format, "json");
        assert!(req.job_description_id.is_none());
    }

    #[test]
    fn test_create_request_explicit_fields() {
        let id = Uuid::new_v4();
        let body = format!(
            r#"{{"job_description_id": "{id}", "template": "modern",
                "output_format": "pdf", "json_data": {{}}}}"#
        );
        let req: CreateResumeRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.job_description_id, Some(id));
        assert_eq!(req.template, "modern");
        assert_eq!(req.output_format, "pdf");
    }

    #[test]
    fn test_generate_request_requires_job_description() {
        let res: Result<GenerateResumeRequest, _> = serde_json::from_str("{}");
        assert!(res.is_err());
    }
}
