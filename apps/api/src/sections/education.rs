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
use crate::extract::AppJson;
use crate::models::profile::EducationRow;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct EducationInput {
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddEducationRequest {
    pub education: Vec<EducationInput>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))
}

/// GET /api/resume/education
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let education = sqlx::query_as::<_, EducationRow>(
        "SELECT * FROM educations WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(current.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "message": "Education fetched successfully",
        "education": education,
    })))
}

/// POST /api/resume/education, batch insert.
pub async fn add(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(req): AppJson<AddEducationRequest>,
) -> Result<Json<Value>, AppError> {
    if req.education.is_empty() {
        return Err(AppError::Validation("Education must be a non-empty array".to_string()));
    }
    for edu in &req.education {
        edu.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let mut tx = state.db.begin().await?;
    for edu in &req.education {
        sqlx::query(
            r#"
            INSERT INTO educations
                (user_id, school, degree, field_of_study, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(current.id)
        .bind(&edu.school)
        .bind(&edu.degree)
        .bind(&edu.field_of_study)
        .bind(parse_date(&edu.start_date)?)
        .bind(edu.end_date.as_deref().map(parse_date).transpose()?)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(Json(json!({ "message": "Education added successfully" })))
}

/// DELETE /api/resume/education/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM educations WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(current.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Education entry not found".to_string()));
    }

    Ok(Json(json!({ "message": "Education entry deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_input_requires_school() {
        let input = EducationInput {
            school: String::new(),
            degree: "BSc".to_string(),
            field_of_study: None,
            start_date: "2018-09-01".to_string(),
            end_date: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_education_input_valid() {
        let input = EducationInput {
            school: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: Some("CS".to_string()),
            start_date: "2018-09-01".to_string(),
            end_date: Some("2022-06-01".to_string()),
        };
        assert!(input.validate().is_ok());
    }
}
