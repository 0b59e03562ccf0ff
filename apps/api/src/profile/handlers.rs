//! Axum route handlers for the aggregate profile API.
//!
//! The profile is a single row of JSON array sections; education, experience
//! and skills are edited positionally, matching the index-based routes the
//! frontend uses.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extract::{AppJson, ValidatedJson};
use crate::models::profile::ProfileRow;
use crate::profile::sections::{self, EducationEntry, ExperienceEntry, SectionError};
use crate::state::AppState;

impl From<SectionError> for AppError {
    fn from(err: SectionError) -> Self {
        AppError::Validation(err.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub skills: Option<Value>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub projects: Option<Value>,
    pub achievements: Option<Value>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EducationPayload {
    #[validate(length(min = 1, message = "School, degree, and startDate are required"))]
    pub school: String,
    #[validate(length(min = 1, message = "School, degree, and startDate are required"))]
    pub degree: String,
    pub field_of_study: Option<String>,
    #[validate(length(min = 1, message = "School, degree, and startDate are required"))]
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExperiencePayload {
    #[validate(length(min = 1, message = "Title, company, responsibilities, and startDate are required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Title, company, responsibilities, and startDate are required"))]
    pub company: String,
    pub responsibilities: Vec<String>,
    #[validate(length(min = 1, message = "Title, company, responsibilities, and startDate are required"))]
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SkillPayload {
    #[validate(length(min = 1, message = "Skill is required and must be a string"))]
    pub skill: String,
}

// ────────────────────────────────────────────────────────────────────────────
// DB helpers
// ────────────────────────────────────────────────────────────────────────────

async fn fetch_profile(
    db: &sqlx::PgPool,
    user_id: Uuid,
) -> Result<Option<ProfileRow>, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(profile)
}

async fn require_profile(db: &sqlx::PgPool, user_id: Uuid) -> Result<ProfileRow, AppError> {
    fetch_profile(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

#[derive(Clone, Copy)]
enum Section {
    Skills,
    Experience,
    Education,
}

impl Section {
    fn of(self, profile: &ProfileRow) -> &Value {
        match self {
            Section::Skills => &profile.skills,
            Section::Experience => &profile.experience,
            Section::Education => &profile.education,
        }
    }

    // Column names are fixed per variant; never interpolated from input.
    fn upsert_sql(self) -> &'static str {
        match self {
            Section::Skills => {
                "INSERT INTO profiles (user_id, skills) VALUES ($1, $2) \
                 ON CONFLICT (user_id) DO UPDATE SET skills = $2, updated_at = now() \
                 RETURNING *"
            }
            Section::Experience => {
                "INSERT INTO profiles (user_id, experience) VALUES ($1, $2) \
                 ON CONFLICT (user_id) DO UPDATE SET experience = $2, updated_at = now() \
                 RETURNING *"
            }
            Section::Education => {
                "INSERT INTO profiles (user_id, education) VALUES ($1, $2) \
                 ON CONFLICT (user_id) DO UPDATE SET education = $2, updated_at = now() \
                 RETURNING *"
            }
        }
    }
}

async fn save_section(
    db: &sqlx::PgPool,
    user_id: Uuid,
    section: Section,
    value: Value,
) -> Result<ProfileRow, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>(section.upsert_sql())
        .bind(user_id)
        .bind(value)
        .fetch_one(db)
        .await?;
    Ok(profile)
}

fn section_response(message: &str, profile: ProfileRow) -> Json<Value> {
    Json(json!({ "message": message, "profile": profile }))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let profile = require_profile(&state.db, current.id).await?;
    Ok(section_response("Profile fetched successfully", profile))
}

/// POST /api/profile
///
/// Upserts the whole profile. Section fields must be JSON arrays when given;
/// absent fields reset to empty.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(req): AppJson<UpsertProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let sections = [
        ("Skills", &req.skills),
        ("Experience", &req.experience),
        ("Education", &req.education),
        ("Projects", &req.projects),
        ("Achievements", &req.achievements),
    ];
    for (label, value) in sections {
        if let Some(v) = value {
            if !v.is_array() {
                return Err(AppError::Validation(format!("{label} must be an array")));
            }
        }
    }

    let empty = || Value::Array(vec![]);
    let profile = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (user_id, skills, experience, education, projects, achievements)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE
        SET skills = $2, experience = $3, education = $4,
            projects = $5, achievements = $6, updated_at = now()
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(req.skills.unwrap_or_else(empty))
    .bind(req.experience.unwrap_or_else(empty))
    .bind(req.education.unwrap_or_else(empty))
    .bind(req.projects.unwrap_or_else(empty))
    .bind(req.achievements.unwrap_or_else(empty))
    .fetch_one(&state.db)
    .await?;

    Ok(section_response("Profile saved successfully", profile))
}

/// POST /api/profile/education
pub async fn add_education(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<EducationPayload>,
) -> Result<Json<Value>, AppError> {
    let entry = education_entry(req)?;
    let current_section = fetch_profile(&state.db, current.id)
        .await?
        .map(|p| p.education)
        .unwrap_or_else(|| Value::Array(vec![]));
    let updated = sections::push_entry(&current_section, entry);
    let profile = save_section(&state.db, current.id, Section::Education, updated).await?;
    Ok(section_response("Education entry added successfully", profile))
}

/// PATCH /api/profile/education/:index
pub async fn update_education(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(index): Path<usize>,
    ValidatedJson(req): ValidatedJson<EducationPayload>,
) -> Result<Json<Value>, AppError> {
    let entry = education_entry(req)?;
    let profile = require_profile(&state.db, current.id).await?;
    let updated = sections::replace_entry(Section::Education.of(&profile), index, entry, "education")?;
    let profile = save_section(&state.db, current.id, Section::Education, updated).await?;
    Ok(section_response("Education entry updated successfully", profile))
}

/// DELETE /api/profile/education/:index
pub async fn delete_education(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(index): Path<usize>,
) -> Result<Json<Value>, AppError> {
    let profile = require_profile(&state.db, current.id).await?;
    let updated = sections::remove_entry(Section::Education.of(&profile), index, "education")?;
    let profile = save_section(&state.db, current.id, Section::Education, updated).await?;
    Ok(section_response("Education entry deleted successfully", profile))
}

/// POST /api/profile/experience
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<ExperiencePayload>,
) -> Result<Json<Value>, AppError> {
    let entry = experience_entry(req)?;
    let current_section = fetch_profile(&state.db, current.id)
        .await?
        .map(|p| p.experience)
        .unwrap_or_else(|| Value::Array(vec![]));
    let updated = sections::push_entry(&current_section, entry);
    let profile = save_section(&state.db, current.id, Section::Experience, updated).await?;
    Ok(section_response("Experience entry added successfully", profile))
}

/// PATCH /api/profile/experience/:index
pub async fn update_experience(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(index): Path<usize>,
    ValidatedJson(req): ValidatedJson<ExperiencePayload>,
) -> Result<Json<Value>, AppError> {
    let entry = experience_entry(req)?;
    let profile = require_profile(&state.db, current.id).await?;
    let updated =
        sections::replace_entry(Section::Experience.of(&profile), index, entry, "experience")?;
    let profile = save_section(&state.db, current.id, Section::Experience, updated).await?;
    Ok(section_response("Experience entry updated successfully", profile))
}

/// DELETE /api/profile/experience/:index
pub async fn delete_experience(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(index): Path<usize>,
) -> Result<Json<Value>, AppError> {
    let profile = require_profile(&state.db, current.id).await?;
    let updated = sections::remove_entry(Section::Experience.of(&profile), index, "experience")?;
    let profile = save_section(&state.db, current.id, Section::Experience, updated).await?;
    Ok(section_response("Experience entry deleted successfully", profile))
}

/// POST /api/profile/skills
pub async fn add_skill(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<SkillPayload>,
) -> Result<Json<Value>, AppError> {
    let current_section = fetch_profile(&state.db, current.id)
        .await?
        .map(|p| p.skills)
        .unwrap_or_else(|| Value::Array(vec![]));
    let updated = sections::add_skill(&current_section, &req.skill)?;
    let profile = save_section(&state.db, current.id, Section::Skills, updated).await?;
    Ok(section_response("Skill added successfully", profile))
}

/// PATCH /api/profile/skills/:index
pub async fn update_skill(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(index): Path<usize>,
    ValidatedJson(req): ValidatedJson<SkillPayload>,
) -> Result<Json<Value>, AppError> {
    let profile = require_profile(&state.db, current.id).await?;
    let updated = sections::replace_skill(Section::Skills.of(&profile), index, &req.skill)?;
    let profile = save_section(&state.db, current.id, Section::Skills, updated).await?;
    Ok(section_response("Skill updated successfully", profile))
}

/// DELETE /api/profile/skills/:index
pub async fn delete_skill(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(index): Path<usize>,
) -> Result<Json<Value>, AppError> {
    let profile = require_profile(&state.db, current.id).await?;
    let updated = sections::remove_entry(Section::Skills.of(&profile), index, "skill")?;
    let profile = save_section(&state.db, current.id, Section::Skills, updated).await?;
    Ok(section_response("Skill deleted successfully", profile))
}

// ────────────────────────────────────────────────────────────────────────────
// Entry construction: dates are normalized to RFC 3339 date strings
// ────────────────────────────────────────────────────────────────────────────

fn parse_date(raw: &str, label: &str) -> Result<String, AppError> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.to_string())
        .map_err(|_| AppError::Validation(format!("Invalid {label}")))
}

fn education_entry(req: EducationPayload) -> Result<Value, AppError> {
    let entry = EducationEntry {
        school: req.school,
        degree: req.degree,
        field_of_study: req.field_of_study,
        start_date: parse_date(&req.start_date, "startDate")?,
        end_date: req
            .end_date
            .as_deref()
            .map(|d| parse_date(d, "endDate"))
            .transpose()?,
    };
    Ok(serde_json::to_value(entry).map_err(|e| AppError::Internal(e.into()))?)
}

fn experience_entry(req: ExperiencePayload) -> Result<Value, AppError> {
    let entry = ExperienceEntry {
        title: req.title,
        company: req.company,
        responsibilities: req.responsibilities,
        start_date: parse_date(&req.start_date, "startDate")?,
        end_date: req
            .end_date
            .as_deref()
            .map(|d| parse_date(d, "endDate"))
            .transpose()?,
    };
    Ok(serde_json::to_value(entry).map_err(|e| AppError::Internal(e.into()))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(parse_date("2020-01-15", "startDate").unwrap(), "2020-01-15");
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("January 2020", "startDate").is_err());
    }

    #[test]
    fn test_education_payload_requires_fields() {
        let payload = EducationPayload {
            school: String::new(),
            degree: "BSc".to_string(),
            field_of_study: None,
            start_date: "2020-01-01".to_string(),
            end_date: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_experience_entry_construction() {
        let payload = ExperiencePayload {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            responsibilities: vec!["built things".to_string()],
            start_date: "2021-03-01".to_string(),
            end_date: Some("2023-06-30".to_string()),
        };
        let entry = experience_entry(payload).unwrap();
        assert_eq!(entry["title"], "Engineer");
        assert_eq!(entry["end_date"], "2023-06-30");
    }

    #[test]
    fn test_experience_entry_rejects_bad_end_date() {
        let payload = ExperiencePayload {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            responsibilities: vec![],
            start_date: "2021-03-01".to_string(),
            end_date: Some("soon".to_string()),
        };
        assert!(experience_entry(payload).is_err());
    }
}
