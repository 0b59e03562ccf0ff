//! Account endpoints under /api/users.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::middleware::CurrentUser;
use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::models::user::PersonalInfo;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePersonalInfo {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(url(message = "Invalid LinkedIn URL"))]
    pub linkedin: Option<String>,
    pub address: Option<String>,
}

const PERSONAL_INFO_COLUMNS: &str =
    "id, name, email, phone, linkedin, address, created_at, updated_at";

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let user: PersonalInfo = sqlx::query_as(&format!(
        "SELECT {PERSONAL_INFO_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(current.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "message": "User fetched successfully",
        "user": user,
    })))
}

/// PATCH /api/users/me
///
/// Updates personal info fields; absent fields are left untouched.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<UpdatePersonalInfo>,
) -> Result<Json<Value>, AppError> {
    let user: PersonalInfo = sqlx::query_as(&format!(
        r#"
        UPDATE users
        SET name     = COALESCE($1, name),
            phone    = COALESCE($2, phone),
            linkedin = COALESCE($3, linkedin),
            address  = COALESCE($4, address),
            updated_at = now()
        WHERE id = $5
        RETURNING {PERSONAL_INFO_COLUMNS}
        "#
    ))
    .bind(&req.name)
    .bind(&req.phone)
    .bind(&req.linkedin)
    .bind(&req.address)
    .bind(current.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "message": "Personal information updated successfully",
        "user": user,
    })))
}

/// DELETE /api/users/me
///
/// Deletes the account; owned rows cascade at the schema level.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(current.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %current.id, "account deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_personal_info_rejects_bad_url() {
        let req = UpdatePersonalInfo {
            name: Some("Ada".to_string()),
            phone: None,
            linkedin: Some("not a url".to_string()),
            address: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_personal_info_accepts_partial() {
        let req = UpdatePersonalInfo {
            name: None,
            phone: Some("+1 555 0100".to_string()),
            linkedin: Some("https://linkedin.com/in/ada".to_string()),
            address: None,
        };
        assert!(req.validate().is_ok());
    }
}
