//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::jwt::{self, TokenPurpose};
use crate::auth::middleware::{CurrentUser, AUTH_COOKIE};
use crate::auth::password::{hash_password, verify_password, DUMMY_HASH};
use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::models::user::{User, UserSummary};
use crate::state::AppState;

const RESET_CODE_MINUTES: i64 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyResetCodeRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(equal = 6, message = "Invalid reset code format"))]
    pub reset_code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub reset_token: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters long"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters long"))]
    pub new_password: String,
}

// Session-scoped cookie; the embedded JWT carries the real 24h expiry.
fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let existing: Option<(uuid::Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (email, name, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&req.email)
    .bind(&req.name)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    let token = jwt::issue_session_token(user.id, &user.email, state.config.jwt_secret_bytes())?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(&token)),
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: UserSummary::from(&user),
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Verify against a dummy hash when the email is unknown so the request
    // does comparable work and does not leak which emails exist.
    let stored_hash = user
        .as_ref()
        .and_then(|u| u.password_hash.as_deref())
        .unwrap_or(DUMMY_HASH);
    let password_valid = verify_password(&req.password, stored_hash);

    let user = match user {
        Some(u) if password_valid && u.password_hash.is_some() => u,
        _ => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
    };

    let token = jwt::issue_session_token(user.id, &user.email, state.config.jwt_secret_bytes())?;

    Ok((
        jar.add(session_cookie(&token)),
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: UserSummary::from(&user),
            token,
        }),
    ))
}

/// GET /api/auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let removal = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// GET /api/auth/verify
///
/// Runs behind the auth middleware; reaching it means the token is valid.
pub async fn verify(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(current.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))?;

    Ok(Json(json!({ "user": UserSummary::from(&user) })))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No user found with that email".to_string()))?;

    let reset_code = generate_reset_code();
    let expires = Utc::now() + Duration::minutes(RESET_CODE_MINUTES);

    sqlx::query("UPDATE users SET reset_code = $1, reset_code_expires = $2 WHERE id = $3")
        .bind(&reset_code)
        .bind(expires)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let body = format!(
        "Your password reset code is: {reset_code}. It will expire in {RESET_CODE_MINUTES} minutes."
    );
    if let Err(e) = state
        .mailer
        .send(&user.email, "Password Reset Code", &body)
        .await
    {
        // Do not leave a live code behind if we could not deliver it.
        sqlx::query("UPDATE users SET reset_code = NULL, reset_code_expires = NULL WHERE id = $1")
            .bind(user.id)
            .execute(&state.db)
            .await?;
        return Err(AppError::Email(e.to_string()));
    }

    Ok(Json(json!({
        "message": format!(
            "Password reset code sent to your email. It will expire in {RESET_CODE_MINUTES} minutes."
        )
    })))
}

/// POST /api/auth/verify-reset-code
pub async fn verify_reset_code(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyResetCodeRequest>,
) -> Result<Json<Value>, AppError> {
    if !req.reset_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation("Invalid reset code format".to_string()));
    }

    let user: User = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No user found with that email".to_string()))?;

    let valid = matches!(
        (&user.reset_code, &user.reset_code_expires),
        (Some(code), Some(expires)) if *code == req.reset_code && *expires > Utc::now()
    );
    if !valid {
        return Err(AppError::Validation(
            "Invalid or expired reset code".to_string(),
        ));
    }

    let reset_token =
        jwt::issue_reset_token(user.id, &user.email, state.config.jwt_secret_bytes())?;

    Ok(Json(json!({
        "message": "Reset code verified successfully. Please set your new password.",
        "resetToken": reset_token,
    })))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let claims = jwt::verify_token(
        &req.reset_token,
        TokenPurpose::PasswordReset,
        state.config.jwt_secret_bytes(),
    )
    .map_err(|_| AppError::Validation("Invalid or expired reset token".to_string()))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?;
    let user = match user {
        Some(u) if u.email == claims.email => u,
        _ => {
            return Err(AppError::Validation(
                "Invalid user for reset token".to_string(),
            ))
        }
    };

    let password_hash = hash_password(&req.new_password)?;

    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1, reset_code = NULL, reset_code_expires = NULL, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(&password_hash)
    .bind(user.id)
    .execute(&state.db)
    .await?;

    Ok(Json(json!({
        "message": "Password has been reset successfully. You can now log in."
    })))
}

/// POST /api/auth/update-password
pub async fn update_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<UpdatePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if req.current_password == req.new_password {
        return Err(AppError::Validation(
            "New password must be different from the current password".to_string(),
        ));
    }

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(current.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let current_ok = user
        .password_hash
        .as_deref()
        .map(|h| verify_password(&req.current_password, h))
        .unwrap_or(false);
    if !current_ok {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;

    sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
        .bind(&password_hash)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully." })))
}

/// Six random decimal digits, zero-padded.
fn generate_reset_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_reset_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            name: "Ada".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            email: "a@b.c".to_string(),
            password: "short".to_string(),
            name: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_reset_code_request_length() {
        let req = VerifyResetCodeRequest {
            email: "a@b.c".to_string(),
            reset_code: "12345".to_string(),
        };
        assert!(req.validate().is_err());

        let req = VerifyResetCodeRequest {
            email: "a@b.c".to_string(),
            reset_code: "123456".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_session_cookie_is_http_only() {
        let cookie = session_cookie("tok");
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
