//! Request authentication: bearer header first, session cookie second.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::jwt::{verify_token, TokenPurpose};
use crate::errors::AppError;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated user injected into request extensions by `authenticate`.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Extracts the session token from the Authorization header or the
/// `auth_token` cookie, verifies it, and injects `CurrentUser`.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match bearer.or_else(|| cookie_token(&jar)) {
        Some(t) => t,
        None => {
            tracing::debug!("no session token on request");
            return Err(AppError::unauthenticated());
        }
    };

    let claims = verify_token(&token, TokenPurpose::Session, state.config.jwt_secret_bytes())?;

    // The token may outlive the account; confirm the user still exists.
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(AppError::Unauthorized(
            "Not authorized, user not found".to_string(),
        ));
    }

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
