//! JWT issuing and verification for session and password-reset tokens.
//!
//! Session tokens live 24 hours; reset tokens 10 minutes. The two are
//! distinguished by a `purpose` claim so a reset token can never be used
//! as a session.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

const SESSION_HOURS: i64 = 24;
const RESET_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub purpose: TokenPurpose,
    pub exp: i64,
    pub iat: i64,
}

/// Issues a 24-hour session token.
pub fn issue_session_token(
    user_id: Uuid,
    email: &str,
    secret: &[u8],
) -> Result<String, AppError> {
    issue(user_id, email, TokenPurpose::Session, Duration::hours(SESSION_HOURS), secret)
}

/// Issues a short-lived token proving a verified password-reset code.
pub fn issue_reset_token(user_id: Uuid, email: &str, secret: &[u8]) -> Result<String, AppError> {
    issue(
        user_id,
        email,
        TokenPurpose::PasswordReset,
        Duration::minutes(RESET_MINUTES),
        secret,
    )
}

fn issue(
    user_id: Uuid,
    email: &str,
    purpose: TokenPurpose,
    lifetime: Duration,
    secret: &[u8],
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        purpose,
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))?;
    Ok(token)
}

/// Decodes and validates a token, checking expiry and the expected purpose.
pub fn verify_token(
    token: &str,
    expected: TokenPurpose,
    secret: &[u8],
) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    if data.claims.purpose != expected {
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_session_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_session_token(user_id, "a@b.c", SECRET).unwrap();
        let claims = verify_token(&token, TokenPurpose::Session, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@b.c");
    }

    #[test]
    fn test_reset_token_rejected_as_session() {
        let token = issue_reset_token(Uuid::new_v4(), "a@b.c", SECRET).unwrap();
        assert!(verify_token(&token, TokenPurpose::Session, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_session_token(Uuid::new_v4(), "a@b.c", SECRET).unwrap();
        assert!(verify_token(&token, TokenPurpose::Session, b"other-secret").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.jwt", TokenPurpose::Session, SECRET).is_err());
    }

    #[test]
    fn test_reset_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_reset_token(user_id, "x@y.z", SECRET).unwrap();
        let claims = verify_token(&token, TokenPurpose::PasswordReset, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
    }
}
