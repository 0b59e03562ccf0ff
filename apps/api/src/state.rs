use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub mailer: Mailer,
    pub config: Config,
}
