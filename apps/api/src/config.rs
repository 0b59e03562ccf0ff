use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails with context if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub smtp: SmtpConfig,
}

/// SMTP settings. When `host` is unset the mailer runs in log-only mode
/// and emails are written to the log instead of being sent.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl SmtpConfig {
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            smtp: SmtpConfig {
                host: std::env::var("SMTP_HOST").ok(),
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                user: std::env::var("SMTP_USER").unwrap_or_default(),
                pass: std::env::var("SMTP_PASS").unwrap_or_default(),
                from: std::env::var("SMTP_FROM")
                    .unwrap_or_else(|_| "noreply@resumake.dev".to_string()),
            },
        })
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_unconfigured_without_host() {
        let smtp = SmtpConfig {
            host: None,
            port: 587,
            user: String::new(),
            pass: String::new(),
            from: "noreply@resumake.dev".to_string(),
        };
        assert!(!smtp.is_configured());
    }

    #[test]
    fn test_smtp_configured_with_host() {
        let smtp = SmtpConfig {
            host: Some("smtp.example.com".to_string()),
            port: 465,
            user: "mailer".to_string(),
            pass: "secret".to_string(),
            from: "noreply@example.com".to_string(),
        };
        assert!(smtp.is_configured());
    }
}
