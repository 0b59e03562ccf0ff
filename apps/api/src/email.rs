//! Outbound email. With SMTP configured, sends through lettre's async
//! transport; otherwise logs the message so development flows still work.

use anyhow::{anyhow, Context, Result};
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::SmtpConfig;

#[derive(Clone)]
pub struct Mailer {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let transport = match &config.host {
            Some(host) => {
                let creds = Credentials::new(config.user.clone(), config.pass.clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                    .context("Invalid SMTP relay host")?
                    .port(config.port)
                    .credentials(creds)
                    .build();
                Some(transport)
            }
            None => None,
        };
        Ok(Self { config, transport })
    }

    /// Sends a plain-text email. In log-only mode this always succeeds.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            warn!("SMTP not configured - logging email instead of sending");
            info!(
                "=== EMAIL (not sent) ===\nFrom: {}\nTo: {}\nSubject: {}\nBody:\n{}\n========================",
                self.config.from, to, subject, body
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(self.config.from.parse().context("Invalid SMTP from address")?)
            .to(to.parse().with_context(|| format!("Invalid recipient address: {to}"))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build email message")?;

        transport
            .send(message)
            .await
            .map_err(|e| anyhow!("SMTP send failed: {e}"))?;

        info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_only_config() -> SmtpConfig {
        SmtpConfig {
            host: None,
            port: 587,
            user: String::new(),
            pass: String::new(),
            from: "noreply@resumake.dev".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_only_mode_always_succeeds() {
        let mailer = Mailer::new(log_only_config()).unwrap();
        let result = mailer
            .send("user@example.com", "Password Reset Code", "123456")
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_mailer_builds_without_transport_when_unconfigured() {
        let mailer = Mailer::new(log_only_config()).unwrap();
        assert!(mailer.transport.is_none());
    }
}
