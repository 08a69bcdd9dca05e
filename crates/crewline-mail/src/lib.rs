//! SMTP delivery adapter.
//!
//! Implements [`crewline_core::MailTransport`] with lettre over a STARTTLS
//! relay. Configuration comes from the environment; a missing credential is
//! a reported [`MailError::NotConfigured`], never a panic, and the error
//! names the variables that must be set.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crewline_core::{MailError, MailTransport};

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address; defaults to the username when unset.
    pub from: Option<String>,
}

impl SmtpConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, and
    /// `SMTP_FROM` from the environment.
    pub fn from_env() -> Self {
        let username = std::env::var("SMTP_USERNAME").ok();
        SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: std::env::var("SMTP_FROM").ok().or_else(|| username.clone()),
            username,
        }
    }

    /// Sender address for signatures and the `From` header.
    pub fn sender(&self) -> String {
        self.from.clone().unwrap_or_default()
    }

    /// Env vars that still need to be set before sending can work.
    fn missing_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.is_none() {
            missing.push("SMTP_USERNAME");
        }
        if self.password.is_none() {
            missing.push("SMTP_PASSWORD");
        }
        if self.from.is_none() {
            missing.push("SMTP_FROM");
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing_vars().is_empty()
    }
}

/// lettre-backed [`MailTransport`].
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        SmtpMailer { config }
    }

    pub fn from_env() -> Self {
        Self::new(SmtpConfig::from_env())
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<String, MailError> {
        let missing = self.config.missing_vars();
        if !missing.is_empty() {
            return Err(MailError::NotConfigured {
                missing: missing.join(", "),
            });
        }
        let username = self.config.username.clone().unwrap_or_default();
        let password = self.config.password.clone().unwrap_or_default();
        let from = self.config.sender();

        let from_mailbox: Mailbox = from
            .parse()
            .map_err(|_| MailError::InvalidAddress(from.clone()))?;
        let mut builder = Message::builder().from(from_mailbox).subject(subject);
        for recipient in recipients {
            let to_mailbox: Mailbox = recipient
                .parse()
                .map_err(|_| MailError::InvalidAddress(recipient.clone()))?;
            builder = builder.to(to_mailbox);
        }
        let message = builder
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let transport = SmtpTransport::starttls_relay(&self.config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.config.port)
            .credentials(Credentials::new(username, password))
            .build();

        // lettre's SmtpTransport is blocking; keep it off the async runtime.
        let send_result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Transport(format!("send task failed: {e}")))?;
        send_result.map_err(|e| MailError::Transport(e.to_string()))?;

        let confirmation = format!("Email sent to: {}", recipients.join(", "));
        info!(host = %self.config.host, recipients = recipients.len(), "smtp send succeeded");
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> SmtpConfig {
        SmtpConfig {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            from: None,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_send_names_missing_vars() {
        let mailer = SmtpMailer::new(unconfigured());
        let err = mailer
            .send("s", "b", &["a@b.com".to_string()])
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SMTP_USERNAME"));
        assert!(msg.contains("SMTP_PASSWORD"));
        assert!(msg.contains("SMTP_FROM"));
    }

    #[tokio::test]
    async fn test_invalid_from_address_is_rejected_before_transport() {
        let config = SmtpConfig {
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            from: Some("not-an-address".to_string()),
            ..unconfigured()
        };
        let err = SmtpMailer::new(config)
            .send("s", "b", &["a@b.com".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(addr) if addr == "not-an-address"));
    }

    #[test]
    fn test_from_defaults_to_username_semantics() {
        let config = SmtpConfig {
            username: Some("robot@corp.example".to_string()),
            password: Some("pass".to_string()),
            from: Some("robot@corp.example".to_string()),
            ..unconfigured()
        };
        assert!(config.is_configured());
        assert_eq!(config.sender(), "robot@corp.example");
    }
}
