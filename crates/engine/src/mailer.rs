//! Invitation email delivery via SMTP.
//!
//! [`InviteMailer`] wraps the `lettre` async SMTP transport to send the
//! entry password to invited staff when a workspace is created.
//! Configuration comes from environment variables; if `SMTP_HOST` is
//! not set, [`MailerConfig::from_env`] returns `None` and no mailer
//! should be constructed.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@brigade.local";

/// Error type for invitation delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Configuration for the SMTP invitation mailer.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl MailerConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that
    /// invitation mail is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | —                        |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@brigade.local`  |
    /// | `SMTP_USER`     | no       | —                        |
    /// | `SMTP_PASSWORD` | no       | —                        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends workspace invitations via SMTP.
pub struct InviteMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl InviteMailer {
    /// Build a mailer from the given configuration.
    pub fn new(config: MailerConfig) -> Result<Self, MailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);
        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }
        Ok(Self {
            from: config.from_address.parse()?,
            transport: builder.build(),
        })
    }

    /// Send one invitation carrying the workspace entry password.
    pub async fn send_invite(
        &self,
        to_email: &str,
        workspace_name: &str,
        admin_email: &str,
        entry_password: &str,
    ) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to_email.parse()?)
            .subject(format!("You're invited to join {workspace_name} on Brigade"))
            .body(format!(
                "{admin_email} has invited you to join the \"{workspace_name}\" kitchen \
                 workspace.\n\nYour entry password: {entry_password}\n\nEnter it on the staff \
                 sign-in screen to see the live queue.\n\nIf you don't know who sent this, you \
                 can safely ignore it.\n"
            ))?;
        self.transport.send(message).await?;
        Ok(())
    }
}
