//! SMTP delivery for transactional email.
//!
//! SMTP is configured in `site_settings`, not in the environment, so a
//! transport is built from [`SmtpSettings`] for every send. Port 465 or
//! `smtp_secure = true` means implicit TLS; anything else uses STARTTLS.

use std::future::Future;

use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use velora_core::{SiteSettings, keys};

/// Message returned when any required SMTP setting is absent.
pub const SMTP_CONFIG_MISSING: &str =
    "SMTP configuration missing. Please configure SMTP settings in admin panel.";

/// Port that implies implicit TLS.
const SMTPS_PORT: u16 = 465;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Required SMTP settings are missing.
    #[error("{0}")]
    Config(String),

    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// SMTP settings read from `site_settings`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub from_email: String,
    pub from_name: String,
    pub secure: bool,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("secure", &self.secure)
            .finish()
    }
}

impl SmtpSettings {
    /// Read SMTP settings, falling back to the site name for the sender name.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Config` if host, port, user, password or from
    /// address is missing or blank.
    pub fn from_settings(settings: &SiteSettings) -> Result<Self, EmailError> {
        let missing = || EmailError::Config(SMTP_CONFIG_MISSING.to_owned());

        let host = settings.get_str(keys::SMTP_HOST).ok_or_else(missing)?;
        let port = settings
            .get_u16(keys::SMTP_PORT)
            .filter(|port| *port != 0)
            .ok_or_else(missing)?;
        let user = settings.get_str(keys::SMTP_USER).ok_or_else(missing)?;
        let password = settings.get_str(keys::SMTP_PASSWORD).ok_or_else(missing)?;
        let from_email = settings.get_str(keys::SMTP_FROM_EMAIL).ok_or_else(missing)?;
        let from_name = settings
            .get_str(keys::SMTP_FROM_NAME)
            .unwrap_or_else(|| settings.site_name());

        Ok(Self {
            host,
            port,
            user,
            password: SecretString::from(password),
            from_email,
            from_name,
            secure: settings.get_bool(keys::SMTP_SECURE),
        })
    }

    /// Connect with TLS from the first byte instead of upgrading.
    #[must_use]
    pub fn implicit_tls(&self) -> bool {
        self.secure || self.port == SMTPS_PORT
    }

    /// `From` header mailbox, e.g. `Velora Tradings <orders@velora.in>`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::InvalidAddress` if `from_email` does not parse.
    pub fn sender(&self) -> Result<Mailbox, EmailError> {
        let address: Address = self
            .from_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.from_email.clone()))?;
        Ok(Mailbox::new(Some(self.from_name.clone()), address))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, SmtpError> {
        let credentials = Credentials::new(
            self.user.clone(),
            self.password.expose_secret().to_string(),
        );

        let builder = if self.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
        };

        Ok(builder.port(self.port).credentials(credentials).build())
    }
}

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutgoingEmail {
    /// Build a multipart message with both plain text and HTML versions.
    ///
    /// # Errors
    ///
    /// Returns an error if an address is invalid or the message cannot be built.
    pub fn to_message(&self, smtp: &SmtpSettings) -> Result<Message, EmailError> {
        let message = Message::builder()
            .from(smtp.sender()?)
            .to(self
                .to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.to.clone()))?)
            .subject(self.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(self.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(self.html_body.clone()),
                    ),
            )?;
        Ok(message)
    }
}

/// Something that can deliver an [`OutgoingEmail`].
pub trait MailTransport: Send + Sync {
    /// Make one delivery attempt.
    fn send(
        &self,
        smtp: &SmtpSettings,
        email: &OutgoingEmail,
    ) -> impl Future<Output = Result<(), EmailError>> + Send;
}

/// Delivers over SMTP with `lettre`, one connection per message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

impl MailTransport for SmtpMailer {
    async fn send(&self, smtp: &SmtpSettings, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = email.to_message(smtp)?;
        let transport = smtp.transport()?;
        transport.send(message).await?;

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            host = %smtp.host,
            implicit_tls = smtp.implicit_tls(),
            "Email sent successfully"
        );
        Ok(())
    }
}
