//! Shared fixtures for the Velora integration tests.
//!
//! # Running Tests
//!
//! ```bash
//! # Library-level checks (no servers needed)
//! cargo test -p velora-integration-tests
//!
//! # HTTP tests against running servers
//! cargo run -p velora-cli -- migrate && cargo run -p velora-cli -- seed
//! cargo run -p velora-storefront &
//! cargo run -p velora-admin &
//! cargo test -p velora-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - storefront base URL (default `http://localhost:3000`)
//! - `ADMIN_URL` - admin base URL (default `http://localhost:3001`)
//! - `ADMIN_API_TOKEN` - bearer token the admin server was started with

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use velora_admin::db::RepositoryError;
use velora_admin::services::order_notifications::OrderSnapshot;
use velora_admin::services::{
    EmailError, MailTransport, NotificationStore, OutgoingEmail, SmtpSettings,
};
use velora_core::{NewSystemLog, SiteSettings};

/// Storefront base URL, without a trailing slash.
#[must_use]
pub fn storefront_url() -> String {
    env_url("STOREFRONT_URL", "http://localhost:3000")
}

/// Admin base URL, without a trailing slash.
#[must_use]
pub fn admin_url() -> String {
    env_url("ADMIN_URL", "http://localhost:3001")
}

fn env_url(key: &str, default: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_owned())
        .trim_end_matches('/')
        .to_owned()
}

/// A client that keeps the storefront session cookie, so consecutive
/// requests act as the same shopper.
///
/// # Errors
///
/// Returns the builder error if the TLS backend cannot be initialised.
pub fn shopper_client() -> reqwest::Result<Client> {
    Client::builder().cookie_store(true).build()
}

/// A client that sends `Authorization: Bearer $ADMIN_API_TOKEN` on every
/// request. With no token set, requests go out unauthenticated.
///
/// # Errors
///
/// Returns the builder error if the TLS backend cannot be initialised.
pub fn admin_client() -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(value) = std::env::var("ADMIN_API_TOKEN")
        .ok()
        .and_then(|token| HeaderValue::from_str(&format!("Bearer {token}")).ok())
    {
        headers.insert(AUTHORIZATION, value);
    }
    Client::builder().default_headers(headers).build()
}

/// A code or slug that will not collide with other test runs.
#[must_use]
pub fn unique(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", suffix.get(..8).unwrap_or(&suffix))
}

/// [`NotificationStore`] over fixed data that records failure logs.
///
/// Implemented for `&StaticStore` so a test keeps the store after handing
/// it to a notifier.
#[derive(Debug, Default)]
pub struct StaticStore {
    pub settings: SiteSettings,
    pub snapshot: Option<OrderSnapshot>,
    pub failures: Mutex<Vec<NewSystemLog>>,
}

impl StaticStore {
    #[must_use]
    pub fn new(settings: SiteSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Failure logs recorded so far.
    #[must_use]
    pub fn failures(&self) -> Vec<NewSystemLog> {
        self.failures
            .lock()
            .map(|logs| logs.clone())
            .unwrap_or_default()
    }
}

impl NotificationStore for &StaticStore {
    async fn site_settings(&self) -> Result<SiteSettings, RepositoryError> {
        Ok(self.settings.clone())
    }

    async fn order_snapshot(&self, _order_id: &str) -> Result<Option<OrderSnapshot>, RepositoryError> {
        Ok(self.snapshot.clone())
    }

    async fn record_failure(&self, log: NewSystemLog) -> Result<(), RepositoryError> {
        if let Ok(mut logs) = self.failures.lock() {
            logs.push(log);
        }
        Ok(())
    }
}

/// [`MailTransport`] that keeps every email instead of sending it, or
/// rejects every attempt when built with [`RecordingTransport::failing`].
/// Implemented for `&RecordingTransport`, like [`StaticStore`].
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    reject: bool,
}

impl RecordingTransport {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// Emails accepted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl MailTransport for &RecordingTransport {
    async fn send(&self, smtp: &SmtpSettings, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.reject {
            return Err(EmailError::Config(format!("{} refused the connection", smtp.host)));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}
