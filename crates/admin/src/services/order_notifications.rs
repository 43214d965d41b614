//! Order-status change notifications.
//!
//! [`OrderNotifier::notify`] loads the site settings, fills in the order's
//! items, address and payment method when the caller left them out,
//! renders the status email and makes a single SMTP attempt. A failed
//! attempt is logged to `system_logs` and reported back to the caller;
//! nothing is retried.

use std::future::Future;

use askama::Template;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;

use velora_core::{
    LogLevel, MAX_LINE_QUANTITY, NewSystemLog, OrderId, OrderLine, Price, ShippingAddress,
    SiteSettings,
    StatusNotice, display_status, order_total, short_ref,
};

use super::email::{EmailError, MailTransport, OutgoingEmail, SmtpSettings};
use crate::db::{OrderRepository, RepositoryError, SettingsRepository, SystemLogRepository};

/// Name used in the greeting when the request has none.
pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";

/// `system_logs` category for failed notifications.
pub const EMAIL_LOG_CATEGORY: &str = "email";

/// Warning attached to a failed send; the status change itself was saved.
pub const DELIVERY_WARNING: &str = "Order was updated but email notification failed";

// =============================================================================
// Request
// =============================================================================

/// Body of `POST /functions/send-order-status-email`.
///
/// Every field is optional at the type level so a missing required field
/// is reported as such rather than as a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEmailRequest {
    pub order_id: Option<String>,
    pub new_status: Option<String>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub order_items: Option<Vec<EmailItem>>,
    pub total_amount: Option<Decimal>,
    pub shipping_address: Option<serde_json::Value>,
    pub payment_method: Option<String>,
}

/// One order line as sent by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailItem {
    #[serde(alias = "product_name")]
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl EmailItem {
    /// A positive quantity no larger than a cart line allows, at a
    /// non-negative price.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1..=MAX_LINE_QUANTITY).contains(&self.quantity) && !self.price.is_sign_negative()
    }
}

impl From<EmailItem> for OrderLine {
    fn from(item: EmailItem) -> Self {
        Self {
            product_name: item.name,
            quantity: item.quantity,
            price: Price::new(item.price),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl StatusEmailRequest {
    /// `(order_id, new_status, customer_email)` when all three are non-blank.
    #[must_use]
    pub fn required(&self) -> Option<(&str, &str, &str)> {
        Some((
            present(self.order_id.as_deref())?,
            present(self.new_status.as_deref())?,
            present(self.customer_email.as_deref())?,
        ))
    }

    /// Whether every supplied item and the supplied total are in range.
    #[must_use]
    pub fn amounts_valid(&self) -> bool {
        self.order_items.iter().flatten().all(EmailItem::is_valid)
            && !self.total_amount.is_some_and(|t| t.is_sign_negative())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a notification was not sent.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// `orderId`, `newStatus` or `customerEmail` missing.
    #[error("Missing required fields")]
    MissingFields,

    /// A supplied item or total is negative or out of range.
    #[error("Invalid order items or total")]
    InvalidAmounts,

    /// Could not read `site_settings`.
    #[error("Failed to fetch site settings")]
    Settings(#[source] RepositoryError),

    /// Configuration, rendering or transport failure.
    #[error("{0}")]
    Delivery(#[from] EmailError),
}

// =============================================================================
// Store
// =============================================================================

/// What is known about a stored order for the email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSnapshot {
    pub lines: Vec<OrderLine>,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
}

/// Data access the notifier needs.
pub trait NotificationStore: Send + Sync {
    fn site_settings(&self) -> impl Future<Output = Result<SiteSettings, RepositoryError>> + Send;

    /// The order's items, address and payment method; `None` if the id is
    /// not a known order.
    fn order_snapshot(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<Option<OrderSnapshot>, RepositoryError>> + Send;

    fn record_failure(
        &self,
        log: NewSystemLog,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// [`NotificationStore`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationStore for PgNotificationStore {
    async fn site_settings(&self) -> Result<SiteSettings, RepositoryError> {
        SettingsRepository::new(&self.pool).load_all().await
    }

    async fn order_snapshot(
        &self,
        order_id: &str,
    ) -> Result<Option<OrderSnapshot>, RepositoryError> {
        let Ok(id) = order_id.parse::<OrderId>() else {
            return Ok(None);
        };
        let repo = OrderRepository::new(&self.pool);
        let order = match repo.get(id).await {
            Ok(order) => order,
            Err(RepositoryError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let lines = repo.lines(id).await?;
        Ok(Some(OrderSnapshot {
            lines,
            shipping_address: order.shipping_address(),
            payment_method: order.payment_method,
        }))
    }

    async fn record_failure(&self, log: NewSystemLog) -> Result<(), RepositoryError> {
        SystemLogRepository::new(&self.pool).create(&log).await?;
        Ok(())
    }
}

// =============================================================================
// Email content
// =============================================================================

/// Items and totals the email is built from, after any lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub lines: Vec<OrderLine>,
    pub total: Price,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
}

/// A rendered line of the items table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub name: String,
    pub quantity: i32,
    pub price: String,
    pub line_total: String,
}

/// Everything the status email shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEmail {
    pub site_name: String,
    pub customer_name: String,
    pub status_label: String,
    pub status_message: String,
    pub status_color: String,
    pub order_ref: String,
    pub items: Vec<ItemView>,
    pub total: String,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<String>,
    pub address_lines: Vec<String>,
    pub payment_method: Option<String>,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "email/order_status.html")]
struct StatusEmailHtml<'a> {
    site_name: &'a str,
    customer_name: &'a str,
    status_label: &'a str,
    status_message: &'a str,
    status_color: &'a str,
    order_ref: &'a str,
    items: &'a [ItemView],
    total: &'a str,
    tracking_number: Option<&'a str>,
    estimated_delivery: Option<&'a str>,
    address_lines: &'a [String],
    payment_method: Option<&'a str>,
    year: i32,
}

#[derive(Template)]
#[template(path = "email/order_status.txt")]
struct StatusEmailText<'a> {
    site_name: &'a str,
    customer_name: &'a str,
    status_label: &'a str,
    status_message: &'a str,
    order_ref: &'a str,
    items: &'a [ItemView],
    total: &'a str,
    tracking_number: Option<&'a str>,
    estimated_delivery: Option<&'a str>,
    address_lines: &'a [String],
    payment_method: Option<&'a str>,
    year: i32,
}

/// Show an ISO date (or timestamp) as e.g. `15 March 2026`; anything that
/// does not parse is shown as given.
#[must_use]
pub fn format_delivery_date(raw: &str) -> String {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_or_else(|_| raw.to_owned(), |d| d.format("%-d %B %Y").to_string())
}

impl StatusEmail {
    /// Assemble the email for `order_id` moving to `status`.
    #[must_use]
    pub fn build(
        request: &StatusEmailRequest,
        order_id: &str,
        status: &str,
        settings: &SiteSettings,
        order: &ResolvedOrder,
    ) -> Self {
        let notice = StatusNotice::for_status(status);
        let currency = settings.currency_symbol();

        Self {
            site_name: settings.site_name(),
            customer_name: present(request.customer_name.as_deref())
                .unwrap_or(DEFAULT_CUSTOMER_NAME)
                .to_owned(),
            status_label: display_status(status),
            status_message: notice.message.to_owned(),
            status_color: notice.color.to_owned(),
            order_ref: short_ref(order_id),
            items: order
                .lines
                .iter()
                .map(|line| ItemView {
                    name: line.product_name.clone(),
                    quantity: line.quantity,
                    price: line.price.display_with(&currency),
                    line_total: line.line_total().display_with(&currency),
                })
                .collect(),
            total: order.total.display_with(&currency),
            tracking_number: present(request.tracking_number.as_deref()).map(str::to_owned),
            estimated_delivery: present(request.estimated_delivery.as_deref())
                .map(format_delivery_date),
            address_lines: order
                .shipping_address
                .as_ref()
                .map(ShippingAddress::lines)
                .unwrap_or_default(),
            payment_method: present(order.payment_method.as_deref()).map(str::to_uppercase),
            year: Utc::now().year(),
        }
    }

    #[must_use]
    pub fn subject(&self) -> String {
        format!("Order Status Update: {}", self.status_label)
    }

    /// Render the HTML and plain-text bodies.
    ///
    /// # Errors
    ///
    /// Returns the template error if rendering fails.
    pub fn render(&self) -> Result<(String, String), askama::Error> {
        let html = StatusEmailHtml {
            site_name: &self.site_name,
            customer_name: &self.customer_name,
            status_label: &self.status_label,
            status_message: &self.status_message,
            status_color: &self.status_color,
            order_ref: &self.order_ref,
            items: &self.items,
            total: &self.total,
            tracking_number: self.tracking_number.as_deref(),
            estimated_delivery: self.estimated_delivery.as_deref(),
            address_lines: &self.address_lines,
            payment_method: self.payment_method.as_deref(),
            year: self.year,
        }
        .render()?;
        let text = StatusEmailText {
            site_name: &self.site_name,
            customer_name: &self.customer_name,
            status_label: &self.status_label,
            status_message: &self.status_message,
            order_ref: &self.order_ref,
            items: &self.items,
            total: &self.total,
            tracking_number: self.tracking_number.as_deref(),
            estimated_delivery: self.estimated_delivery.as_deref(),
            address_lines: &self.address_lines,
            payment_method: self.payment_method.as_deref(),
            year: self.year,
        }
        .render()?;
        Ok((html, text))
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Sends order-status emails.
#[derive(Debug, Clone)]
pub struct OrderNotifier<S, T> {
    store: S,
    transport: T,
}

impl<S: NotificationStore, T: MailTransport> OrderNotifier<S, T> {
    #[must_use]
    pub const fn new(store: S, transport: T) -> Self {
        Self { store, transport }
    }

    /// Send the status email described by `request`.
    ///
    /// When `orderItems` is absent or empty, the order's stored items,
    /// address and payment method are used and the total is the sum of
    /// `price * quantity`. Otherwise `totalAmount` is used when given.
    ///
    /// # Errors
    ///
    /// - `NotifyError::MissingFields` before any I/O if `orderId`,
    ///   `newStatus` or `customerEmail` is blank
    /// - `NotifyError::Settings` if site settings cannot be read
    /// - `NotifyError::Delivery` if SMTP is not configured, rendering
    ///   fails, or the single send attempt fails
    #[tracing::instrument(skip(self, request), fields(order_id, status))]
    pub async fn notify(&self, request: &StatusEmailRequest) -> Result<(), NotifyError> {
        let (order_id, status, customer_email) =
            request.required().ok_or(NotifyError::MissingFields)?;
        if !request.amounts_valid() {
            return Err(NotifyError::InvalidAmounts);
        }
        let span = tracing::Span::current();
        span.record("order_id", order_id);
        span.record("status", status);

        let settings = self.store.site_settings().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch site settings");
            NotifyError::Settings(e)
        })?;

        let order = self.resolve_order(request, order_id).await;
        let email = StatusEmail::build(request, order_id, status, &settings, &order);

        match self.deliver(&settings, customer_email, &email).await {
            Ok(()) => {
                tracing::info!(to = %customer_email, "Status update email sent");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, to = %customer_email, "Status update email failed");
                let log = NewSystemLog::new(
                    LogLevel::Error,
                    EMAIL_LOG_CATEGORY,
                    format!("Order status email failed for order #{}: {err}", email.order_ref),
                )
                .with_metadata(json!({
                    "order_id": order_id,
                    "status": status,
                    "customer_email": customer_email,
                }));
                if let Err(e) = self.store.record_failure(log).await {
                    tracing::warn!(error = %e, "Could not record email failure in system_logs");
                }
                Err(NotifyError::Delivery(err))
            }
        }
    }

    /// Items, total, address and payment method for the email.
    ///
    /// A failed or empty lookup is logged and the email goes out without
    /// items.
    async fn resolve_order(&self, request: &StatusEmailRequest, order_id: &str) -> ResolvedOrder {
        let given = ResolvedOrder {
            lines: Vec::new(),
            total: request.total_amount.map_or(Price::ZERO, Price::new),
            shipping_address: request
                .shipping_address
                .clone()
                .and_then(|v| serde_json::from_value(v).ok()),
            payment_method: request.payment_method.clone(),
        };

        if let Some(items) = request.order_items.as_ref().filter(|items| !items.is_empty()) {
            let lines: Vec<OrderLine> = items.iter().cloned().map(OrderLine::from).collect();
            let total = request
                .total_amount
                .map_or_else(|| order_total(&lines), Price::new);
            return ResolvedOrder {
                lines,
                total,
                ..given
            };
        }

        match self.store.order_snapshot(order_id).await {
            Ok(Some(snapshot)) => ResolvedOrder {
                total: order_total(&snapshot.lines),
                lines: snapshot.lines,
                shipping_address: snapshot.shipping_address.or(given.shipping_address),
                payment_method: snapshot.payment_method.or(given.payment_method),
            },
            Ok(None) => {
                tracing::warn!("Order not found; sending email without items");
                given
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load order items; sending email without items");
                given
            }
        }
    }

    /// Check SMTP settings, render, and make one send attempt.
    async fn deliver(
        &self,
        settings: &SiteSettings,
        customer_email: &str,
        email: &StatusEmail,
    ) -> Result<(), EmailError> {
        let smtp = SmtpSettings::from_settings(settings)?;
        let (html_body, text_body) = email.render()?;
        let outgoing = OutgoingEmail {
            to: customer_email.to_owned(),
            subject: email.subject(),
            text_body,
            html_body,
        };
        self.transport.send(&smtp, &outgoing).await
    }
}
