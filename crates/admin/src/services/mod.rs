//! Business logic services for admin.
//!
//! # Services
//!
//! - `email` - SMTP settings, message building and delivery
//! - `order_notifications` - Order-status emails with item lookup

pub mod email;
pub mod order_notifications;

pub use email::{EmailError, MailTransport, OutgoingEmail, SmtpMailer, SmtpSettings};
pub use order_notifications::{
    DELIVERY_WARNING, NotificationStore, NotifyError, OrderNotifier, PgNotificationStore,
    StatusEmailRequest,
};
