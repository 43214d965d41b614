//! Shopper notifications.
//!
//! Cart and wishlist handlers publish an event after a successful add; each
//! open `/api/events` stream receives only its own shopper's events.

use futures::stream::BoxStream;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use velora_core::{Price, ProductId, ShopperId};

/// Buffered events per subscriber before it starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A notification for one shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShopperEvent {
    ProductAddedToCart {
        product_id: ProductId,
        name: String,
        price: Price,
        image_url: Option<String>,
    },
    ProductAddedToWishlist {
        product_id: ProductId,
        name: String,
        image_url: Option<String>,
    },
}

impl ShopperEvent {
    /// SSE event name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ProductAddedToCart { .. } => "product_added_to_cart",
            Self::ProductAddedToWishlist { .. } => "product_added_to_wishlist",
        }
    }
}

/// In-process publish/subscribe channel for shopper events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<(ShopperId, ShopperEvent)>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver `event` to every open stream for `shopper`.
    pub fn publish(&self, shopper: ShopperId, event: ShopperEvent) {
        let kind = event.kind();
        // No subscribers is normal: the shopper has no page open.
        if self.tx.send((shopper, event)).is_err() {
            tracing::debug!(%shopper, kind, "No listeners for shopper event");
        }
    }

    /// Events for `shopper` published after this call.
    #[must_use]
    pub fn subscribe(&self, shopper: ShopperId) -> BoxStream<'static, ShopperEvent> {
        let mut rx = self.tx.subscribe();
        Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok((target, event)) if target == shopper => yield event,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(%shopper, skipped, "Shopper event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn added_to_cart(name: &str) -> ShopperEvent {
        ShopperEvent::ProductAddedToCart {
            product_id: ProductId::new(),
            name: name.to_owned(),
            price: Price::new(Decimal::new(450, 0)),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_stream_only_sees_own_shopper() {
        let bus = EventBus::default();
        let alice = ShopperId::new();
        let bob = ShopperId::new();
        let mut stream = bus.subscribe(alice);

        bus.publish(bob, added_to_cart("Jute Bag"));
        bus.publish(alice, added_to_cart("Brass Diya"));

        let Some(ShopperEvent::ProductAddedToCart { name, .. }) = stream.next().await else {
            panic!("expected a cart event");
        };
        assert_eq!(name, "Brass Diya");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish(ShopperId::new(), added_to_cart("Jute Bag"));
    }

    #[test]
    fn test_event_json_shape() {
        let event = ShopperEvent::ProductAddedToWishlist {
            product_id: ProductId::new(),
            name: "Silk Stole".to_owned(),
            image_url: Some("https://cdn.velora.in/stole.jpg".to_owned()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], json!("product_added_to_wishlist"));
        assert_eq!(value["name"], json!("Silk Stole"));
        assert_eq!(event.kind(), "product_added_to_wishlist");
    }
}
