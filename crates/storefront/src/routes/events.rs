//! Server-sent shopper notifications.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use tracing::instrument;

use crate::middleware::Shopper;
use crate::state::AppState;

/// `GET /api/events`
///
/// Streams `product_added_to_cart` and `product_added_to_wishlist` events
/// for the current shopper until the client disconnects.
#[instrument(skip(state))]
pub async fn stream(
    Shopper(shopper): Shopper,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = state.events().subscribe(shopper).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|_| {
            r#"{"type":"error","message":"Failed to serialize event"}"#.to_owned()
        });
        Ok(Event::default().event(event.kind()).data(data))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
