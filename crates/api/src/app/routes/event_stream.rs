//! Server-sent change-event stream.
//!
//! Each connection gets its own subscriber channel; closing the connection
//! drops the receiver, which unsubscribes it on the next broadcast. Late
//! joiners receive nothing until the next committed mutation.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Extension, Router};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

use crate::app::services::CatalogService;

pub fn router() -> Router {
    Router::new().route("/events/products", get(product_events))
}

async fn product_events(
    Extension(service): Extension<Arc<CatalogService>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = service.subscribe();
    let stream = UnboundedReceiverStream::new(rx).map(|event| {
        let sse = Event::default().event(event.kind.as_str());
        // ChangeEvent serialization cannot fail; fall back to the slug if
        // it somehow does rather than killing the stream.
        let sse = match sse.json_data(&event) {
            Ok(sse) => sse,
            Err(_) => Event::default().event(event.kind.as_str()).data(event.slug),
        };
        Ok(sse)
    });
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
