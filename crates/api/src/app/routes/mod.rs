//! Route tables, split by audience.

pub mod admin;
pub mod event_stream;
pub mod public;

use axum::Router;

pub fn api_router() -> Router {
    Router::new()
        .merge(public::router())
        .merge(admin::router())
        .merge(event_stream::router())
}
