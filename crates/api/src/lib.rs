//! HTTP API: server wiring, routing, and request/response mapping.

pub mod app;
pub mod seed;
pub mod telemetry;
