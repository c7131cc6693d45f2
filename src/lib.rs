//! Climate relay library.
//!
//! Accepts `GET /climate` with a `zip_code` header, validates the postal
//! code, forwards the lookup to the upstream climate provider and returns its
//! record as JSON, continuing the caller's distributed trace end to end.

pub mod climate;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Telemetry;
