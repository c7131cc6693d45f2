//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace layer, timeout)
//!     → handler.rs (trace extraction, method and header checks)
//!     → ClimateUseCase → ClimateServiceClient → upstream
//!     → JSON record or plain-text error to the client
//! ```

pub mod handler;
pub mod server;

pub use handler::climate_handler;
pub use server::{build_router, AppState, HttpServer, CLIMATE_ROUTE};
