//! Climate lookup domain.
//!
//! # Data Flow
//! ```text
//! raw zip_code header value
//!     → usecase.rs (span, validation via model.rs)
//!     → gateway.rs (ClimateGateway port)
//!     → upstream client (infrastructure)
//!     → ClimateRecord or ClimateError back up
//! ```
//!
//! # Design Decisions
//! - Validation happens before any network call
//! - Errors are never translated between layers; the HTTP boundary maps them
//! - An all-default record means "not found"

pub mod error;
pub mod gateway;
pub mod model;
pub mod usecase;

pub use error::{ClimateError, UpstreamFailure};
pub use gateway::ClimateGateway;
pub use model::{ClimateRecord, ZipCode};
pub use usecase::ClimateUseCase;
