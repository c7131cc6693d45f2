//! Upstream climate provider access.
//!
//! # Data Flow
//! ```text
//! ClimateUseCase
//!     → client.rs (span, headers, trace injection, decoding)
//!     → transport.rs (Transport trait, hyper-util client, deadline)
//!     → climate data provider
//! ```

pub mod client;
pub mod transport;

pub use client::ClimateServiceClient;
pub use transport::{HyperTransport, Transport, TransportError};
