//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline layers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → telemetry.rs (spans, trace context extract/inject)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Zipkin collector
//! ```
//!
//! # Design Decisions
//! - Every pipeline layer logs the trace id of its span
//! - The tracing pipeline is an injected handle, not a process global

pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod telemetry;

pub use telemetry::{SpanScope, Telemetry, TelemetryError};
