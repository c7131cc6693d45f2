//! Climate lookup use case.

use opentelemetry::Context;

use crate::climate::error::ClimateError;
use crate::climate::gateway::ClimateGateway;
use crate::climate::model::{ClimateRecord, ZipCode};
use crate::observability::Telemetry;

pub const USECASE_SPAN: &str = "climate-usercase";

/// Validates the postal code and asks the gateway for its climate record.
pub struct ClimateUseCase<G> {
    gateway: G,
    telemetry: Telemetry,
}

impl<G: ClimateGateway> ClimateUseCase<G> {
    pub fn new(gateway: G, telemetry: Telemetry) -> Self {
        Self { gateway, telemetry }
    }

    /// Look up the climate for a raw, caller-supplied postal code.
    ///
    /// Validation failures return before the gateway is contacted. Gateway
    /// errors are passed through untouched.
    pub async fn get(&self, cx: &Context, raw_zip_code: &str) -> Result<ClimateRecord, ClimateError> {
        let span = self.telemetry.start_span(USECASE_SPAN, cx);
        span.add_event("get climate usercase");

        tracing::debug!(trace_id = %span.trace_id(), "Climate use case");

        let result = match ZipCode::parse(raw_zip_code) {
            Ok(zip_code) => self.gateway.fetch_climate(span.context(), &zip_code).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            span.record_failure(e);
        }
        result
    }
}
