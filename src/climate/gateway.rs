//! Port to the climate data provider.

use async_trait::async_trait;
use opentelemetry::Context;

use crate::climate::error::ClimateError;
use crate::climate::model::{ClimateRecord, ZipCode};

/// Source of climate records for a validated postal code.
///
/// `cx` carries the caller's span so the implementation can open its own
/// span as a child of it.
#[async_trait]
pub trait ClimateGateway: Send + Sync {
    async fn fetch_climate(&self, cx: &Context, zip_code: &ZipCode) -> Result<ClimateRecord, ClimateError>;
}
