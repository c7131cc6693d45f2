//! Distributed tracing support.
//!
//! # Responsibilities
//! - Own the tracer provider, tracer and propagator for the process
//! - Extract trace context from incoming requests
//! - Propagate trace context to upstream requests
//! - Create spans for each pipeline layer
//!
//! # Design Decisions
//! - Constructed once at startup and passed to the handlers, never installed
//!   as a global
//! - W3C Trace Context headers (`traceparent`, `tracestate`)
//! - Spans are closed by a guard so every return path ends them

use std::sync::Arc;

use axum::http::HeaderMap;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{Status, TraceContextExt, TraceError, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config as TraceConfig, Tracer, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use thiserror::Error;

use crate::climate::ClimateError;
use crate::config::TelemetryConfig;
use crate::observability::propagation::{HeaderExtractor, HeaderInjector};

const INSTRUMENTATION_NAME: &str = "climate-relay";

/// Errors raised while starting or stopping the tracing pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build span exporter: {0}")]
    Exporter(#[source] TraceError),

    #[error("failed to shut down tracer provider: {0}")]
    Shutdown(#[source] TraceError),
}

struct Inner {
    provider: TracerProvider,
    tracer: Tracer,
    propagator: TraceContextPropagator,
}

/// Handle to the tracing pipeline, cheap to clone and shared by all requests.
#[derive(Clone)]
pub struct Telemetry {
    inner: Arc<Inner>,
}

impl Telemetry {
    /// Build the tracing pipeline described by `config`.
    ///
    /// When telemetry is disabled the provider has no exporter: trace ids are
    /// still generated and propagated, spans are simply not shipped anywhere.
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let resource = Resource::new(vec![KeyValue::new("service.name", config.service_name.clone())]);

        #[allow(deprecated)]
        let mut builder = TracerProvider::builder().with_config(TraceConfig::default().with_resource(resource));

        if config.enabled {
            let exporter = opentelemetry_zipkin::new_pipeline()
                .with_service_name(config.service_name.clone())
                .with_collector_endpoint(config.zipkin_endpoint.clone())
                .init_exporter()
                .map_err(TelemetryError::Exporter)?;
            builder = builder.with_batch_exporter(exporter, runtime::Tokio);

            tracing::info!(
                endpoint = %config.zipkin_endpoint,
                service_name = %config.service_name,
                "Zipkin span exporter configured"
            );
        } else {
            tracing::info!("Span export disabled");
        }

        Ok(Self::from_provider(builder.build()))
    }

    /// Wrap an already built provider, e.g. one backed by an in-memory exporter.
    pub fn from_provider(provider: TracerProvider) -> Self {
        let tracer = provider.tracer(INSTRUMENTATION_NAME);
        Self {
            inner: Arc::new(Inner {
                provider,
                tracer,
                propagator: TraceContextPropagator::new(),
            }),
        }
    }

    /// A provider with no exporter.
    pub fn noop() -> Self {
        Self::from_provider(TracerProvider::builder().build())
    }

    /// Read the caller's trace context from request headers.
    ///
    /// Returns an empty context when no valid `traceparent` is present, so the
    /// next span starts a fresh trace.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.inner.propagator.extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Write the span context carried by `cx` into outbound headers.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.inner.propagator.inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Start a span named `name` as a child of whatever span `parent` carries.
    pub fn start_span(&self, name: &'static str, parent: &Context) -> SpanScope {
        let span = self.inner.tracer.start_with_context(name, parent);
        SpanScope {
            cx: parent.with_span(span),
        }
    }

    /// Flush pending spans and stop the exporter.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        self.inner.provider.shutdown().map_err(TelemetryError::Shutdown)
    }
}

/// An open span, ended when the scope is dropped.
pub struct SpanScope {
    cx: Context,
}

impl SpanScope {
    /// Context carrying this span, to be handed to child operations.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    pub fn add_event(&self, name: &'static str) {
        self.cx.span().add_event(name, Vec::new());
    }

    pub fn set_attribute(&self, key: &'static str, value: impl Into<opentelemetry::Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    /// Mark the span as failed with the error's kind and message.
    pub fn record_failure(&self, err: &ClimateError) {
        let span = self.cx.span();
        span.set_attribute(KeyValue::new("error.kind", err.kind()));
        span.set_status(Status::error(err.to_string()));
    }
}

impl Drop for SpanScope {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}
