//! OpenTelemetry span export.
//!
//! Replaces [`init_logging`](crate::init_logging) when the `observability`
//! feature is enabled: same filter and log format, plus a stdout span exporter.

use crate::LoggingConfig;
use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an OpenTelemetry layer.
///
/// Returns the tracer provider so the caller can flush it on exit.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is already
/// installed.
pub fn init_observability(
    service_name: &str,
    config: &LoggingConfig,
) -> Result<SdkTracerProvider, Box<dyn std::error::Error + Send + Sync>> {
    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_resource(resource)
        .build();
    global::set_tracer_provider(provider.clone());

    let tracer = provider.tracer(service_name.to_string());

    Registry::default()
        .with(config.filter()?)
        .with(config.fmt_layer())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()?;

    Ok(provider)
}

/// Flush pending spans.
pub fn shutdown_observability(provider: &SdkTracerProvider) {
    if let Err(e) = provider.shutdown() {
        tracing::warn!(error = %e, "Failed to flush spans");
    }
}
