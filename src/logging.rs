//! Request logging and tracing subscriber setup.
//!
//! Logs go to the console, a daily error log and a daily JSON log under
//! `storage/logs`. Spans are exported over OTLP when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{Instrument, Level, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "storage/logs";

/// Wraps each request in a span carrying a fresh `request_id`, so every event
/// logged while handling it can be correlated.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |p| p.as_str().to_string());
    let span = info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %req.method(),
        path = %path,
    );

    async move {
        debug!("Incoming request");
        let response = next.run(req).await;
        log_outcome(response.status(), start.elapsed());
        response
    }
    .instrument(span)
    .await
}

/// 5xx at error, 4xx at warn, everything else at info.
fn outcome_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

fn log_outcome(status: StatusCode, latency: Duration) {
    let code = status.as_u16();
    let latency_ms = latency.as_millis();

    match outcome_level(status) {
        Level::ERROR => error!(status = code, latency_ms = %latency_ms, "Server error"),
        Level::WARN => warn!(status = code, latency_ms = %latency_ms, "Client error"),
        _ => info!(status = code, latency_ms = %latency_ms, "Request completed"),
    }
}

fn init_tracer(otlp_endpoint: String) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

pub fn init_tracing() -> anyhow::Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    std::fs::create_dir_all(LOG_DIR)?;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,academy_db=info,tower_http=warn,sqlx=warn",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let error_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "academy.log");
    let error_layer = fmt::layer()
        .with_writer(error_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for log shippers
    let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "academy.json");
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer);

    let Ok(otlp_endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        registry.try_init()?;
        info!("Tracing initialized without OpenTelemetry");
        return Ok(());
    };

    match init_tracer(otlp_endpoint.clone()) {
        Ok(tracer) => {
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
            info!(endpoint = %otlp_endpoint, "Tracing initialized with OpenTelemetry");
        }
        Err(e) => {
            registry.try_init()?;
            warn!(error = %e, "Failed to initialize OpenTelemetry, continuing without it");
        }
    }

    Ok(())
}

pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer...");
    global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_level_by_status_class() {
        assert_eq!(outcome_level(StatusCode::OK), Level::INFO);
        assert_eq!(outcome_level(StatusCode::NOT_MODIFIED), Level::INFO);
        assert_eq!(outcome_level(StatusCode::TOO_MANY_REQUESTS), Level::WARN);
        assert_eq!(outcome_level(StatusCode::NOT_FOUND), Level::WARN);
        assert_eq!(outcome_level(StatusCode::SERVICE_UNAVAILABLE), Level::ERROR);
    }
}
