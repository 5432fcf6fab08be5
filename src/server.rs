//! HTTP Server
//!
//! Exposes the metric registry over HTTP and starts the device poller.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - Liveness check, always 200 while the process serves requests
//!
//! Device failures never surface here. A device that stops answering keeps its last
//! values on `/metrics`, or is absent if it never answered.

use crate::config::Config;
use crate::error::ExporterError;
use crate::metrics::MetricsCollector;
use crate::poller::Poller;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    metrics: MetricsCollector,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let metrics = MetricsCollector::new()?;
    let poller = Poller::from_config(&config, metrics.clone())?;

    // Start background device polling
    tokio::spawn(poller.run());

    let app = router(metrics);

    let addr = format!("{}:{}", config.listen_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the exporter router around an existing registry
pub fn router(metrics: MetricsCollector) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { metrics })
}

async fn root_handler() -> impl IntoResponse {
    Html(
        r#"<html>
<head><title>Shelly Exporter</title></head>
<body>
<h1>Shelly Plug Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
