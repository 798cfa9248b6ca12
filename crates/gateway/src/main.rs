//! LitGraph API Gateway
//!
//! Serves the article relationship graph and triggers manual updates.
//! Handles:
//! - Graph queries filtered by topic and year
//! - Serialized update cycles against the article store
//! - Rate limiting
//! - Observability (logging, metrics, request ids)

mod handlers;
mod middleware;

use anyhow::Context;
use axum::{
    http::StatusCode, middleware::from_fn, middleware::from_fn_with_state, routing::get, Router,
};
use litgraph_common::{
    config::AppConfig,
    metrics::{self, LATENCY_BUCKETS, METRICS_PREFIX, UPSTREAM_BUCKETS},
    telemetry, ArticleStore, JsonFileStore, VERSION,
};
use litgraph_ingestion::{Aggregator, UpdatePipeline};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::Mutex};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ArticleStore>,
    /// Update pipeline behind a mutex: at most one update runs at a time
    pub updater: Arc<Mutex<UpdatePipeline>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ArticleStore>, pipeline: UpdatePipeline) -> Self {
        Self {
            config: Arc::new(config),
            store,
            updater: Arc::new(Mutex::new(pipeline)),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    telemetry::init_tracing(&config.observability);
    info!("Starting LitGraph API Gateway v{}", VERSION);

    let store: Arc<dyn ArticleStore> = Arc::new(JsonFileStore::new(&config.store.path));
    let aggregator =
        Aggregator::from_config(&config.providers).context("Failed to build provider clients")?;
    let pipeline = UpdatePipeline::new(aggregator, store.clone());

    let mut state = AppState::new(config, store, pipeline);

    // Initialize metrics
    if state.config.observability.metrics_enabled {
        let handle = install_metrics_recorder()?;
        metrics::register_metrics();
        state = state.with_metrics(handle);
    }

    let config = state.config.clone();
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::pin!(server);

    // An in-flight update can outlive the grace period; stop waiting for it
    let deadline = async {
        shutdown_signal().await;
        tokio::time::sleep(config.shutdown_timeout()).await;
    };

    tokio::select! {
        result = &mut server => result?,
        _ = deadline => warn!(
            timeout_secs = config.server.shutdown_timeout_secs,
            "Graceful shutdown timed out, exiting"
        ),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Install the global Prometheus recorder
fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_provider_query_duration_seconds", METRICS_PREFIX)),
            UPSTREAM_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_update_duration_seconds", METRICS_PREFIX)),
            UPSTREAM_BUCKETS,
        )?
        .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), LATENCY_BUCKETS)?
        .install_recorder()?;
    Ok(handle)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        state.config.request_timeout(),
    );

    // Update cycles run detached and can outlast any request timeout, so the
    // update route is added after the timeout layer and is not wrapped by it
    let api_routes = Router::new()
        .route("/articles", get(handlers::articles::get_articles))
        .layer(timeout.clone())
        .route("/update-articles", get(handlers::update::update_articles));

    let mut app = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .layer(timeout)
        .nest("/api", api_routes);

    if let Some(limiter) = middleware::rate_limit::create_rate_limiter(&state.config.rate_limit) {
        app = app.layer(from_fn_with_state(limiter, middleware::rate_limit::rate_limit));
    } else if state.config.rate_limit.enabled {
        warn!("Rate limiting enabled with a zero quota; leaving requests unlimited");
    }

    app.layer(from_fn(middleware::metrics::track_requests))
        .layer(GlobalConcurrencyLimitLayer::new(state.config.server.max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use litgraph_common::{GraphSnapshot, MemoryStore};
    use litgraph_ingestion::PollingPolicy;

    /// Router over an in-memory store and an aggregator with no tasks
    pub(crate) fn router_with(snapshot: GraphSnapshot, config: AppConfig) -> (Router, Arc<MemoryStore>) {
        router_with_aggregator(
            snapshot,
            config,
            Aggregator::new(Vec::new(), PollingPolicy::immediate()),
        )
    }

    pub(crate) fn router_with_aggregator(
        snapshot: GraphSnapshot,
        config: AppConfig,
        aggregator: Aggregator,
    ) -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_snapshot(snapshot));
        let pipeline = UpdatePipeline::new(aggregator, store.clone());
        let state = AppState::new(config, store.clone(), pipeline);
        (create_router(state), store)
    }

    pub(crate) fn router(snapshot: GraphSnapshot) -> (Router, Arc<MemoryStore>) {
        router_with(snapshot, AppConfig::default())
    }

    pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
