//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the submission API handlers
//! - Attach CORS response headers to every API response
//! - Wire up middleware (request ID, tracing, request timeout, metrics)
//! - Serve on a bound listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::track_requests;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::store::SubmissionStore;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_HEADERS: &str = "Content-Type";
const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub health_timeout: Duration,
    pub metrics: Option<PrometheusHandle>,
}

/// HTTP server for the submission API.
pub struct SubmissionServer {
    router: Router,
    config: ServiceConfig,
}

impl SubmissionServer {
    /// Create a server over a bootstrapped store.
    ///
    /// Passing a metrics handle turns on request instrumentation and `/metrics`.
    pub fn new(
        config: ServiceConfig,
        store: Arc<dyn SubmissionStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let state = AppState {
            store,
            health_timeout: config.health.timeout(),
            metrics,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut api = Router::new()
            .route("/api/ready", any(handlers::ready))
            .route("/api/health", any(handlers::health))
            .route(
                "/api/submit",
                post(handlers::create_submission)
                    .options(handlers::preflight)
                    .fallback(handlers::invalid_method),
            )
            .route(
                "/api/submissions",
                get(handlers::list_submissions)
                    .options(handlers::preflight)
                    .fallback(handlers::invalid_method),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        // Timeout and metrics stay inside the CORS headers.
        if state.metrics.is_some() {
            api = api.layer(middleware::from_fn(track_requests));
        }

        let mut app = api
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(ALLOW_ORIGIN),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ));

        if state.metrics.is_some() {
            app = app.route("/metrics", get(render_metrics));
        }

        app.with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend_url = %self.config.frontend.backend_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /metrics`: Prometheus exposition text.
async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
