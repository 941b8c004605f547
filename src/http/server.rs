//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind the server to a listener and run until shutdown

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::{api, downloads, request};
use crate::http::response::ApiError;
use crate::lifecycle::wait_for_shutdown;
use crate::observability::metrics;
use crate::predict::ScriptInvoker;
use crate::upstream::{self, GeminiClient, SpeechClient};

/// Error type for server construction.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub predictor: ScriptInvoker,
    pub gemini: GeminiClient,
    pub speech: SpeechClient,
    pub game_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Result<Self, ServerError> {
        let http = upstream::build_client(config)?;

        Ok(Self {
            predictor: ScriptInvoker::new(&config.prediction),
            gemini: GeminiClient::new(http.clone(), &config.gemini),
            speech: SpeechClient::new(http, &config.tts),
            game_dir: Arc::new(config.downloads.game_dir.clone()),
        })
    }
}

/// Wrap `router` in the relay middleware stack.
///
/// CORS is permissive: the browser bundle is served from another origin.
#[allow(deprecated)]
pub fn with_middleware(router: Router, config: &RelayConfig) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(CorsLayer::permissive())
        .layer(request::propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request::request_span))
        .layer(request::set_request_id_layer())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    ApiError::internal("Internal server error").into_response()
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new relay server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/health", get(api::health))
            .route("/api/predict/aurora", post(api::predict_aurora))
            .route("/api/predict/storm", post(api::predict_storm))
            .route("/api/gemini", post(api::chat))
            .route("/api/tts", post(api::speech))
            .route("/game/{file}", get(downloads::game_file));

        if let Some(dir) = &config.relay.static_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        with_middleware(router.with_state(state), config)
    }

    /// The router, for driving the relay without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// signal arrives or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            gemini_configured = self.config.gemini.api_key.is_some(),
            tts_configured = self.config.tts.api_key.is_some() && self.config.tts.voice_id.is_some(),
            "Relay server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("Relay server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
