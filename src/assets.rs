//! Static asset server for the browser bundle.
//!
//! Serves a directory tree. Any GET that does not resolve to a file is
//! answered with the entry document so client-side routes keep working.

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use axum::Router;

use crate::config::AssetsConfig;
use crate::http::request;
use crate::lifecycle::wait_for_shutdown;

/// Router serving `config.root` with an entry-document fallback.
pub fn static_router(config: &AssetsConfig) -> Router {
    let entry = config.root.join(&config.entry);
    let files = ServeDir::new(&config.root).fallback(ServeFile::new(entry));

    Router::new()
        .fallback_service(files)
        .layer(request::propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request::request_span))
        .layer(request::set_request_id_layer())
}

/// Standalone static file server.
pub struct StaticServer {
    router: Router,
    config: AssetsConfig,
}

impl StaticServer {
    pub fn new(config: AssetsConfig) -> Self {
        Self {
            router: static_router(&config),
            config,
        }
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.root.display(),
            entry = %self.config.entry.display(),
            "Static server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("Static server stopped");
        Ok(())
    }
}
