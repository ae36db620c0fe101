//! HTTP server bootstrap

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{AppState, Config};

pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router and serve until the process is stopped
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr = ("0.0.0.0", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(port = self.config.http_port, "HTTP server listening");
        axum::serve(listener, app).await?;
        Ok(())
    }

    /// Full application router with middleware applied
    pub fn router(&self) -> Router {
        api::router()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }
}
