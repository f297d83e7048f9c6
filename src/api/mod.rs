//! HTTP API server for the homelink relay

pub mod health;
pub mod recognize;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::dispatch::DeviceDispatcher;
use crate::llm::LanguageModel;
use crate::stt::Transcriber;
use crate::Result;

/// Shared state for API handlers
///
/// The adapters are injected at startup; the transcriber wraps the one
/// process-wide model instance, shared read-only across in-flight requests.
#[derive(Clone)]
pub struct ApiState {
    pub transcriber: Arc<dyn Transcriber>,
    pub model: Arc<dyn LanguageModel>,
    pub dispatcher: DeviceDispatcher,
}

impl ApiState {
    /// Assemble the handler state from its adapters
    #[must_use]
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        model: Arc<dyn LanguageModel>,
        dispatcher: DeviceDispatcher,
    ) -> Self {
        Self {
            transcriber,
            model,
            dispatcher,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for the given state and port
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(state: Arc<ApiState>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(recognize::router(state))
            .merge(health::router())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
