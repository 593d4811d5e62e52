//! HTTP API: the question endpoints and the health check.
//!
//! | Route | Purpose |
//! |---|---|
//! | `POST /api/youtube` | YouTube question, envelope includes `data` |
//! | `POST /api/chat` | General question |
//! | `GET /api/health` | Re-checks required environment variables |

pub mod adapter;
mod error;
mod handlers;

pub use adapter::{answer, require_question, QuestionResponse, QUESTION_REQUIRED};
pub use error::{ApiError, ErrorEnvelope};

use crate::agent::Agent;
use crate::config::{Config, EnvSource};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub agent: Arc<dyn Agent>,
    /// Re-read by the health check.
    pub env: Arc<dyn EnvSource>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, agent: Arc<dyn Agent>, env: Arc<dyn EnvSource>) -> Self {
        Self { agent, env, config }
    }
}

/// Build the router with CORS open to every origin, method and header.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/api/youtube", post(handlers::youtube_question))
        .route("/api/chat", post(handlers::chat_question))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind the listen address. Host names such as `localhost` are resolved.
pub async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server starting on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve the API on a bound listener until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    tracing::info!(
        "Using Pinecone index '{}' ({}/{})",
        state.config.pinecone_index,
        state.config.pinecone_cloud,
        state.config.pinecone_region
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
