//! Serve command - run the HTTP API.

use crate::agent::KnowledgeAgent;
use crate::api::{self, AppState};
use crate::cli::Output;
use crate::config::{Config, ProcessEnv, Settings};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Run the HTTP API server.
///
/// Fails before binding if any required environment variable is missing.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> Result<()> {
    let config = Config::from_env()?;
    let agent = KnowledgeAgent::from_config(&config, &settings)?;

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = api::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    Output::header("tubeask API Server");
    Output::success(&format!("Listening on http://{}", listener.local_addr()?));
    Output::kv("YouTube", "POST /api/youtube");
    Output::kv("Chat", "POST /api/chat");
    Output::kv("Health", "GET  /api/health");
    Output::info("Press Ctrl+C to stop the server.");

    let state = AppState::new(config, Arc::new(agent), Arc::new(ProcessEnv));
    api::serve(listener, state).await?;

    Ok(())
}
