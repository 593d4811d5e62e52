//! tubeask - question answering over YouTube and a Pinecone knowledge base
//!
//! Exposes a small HTTP API that forwards questions to an agent and
//! normalizes the agent's result into a fixed JSON envelope.
//!
//! # Overview
//!
//! - `POST /api/youtube` answers questions about YouTube videos
//! - `POST /api/chat` answers general questions from the knowledge base
//! - `GET /api/health` re-checks the required environment variables
//!
//! # Architecture
//!
//! - `config` - Required environment, tunable settings, prompt templates
//! - `api` - Router, handlers and the response envelope
//! - `agent` - The `Agent` trait and the production `KnowledgeAgent`
//! - `llm` - Gemini chat completions over the OpenAI-compatible API
//! - `embedding` - Query embeddings
//! - `vector_store` - Pinecone (and in-memory) retrieval
//! - `rag` - Retrieval context building
//! - `youtube` - YouTube Data API client
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubeask::agent::KnowledgeAgent;
//! use tubeask::api::{self, AppState};
//! use tubeask::config::{Config, ProcessEnv, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let settings = Settings::load()?;
//!     let agent = KnowledgeAgent::from_config(&config, &settings)?;
//!
//!     let state = AppState::new(config, Arc::new(agent), Arc::new(ProcessEnv));
//!     let listener = api::bind("localhost:8000").await?;
//!     api::serve(listener, state).await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod vector_store;
pub mod youtube;

pub use error::{Result, TubeaskError};
