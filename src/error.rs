//! Error types for tubeask.

use thiserror::Error;

/// Library-level error type for tubeask operations.
#[derive(Error, Debug)]
pub enum TubeaskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YouTube API error: {0}")]
    Youtube(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for tubeask operations.
pub type Result<T> = std::result::Result<T, TubeaskError>;
