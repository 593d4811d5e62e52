//! Required environment configuration.
//!
//! Secrets and index placement come from the process environment (optionally
//! seeded from a `.env` file). They are read once at startup into an immutable
//! [`Config`]; the health check re-reads them through the same [`EnvSource`].

use crate::error::{Result, TubeaskError};
use std::collections::HashMap;
use std::path::Path;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const PINECONE_INDEX: &str = "PINECONE_INDEX";
pub const PINECONE_CLOUD: &str = "PINECONE_CLOUD";
pub const PINECONE_REGION: &str = "PINECONE_REGION";

/// Every variable that must be set, in the order they are checked.
pub const REQUIRED_VARS: [&str; 6] = [
    GEMINI_API_KEY,
    PINECONE_API_KEY,
    YOUTUBE_API_KEY,
    PINECONE_INDEX,
    PINECONE_CLOUD,
    PINECONE_REGION,
];

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Look up a variable. Unset and non-unicode values are both `None`.
    fn var(&self, key: &str) -> Option<String>;

    /// Look up a variable, treating an empty value as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Load a `.env` file into the process environment if one exists.
///
/// Variables already set in the environment are not overridden.
pub fn load_dotenv(path: Option<&Path>) {
    let outcome = match path {
        Some(p) => dotenv::from_path(p).map(|_| p.to_path_buf()),
        None => dotenv::dotenv(),
    };

    match outcome {
        Ok(loaded) => tracing::info!("Loaded environment from: {}", loaded.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found, using process environment"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }
}

/// Return the first required variable that is unset or empty.
pub fn first_missing(env: &dyn EnvSource) -> Option<&'static str> {
    REQUIRED_VARS
        .iter()
        .copied()
        .find(|name| env.non_empty(name).is_none())
}

/// Re-verify that every required variable is present.
///
/// Used by the health check; the message names the first missing variable.
pub fn verify_env(env: &dyn EnvSource) -> Result<()> {
    match first_missing(env) {
        Some(name) => Err(TubeaskError::Config(format!("Missing {}", name))),
        None => Ok(()),
    }
}

/// Immutable process configuration built once at startup.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub pinecone_api_key: String,
    pub youtube_api_key: String,
    pub pinecone_index: String,
    pub pinecone_cloud: String,
    pub pinecone_region: String,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Build the configuration from any environment source.
    ///
    /// Fails on the first unset or empty required variable.
    pub fn from_source(env: &dyn EnvSource) -> Result<Self> {
        let get = |name: &str| {
            env.non_empty(name).ok_or_else(|| {
                tracing::error!("Missing required environment variable: {}", name);
                TubeaskError::Config(format!("Missing required environment variable: {}", name))
            })
        };

        Ok(Self {
            gemini_api_key: get(GEMINI_API_KEY)?,
            pinecone_api_key: get(PINECONE_API_KEY)?,
            youtube_api_key: get(YOUTUBE_API_KEY)?,
            pinecone_index: get(PINECONE_INDEX)?,
            pinecone_cloud: get(PINECONE_CLOUD)?,
            pinecone_region: get(PINECONE_REGION)?,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &mask_secret(&self.gemini_api_key))
            .field("pinecone_api_key", &mask_secret(&self.pinecone_api_key))
            .field("youtube_api_key", &mask_secret(&self.youtube_api_key))
            .field("pinecone_index", &self.pinecone_index)
            .field("pinecone_cloud", &self.pinecone_cloud)
            .field("pinecone_region", &self.pinecone_region)
            .finish()
    }
}

/// Mask a secret for display, keeping a short prefix and suffix.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
