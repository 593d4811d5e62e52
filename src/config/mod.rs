//! Configuration module for tubeask.
//!
//! Handles required environment variables, tunable settings and prompt templates.

mod env;
mod prompts;
mod settings;

pub use env::{
    first_missing, load_dotenv, mask_secret, verify_env, Config, EnvSource, ProcessEnv,
    GEMINI_API_KEY, PINECONE_API_KEY, PINECONE_CLOUD, PINECONE_INDEX, PINECONE_REGION,
    REQUIRED_VARS, YOUTUBE_API_KEY,
};
pub use prompts::{GeneralPrompts, Prompts, YoutubePrompts};
pub use settings::{
    LlmSettings, PromptSettings, RetrievalSettings, ServerSettings, Settings, YoutubeSettings,
};
