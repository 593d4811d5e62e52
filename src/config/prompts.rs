//! Prompt templates for tubeask.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompts for questions answered from the vector index.
    pub general: GeneralPrompts,
    /// Prompts for questions answered from YouTube search results.
    pub youtube: YoutubePrompts,
}

/// Prompts for general (retrieval-backed) questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralPrompts {
    pub system: String,
    pub user: String,
}

impl Default for GeneralPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful assistant. Answer the user's question clearly and concisely.

Guidelines:
- Prefer the provided knowledge base excerpts when they are relevant
- Cite excerpts as [n] using their numbers when you rely on them
- If the excerpts do not cover the question, answer from general knowledge and say so
- Never invent sources"#
                .to_string(),

            user: r#"Question: {{question}}

Knowledge base excerpts:
{{context}}

Answer the question."#
                .to_string(),
        }
    }
}

/// Prompts for YouTube questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubePrompts {
    pub system: String,
    pub user: String,
}

impl Default for YoutubePrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a YouTube research assistant. You are given metadata for videos returned by the YouTube Data API.

Guidelines:
- Answer using only the video metadata provided
- Refer to videos by title and channel, and include their links
- Mention view counts or publish dates when they help answer the question
- If the videos do not answer the question, say so clearly"#
                .to_string(),

            user: r#"Question: {{question}}

Videos:
{{context}}

Answer the question based on the videos above."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, overriding defaults from an optional custom directory.
    ///
    /// The directory may contain `general.toml` and/or `youtube.toml`.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let general_path = custom_path.join("general.toml");
            if general_path.exists() {
                let content = std::fs::read_to_string(&general_path)?;
                prompts.general = toml::from_str(&content)?;
            }

            let youtube_path = custom_path.join("youtube.toml");
            if youtube_path.exists() {
                let content = std::fs::read_to_string(&youtube_path)?;
                prompts.youtube = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}
