//! Question-answering agents.
//!
//! The HTTP adapter only sees the [`Agent`] trait. [`KnowledgeAgent`] is the
//! production implementation: YouTube questions are answered from YouTube Data
//! API results, general questions from the Pinecone knowledge base, both
//! written up by Gemini.

mod knowledge;
mod result;

pub use knowledge::KnowledgeAgent;
pub use result::{is_truthy, AgentResult};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which kind of question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextTag {
    General,
    Youtube,
}

impl ContextTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTag::General => "general",
            ContextTag::Youtube => "youtube",
        }
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContextTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" | "chat" => Ok(ContextTag::General),
            "youtube" => Ok(ContextTag::Youtube),
            _ => Err(format!("Unknown context: {}", s)),
        }
    }
}

/// Answers a question in a given context.
///
/// A returned [`AgentResult`] with `error` set is an expected failure whose
/// message is shown to the caller; `Err` is an unexpected one.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, question: &str, context: ContextTag) -> Result<AgentResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_tag_round_trip() {
        assert_eq!("youtube".parse::<ContextTag>(), Ok(ContextTag::Youtube));
        assert_eq!("General".parse::<ContextTag>(), Ok(ContextTag::General));
        assert!("music".parse::<ContextTag>().is_err());
        assert_eq!(ContextTag::Youtube.to_string(), "youtube");
        assert_eq!(serde_json::to_string(&ContextTag::General).unwrap(), "\"general\"");
    }
}
