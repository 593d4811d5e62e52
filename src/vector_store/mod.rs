//! Vector store abstraction for tubeask.
//!
//! Provides a trait-based interface for the retrieval index. Production uses
//! Pinecone; the in-memory store backs tests and local experiments.

mod memory;
mod pinecone;

pub use memory::MemoryVectorStore;
pub use pinecone::{IndexDescription, PineconeStore};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scored match returned from the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Record ID in the index.
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Text content stored with the record.
    pub text: Option<String>,
    /// Where the text came from (URL or document name).
    pub source: Option<String>,
    /// Human-readable title.
    pub title: Option<String>,
}

impl Match {
    /// Build a match from a record's metadata.
    ///
    /// Text is read from `text` or `content`, the source from `source` or `url`.
    pub fn from_metadata(id: String, score: f32, metadata: &Map<String, Value>) -> Self {
        let string_field = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| metadata.get(*k).and_then(Value::as_str))
                .map(str::to_string)
        };

        Self {
            id,
            score,
            text: string_field(&["text", "content"]),
            source: string_field(&["source", "url"]),
            title: string_field(&["title"]),
        }
    }

    /// Label used when citing this match.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.source.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `top_k` matches scoring at least `min_score`, best first.
    async fn query(&self, vector: &[f32], top_k: usize, min_score: f32) -> Result<Vec<Match>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
