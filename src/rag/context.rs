//! Context building for retrieval-backed answers.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{Match, VectorStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Builds context from vector search results.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    max_chunks: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            max_chunks: 5,
            min_score: 0.3,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Build context for a query.
    pub async fn build(&self, query: &str) -> Result<Vec<Match>> {
        let query_embedding = self.embedder.embed(query).await?;

        let matches = self
            .vector_store
            .query(&query_embedding, self.max_chunks, self.min_score)
            .await?;

        debug!("Retrieved {} context chunks", matches.len());
        Ok(matches)
    }
}

/// Format matches for inclusion in a prompt.
///
/// Matches without stored text are skipped.
pub fn format_context_for_prompt(matches: &[Match]) -> String {
    let rendered: Vec<String> = matches
        .iter()
        .filter_map(|m| m.text.as_deref().map(|text| (m, text)))
        .enumerate()
        .map(|(i, (m, text))| format!("---\n[{}] {}\n{}\n---", i + 1, m.label(), text))
        .collect();

    if rendered.is_empty() {
        "(No relevant excerpts found in the knowledge base.)".to_string()
    } else {
        rendered.join("\n\n")
    }
}

/// Sources payload describing the matches used for an answer.
pub fn source_list(matches: &[Match]) -> Value {
    let sources: Vec<Value> = matches
        .iter()
        .map(|m| {
            json!({
                "id": m.id,
                "title": m.title,
                "source": m.source,
                "score": m.score,
            })
        })
        .collect();
    json!({ "sources": sources })
}
