//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, Match, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;

struct Record {
    values: Vec<f32>,
    metadata: Map<String, Value>,
}

/// In-memory vector store.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a record.
    pub fn upsert(&self, id: &str, values: Vec<f32>, metadata: Map<String, Value>) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(id.to_string(), Record { values, metadata });
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn query(&self, vector: &[f32], top_k: usize, min_score: f32) -> Result<Vec<Match>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());

        let mut results: Vec<Match> = records
            .iter()
            .map(|(id, record)| {
                let score = cosine_similarity(vector, &record.values);
                Match::from_metadata(id.clone(), score, &record.metadata)
            })
            .filter(|m| m.score >= min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        Ok(results)
    }
}
