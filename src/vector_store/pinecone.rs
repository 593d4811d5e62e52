//! Pinecone vector store over the REST API.

use super::{Match, VectorStore};
use crate::config::Config;
use crate::error::{Result, TubeaskError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};
use url::Url;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

/// Index metadata from the control plane.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: Option<u32>,
    pub metric: Option<String>,
    pub host: String,
    #[serde(default)]
    pub spec: IndexSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexSpec {
    pub serverless: Option<ServerlessSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerlessSpec {
    pub cloud: String,
    pub region: String,
}

impl IndexDescription {
    /// Cloud and region of a serverless index.
    pub fn placement(&self) -> Option<(&str, &str)> {
        self.spec
            .serverless
            .as_ref()
            .map(|s| (s.cloud.as_str(), s.region.as_str()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

/// Pinecone-backed vector store.
///
/// The data-plane host is resolved from the control plane on first use.
pub struct PineconeStore {
    http: reqwest::Client,
    api_key: String,
    index: String,
    namespace: Option<String>,
    control_plane_url: String,
    host: OnceCell<Url>,
}

impl PineconeStore {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_key: config.pinecone_api_key.clone(),
            index: config.pinecone_index.clone(),
            namespace: None,
            control_plane_url: CONTROL_PLANE_URL.to_string(),
            host: OnceCell::new(),
        }
    }

    /// Query a specific namespace instead of the default one.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|n| !n.is_empty());
        self
    }

    /// Override the control plane URL.
    pub fn with_control_plane_url(mut self, url: &str) -> Self {
        self.control_plane_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch the index description from the control plane.
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn describe(&self) -> Result<IndexDescription> {
        let url = format!("{}/indexes/{}", self.control_plane_url, self.index);
        let response = self
            .http
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TubeaskError::VectorStore(format!(
                "Describe index '{}' failed ({}): {}",
                self.index,
                status,
                error_message(&body)
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn host(&self) -> Result<&Url> {
        self.host
            .get_or_try_init(|| async {
                let description = self.describe().await?;
                info!("Resolved Pinecone index '{}' at {}", description.name, description.host);
                data_plane_url(&description.host)
            })
            .await
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    #[instrument(skip(self, vector), fields(index = %self.index))]
    async fn query(&self, vector: &[f32], top_k: usize, min_score: f32) -> Result<Vec<Match>> {
        let url = self
            .host()
            .await?
            .join("query")
            .map_err(|e| TubeaskError::VectorStore(format!("Invalid query URL: {}", e)))?;

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .http
            .post(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TubeaskError::VectorStore(format!(
                "Query failed ({}): {}",
                status,
                error_message(&body)
            )));
        }

        let matches = parse_matches(&body, min_score)?;
        debug!("Pinecone returned {} matches above {}", matches.len(), min_score);
        Ok(matches)
    }
}

/// Turn a host from the control plane into a base URL.
fn data_plane_url(host: &str) -> Result<Url> {
    let base = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let base = format!("{}/", base.trim_end_matches('/'));

    Url::parse(&base).map_err(|e| TubeaskError::VectorStore(format!("Invalid index host '{}': {}", host, e)))
}

fn parse_matches(body: &str, min_score: f32) -> Result<Vec<Match>> {
    let response: QueryResponse = serde_json::from_str(body)?;
    let empty = Map::new();

    Ok(response
        .matches
        .into_iter()
        .filter(|m| m.score >= min_score)
        .map(|m| {
            let metadata = m.metadata.as_ref().unwrap_or(&empty);
            Match::from_metadata(m.id, m.score, metadata)
        })
        .collect())
}

/// Pull a readable message out of a Pinecone error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
