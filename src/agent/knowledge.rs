//! Production agent backed by YouTube search, Pinecone retrieval and Gemini.

use super::{Agent, AgentResult, ContextTag};
use crate::config::{Config, Prompts, Settings, YoutubeSettings};
use crate::embedding::GeminiEmbedder;
use crate::error::{Result, TubeaskError};
use crate::llm::{self, ChatModel, LanguageModel};
use crate::rag::{format_context_for_prompt, source_list, ContextBuilder};
use crate::vector_store::PineconeStore;
use crate::youtube::{extract_video_ids, VideoSearch, VideoSummary, YoutubeClient};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

const NO_VIDEOS_RESPONSE: &str = "I couldn't find any YouTube videos matching your question.";

/// Agent answering general questions from the knowledge base and YouTube
/// questions from the YouTube Data API.
pub struct KnowledgeAgent {
    model: Arc<dyn LanguageModel>,
    context_builder: ContextBuilder,
    videos: Arc<dyn VideoSearch>,
    youtube: YoutubeSettings,
    prompts: Prompts,
}

impl KnowledgeAgent {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        context_builder: ContextBuilder,
        videos: Arc<dyn VideoSearch>,
    ) -> Self {
        Self {
            model,
            context_builder,
            videos,
            youtube: YoutubeSettings::default(),
            prompts: Prompts::default(),
        }
    }

    /// Set YouTube search settings.
    pub fn with_youtube_settings(mut self, settings: YoutubeSettings) -> Self {
        self.youtube = settings;
        self
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Wire up Gemini, Pinecone and YouTube clients from configuration.
    pub fn from_config(config: &Config, settings: &Settings) -> Result<Self> {
        let client = llm::create_client(config, &settings.llm)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.llm.timeout_seconds))
            .build()?;

        let model = ChatModel::new(client.clone(), &settings.llm.model)
            .with_temperature(settings.llm.temperature);
        let embedder = GeminiEmbedder::new(
            client,
            &settings.llm.embedding_model,
            settings.llm.embedding_dimensions as usize,
        );
        let store = PineconeStore::new(http.clone(), config)
            .with_namespace(settings.retrieval.namespace.clone());
        let context_builder = ContextBuilder::new(Arc::new(store), Arc::new(embedder))
            .with_max_chunks(settings.retrieval.top_k)
            .with_min_score(settings.retrieval.min_score);
        let videos = YoutubeClient::new(http, &config.youtube_api_key);
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        Ok(Self::new(Arc::new(model), context_builder, Arc::new(videos))
            .with_youtube_settings(settings.youtube.clone())
            .with_prompts(prompts))
    }

    async fn answer_general(&self, question: &str) -> Result<AgentResult> {
        let matches = self.context_builder.build(question).await?;

        let mut vars = HashMap::new();
        vars.insert("question", question.to_string());
        vars.insert("context", format_context_for_prompt(&matches));
        let user = Prompts::render(&self.prompts.general.user, &vars);

        let response = self.model.complete(&self.prompts.general.system, &user).await?;
        Ok(AgentResult::answered(response).with_data(source_list(&matches)))
    }

    async fn answer_youtube(&self, question: &str) -> Result<AgentResult> {
        let videos = self.find_videos(question).await?;
        if videos.is_empty() {
            info!("No YouTube videos found for question");
            return Ok(AgentResult::answered(NO_VIDEOS_RESPONSE).with_youtube_data(json!([])));
        }

        let context = videos
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_prompt_entry(i + 1))
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("question", question.to_string());
        vars.insert("context", context);
        let user = Prompts::render(&self.prompts.youtube.user, &vars);

        let response = self.model.complete(&self.prompts.youtube.system, &user).await?;
        Ok(AgentResult::answered(response).with_youtube_data(serde_json::to_value(&videos)?))
    }

    /// Videos linked in the question, or search results when none are linked.
    async fn find_videos(&self, question: &str) -> Result<Vec<VideoSummary>> {
        let ids = extract_video_ids(question);
        if ids.is_empty() {
            self.videos
                .search(question, self.youtube.max_results, self.youtube.region_code.as_deref())
                .await
        } else {
            info!("Looking up {} linked video(s)", ids.len());
            self.videos.videos(&ids).await
        }
    }
}

#[async_trait]
impl Agent for KnowledgeAgent {
    #[instrument(skip(self, question, context), fields(context = %context))]
    async fn run(&self, question: &str, context: ContextTag) -> Result<AgentResult> {
        let outcome = match context {
            ContextTag::General => self.answer_general(question).await,
            ContextTag::Youtube => self.answer_youtube(question).await,
        };

        match outcome {
            Err(
                e @ (TubeaskError::Youtube(_)
                | TubeaskError::VectorStore(_)
                | TubeaskError::Embedding(_)
                | TubeaskError::Llm(_)
                | TubeaskError::Http(_)),
            ) => {
                warn!("Upstream service failed: {}", e);
                Ok(AgentResult::failed(e.to_string()))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::vector_store::MemoryVectorStore;
    use std::sync::Mutex;

    struct EchoModel {
        prompts: Mutex<Vec<String>>,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(user.to_string());
            Ok("model answer".to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(TubeaskError::Llm("rate limited".to_string()))
        }
    }

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct FakeVideos {
        results: Vec<VideoSummary>,
        fail_with: Option<String>,
        looked_up: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VideoSearch for FakeVideos {
        async fn search(&self, _query: &str, max_results: u32, _region: Option<&str>) -> Result<Vec<VideoSummary>> {
            if let Some(msg) = &self.fail_with {
                return Err(TubeaskError::Youtube(msg.clone()));
            }
            Ok(self.results.iter().take(max_results as usize).cloned().collect())
        }

        async fn videos(&self, ids: &[String]) -> Result<Vec<VideoSummary>> {
            self.looked_up.lock().unwrap().extend(ids.iter().cloned());
            Ok(self.results.clone())
        }
    }

    fn video(id: &str, title: &str) -> VideoSummary {
        VideoSummary {
            video_id: id.to_string(),
            title: title.to_string(),
            channel_title: "Channel".to_string(),
            description: String::new(),
            published_at: None,
            thumbnail_url: None,
            url: format!("https://www.youtube.com/watch?v={}", id),
            view_count: None,
            like_count: None,
        }
    }

    fn context_builder() -> ContextBuilder {
        let store = Arc::new(MemoryVectorStore::new());
        store.upsert(
            "doc-1",
            vec![1.0, 0.0],
            json!({"text": "Rust has no garbage collector", "title": "Rust FAQ"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        ContextBuilder::new(store, Arc::new(UnitEmbedder))
    }

    #[tokio::test]
    async fn test_general_question_uses_retrieved_context() {
        let model = Arc::new(EchoModel::new());
        let agent = KnowledgeAgent::new(model.clone(), context_builder(), Arc::new(FakeVideos::default()));

        let result = agent.run("Does Rust have a GC?", ContextTag::General).await.unwrap();
        assert_eq!(result.response_text().as_deref(), Some("model answer"));
        assert_eq!(result.payload().unwrap()["sources"][0]["id"], "doc-1");

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("Does Rust have a GC?"));
        assert!(prompts[0].contains("[1] Rust FAQ\nRust has no garbage collector"));
    }

    #[tokio::test]
    async fn test_youtube_question_returns_videos() {
        let videos = FakeVideos {
            results: vec![video("aaaaaaaaaaa", "First"), video("bbbbbbbbbbb", "Second")],
            ..Default::default()
        };
        let agent = KnowledgeAgent::new(Arc::new(EchoModel::new()), context_builder(), Arc::new(videos))
            .with_youtube_settings(YoutubeSettings {
                max_results: 1,
                region_code: None,
            });

        let result = agent.run("top rust video", ContextTag::Youtube).await.unwrap();
        assert!(result.error_message().is_none());
        let data = result.payload().unwrap();
        assert_eq!(data.as_array().unwrap().len(), 1);
        assert_eq!(data[0]["title"], "First");
    }

    #[tokio::test]
    async fn test_linked_video_is_looked_up() {
        let videos = Arc::new(FakeVideos {
            results: vec![video("dQw4w9WgXcQ", "Linked")],
            ..Default::default()
        });
        let agent = KnowledgeAgent::new(Arc::new(EchoModel::new()), context_builder(), videos.clone());

        agent
            .run("Summarize https://youtu.be/dQw4w9WgXcQ", ContextTag::Youtube)
            .await
            .unwrap();
        assert_eq!(*videos.looked_up.lock().unwrap(), vec!["dQw4w9WgXcQ".to_string()]);
    }

    #[tokio::test]
    async fn test_no_videos_found() {
        let agent = KnowledgeAgent::new(Arc::new(FailingModel), context_builder(), Arc::new(FakeVideos::default()));

        let result = agent.run("nothing matches", ContextTag::Youtube).await.unwrap();
        assert_eq!(result.response_text().as_deref(), Some(NO_VIDEOS_RESPONSE));
        assert_eq!(result.payload(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_upstream_failures_become_error_results() {
        let videos = FakeVideos {
            fail_with: Some("quota exceeded".to_string()),
            ..Default::default()
        };
        let agent = KnowledgeAgent::new(Arc::new(EchoModel::new()), context_builder(), Arc::new(videos));
        let result = agent.run("top video", ContextTag::Youtube).await.unwrap();
        assert_eq!(result.error_message(), Some("YouTube API error: quota exceeded"));

        let agent = KnowledgeAgent::new(Arc::new(FailingModel), context_builder(), Arc::new(FakeVideos::default()));
        let result = agent.run("anything", ContextTag::General).await.unwrap();
        assert_eq!(result.error_message(), Some("LLM error: rate limited"));
    }
}
