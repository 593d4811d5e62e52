//! Ask command - answer one question from the terminal.

use crate::agent::{ContextTag, KnowledgeAgent};
use crate::api::{self, ErrorEnvelope};
use crate::cli::Output;
use crate::config::{Config, Settings};
use crate::youtube::VideoSummary;
use anyhow::Result;

/// Run the ask command.
///
/// Goes through the same validation and normalization as the HTTP endpoints.
pub async fn run_ask(question: &str, context: ContextTag, json: bool, settings: Settings) -> Result<()> {
    let config = Config::from_env()?;
    let agent = KnowledgeAgent::from_config(&config, &settings)?;

    let spinner = Output::spinner(match context {
        ContextTag::Youtube => "Searching YouTube...",
        ContextTag::General => "Searching knowledge base...",
    });
    let outcome = api::answer(&agent, question, context).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(envelope) if json => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Ok(envelope) => {
            println!("\n{}\n", envelope.response.as_deref().unwrap_or("(no response)"));

            let videos: Vec<VideoSummary> = envelope
                .data
                .and_then(|data| serde_json::from_value(data).ok())
                .unwrap_or_default();
            if !videos.is_empty() {
                Output::header("Videos");
                for video in &videos {
                    Output::video(&video.title, &video.channel_title, &video.url);
                }
            }
            Ok(())
        }
        Err(err) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ErrorEnvelope::from(&err))?);
            } else {
                Output::error(&err.message());
            }
            Err(err.into())
        }
    }
}
