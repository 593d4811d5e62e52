//! Question validation and agent result normalization.
//!
//! Shared by the HTTP handlers and the `ask` command so both produce the same
//! envelope for the same agent result.

use super::error::ApiError;
use crate::agent::{Agent, AgentResult, ContextTag};
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

pub const QUESTION_REQUIRED: &str = "Question is required";

/// Successful response envelope.
///
/// `data` is only present for YouTube questions, where it may be `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResponse {
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub success: bool,
}

impl QuestionResponse {
    /// Normalize an agent result that carries no error.
    pub fn from_result(result: &AgentResult, context: ContextTag) -> Self {
        let data = match context {
            ContextTag::Youtube => Some(result.payload().unwrap_or(Value::Null)),
            ContextTag::General => None,
        };

        Self {
            response: result.response_text(),
            data,
            success: true,
        }
    }
}

/// Pull a usable question out of a parsed request body.
pub fn require_question(body: &Value) -> Result<&str, ApiError> {
    let fields = body
        .as_object()
        .ok_or_else(|| ApiError::Internal("request body must be a JSON object".to_string()))?;

    fields
        .get("question")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation(QUESTION_REQUIRED.to_string()))
}

/// Label used in log lines for each context.
pub fn label(context: ContextTag) -> &'static str {
    match context {
        ContextTag::Youtube => "YouTube",
        ContextTag::General => "chat",
    }
}

/// Run the agent for a question and normalize the outcome.
///
/// The empty check repeats [`require_question`] for callers like `ask` that skip it.
pub async fn answer(
    agent: &dyn Agent,
    question: &str,
    context: ContextTag,
) -> Result<QuestionResponse, ApiError> {
    let kind = label(context);
    if question.is_empty() {
        return Err(ApiError::Validation(QUESTION_REQUIRED.to_string()));
    }

    info!("Processing {} question: {}", kind, question);

    let result = match AssertUnwindSafe(agent.run(question, context)).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return Err(ApiError::Internal(e.to_string())),
        Err(panic) => return Err(ApiError::Internal(panic_message(panic.as_ref()))),
    };

    if let Some(message) = result.error_message() {
        error!("Error processing {} question: {}", kind, message);
        return Err(ApiError::Agent(message.to_string()));
    }

    Ok(QuestionResponse::from_result(&result, context))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "agent panicked".to_string()
    }
}
