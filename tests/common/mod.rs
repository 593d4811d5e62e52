#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tubeask::agent::{Agent, AgentResult, ContextTag};
use tubeask::api::{router, AppState};
use tubeask::config::{Config, REQUIRED_VARS};
use tubeask::{Result, TubeaskError};

/// What the scripted agent does when called.
#[derive(Clone)]
pub enum Script {
    Return(Value),
    Fail(String),
    Panic(String),
}

/// Agent that replays a fixed outcome and records its calls.
pub struct ScriptedAgent {
    script: Script,
    pub calls: Mutex<Vec<(String, ContextTag)>>,
}

impl ScriptedAgent {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn run(&self, question: &str, context: ContextTag) -> Result<AgentResult> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), context));

        match &self.script {
            Script::Return(value) => Ok(serde_json::from_value(value.clone())?),
            Script::Fail(msg) => Err(TubeaskError::Agent(msg.clone())),
            Script::Panic(msg) => panic!("{}", msg),
        }
    }
}

pub fn full_env() -> HashMap<String, String> {
    REQUIRED_VARS
        .iter()
        .map(|name| (name.to_string(), format!("test-{}", name.to_lowercase())))
        .collect()
}

pub fn create_test_app_with_env(agent: Arc<ScriptedAgent>, env: HashMap<String, String>) -> Router {
    let config = Config::from_source(&full_env()).unwrap();
    router(AppState::new(config, agent, Arc::new(env)))
}

pub fn create_test_app(agent: Arc<ScriptedAgent>) -> Router {
    create_test_app_with_env(agent, full_env())
}
