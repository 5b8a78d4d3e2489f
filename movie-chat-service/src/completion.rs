use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::prelude::*;
use rig::providers::openrouter;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::models::{ChatTurn, Role};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Output budget for every completion call
pub const MAX_OUTPUT_TOKENS: u64 = 1000;

/// One chat-completion call: model, ordered turns (system first, newest user
/// turn last), sampling temperature and output budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub turns: Vec<ChatTurn>,
    pub temperature: f64,
    pub max_tokens: u64,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion provider error: {0}")]
    Provider(String),

    #[error("completion returned an empty reply")]
    EmptyReply,

    #[error("invalid conversation: {0}")]
    InvalidConversation(&'static str),
}

/// External chat-completion API
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Split an assembled conversation into the pieces a rig agent takes:
/// preamble, chat history and the final prompt.
pub fn split_turns(turns: &[ChatTurn]) -> Result<(String, Vec<Message>, String), CompletionError> {
    let (first, rest) = turns
        .split_first()
        .ok_or(CompletionError::InvalidConversation("no turns"))?;
    if first.role != Role::System {
        return Err(CompletionError::InvalidConversation(
            "first turn must be the system prompt",
        ));
    }

    let (last, history) = rest
        .split_last()
        .ok_or(CompletionError::InvalidConversation("no user turn"))?;
    if last.role != Role::User {
        return Err(CompletionError::InvalidConversation(
            "last turn must come from the user",
        ));
    }

    let history = history
        .iter()
        .map(|turn| match turn.role {
            Role::Assistant => Ok(Message::assistant(turn.content.clone())),
            Role::User => Ok(Message::user(turn.content.clone())),
            Role::System => Err(CompletionError::InvalidConversation(
                "system turn inside history",
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((first.content.clone(), history, last.content.clone()))
}

/// Completion backend on OpenRouter
pub struct OpenRouterBackend {
    client: openrouter::Client,
    timeout: Duration,
}

impl OpenRouterBackend {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Self {
        Self {
            client: openrouter::Client::builder(api_key)
                .base_url(base_url.trim_end_matches('/'))
                .build()
                .expect("OpenRouter client should build"),
            timeout,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let (preamble, history, prompt) = split_turns(&request.turns)?;

        info!(
            model = %request.model,
            history_len = history.len(),
            "calling completion API"
        );

        let agent = self
            .client
            .agent(&request.model)
            .preamble(&preamble)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build();

        let reply = tokio::time::timeout(self.timeout, agent.chat(&prompt, history))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout))?
            .map_err(|e| CompletionError::Provider(e.to_string()))?;

        Ok(reply)
    }
}
