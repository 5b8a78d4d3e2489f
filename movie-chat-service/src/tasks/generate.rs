use async_trait::async_trait;
use chat_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::context_keys;
use super::fallback::{ADVISORY_REPLY, fallback_reply};
use crate::completion::{CompletionBackend, CompletionError, CompletionRequest, MAX_OUTPUT_TOKENS};
use crate::models::{ChatTurn, MovieMetadata, ReplyOrigin, Role};
use crate::personas::{self, DEFAULT_PERSONA, PersonaConfig};

const GENERAL_GUIDANCE: &str = "If this is about movies or TV shows, recommend titles that fit, share useful information, or offer some fun trivia.";

/// Content of the new user turn: the raw message, plus a block describing
/// the resolved title when enrichment succeeded.
pub fn compose_user_turn(message: &str, metadata: Option<&MovieMetadata>) -> String {
    match metadata {
        Some(m) => format!(
            r#"{message}

Movie information:
- Title: {title}
- Year: {year}
- Rating: {rating}
- Genre: {genre}
- Director: {director}
- Cast: {cast}
- Plot: {plot}

Respond enthusiastically about "{title}" using the information above."#,
            title = m.title,
            year = m.year,
            rating = m.rating,
            genre = m.genre,
            director = m.director,
            cast = m.cast,
            plot = m.plot,
        ),
        None => format!("{message}\n\n{GENERAL_GUIDANCE}"),
    }
}

/// Keep only user/assistant turns with non-blank content, in order
pub fn retain_conversational_turns(turns: &[ChatTurn]) -> Vec<ChatTurn> {
    turns
        .iter()
        .filter(|turn| matches!(turn.role, Role::User | Role::Assistant))
        .filter(|turn| !turn.content.trim().is_empty())
        .cloned()
        .collect()
}

/// Assemble the outbound conversation: persona prompt, prior turns, new user turn
pub fn build_turns(
    persona: &PersonaConfig,
    prior_turns: &[ChatTurn],
    message: &str,
    metadata: Option<&MovieMetadata>,
) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(prior_turns.len() + 2);
    turns.push(ChatTurn::system(persona.system_prompt));
    turns.extend(retain_conversational_turns(prior_turns));
    turns.push(ChatTurn::user(compose_user_turn(message, metadata)));
    turns
}

/// Task that produces the reply, from the completion API when possible and
/// from local templates otherwise
pub struct GenerateReplyTask {
    backend: Option<Arc<dyn CompletionBackend>>,
}

impl GenerateReplyTask {
    /// `None` means no completion credential is configured
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Task for GenerateReplyTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let message: String = context
            .get(context_keys::USER_MESSAGE)
            .await
            .ok_or_else(|| GraphError::ContextError("user_message not found".to_string()))?;
        let prior_turns: Vec<ChatTurn> = context
            .get(context_keys::PRIOR_TURNS)
            .await
            .unwrap_or_default();
        let persona_key: String = context
            .get(context_keys::PERSONA)
            .await
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());
        let model_override: Option<String> = context.get(context_keys::MODEL_OVERRIDE).await;
        let metadata: Option<MovieMetadata> = context.get(context_keys::METADATA).await;

        let (reply, origin) = match &self.backend {
            None => {
                warn!(task_id = %self.id(), "OPENROUTER_API_KEY not set, returning advisory reply");
                (ADVISORY_REPLY.to_string(), ReplyOrigin::Unconfigured)
            }
            Some(backend) => {
                let persona = personas::resolve(Some(&persona_key), DEFAULT_PERSONA);
                let model = model_override
                    .filter(|model| !model.trim().is_empty())
                    .unwrap_or_else(|| persona.model.to_string());

                let request = CompletionRequest {
                    model,
                    turns: build_turns(persona, &prior_turns, &message, metadata.as_ref()),
                    temperature: persona.temperature,
                    max_tokens: MAX_OUTPUT_TOKENS,
                };

                let outcome = backend.complete(request).await.and_then(|text| {
                    let text = text.trim();
                    if text.is_empty() {
                        Err(CompletionError::EmptyReply)
                    } else {
                        Ok(text.to_string())
                    }
                });

                match outcome {
                    Ok(text) => {
                        info!(
                            task_id = %self.id(),
                            persona = %persona.key,
                            "reply generated by model"
                        );
                        (text, ReplyOrigin::Model)
                    }
                    Err(e) => {
                        warn!(
                            task_id = %self.id(),
                            error = %e,
                            "completion failed, using fallback reply"
                        );
                        (fallback_reply(&message, metadata.as_ref()), ReplyOrigin::Fallback)
                    }
                }
            }
        };

        context.set(context_keys::REPLY, reply).await?;
        context.set(context_keys::ORIGIN, origin).await?;

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
