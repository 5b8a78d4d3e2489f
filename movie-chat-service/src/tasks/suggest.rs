use async_trait::async_trait;
use chat_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::keywords::{Category, detect_category};
use crate::models::{MovieMetadata, UNKNOWN};

pub const MAX_SUGGESTIONS: usize = 4;

pub const HORROR_SUGGESTIONS: &[&str] = &[
    "Recommend classic horror movies",
    "What are the scariest movies ever made?",
    "Suggest a horror comedy",
];

pub const COMEDY_SUGGESTIONS: &[&str] = &[
    "Suggest a feel-good comedy",
    "What are the funniest movies of all time?",
    "Recommend a romantic comedy",
];

pub const ACTION_SUGGESTIONS: &[&str] = &[
    "Recommend action movies with great fight scenes",
    "What are the best action franchises?",
    "Suggest an action thriller",
];

pub const GENERAL_SUGGESTIONS: &[&str] = &[
    "Recommend a movie for tonight",
    "What are the top rated movies of all time?",
    "Suggest a funny movie",
    "Tell me about Inception",
];

fn metadata_suggestions(metadata: &MovieMetadata) -> Vec<String> {
    let director = if metadata.director == UNKNOWN {
        format!("Who directed {}?", metadata.title)
    } else {
        format!("Other movies directed by {}", metadata.director)
    };
    let genre = if metadata.genre == UNKNOWN {
        format!("Movies similar to {}", metadata.title)
    } else {
        format!(
            "Recommend {} movies like {}",
            metadata.primary_genre().to_lowercase(),
            metadata.title
        )
    };

    vec![
        format!("Tell me more about {}", metadata.title),
        director,
        genre,
        format!("Fun trivia about {}", metadata.title),
    ]
}

/// Follow-up prompts for the chat client. Pure and infallible; never more
/// than [`MAX_SUGGESTIONS`] entries.
pub fn suggest_follow_ups(message: &str, metadata: Option<&MovieMetadata>) -> Vec<String> {
    let mut suggestions = match metadata {
        Some(metadata) => metadata_suggestions(metadata),
        None => {
            let list = match detect_category(message) {
                Some(Category::Horror) => HORROR_SUGGESTIONS,
                Some(Category::Comedy) => COMEDY_SUGGESTIONS,
                Some(Category::Action) => ACTION_SUGGESTIONS,
                None => GENERAL_SUGGESTIONS,
            };
            list.iter().map(|s| s.to_string()).collect()
        }
    };
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Final task: derive follow-up suggestions and hand back the reply
pub struct SuggestFollowUpsTask;

#[async_trait]
impl Task for SuggestFollowUpsTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let message: String = context
            .get(context_keys::USER_MESSAGE)
            .await
            .ok_or_else(|| GraphError::ContextError("user_message not found".to_string()))?;
        let reply: String = context
            .get(context_keys::REPLY)
            .await
            .ok_or_else(|| GraphError::ContextError("reply not found".to_string()))?;
        let metadata: Option<MovieMetadata> = context.get(context_keys::METADATA).await;

        let suggestions = suggest_follow_ups(&message, metadata.as_ref());
        info!(task_id = %self.id(), count = suggestions.len(), "suggestions generated");
        context.set(context_keys::SUGGESTIONS, suggestions).await?;

        Ok(TaskResult::new(Some(reply), NextAction::End))
    }
}
