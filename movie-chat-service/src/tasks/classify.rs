use async_trait::async_trait;
use chat_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

use super::context_keys;
use crate::keywords::is_catalog_query;

static STRIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:tell me about|what about|the movie|the film|movies?|films?|shows?|suggest|recommend|best|top|rated)\b",
    )
    .expect("Invalid regex")
});

const EDGE_PUNCTUATION: &[char] = &['?', '!', '.', ',', ':', ';', '"', '\''];

/// Decide whether `text` is a catalog query and extract the search phrase.
///
/// Returns `None` when no trigger keyword is present or nothing is left once
/// keywords and filler phrases are stripped. The heuristic over-triggers on
/// sentences like "the show must go on" and misses bare titles.
pub fn classify_query(text: &str) -> Option<String> {
    if !is_catalog_query(text) {
        return None;
    }

    let stripped = STRIP_PATTERN.replace_all(text, " ");
    let phrase = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(EDGE_PUNCTUATION)
        .trim()
        .to_string();

    (!phrase.is_empty()).then_some(phrase)
}

/// Task that inspects the user message and records a search phrase when the
/// message looks like a movie or show query
pub struct ClassifyQueryTask;

#[async_trait]
impl Task for ClassifyQueryTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let message: String = context
            .get(context_keys::USER_MESSAGE)
            .await
            .ok_or_else(|| GraphError::ContextError("user_message not found".to_string()))?;

        match classify_query(&message) {
            Some(phrase) => {
                info!(task_id = %self.id(), phrase = %phrase, "catalog lookup needed");
                context.set(context_keys::SEARCH_PHRASE, phrase).await?;
            }
            None => info!(task_id = %self.id(), "no catalog lookup needed"),
        }

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
