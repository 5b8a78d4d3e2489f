use async_trait::async_trait;
use chat_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::sync::Arc;
use tracing::info;

use super::context_keys;
use crate::catalog::{MovieCatalog, lookup_movie};

/// Task that resolves the search phrase to a movie record. Never fails on
/// catalog trouble; the metadata key is simply left unset.
pub struct EnrichMetadataTask {
    catalog: Option<Arc<dyn MovieCatalog>>,
}

impl EnrichMetadataTask {
    /// `None` disables enrichment, as when no catalog credential is configured
    pub fn new(catalog: Option<Arc<dyn MovieCatalog>>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Task for EnrichMetadataTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let phrase: String = context
            .get(context_keys::SEARCH_PHRASE)
            .await
            .ok_or_else(|| GraphError::ContextError("search_phrase not found".to_string()))?;

        let Some(catalog) = &self.catalog else {
            info!(task_id = %self.id(), "catalog disabled, skipping enrichment");
            return Ok(TaskResult::new(None, NextAction::Continue));
        };

        if let Some(metadata) = lookup_movie(catalog.as_ref(), &phrase).await {
            context.set(context_keys::METADATA, metadata).await?;
        }

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
