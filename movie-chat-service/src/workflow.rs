use anyhow::Context as _;
use chat_flow::{Context, Graph, GraphBuilder, GraphError, Task};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{MovieCatalog, TmdbCatalog};
use crate::completion::{CompletionBackend, OpenRouterBackend};
use crate::config::ServiceConfig;
use crate::models::{ChatTurn, MovieMetadata, ReplyOrigin};
use crate::personas::PersonaConfig;
use crate::tasks::generate::retain_conversational_turns;
use crate::tasks::*;

pub const CHAT_GRAPH_ID: &str = "movie_chat_flow";

/// External collaborators of the pipeline. A missing collaborator is not an
/// error: enrichment then never matches and replies use the advisory text.
#[derive(Clone, Default)]
pub struct ChatDependencies {
    pub catalog: Option<Arc<dyn MovieCatalog>>,
    pub completion: Option<Arc<dyn CompletionBackend>>,
}

impl ChatDependencies {
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let catalog = match &config.tmdb_api_key {
            Some(api_key) => {
                let catalog =
                    TmdbCatalog::new(api_key, &config.tmdb_base_url, config.catalog_timeout)
                        .context("failed to build catalog client")?;
                info!(base_url = %config.tmdb_base_url, "movie catalog enabled");
                Some(Arc::new(catalog) as Arc<dyn MovieCatalog>)
            }
            None => {
                warn!("TMDB_API_KEY not set, movie enrichment disabled");
                None
            }
        };

        let completion = match &config.openrouter_api_key {
            Some(api_key) => Some(Arc::new(OpenRouterBackend::new(
                api_key,
                &config.openrouter_base_url,
                config.completion_timeout,
            )) as Arc<dyn CompletionBackend>),
            None => {
                warn!("OPENROUTER_API_KEY not set, replies will use the advisory text");
                None
            }
        };

        Ok(Self {
            catalog,
            completion,
        })
    }
}

/// classify → (enrich when a search phrase was found) → generate → suggest
pub fn build_chat_workflow(deps: &ChatDependencies) -> Graph {
    let classify_task = Arc::new(ClassifyQueryTask);
    let enrich_task = Arc::new(EnrichMetadataTask::new(deps.catalog.clone()));
    let generate_task = Arc::new(GenerateReplyTask::new(deps.completion.clone()));
    let suggest_task = Arc::new(SuggestFollowUpsTask);

    let classify_id = classify_task.id().to_string();
    let enrich_id = enrich_task.id().to_string();
    let generate_id = generate_task.id().to_string();
    let suggest_id = suggest_task.id().to_string();

    GraphBuilder::new(CHAT_GRAPH_ID)
        .add_task(classify_task)
        .add_task(enrich_task)
        .add_task(generate_task)
        .add_task(suggest_task)
        .add_conditional_edge(
            classify_id,
            |ctx| ctx.contains_key(context_keys::SEARCH_PHRASE),
            enrich_id.clone(),
            generate_id.clone(),
        )
        .add_edge(enrich_id, generate_id.clone())
        .add_edge(generate_id, suggest_id)
        .build()
}

/// Parse client-supplied prior turns, silently dropping entries that are not
/// well-formed user/assistant turns
pub fn parse_prior_turns(raw: Option<&Value>) -> Vec<ChatTurn> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };
    let parsed: Vec<ChatTurn> = entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect();
    retain_conversational_turns(&parsed)
}

/// One validated chat turn submitted by a client
#[derive(Debug, Clone)]
pub struct ChatTurnInput {
    pub message: String,
    pub prior_turns: Vec<ChatTurn>,
    pub persona: &'static PersonaConfig,
    pub model_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub metadata: Option<MovieMetadata>,
    pub suggestions: Vec<String>,
    pub origin: ReplyOrigin,
}

/// Run the pipeline once with a fresh context
pub async fn run_chat_turn(graph: &Graph, input: ChatTurnInput) -> chat_flow::Result<ChatOutcome> {
    let context = Context::new();
    context.set(context_keys::USER_MESSAGE, &input.message).await?;
    context.set(context_keys::PRIOR_TURNS, &input.prior_turns).await?;
    context.set(context_keys::PERSONA, input.persona.key).await?;
    if let Some(model) = &input.model_override {
        context.set(context_keys::MODEL_OVERRIDE, model).await?;
    }

    let execution = graph.execute(context.clone()).await?;

    let reply = execution
        .response
        .ok_or_else(|| GraphError::ContextError("pipeline produced no reply".to_string()))?;
    let origin: ReplyOrigin = context
        .get(context_keys::ORIGIN)
        .await
        .ok_or_else(|| GraphError::ContextError("reply_origin not found".to_string()))?;
    let suggestions: Vec<String> = context
        .get(context_keys::SUGGESTIONS)
        .await
        .unwrap_or_default();
    let metadata: Option<MovieMetadata> = context.get(context_keys::METADATA).await;

    Ok(ChatOutcome {
        reply,
        metadata,
        suggestions,
        origin,
    })
}
