use axum::{
    Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use chat_flow::Graph;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::models::{ChatRequest, ChatResponse};
use crate::personas::{self, PERSONAS, PersonaConfig};
use crate::workflow::{
    ChatDependencies, ChatTurnInput, build_chat_workflow, parse_prior_turns, run_chat_turn,
};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<Graph>,
    pub default_persona: &'static PersonaConfig,
}

impl AppState {
    pub fn new(deps: &ChatDependencies, default_persona: &str) -> Self {
        Self {
            graph: Arc::new(build_chat_workflow(deps)),
            default_persona: personas::resolve(Some(default_persona), personas::DEFAULT_PERSONA),
        }
    }
}

pub fn create_app(config: &ServiceConfig) -> anyhow::Result<Router> {
    let deps = ChatDependencies::from_config(config)?;
    let state = AppState::new(&deps, &config.default_persona);
    info!(default_persona = %state.default_persona.key, "chat workflow ready");
    Ok(build_router(state))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/personas", get(list_personas))
        .route("/api/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .with_state(app_state)
}

/// Tag every request with a correlation id, run it inside a span carrying
/// that id, and echo the id back to the caller
async fn correlation_id_middleware(request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Movie Chat Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Persona chat with movie metadata enrichment and follow-up suggestions",
        "endpoints": {
            "POST /api/chat": "Submit a chat turn",
            "GET /api/personas": "List available personas",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_personas() -> Json<&'static [PersonaConfig]> {
    Json(PERSONAS)
}

fn validate_message(message: Option<&Value>) -> Result<String, ApiError> {
    match message {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(bad_request_error("`message` is required and must be non-empty text")),
    }
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected malformed chat request");
        bad_request_error("Request body must be a JSON object with a `message` field")
    })?;

    let message = validate_message(request.message.as_ref()).inspect_err(|_| {
        warn!("rejected chat request without a usable message");
    })?;

    let persona = match request.persona_key() {
        Some(key) => personas::find(key).unwrap_or_else(|| {
            warn!(persona = %key, "unknown persona, using default");
            state.default_persona
        }),
        None => state.default_persona,
    };
    let prior_turns = parse_prior_turns(request.history.as_ref());

    info!(
        persona = %persona.key,
        message_length = message.len(),
        prior_turns = prior_turns.len(),
        "processing chat request"
    );

    let input = ChatTurnInput {
        message,
        prior_turns,
        persona,
        model_override: request.model_override(),
    };

    let outcome = run_chat_turn(&state.graph, input).await.map_err(|e| {
        error!(error = %e, "chat workflow failed");
        internal_error("Chat workflow failed", &e.to_string())
    })?;

    info!(
        origin = ?outcome.origin,
        enriched = outcome.metadata.is_some(),
        "chat request completed"
    );

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        metadata: outcome.metadata,
        suggestions: outcome.suggestions,
        origin: outcome.origin,
        persona: persona.key.to_string(),
    }))
}
