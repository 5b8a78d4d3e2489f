#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use movie_chat_service::catalog::{CatalogError, MovieCatalog, MovieDetails};
use movie_chat_service::completion::{CompletionBackend, CompletionError, CompletionRequest};
use movie_chat_service::{AppState, ChatDependencies, build_router};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Catalog stub that counts calls and records search phrases
#[derive(Default)]
pub struct StubCatalog {
    pub hit: Option<u64>,
    pub details: Option<Value>,
    pub searches: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub phrases: Mutex<Vec<String>>,
}

impl StubCatalog {
    pub fn with_record(id: u64, details: Value) -> Arc<Self> {
        Arc::new(Self {
            hit: Some(id),
            details: Some(details),
            ..Default::default()
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieCatalog for StubCatalog {
    async fn search(&self, phrase: &str) -> Result<Option<u64>, CatalogError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.phrases.lock().unwrap().push(phrase.to_string());
        Ok(self.hit)
    }

    async fn details(&self, _id: u64) -> Result<MovieDetails, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        match &self.details {
            Some(details) => serde_json::from_value(details.clone())
                .map_err(|e| CatalogError::Decode(e.to_string())),
            None => Err(CatalogError::Status(500)),
        }
    }
}

pub enum Script {
    Reply(String),
    Status500,
    Timeout,
}

/// Completion stub that records every request it receives
pub struct StubCompletion {
    pub script: Script,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::scripted(Script::Reply(text.to_string()))
    }

    pub fn failing() -> Arc<Self> {
        Self::scripted(Script::Status500)
    }

    pub fn timing_out() -> Arc<Self> {
        Self::scripted(Script::Timeout)
    }

    fn scripted(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionBackend for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Status500 => Err(CompletionError::Provider(
                "status 500: upstream unavailable".to_string(),
            )),
            Script::Timeout => Err(CompletionError::Timeout(Duration::from_secs(30))),
        }
    }
}

pub fn inception_details() -> Value {
    json!({
        "id": 27205,
        "title": "Inception",
        "release_date": "2010-07-15",
        "vote_average": 8.4,
        "runtime": 148,
        "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
        "overview": "Cobb, a skilled thief who commits corporate espionage by infiltrating the subconscious of his targets.",
        "credits": {
            "cast": [
                { "name": "Leonardo DiCaprio" },
                { "name": "Joseph Gordon-Levitt" },
                { "name": "Elliot Page" }
            ],
            "crew": [
                { "job": "Screenplay", "name": "Christopher Nolan" },
                { "job": "Director", "name": "Christopher Nolan" }
            ]
        }
    })
}

pub fn app(catalog: Option<Arc<StubCatalog>>, completion: Option<Arc<StubCompletion>>) -> Router {
    let deps = ChatDependencies {
        catalog: catalog.map(|c| c as Arc<dyn MovieCatalog>),
        completion: completion.map(|c| c as Arc<dyn CompletionBackend>),
    };
    build_router(AppState::new(&deps, "alina"))
}

pub async fn send(
    app: Router,
    request: Request<Body>,
) -> (StatusCode, Value, axum::http::HeaderMap) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, headers)
}

pub async fn post_raw(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body, _) = send(app, request).await;
    (status, body)
}

pub async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, &body.to_string()).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value, axum::http::HeaderMap) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}
