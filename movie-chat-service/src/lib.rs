pub mod catalog;
pub mod completion;
pub mod config;
pub mod keywords;
pub mod models;
pub mod personas;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use config::ServiceConfig;
pub use models::*;
pub use service::{AppState, build_router, create_app};
pub use workflow::{
    ChatDependencies, ChatOutcome, ChatTurnInput, build_chat_workflow, run_chat_turn,
};
