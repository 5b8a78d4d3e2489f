// Chat request pipeline tasks
pub mod classify;
pub mod enrich;
pub mod fallback;
pub mod generate;
pub mod suggest;

// Shared modules
pub mod types;

// Re-export task implementations
pub use classify::ClassifyQueryTask;
pub use enrich::EnrichMetadataTask;
pub use generate::GenerateReplyTask;
pub use suggest::SuggestFollowUpsTask;

// Re-export context keys
pub use types::context_keys;
