/// Keys under which the chat pipeline stores its state in the flow context
pub mod context_keys {
    pub const USER_MESSAGE: &str = "user_message";
    pub const PRIOR_TURNS: &str = "prior_turns";
    pub const PERSONA: &str = "persona";
    pub const MODEL_OVERRIDE: &str = "model_override";
    /// Present only when the classifier decided a catalog lookup is needed
    pub const SEARCH_PHRASE: &str = "search_phrase";
    /// Present only when enrichment resolved a title
    pub const METADATA: &str = "movie_metadata";
    pub const REPLY: &str = "reply";
    pub const ORIGIN: &str = "reply_origin";
    pub const SUGGESTIONS: &str = "suggestions";
}
