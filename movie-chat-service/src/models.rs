use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Placeholder used by every metadata field the catalog could not supply
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation, tagged with its speaker role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Release year of a title. Serialized as a bare integer, or as the string
/// `"Unknown"` when the catalog had no usable release date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseYear {
    Known(i32),
    Unknown,
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseYear::Known(year) => write!(f, "{year}"),
            ReleaseYear::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for ReleaseYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReleaseYear::Known(year) => serializer.serialize_i32(*year),
            ReleaseYear::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

impl<'de> Deserialize<'de> for ReleaseYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Year(i32),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Year(year) => ReleaseYear::Known(year),
            Raw::Text(_) => ReleaseYear::Unknown,
        })
    }
}

/// Normalized catalog record for one title, built fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub title: String,
    pub year: ReleaseYear,
    pub rating: String,
    pub genre: String,
    pub director: String,
    pub cast: String,
    pub runtime: String,
    pub plot: String,
}

impl MovieMetadata {
    /// First listed genre, used where a single genre reads better
    pub fn primary_genre(&self) -> &str {
        self.genre.split(',').next().map(str::trim).unwrap_or(UNKNOWN)
    }
}

/// Where the reply text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrigin {
    /// The completion API answered
    Model,
    /// The completion call failed and a local template was used
    Fallback,
    /// No completion credential is configured; a fixed advisory was returned
    Unconfigured,
}

/// Inbound body of `POST /api/chat`.
///
/// Fields are kept loose so that validation can answer with a uniform
/// client error instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<Value>,
    #[serde(default, alias = "priorTurns", alias = "prior_turns")]
    pub history: Option<Value>,
    #[serde(default)]
    pub persona: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
}

impl ChatRequest {
    /// Requested persona key; non-text values are ignored
    pub fn persona_key(&self) -> Option<&str> {
        self.persona.as_ref().and_then(Value::as_str)
    }

    /// Requested model override; non-text values are ignored
    pub fn model_override(&self) -> Option<String> {
        self.model.as_ref().and_then(Value::as_str).map(str::to_string)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub metadata: Option<MovieMetadata>,
    pub suggestions: Vec<String>,
    pub origin: ReplyOrigin,
    pub persona: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_release_year_serialization() {
        assert_eq!(serde_json::to_value(ReleaseYear::Known(2010)).unwrap(), json!(2010));
        assert_eq!(serde_json::to_value(ReleaseYear::Unknown).unwrap(), json!("Unknown"));

        let parsed: ReleaseYear = serde_json::from_value(json!("Unknown")).unwrap();
        assert_eq!(parsed, ReleaseYear::Unknown);
        let parsed: ReleaseYear = serde_json::from_value(json!(1999)).unwrap();
        assert_eq!(parsed.to_string(), "1999");
    }

    #[test]
    fn test_chat_turn_roles_are_lowercase() {
        let turn = ChatTurn::assistant("hi");
        assert_eq!(
            serde_json::to_value(&turn).unwrap(),
            json!({ "role": "assistant", "content": "hi" })
        );
        let unknown_role = json!({ "role": "bot", "content": "x" });
        assert!(serde_json::from_value::<ChatTurn>(unknown_role).is_err());
    }

    #[test]
    fn test_primary_genre() {
        let metadata = MovieMetadata {
            title: "Inception".into(),
            year: ReleaseYear::Known(2010),
            rating: "8.4/10".into(),
            genre: "Action, Science Fiction".into(),
            director: "Christopher Nolan".into(),
            cast: UNKNOWN.into(),
            runtime: "148 min".into(),
            plot: "Dreams.".into(),
        };
        assert_eq!(metadata.primary_genre(), "Action");
    }

    #[test]
    fn test_chat_request_accepts_prior_turns_alias() {
        let request: ChatRequest = serde_json::from_value(json!({
            "message": "hello",
            "priorTurns": [{ "role": "user", "content": "earlier" }]
        }))
        .unwrap();
        assert!(request.history.is_some());
        assert!(request.persona.is_none());
    }

    #[test]
    fn test_non_text_persona_and_model_are_ignored() {
        let request: ChatRequest = serde_json::from_value(json!({
            "message": "hello",
            "persona": { "key": "teacher" },
            "model": 7
        }))
        .unwrap();
        assert_eq!(request.persona_key(), None);
        assert_eq!(request.model_override(), None);

        let request: ChatRequest = serde_json::from_value(json!({
            "message": "hello",
            "persona": "teacher",
            "model": "openai/gpt-4o"
        }))
        .unwrap();
        assert_eq!(request.persona_key(), Some("teacher"));
        assert_eq!(request.model_override().as_deref(), Some("openai/gpt-4o"));
    }
}
