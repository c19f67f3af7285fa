//! Chat request/response payloads and conversation history normalization.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Which party produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role assigned to a bare-string history entry landing at `position`
    /// in the normalized sequence.
    fn for_position(position: usize) -> Self {
        if position % 2 == 0 {
            Role::User
        } else {
            Role::Model
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One exchange unit in a dialogue, in the shape the model API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<String>,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![text.into()],
        }
    }
}

/// A caller-supplied history entry before normalization.
///
/// Only a JSON object can become a [`HistoryItem::Turn`]; serde's derived
/// struct impl would also accept a positional array like `["user", ["x"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum HistoryItem {
    Turn(ConversationTurn),
    Text(String),
    Unrecognized,
}

impl From<Value> for HistoryItem {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => HistoryItem::Text(text),
            Value::Object(_) => serde_json::from_value(value)
                .map(HistoryItem::Turn)
                .unwrap_or(HistoryItem::Unrecognized),
            _ => HistoryItem::Unrecognized,
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Anything other than an array (including `null`) reads as no history.
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Option<Vec<HistoryItem>>,
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Option<Vec<HistoryItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(items.into_iter().map(HistoryItem::from).collect())),
        _ => Ok(None),
    }
}

/// Body of every `/chat` response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Resolve raw history entries into concrete turns.
///
/// Structured turns pass through untouched. Bare strings alternate
/// user/model by their index in the *output* built so far, so an interleaved
/// structured turn shifts the roles of the strings after it. This can differ
/// from the alternation the caller meant; existing clients depend on it.
/// Anything else is dropped.
pub fn normalize_history(items: Vec<HistoryItem>) -> Vec<ConversationTurn> {
    let mut history = Vec::with_capacity(items.len());

    for item in items {
        match item {
            HistoryItem::Turn(turn) => history.push(turn),
            HistoryItem::Text(text) => {
                let role = Role::for_position(history.len());
                history.push(ConversationTurn::new(role, text));
            }
            HistoryItem::Unrecognized => {}
        }
    }

    history
}
