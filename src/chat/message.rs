use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ai::GroundingSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    User,
    Assistant,
}

impl Origin {
    pub fn is_bot(self) -> bool {
        self == Origin::Assistant
    }
}

/// One chat bubble.
///
/// Serialized as `{"id", "text", "isBot", "timestamp", "sources"}`, the shape the web widget
/// keeps in session storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredMessage", into = "StoredMessage")]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    pub timestamp: DateTime<Utc>,
    pub sources: Vec<GroundingSource>,
}

impl Message {
    pub fn new(id: MessageId, text: impl Into<String>, origin: Origin) -> Self {
        Self {
            id,
            text: text.into(),
            origin,
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn is_bot(&self) -> bool {
        self.origin.is_bot()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMessage {
    id: MessageId,
    text: String,
    is_bot: bool,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sources: Vec<GroundingSource>,
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Self {
        Self {
            id: stored.id,
            text: stored.text,
            origin: if stored.is_bot {
                Origin::Assistant
            } else {
                Origin::User
            },
            timestamp: stored.timestamp,
            sources: stored.sources,
        }
    }
}

impl From<Message> for StoredMessage {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            is_bot: message.is_bot(),
            text: message.text,
            timestamp: message.timestamp,
            sources: message.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_widget_shape() {
        let timestamp = DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut message = Message::new(MessageId(17), "Where is my order?", Origin::User);
        message.timestamp = timestamp;

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "id": 17,
                "text": "Where is my order?",
                "isBot": false,
                "timestamp": "2025-03-01T12:00:00Z"
            })
        );
    }

    #[test]
    fn reads_history_written_by_the_web_widget() {
        let message: Message = serde_json::from_value(json!({
            "id": 1741000000000u64,
            "text": "Your pizza is on its way",
            "isBot": true,
            "timestamp": "2025-03-03T10:06:40.000Z"
        }))
        .unwrap();

        assert_eq!(message.id, MessageId(1_741_000_000_000));
        assert_eq!(message.origin, Origin::Assistant);
        assert!(message.sources.is_empty());
    }
}
