use crate::ai::{Content, GroundingSource};
use crate::chat::constants::{MAX_MESSAGE_ID, WELCOME_MESSAGE_ID};
use crate::chat::error::{ChatError, ChatResult};
use crate::chat::message::{Message, MessageId, Origin};
use crate::platform::runtime;

/// Ordered, append-only sequence of chat messages that opens with a welcome message.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversation {
    welcome_text: String,
    messages: Vec<Message>,
    last_id: u64,
}

impl Conversation {
    pub fn new(welcome_text: impl Into<String>) -> Self {
        let welcome_text = welcome_text.into();
        let welcome = Message::new(
            MessageId(WELCOME_MESSAGE_ID),
            welcome_text.clone(),
            Origin::Assistant,
        );
        Self {
            welcome_text,
            messages: vec![welcome],
            last_id: WELCOME_MESSAGE_ID,
        }
    }

    /// Restores a sequence serialized by [`to_json`](Self::to_json).
    ///
    /// An empty array yields a fresh conversation. Ids must be strictly increasing and at most
    /// [`MAX_MESSAGE_ID`], and the welcome id may only appear on a leading assistant message;
    /// anything else is rejected as [`ChatError::Serialization`].
    pub fn from_json(json: &str, welcome_text: impl Into<String>) -> ChatResult<Self> {
        let messages: Vec<Message> = serde_json::from_str(json)?;
        let mut conversation = Self::new(welcome_text);
        if messages.is_empty() {
            return Ok(conversation);
        }
        validate_ids(&messages)?;

        conversation.last_id = messages
            .iter()
            .map(|message| message.id.value())
            .max()
            .unwrap_or(WELCOME_MESSAGE_ID);
        conversation.messages = messages;
        Ok(conversation)
    }

    pub fn to_json(&self) -> ChatResult<String> {
        Ok(serde_json::to_string(&self.messages)?)
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Message {
        self.push(Message::new(self.next_id(), text, Origin::User))
    }

    pub fn push_assistant(
        &mut self,
        text: impl Into<String>,
        sources: Vec<GroundingSource>,
    ) -> Message {
        let message = Message::new(self.next_id(), text, Origin::Assistant).with_sources(sources);
        self.push(message)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether anything beyond the welcome message has been said.
    pub fn has_history(&self) -> bool {
        self.messages.len() > 1
    }

    /// Drops every message and starts over with the welcome message.
    pub fn clear(&mut self) {
        *self = Self::new(std::mem::take(&mut self.welcome_text));
    }

    /// The conversation as Gemini contents, oldest first, without the welcome message.
    pub fn history_contents(&self) -> Vec<Content> {
        self.messages
            .iter()
            .filter(|message| message.id.value() != WELCOME_MESSAGE_ID)
            .map(|message| match message.origin {
                Origin::User => Content::user(message.text.clone()),
                Origin::Assistant => Content::model(message.text.clone()),
            })
            .collect()
    }

    fn push(&mut self, message: Message) -> Message {
        self.last_id = message.id.value();
        self.messages.push(message.clone());
        message
    }

    fn next_id(&self) -> MessageId {
        MessageId(runtime::now_millis().max(self.last_id.saturating_add(1)))
    }
}

fn validate_ids(messages: &[Message]) -> ChatResult<()> {
    let mut previous: Option<u64> = None;
    for (index, message) in messages.iter().enumerate() {
        let id = message.id.value();
        if id > MAX_MESSAGE_ID {
            return Err(ChatError::Serialization(format!(
                "message id {id} exceeds {MAX_MESSAGE_ID}"
            )));
        }
        if id == WELCOME_MESSAGE_ID && (index != 0 || !message.is_bot()) {
            return Err(ChatError::Serialization(format!(
                "message id {WELCOME_MESSAGE_ID} is reserved for the leading welcome message"
            )));
        }
        if previous.is_some_and(|previous| id <= previous) {
            return Err(ChatError::Serialization(format!(
                "message id {id} at position {index} is not greater than the one before it"
            )));
        }
        previous = Some(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ROLE_MODEL, ROLE_USER};
    use std::collections::HashSet;

    fn source(title: &str) -> GroundingSource {
        GroundingSource {
            uri: format!("https://{title}.example"),
            title: title.to_string(),
        }
    }

    #[test]
    fn starts_with_welcome_message() {
        let conversation = Conversation::new("Hi there");
        assert_eq!(conversation.len(), 1);
        let welcome = conversation.last().unwrap();
        assert_eq!(welcome.id, MessageId(WELCOME_MESSAGE_ID));
        assert!(welcome.is_bot());
        assert!(!conversation.has_history());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut conversation = Conversation::new("Hi");
        for i in 0..50 {
            conversation.push_user(format!("message {i}"));
        }
        let ids: Vec<u64> = conversation.messages().iter().map(|m| m.id.value()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    }

    #[test]
    fn history_excludes_welcome_and_maps_roles() {
        let mut conversation = Conversation::new("Hi");
        conversation.push_user("Is the kitchen open?");
        conversation.push_assistant("Yes, until 11pm.", Vec::new());
        conversation.push_user("Great");

        let history = conversation.history_contents();
        let roles: Vec<_> = history.iter().filter_map(|c| c.role.as_deref()).collect();
        assert_eq!(roles, vec![ROLE_USER, ROLE_MODEL, ROLE_USER]);
        assert_eq!(history[0].first_text(), Some("Is the kitchen open?"));
    }

    #[test]
    fn serialization_round_trip_is_stable() {
        let mut conversation = Conversation::new("Hi");
        conversation.push_user("Track order 42");
        conversation.push_assistant("It left the restaurant.", vec![source("a"), source("b")]);

        let first = conversation.to_json().unwrap();
        let restored = Conversation::from_json(&first, "Hi").unwrap();
        let second = restored.to_json().unwrap();

        assert_eq!(first, second);
        assert_eq!(restored.messages(), conversation.messages());
    }

    #[test]
    fn restored_conversation_keeps_allocating_fresh_ids() {
        let json = r#"[
            {"id": 1, "text": "Hi", "isBot": true, "timestamp": "2025-01-01T00:00:00Z"},
            {"id": 99999999999999, "text": "Hello", "isBot": false, "timestamp": "2025-01-01T00:00:01Z"}
        ]"#;
        let mut conversation = Conversation::from_json(json, "Hi").unwrap();
        let next = conversation.push_user("Again");
        assert_eq!(next.id, MessageId(100_000_000_000_000));
    }

    #[test]
    fn empty_array_restores_fresh_conversation() {
        let conversation = Conversation::from_json("[]", "Welcome").unwrap();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].text, "Welcome");
        assert!(Conversation::from_json("{not json", "Welcome").is_err());
    }

    fn stored(ids: &[(u64, bool)]) -> String {
        let messages: Vec<_> = ids
            .iter()
            .map(|(id, is_bot)| {
                serde_json::json!({
                    "id": id,
                    "text": format!("message {id}"),
                    "isBot": is_bot,
                    "timestamp": "2025-01-01T00:00:00Z"
                })
            })
            .collect();
        serde_json::to_string(&messages).unwrap()
    }

    #[test]
    fn oversized_ids_are_rejected() {
        let json = stored(&[(1, true), (u64::MAX, false)]);
        assert!(matches!(
            Conversation::from_json(&json, "Hi"),
            Err(ChatError::Serialization(_))
        ));

        let json = stored(&[(1, true), (MAX_MESSAGE_ID, false)]);
        let mut conversation = Conversation::from_json(&json, "Hi").unwrap();
        let next = conversation.push_user("next");
        assert_eq!(next.id, MessageId(MAX_MESSAGE_ID + 1));
    }

    #[test]
    fn duplicate_or_unordered_ids_are_rejected() {
        for ids in [
            vec![(1, true), (500, false), (500, true)],
            vec![(1, true), (600, false), (599, true)],
        ] {
            assert!(
                Conversation::from_json(&stored(&ids), "Hi").is_err(),
                "{ids:?} should be rejected"
            );
        }
    }

    #[test]
    fn welcome_id_is_only_valid_on_leading_assistant_message() {
        assert!(Conversation::from_json(&stored(&[(1, false), (5, true)]), "Hi").is_err());
        assert!(Conversation::from_json(&stored(&[(3, false), (1, true)]), "Hi").is_err());

        let restored = Conversation::from_json(&stored(&[(2, false), (3, true)]), "Hi").unwrap();
        assert_eq!(restored.history_contents().len(), 2);
    }

    #[test]
    fn clear_returns_to_welcome_message() {
        let mut conversation = Conversation::new("Welcome back");
        conversation.push_user("one");
        conversation.push_assistant("two", Vec::new());
        conversation.clear();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].text, "Welcome back");
        assert!(conversation.history_contents().is_empty());
    }
}
