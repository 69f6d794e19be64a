use std::fmt;

use crate::ai::AiError;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Clone, Debug)]
pub enum ChatError {
    /// The message was empty or whitespace only.
    EmptyMessage,
    /// Another message of the same conversation is still waiting for its reply.
    RequestInFlight,
    Storage(String),
    Serialization(String),
    InvalidConfig(AiError),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::EmptyMessage => write!(f, "Message must not be empty"),
            ChatError::RequestInFlight => {
                write!(f, "A message is already waiting for a reply")
            }
            ChatError::Storage(message) => write!(f, "Session storage error: {message}"),
            ChatError::Serialization(message) => {
                write!(f, "Failed to (de)serialize chat history: {message}")
            }
            ChatError::InvalidConfig(err) => write!(f, "Invalid chatbot configuration: {err}"),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AiError> for ChatError {
    fn from(error: AiError) -> Self {
        ChatError::InvalidConfig(error)
    }
}

pub(crate) fn storage_error(message: impl Into<String>) -> ChatError {
    ChatError::Storage(message.into())
}

impl From<serde_json::Error> for ChatError {
    fn from(error: serde_json::Error) -> Self {
        ChatError::Serialization(error.to_string())
    }
}
