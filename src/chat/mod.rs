//! Conversation manager of the KOS chat assistant.
//!
//! [`Chatbot`] keeps the message sequence, sends it to Gemini through the retrying request client
//! and persists it in session-scoped storage. [`render_message`] turns a message into the HTML the
//! widget displays.
//!
//! ```no_run
//! use std::sync::Arc;
//! use kos_chatbot::chat::{Chatbot, ChatbotConfig, InMemorySessionStorage};
//!
//! # async fn run() -> kos_chatbot::chat::ChatResult<()> {
//! let config = ChatbotConfig::from_env().unwrap_or_else(|| ChatbotConfig::new("api-key"));
//! let chatbot = Chatbot::builder(config)
//!     .with_storage(Arc::new(InMemorySessionStorage::new()))
//!     .build()?;
//! let reply = chatbot.send_message("Where is my order?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

mod chatbot;
mod config;
mod constants;
mod conversation;
mod error;
mod message;
mod render;
mod storage;

#[doc(inline)]
pub use chatbot::{Chatbot, ChatbotBuilder};

#[doc(inline)]
pub use config::ChatbotConfig;

#[doc(inline)]
pub use constants::{
    API_BASE_ENV_VAR, API_KEY_ENV_VAR, CONNECTION_ERROR_TEXT, HISTORY_STORAGE_KEY, MAX_MESSAGE_ID,
    MAX_SOURCES, MODEL_ENV_VAR, PROCESSING_ERROR_TEXT, SYSTEM_PROMPT, UNEXPECTED_API_ERROR_TEXT,
    WELCOME_MESSAGE_ID, WELCOME_TEXT,
};

#[doc(inline)]
pub use conversation::Conversation;

#[doc(inline)]
pub use error::{ChatError, ChatResult};

#[doc(inline)]
pub use message::{Message, MessageId, Origin};

#[doc(inline)]
pub use render::{format_message, render_message};

#[doc(inline)]
pub use storage::{InMemorySessionStorage, SessionStorage};

#[cfg(not(target_arch = "wasm32"))]
#[doc(inline)]
pub use storage::FileSessionStorage;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
#[doc(inline)]
pub use storage::WebSessionStorage;
