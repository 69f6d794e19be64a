use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::ai::{AiErrorCode, Content, GenerativeModel, GroundingSource};
use crate::auth::Auth;
use crate::chat::config::ChatbotConfig;
use crate::chat::constants::{
    CONNECTION_ERROR_TEXT, PROCESSING_ERROR_TEXT, UNEXPECTED_API_ERROR_TEXT,
};
use crate::chat::conversation::Conversation;
use crate::chat::error::{ChatError, ChatResult};
use crate::chat::message::Message;
use crate::chat::storage::{InMemorySessionStorage, SessionStorage};
use crate::request::{HttpTransport, ResilientClient};

/// The KOS chat assistant: a conversation, the model that answers it and the session storage
/// that keeps it across page loads.
///
/// Only one message can wait for a reply at a time. Model failures never surface as errors;
/// they become assistant messages, as the chat widget shows them.
pub struct Chatbot {
    model: GenerativeModel,
    config: ChatbotConfig,
    storage: Arc<dyn SessionStorage>,
    auth: Option<Auth>,
    session: Mutex<Session>,
    in_flight: AtomicBool,
}

/// The conversation together with the storage key it was loaded from and is saved under.
struct Session {
    key: String,
    conversation: Conversation,
}

pub struct ChatbotBuilder {
    config: ChatbotConfig,
    storage: Option<Arc<dyn SessionStorage>>,
    auth: Option<Auth>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ChatbotBuilder {
    /// Session storage for the history. Defaults to [`InMemorySessionStorage`].
    pub fn with_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Scopes the stored history to the signed-in user of `auth`.
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// HTTP transport used by the retrying client. Defaults to reqwest.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the chatbot and restores any history found in storage.
    pub fn build(self) -> ChatResult<Chatbot> {
        let config = self.config;
        let client = match self.transport {
            Some(transport) => ResilientClient::new(transport, config.retry),
            None => ResilientClient::with_default_transport(config.retry),
        }
        .with_timeout(config.request_timeout);

        let model = GenerativeModel::new(client, config.api_key.clone(), config.model.clone())?
            .with_base_url(config.api_base.clone())?
            .with_system_instruction(config.system_prompt.clone());

        let chatbot = Chatbot {
            model,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(InMemorySessionStorage::new())),
            auth: self.auth,
            session: Mutex::new(Session {
                key: String::new(),
                conversation: Conversation::new(config.welcome_text.clone()),
            }),
            in_flight: AtomicBool::new(false),
            config,
        };
        chatbot.restore();
        Ok(chatbot)
    }
}

impl Chatbot {
    pub fn builder(config: ChatbotConfig) -> ChatbotBuilder {
        ChatbotBuilder {
            config,
            storage: None,
            auth: None,
            transport: None,
        }
    }

    pub fn config(&self) -> &ChatbotConfig {
        &self.config
    }

    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }

    /// Snapshot of the conversation of the current storage key, oldest message first.
    pub fn messages(&self) -> Vec<Message> {
        self.sync_session();
        self.session.lock().unwrap().conversation.messages().to_vec()
    }

    /// Whether a message is waiting for its reply.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Storage key of the history: the configured key, suffixed with `:{uid}` while a user is
    /// signed in.
    pub fn storage_key(&self) -> String {
        let user = self.auth.as_ref().and_then(Auth::current_user);
        match user {
            Some(user) => format!("{}:{}", self.config.storage_key, user.uid),
            None => self.config.storage_key.clone(),
        }
    }

    /// Sends `text` and returns the assistant's reply once it has been appended.
    ///
    /// The reply is recorded in the history the message was sent from, even if the signed-in
    /// user changes while it is pending.
    pub async fn send_message(&self, text: &str) -> ChatResult<Message> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        self.sync_session();

        let (key, contents) = {
            let mut session = self.session.lock().unwrap();
            session.conversation.push_user(text);
            (session.key.clone(), session.conversation.history_contents())
        };
        self.persist(&key);

        let (reply, sources) = self.request_reply(contents).await;
        Ok(self.append_reply(&key, reply, sources))
    }

    /// Ends the session: back to the welcome message, stored history removed.
    pub fn clear(&self) -> ChatResult<()> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let key = self.storage_key();
        *self.session.lock().unwrap() = Session {
            conversation: Conversation::new(self.config.welcome_text.clone()),
            key: key.clone(),
        };
        self.storage.remove(&key)
    }

    /// Replaces the conversation with the history stored under [`storage_key`](Self::storage_key),
    /// e.g. after the signed-in user changed. Returns whether anything was restored; without
    /// usable history the conversation starts over with the welcome message.
    ///
    /// Unreadable history is logged and ignored.
    pub fn restore(&self) -> bool {
        let key = self.storage_key();
        let restored = self.load(&key);
        let found = restored.is_some();
        let conversation =
            restored.unwrap_or_else(|| Conversation::new(self.config.welcome_text.clone()));
        *self.session.lock().unwrap() = Session { key, conversation };
        found
    }

    /// Switches to the history of the current storage key when the signed-in user changed.
    fn sync_session(&self) {
        let key = self.storage_key();
        let stale = self.session.lock().unwrap().key != key;
        if stale {
            log::debug!("chat storage key changed to '{key}'; switching history");
            self.restore();
        }
    }

    fn load(&self, key: &str) -> Option<Conversation> {
        let stored = match self.storage.get(key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("failed to load chat history '{key}': {err}");
                return None;
            }
        };

        match Conversation::from_json(&stored, self.config.welcome_text.clone()) {
            Ok(restored) if restored.has_history() => {
                log::debug!("restored {} chat messages from '{key}'", restored.len());
                Some(restored)
            }
            Ok(_) => None,
            Err(err) => {
                log::warn!("ignoring unreadable chat history '{key}': {err}");
                None
            }
        }
    }

    fn append_reply(&self, key: &str, reply: String, sources: Vec<GroundingSource>) -> Message {
        {
            let mut session = self.session.lock().unwrap();
            if session.key == key {
                let message = session.conversation.push_assistant(reply, sources);
                drop(session);
                self.persist(key);
                return message;
            }
        }

        // The active history changed while waiting; the reply goes to the one it answers.
        let mut conversation = self
            .load(key)
            .unwrap_or_else(|| Conversation::new(self.config.welcome_text.clone()));
        let message = conversation.push_assistant(reply, sources);
        self.store(key, &conversation);
        message
    }

    fn persist(&self, key: &str) {
        let serialized = {
            let session = self.session.lock().unwrap();
            if session.key != key || !session.conversation.has_history() {
                return;
            }
            session.conversation.to_json()
        };
        self.write(key, serialized);
    }

    fn store(&self, key: &str, conversation: &Conversation) {
        self.write(key, conversation.to_json());
    }

    fn write(&self, key: &str, serialized: ChatResult<String>) {
        let result = serialized.and_then(|json| self.storage.set(key, &json));
        if let Err(err) = result {
            log::warn!("failed to persist chat history '{key}': {err}");
        }
    }

    async fn request_reply(&self, contents: Vec<Content>) -> (String, Vec<GroundingSource>) {
        let request = self.model.build_request(contents);
        let response = match self.model.generate_content(&request).await {
            Ok(response) => response,
            Err(err) if err.code() == AiErrorCode::RequestFailed => {
                log::warn!("chat request failed: {err}");
                return (CONNECTION_ERROR_TEXT.to_string(), Vec::new());
            }
            Err(err) => {
                log::warn!("chat response could not be processed: {err}");
                return (PROCESSING_ERROR_TEXT.to_string(), Vec::new());
            }
        };

        if let Some(text) = response.text() {
            return (
                text.to_string(),
                response.grounding_sources(self.config.max_sources),
            );
        }

        match &response.error {
            Some(error) => {
                let message = error
                    .message
                    .as_deref()
                    .filter(|message| !message.is_empty())
                    .unwrap_or(UNEXPECTED_API_ERROR_TEXT);
                (format!("Error: {message}"), Vec::new())
            }
            None => (PROCESSING_ERROR_TEXT.to_string(), Vec::new()),
        }
    }
}

impl std::fmt::Debug for Chatbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chatbot")
            .field("model", &self.model.model())
            .field("storage_key", &self.storage_key())
            .field("is_loading", &self.is_loading())
            .finish()
    }
}

/// Holds the in-flight flag; released on drop, including when the send future is dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ChatResult<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ChatError::RequestInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
