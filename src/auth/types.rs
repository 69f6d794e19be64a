use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};

/// Profile of the signed-in account, as reported by the identity provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

pub type AuthStateListener = Arc<dyn Fn(Option<Arc<User>>) + Send + Sync>;

#[derive(Default)]
pub(crate) struct AuthStateListeners {
    next_id: AtomicU64,
    observers: Mutex<Vec<(u64, AuthStateListener)>>,
}

impl AuthStateListeners {
    pub(crate) fn add(&self, listener: AuthStateListener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.observers.lock().unwrap().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: u64) {
        self.observers
            .lock()
            .unwrap()
            .retain(|(observer_id, _)| *observer_id != id);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    /// Calls every listener with `user`. The lock is released before any listener runs.
    pub(crate) fn notify(&self, user: Option<Arc<User>>) {
        let observers: Vec<AuthStateListener> = self
            .observers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in observers {
            listener(user.clone());
        }
    }
}

/// Keeps an auth state listener registered. Dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) removes the listener.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct AuthStateSubscription {
    listeners: Weak<AuthStateListeners>,
    id: u64,
}

impl AuthStateSubscription {
    pub(crate) fn new(listeners: &Arc<AuthStateListeners>, id: u64) -> Self {
        Self {
            listeners: Arc::downgrade(listeners),
            id,
        }
    }

    pub fn unsubscribe(self) {}
}

impl Drop for AuthStateSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

impl std::fmt::Debug for AuthStateSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStateSubscription")
            .field("id", &self.id)
            .finish()
    }
}
