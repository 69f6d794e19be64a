use std::sync::{Arc, Mutex};

use crate::app::FirebaseApp;
use crate::auth::error::{app_deleted, AuthError, AuthResult};
use crate::auth::types::{AuthStateListeners, AuthStateSubscription, User};

/// Auth handle bound to a [`FirebaseApp`].
///
/// Sign-in itself happens in the host's identity provider integration, which reports the result
/// through [`set_current_user`](Self::set_current_user). Clones share the same state.
#[derive(Clone)]
pub struct Auth {
    app: FirebaseApp,
    inner: Arc<AuthInner>,
}

struct AuthInner {
    current_user: Mutex<Option<Arc<User>>>,
    listeners: Arc<AuthStateListeners>,
}

/// Returns an Auth handle for `app`.
///
/// The app must carry an API key and must not have been deleted.
pub fn get_auth(app: &FirebaseApp) -> AuthResult<Auth> {
    app.check_destroyed()
        .map_err(|_| app_deleted(app.name()))?;
    let has_key = app
        .options()
        .api_key
        .is_some_and(|key| !key.trim().is_empty());
    if !has_key {
        return Err(AuthError::MissingApiKey {
            app_name: app.name().to_owned(),
        });
    }

    log::debug!("auth initialized for app {}", app.name());
    Ok(Auth {
        app: app.clone(),
        inner: Arc::new(AuthInner {
            current_user: Mutex::new(None),
            listeners: Arc::new(AuthStateListeners::default()),
        }),
    })
}

impl Auth {
    pub fn app(&self) -> &FirebaseApp {
        &self.app
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.inner.current_user.lock().unwrap().clone()
    }

    /// Replaces the signed-in user (`None` signs out) and notifies listeners when it changed.
    pub fn set_current_user(&self, user: Option<User>) -> AuthResult<()> {
        self.app
            .check_destroyed()
            .map_err(|_| app_deleted(self.app.name()))?;
        let user = user.map(Arc::new);
        {
            let mut current = self.inner.current_user.lock().unwrap();
            if *current == user {
                return Ok(());
            }
            *current = user.clone();
        }
        log::debug!(
            "auth state changed for app {}: {}",
            self.app.name(),
            user.as_ref().map(|u| u.uid.as_str()).unwrap_or("<signed out>")
        );
        self.inner.listeners.notify(user);
        Ok(())
    }

    /// Registers `listener`, which is called right away with the current user and then on
    /// every sign-in or sign-out.
    pub fn on_auth_state_changed<F>(&self, listener: F) -> AuthStateSubscription
    where
        F: Fn(Option<Arc<User>>) + Send + Sync + 'static,
    {
        let listener = Arc::new(listener);
        listener(self.current_user());
        let id = self.inner.listeners.add(listener);
        AuthStateSubscription::new(&self.inner.listeners, id)
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("app", &self.app.name())
            .field("current_user", &self.current_user().map(|u| u.uid.clone()))
            .finish()
    }
}
