use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::constants::{
    API_KEY_ENV_VARS, KOS_APP_ID, KOS_AUTH_DOMAIN, KOS_MESSAGING_SENDER_ID, KOS_PROJECT_ID,
    KOS_STORAGE_BUCKET,
};
use crate::app::errors::{AppError, AppResult};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirebaseOptions {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

impl FirebaseOptions {
    /// Options of the KOS food delivery Firebase project with the given web API key.
    pub fn kos_defaults(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            auth_domain: Some(KOS_AUTH_DOMAIN.to_string()),
            project_id: Some(KOS_PROJECT_ID.to_string()),
            storage_bucket: Some(KOS_STORAGE_BUCKET.to_string()),
            messaging_sender_id: Some(KOS_MESSAGING_SENDER_ID.to_string()),
            app_id: Some(KOS_APP_ID.to_string()),
            measurement_id: None,
        }
    }

    pub(crate) fn is_defined(&self) -> bool {
        self.api_key.is_some()
            || self.project_id.is_some()
            || self.app_id.is_some()
            || self.auth_domain.is_some()
            || self.storage_bucket.is_some()
            || self.messaging_sender_id.is_some()
            || self.measurement_id.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirebaseAppSettings {
    pub name: Option<String>,
    pub automatic_data_collection_enabled: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseAppConfig {
    pub name: Arc<str>,
    pub automatic_data_collection_enabled: bool,
}

impl FirebaseAppConfig {
    pub fn new(name: impl Into<String>, automatic: bool) -> Self {
        Self {
            name: Arc::from(name.into()),
            automatic_data_collection_enabled: automatic,
        }
    }
}

/// Handle to an initialized Firebase app.
///
/// Cloning is cheap; every clone observes [`delete`](Self::delete).
#[derive(Clone)]
pub struct FirebaseApp {
    inner: Arc<FirebaseAppInner>,
}

struct FirebaseAppInner {
    options: FirebaseOptions,
    config: FirebaseAppConfig,
    is_deleted: AtomicBool,
}

impl FirebaseApp {
    pub fn new(options: FirebaseOptions, config: FirebaseAppConfig) -> Self {
        Self {
            inner: Arc::new(FirebaseAppInner {
                options,
                config,
                is_deleted: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn options(&self) -> FirebaseOptions {
        self.inner.options.clone()
    }

    pub fn config(&self) -> FirebaseAppConfig {
        self.inner.config.clone()
    }

    pub fn automatic_data_collection_enabled(&self) -> bool {
        self.inner.config.automatic_data_collection_enabled
    }

    pub fn is_deleted(&self) -> bool {
        self.inner.is_deleted.load(Ordering::SeqCst)
    }

    /// Marks the app as deleted. Services refuse to attach to a deleted app.
    pub fn delete(&self) {
        self.inner.is_deleted.store(true, Ordering::SeqCst);
    }

    pub fn check_destroyed(&self) -> AppResult<()> {
        if self.is_deleted() {
            return Err(AppError::AppDeleted {
                app_name: self.name().to_owned(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for FirebaseApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseApp")
            .field("name", &self.name())
            .field("project_id", &self.inner.options.project_id)
            .field("is_deleted", &self.is_deleted())
            .finish()
    }
}

/// Builds the KOS project options from the process environment.
///
/// Returns `None` when none of [`API_KEY_ENV_VARS`] holds a non-empty key.
pub fn get_default_app_config() -> Option<FirebaseOptions> {
    default_app_config_from(|name| std::env::var(name).ok())
}

pub(crate) fn default_app_config_from<F>(lookup: F) -> Option<FirebaseOptions>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(FirebaseOptions::kos_defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_lookup_prefers_kos_variable() {
        let options = default_app_config_from(|name| match name {
            "KOS_FIREBASE_API_KEY" => Some("kos-key".into()),
            "VITE_FIREBASE_APIKEY" => Some("vite-key".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(options.api_key.as_deref(), Some("kos-key"));
        assert_eq!(options.project_id.as_deref(), Some(KOS_PROJECT_ID));
    }

    #[test]
    fn env_lookup_falls_back_and_skips_blank_values() {
        let options = default_app_config_from(|name| match name {
            "KOS_FIREBASE_API_KEY" => Some("   ".into()),
            "VITE_FIREBASE_APIKEY" => Some("vite-key".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(options.api_key.as_deref(), Some("vite-key"));
        assert!(default_app_config_from(|_| None).is_none());
    }

    #[test]
    fn delete_is_shared_between_clones() {
        let app = FirebaseApp::new(
            FirebaseOptions::kos_defaults("key"),
            FirebaseAppConfig::new("clone-test", true),
        );
        let clone = app.clone();
        app.delete();
        assert!(clone.is_deleted());
        assert_eq!(
            clone.check_destroyed(),
            Err(AppError::AppDeleted {
                app_name: "clone-test".into()
            })
        );
    }
}
