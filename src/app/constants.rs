pub const DEFAULT_ENTRY_NAME: &str = "[DEFAULT]";

/// Environment variables consulted, in order, for the Firebase web API key.
pub const API_KEY_ENV_VARS: &[&str] = &["KOS_FIREBASE_API_KEY", "VITE_FIREBASE_APIKEY"];

pub const KOS_AUTH_DOMAIN: &str = "kos-food-delivery.firebaseapp.com";
pub const KOS_PROJECT_ID: &str = "kos-food-delivery";
pub const KOS_STORAGE_BUCKET: &str = "kos-food-delivery.firebasestorage.app";
pub const KOS_MESSAGING_SENDER_ID: &str = "1007193976687";
pub const KOS_APP_ID: &str = "1:1007193976687:web:bb1d12ea5b5d89b114829a";
