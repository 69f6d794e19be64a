//! Firebase app bootstrap.
//!
//! [`initialize_app`] validates the options and hands back an explicit [`FirebaseApp`] handle
//! that other services, such as [`auth`](crate::auth), take as a constructor argument.

mod api;
mod constants;
mod errors;
mod types;

#[doc(inline)]
pub use api::{initialize_app, SDK_VERSION};

#[doc(inline)]
pub use constants::{API_KEY_ENV_VARS, DEFAULT_ENTRY_NAME};

#[doc(inline)]
pub use errors::{AppError, AppResult};

#[doc(inline)]
pub use types::{
    get_default_app_config, FirebaseApp, FirebaseAppConfig, FirebaseAppSettings, FirebaseOptions,
};
