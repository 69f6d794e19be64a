use crate::app::constants::DEFAULT_ENTRY_NAME;
use crate::app::errors::{AppError, AppResult};
use crate::app::types::{
    get_default_app_config, FirebaseApp, FirebaseAppConfig, FirebaseAppSettings, FirebaseOptions,
};

pub static SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

fn normalize_name(settings: &FirebaseAppSettings) -> AppResult<String> {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_ENTRY_NAME.to_string());
    if name.trim().is_empty() {
        return Err(AppError::BadAppName { app_name: name });
    }
    Ok(name)
}

fn ensure_options(options: FirebaseOptions) -> AppResult<FirebaseOptions> {
    if options.is_defined() {
        return Ok(options);
    }
    get_default_app_config().ok_or(AppError::NoOptions)
}

/// Creates a Firebase app handle from explicit options.
///
/// Empty options fall back to [`get_default_app_config`]. The returned handle is owned by the
/// caller and passed to the services that need it; nothing is registered globally.
pub fn initialize_app(
    options: FirebaseOptions,
    settings: Option<FirebaseAppSettings>,
) -> AppResult<FirebaseApp> {
    let settings = settings.unwrap_or_default();
    let name = normalize_name(&settings)?;
    let automatic = settings.automatic_data_collection_enabled.unwrap_or(true);
    let options = ensure_options(options)?;

    log::debug!(
        "initialized Firebase app '{name}' for project {}",
        options.project_id.as_deref().unwrap_or("<unset>")
    );
    Ok(FirebaseApp::new(
        options,
        FirebaseAppConfig::new(name, automatic),
    ))
}
