use std::fmt;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingApiKey { app_name: String },
    AppDeleted { app_name: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingApiKey { app_name } => write!(
                f,
                "Firebase App '{app_name}' has no API key; Auth cannot be initialized"
            ),
            AuthError::AppDeleted { app_name } => {
                write!(f, "Firebase App named '{app_name}' already deleted")
            }
        }
    }
}

impl std::error::Error for AuthError {}

pub(crate) fn app_deleted(app_name: &str) -> AuthError {
    AuthError::AppDeleted {
        app_name: app_name.to_owned(),
    }
}
