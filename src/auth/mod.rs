//! Auth handle for the KOS Firebase project.
//!
//! The crate does not sign users in. The host's identity provider integration reports the
//! signed-in account through [`Auth::set_current_user`], and consumers such as the chatbot read
//! it back to scope their state per account.

mod api;
mod error;
mod types;

pub use api::{get_auth, Auth};
pub use error::{AuthError, AuthResult};
pub use types::{AuthStateListener, AuthStateSubscription, User};
