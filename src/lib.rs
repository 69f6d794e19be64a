//! Client library of the KOS food delivery chat assistant.
//!
//! - [`app`] and [`auth`] bootstrap the KOS Firebase project and expose the signed-in account.
//! - [`request`] is an HTTP client that retries rate-limited and failed requests with
//!   exponential backoff.
//! - [`ai`] speaks Gemini's `generateContent` API on top of it.
//! - [`chat`] keeps the conversation, persists it per session and renders it for display.
//!
//! The crate builds natively (tokio timers, reqwest) and for `wasm32` (gloo timers, the browser's
//! `sessionStorage` behind the `wasm-web` feature).

pub mod ai;
pub mod app;
pub mod auth;
pub mod chat;
pub mod platform;
pub mod request;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_support;
