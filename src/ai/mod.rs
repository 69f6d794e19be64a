//! Gemini `generateContent` support: wire types and a retrying model handle.

mod constants;
mod error;
mod model;
mod types;

#[doc(inline)]
pub use constants::{DEFAULT_API_BASE, DEFAULT_MODEL, ROLE_MODEL, ROLE_USER};

#[doc(inline)]
pub use error::{invalid_argument, AiError, AiErrorCode, AiResult};

#[doc(inline)]
pub use model::GenerativeModel;

#[doc(inline)]
pub use types::{
    ApiErrorBody, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    GoogleSearch, GroundingAttribution, GroundingMetadata, GroundingSource, Part, Tool, WebSource,
};
