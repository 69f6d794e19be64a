//! Resilient Request Client: JSON POST requests with exponential backoff.
//!
//! [`ResilientClient`] retries `429 Too Many Requests` responses and transport failures on the
//! schedule described by a [`RetryPolicy`]; the schedule itself lives in the I/O-free
//! [`Backoff`] state machine.

mod backoff;
mod client;
mod error;
mod transport;

#[doc(inline)]
pub use backoff::{
    AttemptResult, Backoff, RetryPolicy, RetryState, DEFAULT_BACKOFF_MULTIPLIER,
    DEFAULT_INITIAL_DELAY_MILLIS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MILLIS,
};

#[doc(inline)]
pub use client::ResilientClient;

#[doc(inline)]
pub use error::{
    invalid_request, network_failure, response_malformed, RequestError, RequestErrorKind,
    RequestResult,
};

#[doc(inline)]
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, DEFAULT_REQUEST_TIMEOUT_MS,
    STATUS_TOO_MANY_REQUESTS,
};
