use std::fmt::{Display, Formatter};

/// Classification of request failures.
///
/// `RateLimited` and `NetworkFailure` are retried according to the active
/// [`RetryPolicy`](crate::request::RetryPolicy); every other kind is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestErrorKind {
    RateLimited,
    NetworkFailure,
    NonRetryableHttp,
    ResponseMalformed,
    InvalidRequest,
}

impl RequestErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestErrorKind::RateLimited => "request/rate-limited",
            RequestErrorKind::NetworkFailure => "request/network-failure",
            RequestErrorKind::NonRetryableHttp => "request/non-retryable-http",
            RequestErrorKind::ResponseMalformed => "request/response-malformed",
            RequestErrorKind::InvalidRequest => "request/invalid-request",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RequestErrorKind::RateLimited | RequestErrorKind::NetworkFailure
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestError {
    kind: RequestErrorKind,
    message: String,
    status: Option<u16>,
    server_response: Option<String>,
}

impl RequestError {
    pub fn new(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            server_response: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_server_response(mut self, body: impl Into<String>) -> Self {
        self.server_response = Some(body.into());
        self
    }

    pub fn kind(&self) -> RequestErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the last response, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Raw body of the last response, when the failure came from one.
    pub fn server_response(&self) -> Option<&str> {
        self.server_response.as_deref()
    }
}

impl Display for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.as_str())
    }
}

impl std::error::Error for RequestError {}

pub type RequestResult<T> = Result<T, RequestError>;

pub fn network_failure(message: impl Into<String>) -> RequestError {
    RequestError::new(RequestErrorKind::NetworkFailure, message)
}

pub fn invalid_request(message: impl Into<String>) -> RequestError {
    RequestError::new(RequestErrorKind::InvalidRequest, message)
}

pub fn response_malformed(message: impl Into<String>) -> RequestError {
    RequestError::new(RequestErrorKind::ResponseMalformed, message)
}
