use std::fmt::{Display, Formatter};

use crate::request::{RequestError, RequestErrorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiErrorCode {
    InvalidArgument,
    RequestFailed,
    ResponseMalformed,
}

impl AiErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiErrorCode::InvalidArgument => "ai/invalid-argument",
            AiErrorCode::RequestFailed => "ai/request-failed",
            AiErrorCode::ResponseMalformed => "ai/response-malformed",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AiError {
    code: AiErrorCode,
    message: String,
    source: Option<RequestError>,
}

impl AiError {
    pub fn new(code: AiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn code(&self) -> AiErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Failure reported by the request layer, if any.
    pub fn request_error(&self) -> Option<&RequestError> {
        self.source.as_ref()
    }

    /// Kind of the underlying request failure, if any.
    pub fn request_kind(&self) -> Option<RequestErrorKind> {
        self.source.as_ref().map(RequestError::kind)
    }
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl From<RequestError> for AiError {
    fn from(err: RequestError) -> Self {
        let code = match err.kind() {
            RequestErrorKind::ResponseMalformed => AiErrorCode::ResponseMalformed,
            RequestErrorKind::InvalidRequest => AiErrorCode::InvalidArgument,
            _ => AiErrorCode::RequestFailed,
        };
        Self {
            code,
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}

pub type AiResult<T> = Result<T, AiError>;

pub fn invalid_argument(message: impl Into<String>) -> AiError {
    AiError::new(AiErrorCode::InvalidArgument, message)
}
