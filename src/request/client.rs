use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::platform::runtime;
use crate::request::backoff::{AttemptResult, Backoff, RetryPolicy, RetryState};
use crate::request::error::{invalid_request, RequestError, RequestErrorKind, RequestResult};
use crate::request::transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, DEFAULT_REQUEST_TIMEOUT_MS,
};

/// HTTP client that retries rate-limited and failed requests with exponential backoff.
///
/// A `429 Too Many Requests` response or a transport failure puts the request to sleep for the
/// next delay of the [`RetryPolicy`] before trying again. Successful responses are returned
/// untouched; any other status fails immediately with the response's status text.
#[derive(Clone)]
pub struct ResilientClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientClient")
            .field("policy", &self.policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ResilientClient {
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Creates a client backed by [`ReqwestTransport`].
    pub fn with_default_transport(policy: RetryPolicy) -> Self {
        Self::new(Arc::new(ReqwestTransport::default()), policy)
    }

    /// Overrides the per-attempt timeout applied by [`post_json`](Self::post_json).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Serializes `body` as JSON and POSTs it to `url`, retrying per the policy.
    pub async fn post_json<B>(&self, url: &Url, body: &B) -> RequestResult<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body)
            .map_err(|err| invalid_request(format!("failed to serialize request body: {err}")))?;
        let request = HttpRequest::post_json(url.clone(), body).with_timeout(self.timeout);
        self.execute(request).await
    }

    /// Sends a prepared request, retrying per the policy.
    pub async fn execute(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        let mut backoff = Backoff::new(self.policy);
        let mut attempt = 0;

        loop {
            let result = self.transport.send(request.clone()).await;
            let (attempt_result, last_error) = match result {
                Ok(response) if response.is_success() && !response.is_rate_limited() => {
                    log::debug!(
                        "request to {} succeeded on attempt {}",
                        redact(&request.url),
                        attempt + 1
                    );
                    return Ok(response);
                }
                Ok(response) if response.is_rate_limited() => (
                    AttemptResult::RateLimited,
                    status_error(RequestErrorKind::RateLimited, response),
                ),
                Ok(response) => (
                    AttemptResult::NonRetryable,
                    status_error(RequestErrorKind::NonRetryableHttp, response),
                ),
                Err(err) if err.kind() == RequestErrorKind::NetworkFailure => {
                    (AttemptResult::NetworkFailure, err)
                }
                Err(err) => (AttemptResult::NonRetryable, err),
            };

            match backoff.record(attempt_result) {
                RetryState::Waiting { attempt: next, delay } => {
                    log::debug!(
                        "attempt {} to {} failed ({last_error}); retrying in {delay:?} (attempt {} of {})",
                        attempt + 1,
                        redact(&request.url),
                        next + 1,
                        self.policy.max_attempts()
                    );
                    runtime::sleep(delay).await;
                    backoff.resume();
                    attempt = next;
                }
                _ => {
                    if attempt_result != AttemptResult::NonRetryable {
                        log::warn!(
                            "request to {} failed after {} attempts: {last_error}",
                            redact(&request.url),
                            backoff.attempts()
                        );
                    }
                    return Err(last_error);
                }
            }
        }
    }
}

fn status_error(kind: RequestErrorKind, response: HttpResponse) -> RequestError {
    let status_text = if response.status_text.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        response.status_text.clone()
    };
    RequestError::new(kind, format!("API error: {status_text}"))
        .with_status(response.status)
        .with_server_response(response.text())
}

/// Strips the query string, which carries the API key, before logging a URL.
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
