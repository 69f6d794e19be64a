use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::request::error::{network_failure, response_malformed, RequestResult};

/// Default per-attempt timeout, matching the Firebase AI fetch timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 180_000;

pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// A fully prepared POST request. The body is already serialized JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn post_json(url: Url, body: String) -> Self {
        Self {
            url,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body,
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the value of a header if it exists.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: canonical_status_text(status).to_string(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == STATUS_TOO_MANY_REQUESTS
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> RequestResult<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            response_malformed(format!("failed to parse response JSON: {err}"))
                .with_status(self.status)
                .with_server_response(self.text())
        })
    }
}

/// Sends a single HTTP request without any retry logic.
///
/// Transport-level failures (DNS, connection, timeout) must be reported as
/// [`RequestErrorKind::NetworkFailure`](crate::request::RequestErrorKind::NetworkFailure);
/// HTTP error statuses are returned as regular responses.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        let mut builder = self.client.post(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(request.timeout);
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|err| network_failure(format!("failed to send request: {err}")))?;

        let status = response.status();
        let mut headers = HashMap::new();
        for (key, value) in response.headers().iter() {
            if let Ok(val) = value.to_str() {
                headers.insert(key.as_str().to_owned(), val.to_owned());
            }
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| network_failure(format!("failed to read response body: {err}")))?
            .to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

fn canonical_status_text(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}
