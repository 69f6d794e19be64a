use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use crate::request::{network_failure, HttpRequest, HttpResponse, HttpTransport, RequestResult};

/// A canned reply for [`ScriptedTransport`].
#[derive(Clone, Debug)]
pub enum TestResponse {
    Status(u16, String),
    Json(u16, Value),
    NetworkError(String),
}

impl TestResponse {
    fn into_result(self) -> RequestResult<HttpResponse> {
        match self {
            TestResponse::Status(status, body) => Ok(HttpResponse::new(status, body.into_bytes())),
            TestResponse::Json(status, body) => {
                Ok(HttpResponse::new(status, body.to_string().into_bytes()))
            }
            TestResponse::NetworkError(reason) => Err(network_failure(reason)),
        }
    }
}

/// In-process transport replaying queued responses and recording every request.
///
/// Once the queue is empty, every further request is answered with a network error.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<TestResponse>>>,
    requests: Arc<Mutex<Vec<(Instant, HttpRequest)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = TestResponse>) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.push(response);
        }
        transport
    }

    pub fn push(&self, response: TestResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Instants at which each request was received.
    pub fn request_times(&self) -> Vec<Instant> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        self.requests.lock().unwrap().push((Instant::now(), request));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| TestResponse::NetworkError("no scripted response left".into()))
            .into_result()
    }
}
