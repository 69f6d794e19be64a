use url::Url;

use crate::ai::constants::{DEFAULT_API_BASE, GENERATE_CONTENT_OPERATION};
use crate::ai::error::{invalid_argument, AiResult};
use crate::ai::types::{Content, GenerateContentRequest, GenerateContentResponse, Tool};
use crate::request::ResilientClient;

/// A Gemini model reachable through the generative-language REST API.
///
/// Requests go through a [`ResilientClient`], so rate limiting and transient network failures
/// are retried before an error reaches the caller.
#[derive(Clone, Debug)]
pub struct GenerativeModel {
    client: ResilientClient,
    api_key: String,
    model: String,
    base_url: String,
    system_instruction: Option<String>,
    tools: Vec<Tool>,
}

impl GenerativeModel {
    /// Creates a model handle. Google Search grounding is enabled by default.
    pub fn new(
        client: ResilientClient,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> AiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(invalid_argument("An API key is required to call the Gemini API"));
        }
        let model = normalize_model_name(&model.into());
        if model.is_empty() {
            return Err(invalid_argument("Model name must not be empty"));
        }

        Ok(Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_API_BASE.to_string(),
            system_instruction: None,
            tools: vec![Tool::google_search()],
        })
    }

    /// Points the model at another API base, e.g. a proxy or a test server.
    ///
    /// The base must end with the path segment that precedes the model name (`.../models/`);
    /// a missing trailing slash is added.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> AiResult<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Url::parse(&base_url)
            .map_err(|err| invalid_argument(format!("Invalid base URL '{base_url}': {err}")))?;
        self.base_url = base_url;
        Ok(self)
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Bare model name, e.g. `gemini-2.5-flash-preview-09-2025`.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// Full `generateContent` URL, API key included.
    pub fn endpoint(&self) -> AiResult<Url> {
        let raw = format!(
            "{}{}:{}",
            self.base_url, self.model, GENERATE_CONTENT_OPERATION
        );
        let mut url = Url::parse(&raw)
            .map_err(|err| invalid_argument(format!("Invalid endpoint '{raw}': {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Wraps `contents` with this model's tools and system instruction.
    pub fn build_request(&self, contents: Vec<Content>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents,
            tools: self.tools.clone(),
            system_instruction: self.system_instruction.clone().map(Content::instruction),
        }
    }

    /// Sends a `generateContent` request and decodes the response.
    ///
    /// A successful HTTP response whose body does not decode fails with
    /// [`AiErrorCode::ResponseMalformed`](crate::ai::AiErrorCode::ResponseMalformed). An
    /// `error` object embedded in a decodable body is returned to the caller as-is.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> AiResult<GenerateContentResponse> {
        if request.contents.is_empty() {
            return Err(invalid_argument("A request needs at least one content entry"));
        }

        let url = self.endpoint()?;
        let response = self.client.post_json(&url, request).await?;
        let decoded: GenerateContentResponse = response.json()?;

        if let Some(error) = &decoded.error {
            log::warn!(
                "Gemini API returned an error for model {}: {}",
                self.model,
                error.message.as_deref().unwrap_or("<no message>")
            );
        }

        Ok(decoded)
    }
}

fn normalize_model_name(model: &str) -> String {
    let trimmed = model.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("models/")
        .unwrap_or(trimmed)
        .to_string()
}
