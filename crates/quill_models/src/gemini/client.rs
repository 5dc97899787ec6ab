//! Gemini REST client.

use crate::gemini::{GenerateContentResponse, conversions};
use async_trait::async_trait;
use quill_core::GenerationSettings;
use quill_error::{GenerationError, GenerationErrorKind};
use quill_interface::{GenerationBackend, RawResponse};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Generation backend calling `models/{model}:generateContent`.
///
/// One HTTP request per call; no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client for the given endpoint and key.
    #[instrument(skip(api_key))]
    pub fn new(api_key: String, base_url: &str) -> Result<Self, GenerationError> {
        let client = Client::builder().build().map_err(|e| {
            GenerationError::new(GenerationErrorKind::ClientCreation(e.to_string()))
        })?;

        debug!("Created Gemini client");
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client reading the key from the environment variable `key_env`.
    ///
    /// # Errors
    ///
    /// `GenerationErrorKind::MissingApiKey` if the variable is unset or empty.
    pub fn from_env(key_env: &str, base_url: &str) -> Result<Self, GenerationError> {
        let api_key = std::env::var(key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::MissingApiKey(key_env.to_string()))
            })?;
        Self::new(api_key, base_url)
    }

    /// Returns the endpoint base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    #[instrument(skip(self, prompt, settings), fields(provider = "gemini", model = %model))]
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<RawResponse, GenerationError> {
        let body = conversions::to_request(prompt, settings)?;

        debug!(
            max_output_tokens = settings.max_output_tokens,
            temperature = settings.temperature,
            "Sending request"
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, "HTTP request failed");
                GenerationError::new(GenerationErrorKind::Http(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            }));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "Failed to parse response");
            GenerationError::new(GenerationErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(candidates = parsed.candidates.len(), "Received response");
        conversions::from_response(&parsed)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
