//! Single backend call with outcome classification.

use quill_core::{GenerationSettings, Outcome};
use quill_error::{GenerationError, GenerationErrorKind};
use quill_interface::{FinishCode, GenerationBackend, RawResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Returned in place of text when the backend stops normally with no text.
pub const EMPTY_RESPONSE_WARNING: &str = "⚠️ Empty response received from the model.";

/// Returned in place of text when the safety filter stops generation.
pub const SAFETY_WARNING: &str =
    "⚠️ Content blocked by safety policies (finish reason: SAFETY). Try changing the prompt.";

/// Returned in place of text when the recitation filter stops generation.
pub const RECITATION_WARNING: &str = "⚠️ Content blocked due to recitation of copyrighted material (finish reason: RECITATION). Try changing the prompt.";

/// Warning text for a generation cut off at the token budget.
pub fn token_limit_warning(max_output_tokens: u32) -> String {
    format!(
        "⚠️ Token limit exceeded (max_tokens: {}). Increase the limit.",
        max_output_tokens
    )
}

/// Warning text for a transport or API fault.
pub fn backend_error_warning(kind: &GenerationErrorKind) -> String {
    format!("⚠️ AI content generation failed: {}", kind)
}

/// Backend finish reasons the classifier distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FinishKind {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Unrecognized(String),
}

impl FinishKind {
    /// Map a raw code to a finish kind.
    ///
    /// Numeric codes follow the Gemini `FinishReason` enum order. A missing
    /// or unspecified code is treated as a normal stop.
    fn from_code(code: Option<&FinishCode>) -> Self {
        match code {
            None => FinishKind::Stop,
            Some(FinishCode::Numeric(n)) => match n {
                0 | 1 => FinishKind::Stop,
                2 => FinishKind::MaxTokens,
                3 | 6 | 7 | 8 | 10 => FinishKind::Safety,
                4 => FinishKind::Recitation,
                other => FinishKind::Unrecognized(other.to_string()),
            },
            Some(FinishCode::Named(name)) => {
                let upper = name.trim().to_ascii_uppercase();
                let bare = upper.strip_prefix("FINISH_REASON_").unwrap_or(&upper);
                match bare {
                    "" | "UNSPECIFIED" | "STOP" => FinishKind::Stop,
                    "MAX_TOKENS" => FinishKind::MaxTokens,
                    "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" | "IMAGE_SAFETY" => {
                        FinishKind::Safety
                    }
                    "RECITATION" => FinishKind::Recitation,
                    _ => FinishKind::Unrecognized(name.clone()),
                }
            }
        }
    }
}

/// Text and classification of one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Generated text or warning sentinel
    pub text: String,
    /// Classification of the call
    pub outcome: Outcome,
}

impl Invocation {
    fn new(text: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}

/// Classify a backend result into one of the six outcomes.
///
/// Never fails: faults become `Outcome::BackendError` with a warning text.
pub fn classify(
    result: Result<RawResponse, GenerationError>,
    settings: &GenerationSettings,
) -> Invocation {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            return Invocation::new(backend_error_warning(&err.kind), Outcome::BackendError);
        }
    };

    match FinishKind::from_code(response.finish_reason().as_ref()) {
        FinishKind::Stop => match response.text() {
            Some(text) if !text.trim().is_empty() => {
                Invocation::new(text.clone(), Outcome::Completed)
            }
            _ => Invocation::new(EMPTY_RESPONSE_WARNING, Outcome::EmptyResponse),
        },
        FinishKind::MaxTokens => Invocation::new(
            token_limit_warning(settings.max_output_tokens),
            Outcome::TokenLimitExceeded,
        ),
        FinishKind::Safety => Invocation::new(SAFETY_WARNING, Outcome::SafetyBlocked),
        FinishKind::Recitation => Invocation::new(RECITATION_WARNING, Outcome::RecitationBlocked),
        FinishKind::Unrecognized(code) => Invocation::new(
            backend_error_warning(&GenerationErrorKind::ResponseParsing(format!(
                "unrecognized finish reason '{}'",
                code
            ))),
            Outcome::BackendError,
        ),
    }
}

/// Calls a generation backend once and classifies the result.
#[derive(Debug, Clone)]
pub struct GenerationInvoker<B: GenerationBackend> {
    backend: B,
    timeout: Option<Duration>,
}

impl<B: GenerationBackend> GenerationInvoker<B> {
    /// Create an invoker without a call timeout.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: None,
        }
    }

    /// Bound every backend call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send one prompt to the backend and classify the answer.
    ///
    /// The call is attempted exactly once.
    #[instrument(
        skip(self, prompt, settings),
        fields(
            provider = self.backend.provider_name(),
            model = %settings.model,
            prompt_len = prompt.len()
        )
    )]
    pub async fn invoke(&self, prompt: &str, settings: &GenerationSettings) -> Invocation {
        let call = self.backend.generate(&settings.model, prompt, settings);

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| {
                    Err(GenerationError::new(GenerationErrorKind::Timeout(
                        limit.as_secs(),
                    )))
                }),
            None => call.await,
        };

        if let Err(err) = &result {
            warn!(error = %err, "Generation backend call failed");
        }

        let invocation = classify(result, settings);
        debug!(
            outcome = %invocation.outcome,
            output_len = invocation.text.len(),
            "Backend call classified"
        );
        invocation
    }
}
