//! Generation backend trait and raw response types.

use async_trait::async_trait;
use quill_core::GenerationSettings;
use quill_error::GenerationError;
use serde::{Deserialize, Serialize};

/// Finish-reason code as reported by a backend.
///
/// Backends report either symbolic names (`"STOP"`) or numeric enum values
/// (`1`); both are carried through untouched and interpreted by the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum FinishCode {
    /// Numeric enum value
    #[display("{}", _0)]
    Numeric(i64),
    /// Symbolic name
    #[display("{}", _0)]
    Named(String),
}

impl From<&str> for FinishCode {
    fn from(name: &str) -> Self {
        FinishCode::Named(name.to_string())
    }
}

impl From<i64> for FinishCode {
    fn from(code: i64) -> Self {
        FinishCode::Numeric(code)
    }
}

/// Unclassified backend answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RawResponse {
    /// Finish reason of the first candidate, if any
    finish_reason: Option<FinishCode>,
    /// Generated text, if any
    text: Option<String>,
}

impl RawResponse {
    /// Creates a raw response.
    pub fn new(finish_reason: Option<FinishCode>, text: Option<String>) -> Self {
        Self {
            finish_reason,
            text,
        }
    }

    /// A normal stop carrying `text`.
    pub fn stop(text: impl Into<String>) -> Self {
        Self::new(Some(FinishCode::from("STOP")), Some(text.into()))
    }
}

/// A text-generation backend.
///
/// Implementations perform exactly one call per invocation and never retry.
/// Transport and API failures are returned as `GenerationError`; content
/// outcomes (safety, recitation, token limit) are reported through the
/// finish code of a successful `RawResponse`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for a single prompt.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<RawResponse, GenerationError>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}
