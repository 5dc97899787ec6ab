//! Generation parameter types.

use quill_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model used when neither the step nor the caller names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default lower bound for `max_output_tokens`.
pub const DEFAULT_OUTPUT_TOKEN_FLOOR: u32 = 8000;

/// Output format requested from the backend.
///
/// Serialized as the MIME type the backend understands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum ResponseFormat {
    /// Plain text, passed through unchanged.
    #[default]
    #[serde(rename = "text/plain")]
    #[strum(serialize = "text/plain")]
    PlainText,
    /// Markdown, rendered to HTML when produced by the final step.
    #[serde(rename = "text/markdown")]
    #[strum(serialize = "text/markdown")]
    Markdown,
}

impl ResponseFormat {
    /// MIME type sent to the backend.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResponseFormat::PlainText => "text/plain",
            ResponseFormat::Markdown => "text/markdown",
        }
    }

    /// True for markdown output.
    pub fn is_markdown(&self) -> bool {
        matches!(self, ResponseFormat::Markdown)
    }
}

/// Fully resolved generation parameters for one backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Requested output format
    #[serde(rename = "response_mime_type")]
    pub response_format: ResponseFormat,
    /// Maximum tokens the backend may generate
    #[serde(rename = "max_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationDefaults::default().settings()
    }
}

/// A partial set of generation parameters.
///
/// Used both for settings stored on a step and for caller-supplied overrides.
/// Unset fields fall through to the layer below.
///
/// # Examples
///
/// ```
/// use quill_core::{ResponseFormat, SettingsOverride};
///
/// let layer = SettingsOverride::default()
///     .with_temperature(0.2)
///     .with_response_format(ResponseFormat::Markdown);
/// assert_eq!(layer.temperature, Some(0.2));
/// assert!(layer.model.is_none());
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option, into)]
pub struct SettingsOverride {
    /// Model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Requested output format
    #[serde(
        default,
        rename = "response_mime_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_format: Option<ResponseFormat>,
    /// Maximum tokens the backend may generate
    #[serde(default, rename = "max_tokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl SettingsOverride {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
            && self.response_format.is_none()
            && self.max_output_tokens.is_none()
    }
}

impl From<GenerationSettings> for SettingsOverride {
    fn from(settings: GenerationSettings) -> Self {
        Self {
            model: Some(settings.model),
            temperature: Some(settings.temperature),
            top_p: Some(settings.top_p),
            response_format: Some(settings.response_format),
            max_output_tokens: Some(settings.max_output_tokens),
        }
    }
}

/// Process-wide generation defaults.
///
/// Loaded once at start-up and handed to the executor; the lowest layer of
/// the settings precedence chain.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct GenerationDefaults {
    /// Default model identifier
    #[serde(default = "default_model")]
    #[setters(into)]
    model: String,
    /// Default sampling temperature
    #[serde(default = "default_sampling")]
    temperature: f64,
    /// Default nucleus sampling threshold
    #[serde(default = "default_sampling")]
    top_p: f64,
    /// Default output format
    #[serde(default)]
    response_format: ResponseFormat,
    /// Default output token budget
    #[serde(default = "default_floor")]
    max_output_tokens: u32,
    /// Floor applied to every resolved `max_output_tokens`
    #[serde(default = "default_floor")]
    min_output_tokens: u32,
    /// Per-call backend timeout, unbounded when absent
    #[serde(default)]
    #[setters(strip_option)]
    call_timeout_secs: Option<u64>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_sampling() -> f64 {
    0.7
}

fn default_floor() -> u32 {
    DEFAULT_OUTPUT_TOKEN_FLOOR
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_sampling(),
            top_p: default_sampling(),
            response_format: ResponseFormat::default(),
            max_output_tokens: default_floor(),
            min_output_tokens: default_floor(),
            call_timeout_secs: None,
        }
    }
}

impl GenerationDefaults {
    /// The default layer as a complete settings value.
    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            response_format: self.response_format,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Per-call timeout as a duration.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }

    /// Check that the defaults describe a usable configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the model is blank, the token floor is
    /// zero, or a sampling parameter is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("generation.model cannot be empty"));
        }
        if self.min_output_tokens == 0 {
            return Err(ConfigError::new(
                "generation.min_output_tokens must be greater than zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::new(format!(
                "generation.temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::new(format!(
                "generation.top_p must be within [0, 1], got {}",
                self.top_p
            )));
        }
        if self.call_timeout_secs == Some(0) {
            return Err(ConfigError::new(
                "generation.call_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}
