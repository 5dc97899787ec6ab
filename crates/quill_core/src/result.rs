//! Per-step audit records and the final generation result.

use crate::{GenerationSettings, Outcome, StepDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Audit record for one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step index
    pub step: i64,
    /// Template before substitution (the caller override when one was given)
    pub original_prompt: String,
    /// Prompt actually sent, after substitution and forward-feeding
    pub processed_prompt: String,
    /// Settings actually used
    #[serde(rename = "ai_settings")]
    pub settings_used: GenerationSettings,
    /// Generated text or warning sentinel
    pub output: String,
    /// Classification of the backend call
    pub outcome: Outcome,
}

/// Metadata returned alongside the generated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Number of steps in the recipe
    pub total_steps: usize,
    /// Echo of the caller's template variables
    pub dynamic_data_used: Map<String, Value>,
    /// Full audit trail in execution order
    pub step_details: Vec<StepResult>,
    /// Echo of the recipe's stored step definitions
    pub original_prompts: Vec<StepDefinition>,
    /// Override keys that addressed no step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_overrides: Vec<String>,
}

/// Result of running a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Final content: the last step's output, HTML-rendered if that step produced markdown
    pub content: String,
    /// Raw output of every step, in order
    pub prompt_outputs: Vec<String>,
    /// Recipe name
    pub content_type: String,
    /// Audit trail and echoes
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    /// Steps whose outcome was not `Completed`.
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.metadata
            .step_details
            .iter()
            .filter(|s| !s.outcome.is_success())
    }
}
