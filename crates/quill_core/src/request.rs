//! Caller input for a generation run.

use crate::{SettingsOverride, StepKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A request to generate content from a stored recipe.
///
/// Override maps are keyed by `step_<N>`.
///
/// # Examples
///
/// ```
/// use quill_core::{GenerationRequest, StepKey};
///
/// let request = GenerationRequest::new("blog")
///     .with_variable("city", "Oslo")
///     .with_prompt(StepKey::new(1), "Override text");
///
/// assert_eq!(request.variables()["city"], "Oslo");
/// assert_eq!(request.prompt_override(1), Some("Override text"));
/// assert_eq!(request.prompt_override(2), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Recipe name
    pub content_type: String,
    /// Template variables
    #[serde(default)]
    pub dynamic_data: Map<String, Value>,
    /// Per-step partial settings overrides
    #[serde(default, rename = "custom_ai_configs")]
    pub custom_settings: BTreeMap<String, SettingsOverride>,
    /// Per-step replacement templates
    #[serde(default)]
    pub custom_prompts: BTreeMap<String, String>,
}

impl GenerationRequest {
    /// Creates a request for the given content type with no variables or overrides.
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            ..Self::default()
        }
    }

    /// Adds a template variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.dynamic_data.insert(name.into(), value.into());
        self
    }

    /// Replaces the template of one step.
    pub fn with_prompt(mut self, key: StepKey, text: impl Into<String>) -> Self {
        self.custom_prompts.insert(key.to_string(), text.into());
        self
    }

    /// Overrides settings of one step.
    pub fn with_settings(mut self, key: StepKey, settings: SettingsOverride) -> Self {
        self.custom_settings.insert(key.to_string(), settings);
        self
    }

    /// Template variables rendered to their string form.
    ///
    /// Strings are used verbatim; every other JSON value uses its JSON text.
    pub fn variables(&self) -> BTreeMap<String, String> {
        self.dynamic_data
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), text)
            })
            .collect()
    }

    /// Replacement template for a step, if the caller supplied one.
    pub fn prompt_override(&self, step: i64) -> Option<&str> {
        self.custom_prompts
            .get(&StepKey::new(step).to_string())
            .map(String::as_str)
    }

    /// Caller settings layer for a step, if supplied.
    pub fn settings_override(&self, step: i64) -> Option<&SettingsOverride> {
        self.custom_settings.get(&StepKey::new(step).to_string())
    }

    /// Override keys that address none of the given steps.
    ///
    /// Malformed keys are always reported.
    pub fn unmatched_overrides(&self, steps: &[i64]) -> Vec<String> {
        let mut unmatched: Vec<String> = self
            .custom_prompts
            .keys()
            .chain(self.custom_settings.keys())
            .filter(|key| match key.parse::<StepKey>() {
                Ok(parsed) => !steps.contains(&parsed.step()),
                Err(_) => true,
            })
            .cloned()
            .collect();
        unmatched.sort();
        unmatched.dedup();
        unmatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_wire_shape() {
        let json = r#"{
            "content_type": "blog",
            "dynamic_data": {"city": "Oslo", "year": 2024, "draft": true},
            "custom_ai_configs": {"step_2": {"temperature": 0.1}},
            "custom_prompts": {"step_1": "Override text"}
        }"#;

        let request: GenerationRequest = serde_json::from_str(json).unwrap();
        let vars = request.variables();
        assert_eq!(vars["city"], "Oslo");
        assert_eq!(vars["year"], "2024");
        assert_eq!(vars["draft"], "true");
        assert_eq!(request.settings_override(2).unwrap().temperature, Some(0.1));
        assert!(request.settings_override(1).is_none());
    }

    #[test]
    fn test_request_defaults_optional_maps() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"content_type": "blog"}"#).unwrap();
        assert!(request.dynamic_data.is_empty());
        assert!(request.custom_prompts.is_empty());
        assert!(request.custom_settings.is_empty());
    }

    #[test]
    fn test_unmatched_overrides() {
        let request = GenerationRequest::new("blog")
            .with_prompt(StepKey::new(1), "a")
            .with_prompt(StepKey::new(9), "b")
            .with_settings(StepKey::new(9), SettingsOverride::default())
            .with_settings(StepKey::new(2), SettingsOverride::default());
        let mut request = request;
        request
            .custom_prompts
            .insert("intro".to_string(), "c".to_string());

        assert_eq!(
            request.unmatched_overrides(&[1, 2]),
            vec!["intro".to_string(), "step_9".to_string()]
        );
    }
}
