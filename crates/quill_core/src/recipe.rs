//! Recipe and step definition types.

use crate::SettingsOverride;
use quill_error::{RecipeError, RecipeErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// One prompt template within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StepDefinition {
    /// Position of the step; steps run in ascending order
    step: i64,
    /// Template with `{name}` placeholders
    text: String,
    /// Generation parameters stored with the step
    #[serde(
        default,
        rename = "ai_settings",
        skip_serializing_if = "Option::is_none"
    )]
    settings: Option<SettingsOverride>,
}

impl StepDefinition {
    /// Creates a step without stored settings.
    pub fn new(step: i64, text: impl Into<String>) -> Self {
        Self {
            step,
            text: text.into(),
            settings: None,
        }
    }

    /// Attaches stored settings to the step.
    pub fn with_settings(mut self, settings: SettingsOverride) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Key used by request overrides addressing this step.
    pub fn key(&self) -> StepKey {
        StepKey::new(self.step)
    }
}

/// A named, ordered set of prompt-template steps.
///
/// # Examples
///
/// ```
/// use quill_core::{Recipe, StepDefinition};
///
/// let recipe = Recipe::builder()
///     .name("blog")
///     .steps(vec![
///         StepDefinition::new(2, "Write a post about {city}."),
///         StepDefinition::new(1, "Research {city}."),
///     ])
///     .build()
///     .unwrap();
///
/// let order: Vec<i64> = recipe.ordered_steps().iter().map(|s| *s.step()).collect();
/// assert_eq!(order, vec![1, 2]);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Recipe {
    /// Unique content-type name
    name: String,
    /// Human-readable description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// Step definitions in stored order
    #[serde(rename = "prompts")]
    #[builder(default)]
    steps: Vec<StepDefinition>,
}

impl Recipe {
    /// Returns a builder for constructing a Recipe.
    pub fn builder() -> RecipeBuilder {
        RecipeBuilder::default()
    }

    /// Steps sorted by ascending index.
    pub fn ordered_steps(&self) -> Vec<&StepDefinition> {
        let mut steps: Vec<&StepDefinition> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.step);
        steps
    }

    /// Check the recipe invariants.
    ///
    /// # Errors
    ///
    /// Returns a `RecipeError` when the name is blank, a step index repeats,
    /// or a step template is blank.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::new(RecipeErrorKind::EmptyName));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.step) {
                return Err(RecipeError::new(RecipeErrorKind::DuplicateStep {
                    recipe: self.name.clone(),
                    step: step.step,
                }));
            }
            if step.text.trim().is_empty() {
                return Err(RecipeError::new(RecipeErrorKind::EmptyPrompt(step.step)));
            }
        }
        Ok(())
    }

    /// Replaces description and steps, keeping the name.
    pub fn replace_content(&mut self, description: String, steps: Vec<StepDefinition>) {
        self.description = description;
        self.steps = steps;
    }
}

/// Key addressing a step in request override maps, written `step_<N>`.
///
/// # Examples
///
/// ```
/// use quill_core::StepKey;
///
/// let key: StepKey = "step_3".parse().unwrap();
/// assert_eq!(key.step(), 3);
/// assert_eq!(key.to_string(), "step_3");
/// assert!("third".parse::<StepKey>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
#[display("step_{}", _0)]
pub struct StepKey(i64);

impl StepKey {
    const PREFIX: &'static str = "step_";

    /// Key for the given step index.
    pub fn new(step: i64) -> Self {
        Self(step)
    }

    /// The addressed step index.
    pub fn step(&self) -> i64 {
        self.0
    }
}

impl FromStr for StepKey {
    type Err = RecipeError;

    /// Only the canonical form parses; `step_01` and `step_+2` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|n| n.parse::<i64>().ok())
            .map(StepKey)
            .filter(|key| key.to_string() == s)
            .ok_or_else(|| RecipeError::new(RecipeErrorKind::InvalidStepKey(s.to_string())))
    }
}
