//! Store-backed content generation.

use crate::{HtmlRenderer, RecipeExecutor};
use quill_core::{
    GenerationDefaults, GenerationRequest, GenerationResult, GenerationSettings, Outcome,
    SettingsOverride,
};
use quill_error::{QuillResult, RecipeError, RecipeErrorKind};
use quill_interface::{GenerationBackend, MarkdownRenderer, RecipeStore};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// One step of a recipe as it would run without request overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDescription {
    /// Step index
    pub step: i64,
    /// Key of the form `<content_type>_prompt_<step>`
    pub prompt_key: String,
    /// Stored template
    pub text: String,
    /// Defaults merged with the stored step settings, floor applied
    pub settings: GenerationSettings,
}

/// Listing of a recipe's steps with their effective settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDescription {
    /// Recipe name
    pub content_type: String,
    /// Recipe description
    pub description: String,
    /// Steps in execution order
    pub prompts: Vec<PromptDescription>,
}

/// Result of a single ad-hoc prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTestResult {
    /// Generated text or warning sentinel
    pub output: String,
    /// Classification of the backend call
    pub outcome: Outcome,
    /// Settings actually used
    pub settings_used: GenerationSettings,
}

/// Resolves recipes from a store and runs them.
///
/// The store is consulted once per request; a missing recipe fails before
/// any backend call is made.
#[derive(Debug, Clone)]
pub struct ContentGenerator<S, B, R = HtmlRenderer>
where
    S: RecipeStore,
    B: GenerationBackend,
    R: MarkdownRenderer,
{
    store: S,
    executor: RecipeExecutor<B, R>,
}

impl<S: RecipeStore, B: GenerationBackend> ContentGenerator<S, B> {
    /// Create a generator with the default HTML renderer.
    pub fn new(store: S, backend: B, defaults: &GenerationDefaults) -> Self {
        Self {
            store,
            executor: RecipeExecutor::new(backend, defaults),
        }
    }
}

impl<S, B, R> ContentGenerator<S, B, R>
where
    S: RecipeStore,
    B: GenerationBackend,
    R: MarkdownRenderer,
{
    /// Create a generator around an existing executor.
    pub fn from_executor(store: S, executor: RecipeExecutor<B, R>) -> Self {
        Self { store, executor }
    }

    /// Get the recipe store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the executor.
    pub fn executor(&self) -> &RecipeExecutor<B, R> {
        &self.executor
    }

    /// Look up the requested recipe and run it.
    ///
    /// # Errors
    ///
    /// `RecipeErrorKind::NotFound` when `content_type` names no stored
    /// recipe; store faults and validation errors otherwise.
    #[instrument(skip(self, request), fields(content_type = %request.content_type))]
    pub async fn generate(&self, request: &GenerationRequest) -> QuillResult<GenerationResult> {
        let stored = self
            .store
            .find_recipe(&request.content_type)
            .await?
            .ok_or_else(|| {
                RecipeError::new(RecipeErrorKind::NotFound(request.content_type.clone()))
            })?;

        info!(recipe_id = stored.id, "Generating content");
        self.executor.execute(&stored.recipe, request).await
    }

    /// Describe the steps of a stored recipe.
    ///
    /// # Errors
    ///
    /// `RecipeErrorKind::NotFound` when `name` names no stored recipe.
    #[instrument(skip(self))]
    pub async fn describe_recipe(&self, name: &str) -> QuillResult<RecipeDescription> {
        let stored = self
            .store
            .find_recipe(name)
            .await?
            .ok_or_else(|| RecipeError::new(RecipeErrorKind::NotFound(name.to_string())))?;

        let recipe = &stored.recipe;
        let prompts = recipe
            .ordered_steps()
            .into_iter()
            .map(|step| PromptDescription {
                step: *step.step(),
                prompt_key: format!("{}_prompt_{}", recipe.name(), step.step()),
                text: step.text().clone(),
                settings: self.executor.merger().merge(step.settings().as_ref(), None),
            })
            .collect();

        Ok(RecipeDescription {
            content_type: recipe.name().clone(),
            description: recipe.description().clone(),
            prompts,
        })
    }

    /// Send one prompt through the same merge and classification as a step.
    ///
    /// The prompt is sent verbatim; no placeholders are substituted.
    #[instrument(skip(self, prompt, overrides), fields(prompt_len = prompt.len()))]
    pub async fn test_prompt(
        &self,
        prompt: &str,
        overrides: &SettingsOverride,
    ) -> PromptTestResult {
        let settings = self.executor.merger().merge(None, Some(overrides));
        let invocation = self.executor.invoker().invoke(prompt, &settings).await;

        PromptTestResult {
            output: invocation.text,
            outcome: invocation.outcome,
            settings_used: settings,
        }
    }
}
