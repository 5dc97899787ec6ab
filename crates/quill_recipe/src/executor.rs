//! Step chain orchestration.
//!
//! A run is a fold over the recipe's steps in ascending order. The
//! accumulator carries the previous step's output and the audit records
//! collected so far; nothing else is shared between steps.

use crate::{GenerationInvoker, HtmlRenderer, SettingsMerger, resolve};
use futures::stream::{self, StreamExt};
use quill_core::{
    GenerationDefaults, GenerationMetadata, GenerationRequest, GenerationResult, Recipe,
    StepDefinition, StepResult,
};
use quill_error::QuillResult;
use quill_interface::{GenerationBackend, MarkdownRenderer};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Final content of a run over a recipe with no steps.
pub const NO_CONTENT_PRODUCED: &str = "No content produced.";

/// Label introducing the forward-fed output of the previous step.
pub const PREVIOUS_STEP_LABEL: &str = "Previous step result:";

/// Fold accumulator.
#[derive(Debug, Default)]
struct ChainState {
    previous: Option<String>,
    results: Vec<StepResult>,
}

/// Append the previous step's output to a resolved prompt.
fn forward_feed(resolved: String, previous: Option<&str>) -> String {
    match previous {
        Some(prev) => format!("{}\n\n{}\n{}", resolved, PREVIOUS_STEP_LABEL, prev),
        None => resolved,
    }
}

/// Runs recipes step by step against a generation backend.
///
/// Holds no mutable state; one executor can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct RecipeExecutor<B: GenerationBackend, R: MarkdownRenderer = HtmlRenderer> {
    invoker: GenerationInvoker<B>,
    merger: SettingsMerger,
    renderer: R,
}

impl<B: GenerationBackend> RecipeExecutor<B> {
    /// Create an executor using the given defaults, token floor and call timeout.
    pub fn new(backend: B, defaults: &GenerationDefaults) -> Self {
        Self {
            invoker: GenerationInvoker::new(backend).with_timeout(defaults.call_timeout()),
            merger: SettingsMerger::from(defaults),
            renderer: HtmlRenderer,
        }
    }
}

impl<B: GenerationBackend, R: MarkdownRenderer> RecipeExecutor<B, R> {
    /// Replace the markdown renderer.
    pub fn with_renderer<R2: MarkdownRenderer>(self, renderer: R2) -> RecipeExecutor<B, R2> {
        RecipeExecutor {
            invoker: self.invoker,
            merger: self.merger,
            renderer,
        }
    }

    /// Get the invoker used for backend calls.
    pub fn invoker(&self) -> &GenerationInvoker<B> {
        &self.invoker
    }

    /// Get the settings merger.
    pub fn merger(&self) -> &SettingsMerger {
        &self.merger
    }

    /// Run every step of `recipe` once, in ascending step order.
    ///
    /// Content outcomes and backend faults never abort the run; they are
    /// recorded in the audit trail and fed forward like any other output.
    ///
    /// # Errors
    ///
    /// Returns a `RecipeError` if the recipe is invalid. No backend call is
    /// made in that case.
    #[instrument(
        skip(self, recipe, request),
        fields(recipe = %recipe.name(), steps = recipe.steps().len())
    )]
    pub async fn execute(
        &self,
        recipe: &Recipe,
        request: &GenerationRequest,
    ) -> QuillResult<GenerationResult> {
        recipe.validate()?;

        let ordered = recipe.ordered_steps();
        let indices: Vec<i64> = ordered.iter().map(|s| *s.step()).collect();
        let ignored_overrides = request.unmatched_overrides(&indices);
        if !ignored_overrides.is_empty() {
            warn!(keys = ?ignored_overrides, "Request overrides address no step");
        }

        let variables = request.variables();
        let variables = &variables;

        let state = stream::iter(ordered)
            .fold(ChainState::default(), move |state, step| {
                self.run_step(state, step, request, variables)
            })
            .await;

        let content = self.final_content(&state.results);
        let prompt_outputs: Vec<String> = state.results.iter().map(|r| r.output.clone()).collect();

        info!(
            steps_run = state.results.len(),
            failed = state.results.iter().filter(|r| !r.outcome.is_success()).count(),
            "Recipe run finished"
        );

        Ok(GenerationResult {
            content,
            prompt_outputs,
            content_type: recipe.name().clone(),
            metadata: GenerationMetadata {
                total_steps: recipe.steps().len(),
                dynamic_data_used: request.dynamic_data.clone(),
                step_details: state.results,
                original_prompts: recipe.steps().clone(),
                ignored_overrides,
            },
        })
    }

    /// Execute one step and advance the accumulator.
    async fn run_step(
        &self,
        mut state: ChainState,
        step: &StepDefinition,
        request: &GenerationRequest,
        variables: &BTreeMap<String, String>,
    ) -> ChainState {
        let index = *step.step();
        let template = request
            .prompt_override(index)
            .unwrap_or(step.text().as_str());
        let processed = forward_feed(resolve(template, variables), state.previous.as_deref());
        let settings = self
            .merger
            .merge(step.settings().as_ref(), request.settings_override(index));

        debug!(step = index, model = %settings.model, prompt_len = processed.len(), "Running step");
        let invocation = self.invoker.invoke(&processed, &settings).await;
        if !invocation.outcome.is_success() {
            warn!(step = index, outcome = %invocation.outcome, "Step did not complete normally");
        }

        state.previous = Some(invocation.text.clone());
        state.results.push(StepResult {
            step: index,
            original_prompt: template.to_string(),
            processed_prompt: processed,
            settings_used: settings,
            output: invocation.text,
            outcome: invocation.outcome,
        });
        state
    }

    /// Last step's output, rendered when that step asked for markdown.
    fn final_content(&self, results: &[StepResult]) -> String {
        match results.last() {
            None => NO_CONTENT_PRODUCED.to_string(),
            Some(last) if last.settings_used.response_format.is_markdown() => {
                self.renderer.to_html(&last.output)
            }
            Some(last) => last.output.clone(),
        }
    }
}
