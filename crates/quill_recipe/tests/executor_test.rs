//! Tests for step chaining, forward-feeding and final rendering.

mod common;

use common::{ScriptedBackend, blog_recipe};
use quill_core::{
    GenerationDefaults, GenerationRequest, Outcome, Recipe, ResponseFormat, SettingsOverride,
    StepDefinition, StepKey,
};
use quill_error::{GenerationError, GenerationErrorKind, QuillErrorKind, RecipeErrorKind};
use quill_interface::{FinishCode, MarkdownRenderer, RawResponse};
use quill_recipe::{NO_CONTENT_PRODUCED, RecipeExecutor, SAFETY_WARNING};

/// Renderer that tags its input so tests can see whether it ran.
#[derive(Debug, Clone, Copy)]
struct TaggingRenderer;

impl MarkdownRenderer for TaggingRenderer {
    fn to_html(&self, markdown: &str) -> String {
        format!("<rendered>{}</rendered>", markdown)
    }
}

fn executor(backend: ScriptedBackend) -> RecipeExecutor<ScriptedBackend> {
    RecipeExecutor::new(backend, &GenerationDefaults::default())
}

#[tokio::test]
async fn test_blog_scenario() {
    let backend = ScriptedBackend::new();
    let executor = executor(backend.clone());
    let request = GenerationRequest::new("blog").with_variable("city", "Oslo");

    let result = executor
        .execute(&blog_recipe(), &request)
        .await
        .expect("Execution failed");

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].prompt, "Research Oslo.");
    assert_eq!(
        calls[1].prompt,
        "Write a post about Oslo.\n\nPrevious step result:\nreply 1"
    );

    assert_eq!(result.prompt_outputs, vec!["reply 1", "reply 2"]);
    assert_eq!(result.content, "reply 2");
    assert_eq!(result.content_type, "blog");
    assert_eq!(result.metadata.total_steps, 2);
    assert_eq!(result.metadata.original_prompts, blog_recipe().steps().clone());
    assert_eq!(result.metadata.dynamic_data_used["city"], "Oslo");
    assert!(result.metadata.ignored_overrides.is_empty());

    let details = &result.metadata.step_details;
    assert_eq!(details[0].original_prompt, "Research {city}.");
    assert_eq!(details[0].processed_prompt, "Research Oslo.");
    assert!(details.iter().all(|d| d.outcome == Outcome::Completed));
}

#[tokio::test]
async fn test_steps_run_in_ascending_order() {
    let recipe = Recipe::builder()
        .name("sparse")
        .steps(vec![
            StepDefinition::new(30, "third"),
            StepDefinition::new(-5, "first"),
            StepDefinition::new(7, "second"),
        ])
        .build()
        .unwrap();
    let backend = ScriptedBackend::new();

    let result = executor(backend.clone())
        .execute(&recipe, &GenerationRequest::new("sparse"))
        .await
        .unwrap();

    let order: Vec<i64> = result.metadata.step_details.iter().map(|d| d.step).collect();
    assert_eq!(order, vec![-5, 7, 30]);
    assert!(backend.calls()[0].prompt.starts_with("first"));
    assert!(backend.calls()[2].prompt.starts_with("third"));
}

#[tokio::test]
async fn test_custom_prompt_replaces_template() {
    let backend = ScriptedBackend::new();
    let request = GenerationRequest::new("blog")
        .with_variable("city", "Oslo")
        .with_prompt(StepKey::new(1), "Override text about {city}");

    let result = executor(backend.clone())
        .execute(&blog_recipe(), &request)
        .await
        .unwrap();

    let details = &result.metadata.step_details;
    assert_eq!(details[0].original_prompt, "Override text about {city}");
    assert_eq!(details[0].processed_prompt, "Override text about Oslo");
    assert_eq!(details[1].original_prompt, "Write a post about {city}.");
    assert!(!backend.calls()[0].prompt.contains("Research"));
}

#[tokio::test]
async fn test_caller_settings_apply_to_addressed_step_only() {
    let backend = ScriptedBackend::new();
    let request = GenerationRequest::new("blog").with_settings(
        StepKey::new(2),
        SettingsOverride::default()
            .with_model("gemini-2.5-pro")
            .with_temperature(0.1),
    );

    let result = executor(backend.clone())
        .execute(&blog_recipe(), &request)
        .await
        .unwrap();

    let calls = backend.calls();
    assert_eq!(calls[0].model, "gemini-2.5-flash");
    assert_eq!(calls[1].model, "gemini-2.5-pro");
    assert_eq!(result.metadata.step_details[1].settings_used.temperature, 0.1);
    assert_eq!(result.metadata.step_details[0].settings_used.temperature, 0.7);
}

#[tokio::test]
async fn test_stored_settings_below_floor_are_raised() {
    let recipe = Recipe::builder()
        .name("short")
        .steps(vec![StepDefinition::new(1, "Go").with_settings(
            SettingsOverride::default().with_max_output_tokens(256u32),
        )])
        .build()
        .unwrap();
    let backend = ScriptedBackend::new();

    executor(backend.clone())
        .execute(&recipe, &GenerationRequest::new("short"))
        .await
        .unwrap();

    assert_eq!(backend.calls()[0].settings.max_output_tokens, 8000);
}

#[tokio::test]
async fn test_zero_steps_yields_sentinel() {
    let recipe = Recipe::builder().name("empty").build().unwrap();
    let backend = ScriptedBackend::new();

    let result = executor(backend.clone())
        .execute(&recipe, &GenerationRequest::new("empty"))
        .await
        .unwrap();

    assert_eq!(result.content, NO_CONTENT_PRODUCED);
    assert!(result.prompt_outputs.is_empty());
    assert!(result.metadata.step_details.is_empty());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_warning_is_fed_forward() {
    let backend = ScriptedBackend::with_script(vec![Ok(RawResponse::new(
        Some(FinishCode::from("SAFETY")),
        None,
    ))]);

    let result = executor(backend.clone())
        .execute(&blog_recipe(), &GenerationRequest::new("blog"))
        .await
        .unwrap();

    let details = &result.metadata.step_details;
    assert_eq!(details[0].outcome, Outcome::SafetyBlocked);
    assert_eq!(details[0].output, SAFETY_WARNING);
    assert!(details[1].processed_prompt.contains(SAFETY_WARNING));
    assert_eq!(details[1].outcome, Outcome::Completed);
    assert_eq!(result.failed_steps().count(), 1);
}

#[tokio::test]
async fn test_backend_fault_does_not_abort_chain() {
    let backend = ScriptedBackend::with_script(vec![Err(GenerationError::new(
        GenerationErrorKind::Api {
            status: 429,
            message: "quota exhausted".to_string(),
        },
    ))]);

    let result = executor(backend.clone())
        .execute(&blog_recipe(), &GenerationRequest::new("blog"))
        .await
        .unwrap();

    assert_eq!(backend.call_count(), 2);
    let first = &result.metadata.step_details[0];
    assert_eq!(first.outcome, Outcome::BackendError);
    assert!(first.output.contains("quota exhausted"));
    assert!(result.metadata.step_details[1]
        .processed_prompt
        .contains("quota exhausted"));
}

#[tokio::test]
async fn test_markdown_on_final_step_is_rendered() {
    let recipe = Recipe::builder()
        .name("md")
        .steps(vec![
            StepDefinition::new(1, "Outline"),
            StepDefinition::new(2, "Write").with_settings(
                SettingsOverride::default().with_response_format(ResponseFormat::Markdown),
            ),
        ])
        .build()
        .unwrap();

    let result = executor(ScriptedBackend::new())
        .with_renderer(TaggingRenderer)
        .execute(&recipe, &GenerationRequest::new("md"))
        .await
        .unwrap();

    assert_eq!(result.content, "<rendered>reply 2</rendered>");
    assert_eq!(result.prompt_outputs[1], "reply 2");
}

#[tokio::test]
async fn test_markdown_on_intermediate_step_is_not_rendered() {
    let recipe = Recipe::builder()
        .name("md")
        .steps(vec![
            StepDefinition::new(1, "Outline").with_settings(
                SettingsOverride::default().with_response_format(ResponseFormat::Markdown),
            ),
            StepDefinition::new(2, "Write"),
        ])
        .build()
        .unwrap();

    let result = executor(ScriptedBackend::new())
        .with_renderer(TaggingRenderer)
        .execute(&recipe, &GenerationRequest::new("md"))
        .await
        .unwrap();

    assert_eq!(result.content, "reply 2");
}

#[tokio::test]
async fn test_caller_can_switch_final_step_to_markdown() {
    let request = GenerationRequest::new("blog").with_settings(
        StepKey::new(2),
        SettingsOverride::default().with_response_format(ResponseFormat::Markdown),
    );

    let result = executor(ScriptedBackend::new())
        .execute(&blog_recipe(), &request)
        .await
        .unwrap();

    assert_eq!(result.content, "<p>reply 2</p>\n");
}

#[tokio::test]
async fn test_unmatched_overrides_are_reported() {
    let request = GenerationRequest::new("blog")
        .with_prompt(StepKey::new(5), "never used")
        .with_settings(StepKey::new(1), SettingsOverride::default().with_top_p(0.5));

    let result = executor(ScriptedBackend::new())
        .execute(&blog_recipe(), &request)
        .await
        .unwrap();

    assert_eq!(result.metadata.ignored_overrides, vec!["step_5".to_string()]);
    assert_eq!(result.metadata.step_details[0].settings_used.top_p, 0.5);
}

#[tokio::test]
async fn test_non_canonical_override_keys_are_reported() {
    let mut request = GenerationRequest::new("blog").with_variable("city", "Oslo");
    request
        .custom_prompts
        .insert("step_01".to_string(), "Override".to_string());
    request.custom_settings.insert(
        "step_+2".to_string(),
        SettingsOverride::default().with_temperature(0.1),
    );

    let result = executor(ScriptedBackend::new())
        .execute(&blog_recipe(), &request)
        .await
        .unwrap();

    let details = &result.metadata.step_details;
    assert_eq!(details[0].original_prompt, "Research {city}.");
    assert_eq!(details[1].settings_used.temperature, 0.7);
    assert_eq!(
        result.metadata.ignored_overrides,
        vec!["step_+2".to_string(), "step_01".to_string()]
    );
}

#[tokio::test]
async fn test_invalid_recipe_makes_no_calls() {
    let recipe = Recipe::builder()
        .name("dup")
        .steps(vec![StepDefinition::new(1, "a"), StepDefinition::new(1, "b")])
        .build()
        .unwrap();
    let backend = ScriptedBackend::new();

    let err = executor(backend.clone())
        .execute(&recipe, &GenerationRequest::new("dup"))
        .await
        .unwrap_err();

    match err.kind() {
        QuillErrorKind::Recipe(e) => assert!(matches!(
            e.kind,
            RecipeErrorKind::DuplicateStep { step: 1, .. }
        )),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_call_timeout_is_backend_error() {
    let backend = ScriptedBackend::new().with_delay(std::time::Duration::from_secs(60));
    let defaults = GenerationDefaults::default().with_call_timeout_secs(5u64);
    let executor = RecipeExecutor::new(backend.clone(), &defaults);

    let result = executor
        .execute(&blog_recipe(), &GenerationRequest::new("blog"))
        .await
        .unwrap();

    assert_eq!(backend.call_count(), 2);
    for detail in &result.metadata.step_details {
        assert_eq!(detail.outcome, Outcome::BackendError);
        assert!(detail.output.contains("timed out after 5 seconds"));
    }
}
