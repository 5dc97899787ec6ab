//! Generation command handlers.

use super::exit_not_found;
use quill::{
    ContentGenerator, GenerationBackend, GenerationRequest, RecipeStore, ResponseFormat,
    SettingsOverride,
};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Build the request from an optional file, a positional content type and variables.
fn build_request(
    content_type: Option<String>,
    request_file: Option<PathBuf>,
    vars: Vec<(String, String)>,
) -> anyhow::Result<GenerationRequest> {
    let mut request = match request_file {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str::<GenerationRequest>(&text)?
        }
        None => GenerationRequest::default(),
    };

    if let Some(content_type) = content_type {
        request.content_type = content_type;
    }
    if request.content_type.trim().is_empty() {
        anyhow::bail!("no content type given: pass one or use --request with a content_type");
    }

    Ok(vars
        .into_iter()
        .fold(request, |request, (name, value)| request.with_variable(name, value)))
}

/// Handles the generate command.
#[instrument(skip_all)]
pub async fn handle_generate_command<S, B>(
    generator: &ContentGenerator<S, B>,
    content_type: Option<String>,
    request_file: Option<PathBuf>,
    vars: Vec<(String, String)>,
    content_only: bool,
) -> anyhow::Result<()>
where
    S: RecipeStore,
    B: GenerationBackend,
{
    let request = build_request(content_type, request_file, vars)?;
    info!(content_type = %request.content_type, "Generating content");

    let result = match generator.generate(&request).await {
        Ok(result) => result,
        Err(e) if e.is_not_found() => exit_not_found(&request.content_type),
        Err(e) => return Err(e.into()),
    };

    let failed = result.failed_steps().count();
    if failed > 0 {
        tracing::warn!(failed, "Some steps did not complete normally");
    }

    if content_only {
        println!("{}", result.content);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

/// Handles the describe command.
#[instrument(skip(generator))]
pub async fn handle_describe_command<S, B>(
    generator: &ContentGenerator<S, B>,
    content_type: &str,
) -> anyhow::Result<()>
where
    S: RecipeStore,
    B: GenerationBackend,
{
    match generator.describe_recipe(content_type).await {
        Ok(description) => {
            println!("{}", serde_json::to_string_pretty(&description)?);
            Ok(())
        }
        Err(e) if e.is_not_found() => exit_not_found(content_type),
        Err(e) => Err(e.into()),
    }
}

/// Handles the test-prompt command.
#[instrument(skip(generator, prompt))]
pub async fn handle_test_prompt_command<S, B>(
    generator: &ContentGenerator<S, B>,
    prompt: &str,
    overrides: SettingsOverride,
) -> anyhow::Result<()>
where
    S: RecipeStore,
    B: GenerationBackend,
{
    let tested = generator.test_prompt(prompt, &overrides).await;
    println!("{}", serde_json::to_string_pretty(&tested)?);
    Ok(())
}

/// Collect test-prompt flags into a caller settings layer.
pub fn prompt_overrides(
    model: Option<String>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    max_tokens: Option<u32>,
    markdown: bool,
) -> SettingsOverride {
    SettingsOverride {
        model,
        temperature,
        top_p,
        response_format: markdown.then_some(ResponseFormat::Markdown),
        max_output_tokens: max_tokens,
    }
}
