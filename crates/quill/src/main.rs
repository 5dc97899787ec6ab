//! Quill command-line interface.
//!
//! Runs stored content recipes against Gemini and manages the recipe
//! database. Configuration is read from `quill.toml` and `QUILL__*`
//! environment variables; the API key is read from the variable named by
//! `gemini.api_key_env` (default `GEMINI_API_KEY`).

mod cli;

use clap::Parser;
use cli::{
    Cli, Commands, handle_describe_command, handle_generate_command, handle_recipe_command,
    handle_test_prompt_command, prompt_overrides,
};
use quill::{ContentGenerator, DatabaseRecipeStore, GeminiClient, QuillConfig, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format, "info")?;

    let config = QuillConfig::load(cli.config.as_deref())?;
    info!(
        database = %config.database().url(),
        model = %config.generation().model(),
        "Configuration loaded"
    );

    let store =
        DatabaseRecipeStore::connect(config.database().url(), *config.database().pool_size())
            .await?;

    match cli.command {
        Commands::Recipes { action } => handle_recipe_command(&store, action).await,
        Commands::Generate {
            content_type,
            request,
            vars,
            content_only,
        } => {
            let generator = build_generator(&config, store)?;
            handle_generate_command(&generator, content_type, request, vars, content_only).await
        }
        Commands::Describe { content_type } => {
            let generator = build_generator(&config, store)?;
            handle_describe_command(&generator, &content_type).await
        }
        Commands::TestPrompt {
            prompt,
            model,
            temperature,
            top_p,
            max_tokens,
            markdown,
        } => {
            let generator = build_generator(&config, store)?;
            let overrides = prompt_overrides(model, temperature, top_p, max_tokens, markdown);
            handle_test_prompt_command(&generator, &prompt, overrides).await
        }
    }
}

/// Connect to Gemini and wrap the store in a generator.
fn build_generator(
    config: &QuillConfig,
    store: DatabaseRecipeStore,
) -> anyhow::Result<ContentGenerator<DatabaseRecipeStore, GeminiClient>> {
    let gemini = config.gemini();
    let backend = GeminiClient::from_env(gemini.api_key_env(), gemini.base_url())?;
    Ok(ContentGenerator::new(store, backend, config.generation()))
}
