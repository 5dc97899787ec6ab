//! Quill: multi-step content recipes over generative text backends.
//!
//! A recipe is a named, ordered list of prompt templates. Running one
//! substitutes caller variables into each template, resolves generation
//! settings layer by layer, calls the backend once per step and feeds each
//! step's output into the next, returning the final content together with a
//! per-step audit trail.
//!
//! # Features
//!
//! - `gemini` (default): Google Gemini backend
//! - `database` (default): SQLite recipe storage
//!
//! # Example
//!
//! ```no_run
//! use quill::{ContentGenerator, GenerationRequest, InMemoryRecipeStore, QuillConfig};
//! # #[cfg(feature = "gemini")]
//! use quill::GeminiClient;
//!
//! # #[cfg(feature = "gemini")]
//! # async fn run() -> quill::QuillResult<()> {
//! let config = QuillConfig::load(None)?;
//! let gemini = config.gemini();
//! let backend = GeminiClient::from_env(gemini.api_key_env(), gemini.base_url())?;
//! let generator = ContentGenerator::new(InMemoryRecipeStore::new(), backend, config.generation());
//!
//! let request = GenerationRequest::new("blog").with_variable("city", "Oslo");
//! let result = generator.generate(&request).await?;
//! println!("{}", result.content);
//! # Ok(())
//! # }
//! ```

mod config;

pub use self::config::{
    CONFIG_FILE_NAME, DEFAULT_GEMINI_API_KEY_ENV, DEFAULT_GEMINI_BASE_URL, DatabaseConfig,
    GeminiConfig, QuillConfig,
};

pub use quill_core::{
    GenerationDefaults, GenerationMetadata, GenerationRequest, GenerationResult,
    GenerationSettings, LogFormat, Outcome, Recipe, RecipeBuilder, ResponseFormat,
    SettingsOverride, StepDefinition, StepKey, StepResult, init_tracing,
};
pub use quill_error::{
    ConfigError, DatabaseError, DatabaseErrorKind, GenerationError, GenerationErrorKind,
    JsonError, QuillError, QuillErrorKind, QuillResult, RecipeError, RecipeErrorKind,
};
pub use quill_interface::{
    FinishCode, GenerationBackend, MarkdownRenderer, RawResponse, RecipeStore, RecipeSummary,
    StoredRecipe,
};
pub use quill_recipe::{
    ContentGenerator, GenerationInvoker, HtmlRenderer, InMemoryRecipeStore, Invocation,
    NO_CONTENT_PRODUCED, PREVIOUS_STEP_LABEL, PromptDescription, PromptTestResult,
    RecipeDescription, RecipeExecutor, SettingsMerger, classify, merge_settings, resolve,
};

#[cfg(feature = "gemini")]
pub use quill_models::GeminiClient;

#[cfg(feature = "database")]
pub use quill_database::DatabaseRecipeStore;
