//! Recipe execution engine for Quill.
//!
//! This crate drives multi-step content recipes: it substitutes template
//! variables, merges generation settings layer by layer, calls the
//! generation backend once per step and classifies each answer, feeding
//! every step's output into the next.
//!
//! # Example
//!
//! ```no_run
//! use quill_core::{GenerationDefaults, GenerationRequest, Recipe, StepDefinition};
//! use quill_interface::GenerationBackend;
//! use quill_recipe::RecipeExecutor;
//!
//! async fn run(backend: impl GenerationBackend) -> quill_error::QuillResult<()> {
//!     let recipe = Recipe::builder()
//!         .name("blog")
//!         .steps(vec![
//!             StepDefinition::new(1, "Research {city}."),
//!             StepDefinition::new(2, "Write a post about {city}."),
//!         ])
//!         .build()
//!         .unwrap();
//!
//!     let executor = RecipeExecutor::new(backend, &GenerationDefaults::default());
//!     let request = GenerationRequest::new("blog").with_variable("city", "Oslo");
//!     let result = executor.execute(&recipe, &request).await?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod executor;
mod generator;
mod in_memory_store;
mod invoker;
mod markdown;
mod settings;
mod template;

pub use executor::{NO_CONTENT_PRODUCED, PREVIOUS_STEP_LABEL, RecipeExecutor};
pub use generator::{ContentGenerator, PromptDescription, PromptTestResult, RecipeDescription};
pub use in_memory_store::InMemoryRecipeStore;
pub use invoker::{
    EMPTY_RESPONSE_WARNING, GenerationInvoker, Invocation, RECITATION_WARNING, SAFETY_WARNING,
    backend_error_warning, classify, token_limit_warning,
};
pub use markdown::HtmlRenderer;
pub use settings::{SettingsMerger, merge_settings};
pub use template::resolve;
