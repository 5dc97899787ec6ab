//! Core data types for the Quill content recipe engine.
//!
//! This crate provides the recipe, request, settings and result types shared
//! by the executor, the stores and the generation backends.

mod observability;
mod outcome;
mod recipe;
mod request;
mod result;
mod settings;

pub use observability::{LogFormat, init_tracing};
pub use outcome::Outcome;
pub use recipe::{Recipe, RecipeBuilder, StepDefinition, StepKey};
pub use request::GenerationRequest;
pub use result::{GenerationMetadata, GenerationResult, StepResult};
pub use settings::{
    DEFAULT_MODEL, DEFAULT_OUTPUT_TOKEN_FLOOR, GenerationDefaults, GenerationSettings,
    ResponseFormat, SettingsOverride,
};
