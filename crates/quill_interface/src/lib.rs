//! Trait definitions for the collaborators of the recipe executor.
//!
//! The executor never talks to a concrete database, HTTP client or markdown
//! library. It is handed implementations of the traits in this crate.

mod backend;
mod render;
mod store;

pub use backend::{FinishCode, GenerationBackend, RawResponse};
pub use render::MarkdownRenderer;
pub use store::{RecipeStore, RecipeSummary, StoredRecipe};
