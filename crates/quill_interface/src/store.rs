//! Recipe store trait and record types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_core::{Recipe, StepDefinition};
use quill_error::QuillResult;
use serde::{Deserialize, Serialize};

/// A recipe together with its storage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecipe {
    /// Storage identifier
    pub id: i32,
    /// The recipe itself
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Listing entry for a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Storage identifier
    pub id: i32,
    /// Content-type name
    pub content_type: String,
    /// Human-readable description
    pub description: String,
    /// Number of steps
    pub prompt_count: usize,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&StoredRecipe> for RecipeSummary {
    fn from(stored: &StoredRecipe) -> Self {
        Self {
            id: stored.id,
            content_type: stored.recipe.name().clone(),
            description: stored.recipe.description().clone(),
            prompt_count: stored.recipe.steps().len(),
            created_at: stored.created_at,
        }
    }
}

/// Persistent storage of recipes keyed by content-type name.
///
/// Read-only from the executor's point of view during a run. Implementations
/// must be safe for concurrent use.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Look up a recipe by name.
    ///
    /// Returns `Ok(None)` when no recipe has that name.
    async fn find_recipe(&self, name: &str) -> QuillResult<Option<StoredRecipe>>;

    /// List every stored recipe, ordered by id.
    async fn list_recipes(&self) -> QuillResult<Vec<RecipeSummary>>;

    /// Store a new recipe.
    ///
    /// Fails with `RecipeErrorKind::AlreadyExists` if the name is taken.
    async fn create_recipe(&self, recipe: &Recipe) -> QuillResult<StoredRecipe>;

    /// Replace the description and steps of an existing recipe.
    ///
    /// Fails with `RecipeErrorKind::NotFound` if the name is unknown.
    async fn update_recipe(
        &self,
        name: &str,
        description: &str,
        steps: &[StepDefinition],
    ) -> QuillResult<StoredRecipe>;

    /// Remove a recipe.
    ///
    /// Fails with `RecipeErrorKind::NotFound` if the name is unknown.
    async fn delete_recipe(&self, name: &str) -> QuillResult<()>;
}
