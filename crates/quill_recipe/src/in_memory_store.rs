//! In-memory implementation of RecipeStore.
//!
//! Recipes live in a HashMap behind an RwLock and are lost when the store is
//! dropped. Useful for tests and for running recipes loaded from files.

use async_trait::async_trait;
use chrono::Utc;
use quill_core::{Recipe, StepDefinition};
use quill_error::{QuillResult, RecipeError, RecipeErrorKind};
use quill_interface::{RecipeStore, RecipeSummary, StoredRecipe};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// In-memory recipe store keyed by content-type name.
///
/// # Example
/// ```no_run
/// use quill_core::{Recipe, StepDefinition};
/// use quill_interface::RecipeStore;
/// use quill_recipe::InMemoryRecipeStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryRecipeStore::new();
///     let recipe = Recipe::builder()
///         .name("blog")
///         .steps(vec![StepDefinition::new(1, "Research {city}.")])
///         .build()
///         .unwrap();
///     store.create_recipe(&recipe).await.unwrap();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryRecipeStore {
    /// Stored recipes, keyed by name
    recipes: Arc<RwLock<HashMap<String, StoredRecipe>>>,
    /// Next ID to assign
    next_id: Arc<RwLock<i32>>,
}

impl InMemoryRecipeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            recipes: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Create a store holding the given recipes.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or duplicate recipe.
    pub async fn with_recipes(recipes: impl IntoIterator<Item = Recipe>) -> QuillResult<Self> {
        let store = Self::new();
        for recipe in recipes {
            store.create_recipe(&recipe).await?;
        }
        Ok(store)
    }

    /// Get the number of stored recipes.
    pub async fn len(&self) -> usize {
        self.recipes.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.recipes.read().await.is_empty()
    }
}

impl Default for InMemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(name: &str) -> RecipeError {
    RecipeError::new(RecipeErrorKind::NotFound(name.to_string()))
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn find_recipe(&self, name: &str) -> QuillResult<Option<StoredRecipe>> {
        Ok(self.recipes.read().await.get(name).cloned())
    }

    async fn list_recipes(&self) -> QuillResult<Vec<RecipeSummary>> {
        let recipes = self.recipes.read().await;
        let mut summaries: Vec<RecipeSummary> = recipes.values().map(RecipeSummary::from).collect();
        summaries.sort_by_key(|s| s.id);
        Ok(summaries)
    }

    #[instrument(skip(self, recipe), fields(recipe = %recipe.name()))]
    async fn create_recipe(&self, recipe: &Recipe) -> QuillResult<StoredRecipe> {
        recipe.validate()?;

        let mut recipes = self.recipes.write().await;
        if recipes.contains_key(recipe.name()) {
            return Err(
                RecipeError::new(RecipeErrorKind::AlreadyExists(recipe.name().clone())).into(),
            );
        }

        let mut next_id = self.next_id.write().await;
        let stored = StoredRecipe {
            id: *next_id,
            recipe: recipe.clone(),
            created_at: Utc::now(),
        };
        *next_id += 1;

        recipes.insert(recipe.name().clone(), stored.clone());
        debug!(id = stored.id, "Recipe created");
        Ok(stored)
    }

    #[instrument(skip(self, description, steps))]
    async fn update_recipe(
        &self,
        name: &str,
        description: &str,
        steps: &[StepDefinition],
    ) -> QuillResult<StoredRecipe> {
        let mut recipes = self.recipes.write().await;
        let existing = recipes.get(name).ok_or_else(|| not_found(name))?;

        let mut updated = existing.clone();
        updated
            .recipe
            .replace_content(description.to_string(), steps.to_vec());
        updated.recipe.validate()?;

        recipes.insert(name.to_string(), updated.clone());
        debug!(id = updated.id, "Recipe updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_recipe(&self, name: &str) -> QuillResult<()> {
        self.recipes
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name).into())
    }
}
