//! Row types for the `content_configs` table.

use crate::DatabaseResult;
use crate::schema::content_configs;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use quill_core::{Recipe, StepDefinition};
use quill_error::{DatabaseError, DatabaseErrorKind};
use quill_interface::StoredRecipe;

/// A stored recipe row. Steps are kept as a JSON array in `prompts`.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = content_configs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContentConfigRow {
    /// Row identifier
    pub id: i32,
    /// Content-type name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON array of step definitions
    pub prompts: String,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
}

/// Insert form of a recipe row.
#[derive(Debug, Insertable)]
#[diesel(table_name = content_configs)]
pub struct NewContentConfig<'a> {
    /// Content-type name
    pub name: &'a str,
    /// Human-readable description
    pub description: &'a str,
    /// JSON array of step definitions
    pub prompts: String,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
}

impl<'a> NewContentConfig<'a> {
    /// Serializes a recipe into an insertable row stamped with the current time.
    pub fn from_recipe(recipe: &'a Recipe) -> DatabaseResult<Self> {
        Ok(Self {
            name: recipe.name(),
            description: recipe.description(),
            prompts: serde_json::to_string(recipe.steps())?,
            created_at: chrono::Utc::now().naive_utc(),
        })
    }
}

impl ContentConfigRow {
    /// Decoded step definitions.
    pub fn steps(&self) -> DatabaseResult<Vec<StepDefinition>> {
        Ok(serde_json::from_str(&self.prompts)?)
    }

    /// Converts the row into a stored recipe.
    pub fn into_stored(self) -> DatabaseResult<StoredRecipe> {
        let steps = self.steps()?;
        let recipe = Recipe::builder()
            .name(self.name)
            .description(self.description)
            .steps(steps)
            .build()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Serialization(e.to_string())))?;

        Ok(StoredRecipe {
            id: self.id,
            recipe,
            created_at: self.created_at.and_utc(),
        })
    }
}
