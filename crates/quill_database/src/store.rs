//! Diesel-backed implementation of RecipeStore.

use crate::models::{ContentConfigRow, NewContentConfig};
use crate::schema::content_configs;
use crate::{DatabaseResult, SqlitePool, create_pool, run_migrations};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use quill_core::{Recipe, StepDefinition};
use quill_error::{
    DatabaseError, DatabaseErrorKind, QuillResult, RecipeError, RecipeErrorKind,
};
use quill_interface::{RecipeStore, RecipeSummary, StoredRecipe};
use tracing::{debug, info, instrument};

/// Recipe store persisting to SQLite through an r2d2 pool.
///
/// Every operation checks out one connection inside `spawn_blocking` and
/// returns it to the pool on all exit paths. Writes run in an immediate
/// transaction, so a failed write leaves no partial row behind.
#[derive(Debug, Clone)]
pub struct DatabaseRecipeStore {
    pool: SqlitePool,
}

impl DatabaseRecipeStore {
    /// Wrap an existing pool. The schema must already be migrated.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and apply migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or a migration fails.
    #[instrument(name = "database.connect")]
    pub async fn connect(database_url: &str, pool_size: u32) -> QuillResult<Self> {
        let url = database_url.to_string();
        let pool = tokio::task::spawn_blocking(move || -> DatabaseResult<SqlitePool> {
            let pool = create_pool(&url, pool_size)?;
            let mut conn = pool.get()?;
            run_migrations(&mut conn)?;
            Ok(pool)
        })
        .await
        .map_err(join_error)??;

        info!("Recipe database ready");
        Ok(Self::new(pool))
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run `op` on a pooled connection in the blocking thread pool.
    async fn with_conn<T, F>(&self, op: F) -> QuillResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> QuillResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(DatabaseError::from)?;
            op(&mut *conn)
        })
        .await
        .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Connection(format!(
        "Task join error: {}",
        e
    )))
}

fn not_found(name: &str) -> RecipeError {
    RecipeError::new(RecipeErrorKind::NotFound(name.to_string()))
}

/// A row that may be missing after a write.
type MaybeRow = DatabaseResult<Option<ContentConfigRow>>;

fn load_by_name(conn: &mut SqliteConnection, name: &str) -> MaybeRow {
    Ok(content_configs::table
        .filter(content_configs::name.eq(name))
        .select(ContentConfigRow::as_select())
        .first(conn)
        .optional()?)
}

#[async_trait]
impl RecipeStore for DatabaseRecipeStore {
    #[instrument(skip(self))]
    async fn find_recipe(&self, name: &str) -> QuillResult<Option<StoredRecipe>> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            let row = load_by_name(conn, &name)?;
            Ok(row.map(ContentConfigRow::into_stored).transpose()?)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_recipes(&self) -> QuillResult<Vec<RecipeSummary>> {
        self.with_conn(|conn| {
            let rows = content_configs::table
                .order(content_configs::id.asc())
                .select(ContentConfigRow::as_select())
                .load(conn)
                .map_err(DatabaseError::from)?;

            let summaries = rows
                .into_iter()
                .map(|row| row.into_stored().map(|stored| RecipeSummary::from(&stored)))
                .collect::<DatabaseResult<Vec<_>>>()?;
            debug!(count = summaries.len(), "Listed recipes");
            Ok(summaries)
        })
        .await
    }

    #[instrument(skip(self, recipe), fields(recipe = %recipe.name()))]
    async fn create_recipe(&self, recipe: &Recipe) -> QuillResult<StoredRecipe> {
        recipe.validate()?;
        let recipe = recipe.clone();

        self.with_conn(move |conn| {
            let inserted = conn.immediate_transaction(|conn| -> MaybeRow {
                if load_by_name(conn, recipe.name())?.is_some() {
                    return Ok(None);
                }
                diesel::insert_into(content_configs::table)
                    .values(NewContentConfig::from_recipe(&recipe)?)
                    .execute(conn)?;
                load_by_name(conn, recipe.name())
            })?;

            let row = inserted.ok_or_else(|| {
                RecipeError::new(RecipeErrorKind::AlreadyExists(recipe.name().clone()))
            })?;
            info!(id = row.id, "Recipe created");
            Ok(row.into_stored()?)
        })
        .await
    }

    #[instrument(skip(self, description, steps))]
    async fn update_recipe(
        &self,
        name: &str,
        description: &str,
        steps: &[StepDefinition],
    ) -> QuillResult<StoredRecipe> {
        let candidate = Recipe::builder()
            .name(name)
            .description(description)
            .steps(steps.to_vec())
            .build()
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Serialization(e.to_string())))?;
        candidate.validate()?;

        let prompts = serde_json::to_string(candidate.steps()).map_err(DatabaseError::from)?;
        self.with_conn(move |conn| {
            let updated = conn.immediate_transaction(|conn| -> MaybeRow {
                let affected = diesel::update(
                    content_configs::table.filter(content_configs::name.eq(candidate.name())),
                )
                .set((
                    content_configs::description.eq(candidate.description()),
                    content_configs::prompts.eq(&prompts),
                ))
                .execute(conn)?;

                if affected == 0 {
                    return Ok(None);
                }
                load_by_name(conn, candidate.name())
            })?;

            let row = updated.ok_or_else(|| not_found(candidate.name()))?;
            info!(id = row.id, "Recipe updated");
            Ok(row.into_stored()?)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_recipe(&self, name: &str) -> QuillResult<()> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            let affected =
                diesel::delete(content_configs::table.filter(content_configs::name.eq(&name)))
                    .execute(conn)
                    .map_err(DatabaseError::from)?;

            if affected == 0 {
                return Err(not_found(&name).into());
            }
            info!("Recipe deleted");
            Ok(())
        })
        .await
    }
}
