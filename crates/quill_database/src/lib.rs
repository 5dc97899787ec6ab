//! SQLite recipe storage for Quill.
//!
//! Recipes live in a single `content_configs` table with their steps stored
//! as a JSON array. Schema migrations are embedded and applied by
//! [`DatabaseRecipeStore::connect`].

mod connection;
mod models;
pub mod schema;
mod store;

pub use connection::{MIGRATIONS, SqlitePool, create_pool, run_migrations};
pub use models::{ContentConfigRow, NewContentConfig};
pub use store::DatabaseRecipeStore;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, quill_error::DatabaseError>;
