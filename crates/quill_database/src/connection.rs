//! Connection pooling and schema migrations.

use crate::DatabaseResult;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use quill_error::{DatabaseError, DatabaseErrorKind};
use tracing::instrument;

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pool of SQLite connections.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Sets per-connection pragmas on checkout.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query(format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the SQLite database at `database_url`.
///
/// The file is created if it does not exist.
///
/// # Errors
///
/// Returns an error if the pool cannot open its first connection.
#[instrument(name = "database.create_pool")]
pub fn create_pool(database_url: &str, pool_size: u32) -> DatabaseResult<SqlitePool> {
    tracing::debug!("Creating SQLite connection pool");
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    Pool::builder()
        .max_size(pool_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create connection pool");
            DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
        })
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns a `DatabaseErrorKind::Migration` error if a migration fails.
#[instrument(name = "database.run_migrations", skip(conn))]
pub fn run_migrations(conn: &mut SqliteConnection) -> DatabaseResult<()> {
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        tracing::error!(error = %e, "Migration failed");
        DatabaseError::new(DatabaseErrorKind::Migration(e.to_string()))
    })?;

    tracing::debug!(count = applied.len(), "Migrations applied");
    Ok(())
}
