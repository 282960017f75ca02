//! Repository layer for database operations
//!
//! Every method acquires a pooled connection (or opens a transaction) for a
//! single unit of work. Transactions that are dropped without `commit` roll
//! back, so early returns and `?` never leave partial writes behind.

pub mod books;
pub mod favorites;
pub mod loans;
pub mod schema;
pub mod users;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
    ConnectOptions,
};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::CreateBook,
};

pub use schema::store_exists;

/// Column list selecting a book row from `books b`.
///
/// Rows created by older deployments may hold NULLs in the optional columns.
pub(crate) const BOOK_COLUMNS: &str = "b.id, b.title, \
     COALESCE(b.author, '') AS author, \
     COALESCE(b.year, 0) AS year, \
     COALESCE(b.category, '') AS category, \
     COALESCE(b.description, '') AS description";

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: SqlitePool,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub favorites: favorites::FavoritesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            favorites: favorites::FavoritesRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open (creating if missing) the database file named by the configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let path = Path::new(&config.path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let connect_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_with(connect_opts)
            .await?;

        Ok(Self::new(pool))
    }

    /// Private in-memory database, used by tests and throwaway runs
    pub async fn in_memory() -> AppResult<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true)
            .disable_statement_logging();

        // Each connection would get its own memory database, so hold exactly one
        // and never let the pool recycle it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create the schema if needed and evolve older layouts
    pub async fn initialize(&self) -> AppResult<()> {
        schema::initialize(&self.pool).await
    }

    /// `initialize`, then insert the seed catalog
    pub async fn initialize_with_seed(&self, seed: &[CreateBook]) -> AppResult<()> {
        schema::initialize(&self.pool).await?;
        schema::seed_books(&self.pool, seed).await
    }

    /// Cheap round trip used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
