//! Schema creation and additive evolution
//!
//! There is no migration history table: each statement is idempotent
//! (`IF NOT EXISTS`) and columns introduced after a table shipped are added
//! in place when they are found missing.

use std::path::Path;

use sqlx::SqlitePool;

use crate::{error::AppResult, models::CreateBook};

const CREATE_TABLES: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author TEXT NOT NULL DEFAULT '',
        year INTEGER NOT NULL DEFAULT 0 CHECK (year >= 0),
        category TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS loans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        book_id INTEGER NOT NULL REFERENCES books(id),
        borrowed_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        due_date TIMESTAMP,
        returned_at TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        added_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (user_id, book_id)
    )
    "#,
];

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_loans_user_book ON loans (user_id, book_id, returned_at)",
    "CREATE INDEX IF NOT EXISTS idx_loans_book ON loans (book_id)",
    "CREATE INDEX IF NOT EXISTS idx_favorites_book ON favorites (book_id)",
];

/// Columns added to existing tables after their first release: (table, column, type)
const ADDED_COLUMNS: [(&str, &str, &str); 1] = [("loans", "due_date", "TIMESTAMP")];

/// True when the store file is already present; decides whether to seed
pub fn store_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Create missing tables and indexes, then add any missing columns
pub async fn initialize(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    for (table, column, sql_type) in ADDED_COLUMNS {
        ensure_column(pool, table, column, sql_type).await?;
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema initialized");
    Ok(())
}

/// Whether `table` currently has a column named `column`
pub async fn column_exists(pool: &SqlitePool, table: &str, column: &str) -> AppResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Add `column` to `table` when missing.
///
/// A failing `ALTER TABLE` (typically another process racing us to add the
/// same column) is logged and tolerated.
async fn ensure_column(pool: &SqlitePool, table: &str, column: &str, sql_type: &str) -> AppResult<()> {
    if column_exists(pool, table, column).await? {
        return Ok(());
    }

    let statement = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, sql_type);
    match sqlx::query(&statement).execute(pool).await {
        Ok(_) => tracing::info!("Added column {}.{}", table, column),
        Err(e) => tracing::warn!("Could not add column {}.{}: {}", table, column, e),
    }
    Ok(())
}

/// Insert the seed catalog in one transaction
pub async fn seed_books(pool: &SqlitePool, books: &[CreateBook]) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    for book in books {
        sqlx::query(
            "INSERT INTO books (title, author, year, category, description) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(&book.category)
        .bind(&book.description)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!("Seeded catalog with {} books", books.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.db");
        assert!(!store_exists(&path));
        std::fs::write(&path, b"").unwrap();
        assert!(store_exists(&path));
    }
}
