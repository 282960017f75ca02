//! Books repository for database operations

use sqlx::SqlitePool;

use super::BOOK_COLUMNS;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookId, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: SqlitePool,
}

/// Escape `LIKE` wildcards so the query is matched as a literal substring
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl BooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All books ordered by title
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b ORDER BY b.title, b.id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b WHERE b.id = ?",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Insert a book
    pub async fn create(&self, book: &CreateBook) -> AppResult<BookId> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, year, category, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(&book.category)
        .bind(&book.description)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Case-insensitive substring search over title, author and category
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let pattern = like_pattern(query);

        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books b
            WHERE b.title LIKE ? ESCAPE '\'
               OR b.author LIKE ? ESCAPE '\'
               OR b.category LIKE ? ESCAPE '\'
            ORDER BY b.title, b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Delete a book and its favorites.
    ///
    /// Returns `false` when the book does not exist. A book that any loan row
    /// still references is kept and reported as a conflict.
    pub async fn delete(&self, id: BookId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Opening with a write makes the transaction hold the write lock before any read
        sqlx::query(
            "DELETE FROM favorites WHERE book_id = ? AND NOT EXISTS (SELECT 1 FROM loans WHERE book_id = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query(
            "DELETE FROM books WHERE id = ? AND NOT EXISTS (SELECT 1 FROM loans WHERE book_id = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            let loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            if loans > 0 {
                return Err(AppError::Conflict(format!(
                    "Book {} has {} loan record(s) and cannot be deleted",
                    id, loans
                )));
            }
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Count books in the catalog
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("tolkien"), "%tolkien%");
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }
}
