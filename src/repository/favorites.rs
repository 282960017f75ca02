//! Favorites repository for database operations

use sqlx::SqlitePool;

use super::BOOK_COLUMNS;
use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::{book::BookId, favorite::FavoriteBook, user::UserId},
};

#[derive(Clone)]
pub struct FavoritesRepository {
    pool: SqlitePool,
}

impl FavoritesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the pair; `false` if it was already there
    pub async fn add(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, book_id)
            VALUES (?, ?)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("User {} or book {} not found", user_id, book_id))
            } else {
                e.into()
            }
        })?
        .rows_affected();

        Ok(inserted > 0)
    }

    /// Delete the pair; `false` if it was not there
    pub async fn remove(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    /// Favorited books of a user, most recently added first
    pub async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<FavoriteBook>> {
        let favorites = sqlx::query_as::<_, FavoriteBook>(&format!(
            r#"
            SELECT {}, f.added_at
            FROM favorites f
            JOIN books b ON f.book_id = b.id
            WHERE f.user_id = ?
            ORDER BY f.added_at DESC, f.id DESC
            "#,
            BOOK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    /// Count favorite rows for one pair (0 or 1)
    pub async fn count_pair(&self, user_id: UserId, book_id: BookId) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = ? AND book_id = ?")
                .bind(user_id)
                .bind(book_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
