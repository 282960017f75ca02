//! Loans repository for database operations

use sqlx::SqlitePool;

use super::BOOK_COLUMNS;
use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::{
        book::BookId,
        loan::{Loan, LoanDetails, LoanId},
        user::UserId,
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: SqlitePool,
}

impl LoansRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: LoanId) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, user_id, book_id, borrowed_at, due_date, returned_at FROM loans WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Create an active loan due `days` after now.
    ///
    /// Both timestamps come from the database clock within one statement, so
    /// `due_date - borrowed_at` is exactly `days`. The statement runs to
    /// completion before the id is returned, so the row is committed and
    /// visible to every pooled connection.
    pub async fn create(&self, user_id: UserId, book_id: BookId, days: i64) -> AppResult<LoanId> {
        let modifier = format!("+{} days", days);

        let result = sqlx::query(
            r#"
            INSERT INTO loans (user_id, book_id, borrowed_at, due_date)
            VALUES (?, ?, datetime('now'), datetime('now', ?))
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(modifier)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("User {} or book {} not found", user_id, book_id))
            } else {
                AppError::from(e)
            }
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Mark the newest active loan of `book_id` by `user_id` as returned.
    ///
    /// The lookup and the update are one statement, and the update re-checks
    /// `returned_at IS NULL`, so of two concurrent returns only one changes a row.
    pub async fn return_active(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE loans SET returned_at = CURRENT_TIMESTAMP
            WHERE returned_at IS NULL
              AND id = (
                  SELECT id FROM loans
                  WHERE user_id = ? AND book_id = ? AND returned_at IS NULL
                  ORDER BY borrowed_at DESC, id DESC
                  LIMIT 1
              )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    /// All loans of a user with their books, newest first
    pub async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<LoanDetails>> {
        self.fetch_details(user_id, false).await
    }

    /// Loans of a user that are not returned yet, newest first
    pub async fn list_active_for_user(&self, user_id: UserId) -> AppResult<Vec<LoanDetails>> {
        self.fetch_details(user_id, true).await
    }

    async fn fetch_details(&self, user_id: UserId, active_only: bool) -> AppResult<Vec<LoanDetails>> {
        let filter = if active_only { "AND l.returned_at IS NULL" } else { "" };

        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            r#"
            SELECT l.id AS loan_id, {}, l.borrowed_at, l.due_date, l.returned_at
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.user_id = ? {}
            ORDER BY l.borrowed_at DESC, l.id DESC
            "#,
            BOOK_COLUMNS, filter
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE returned_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count active loans past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE returned_at IS NULL AND due_date < datetime('now')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
