//! Loan management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::BookId,
        loan::{CreateLoan, Loan, LoanDetails, LoanId},
        user::UserId,
    },
    repository::Repository,
};

use super::events::{LendingEvent, LendingEvents};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    events: LendingEvents,
    default_days: i64,
}

impl LoansService {
    pub fn new(repository: Repository, events: LendingEvents, default_days: i64) -> Self {
        Self {
            repository,
            events,
            default_days,
        }
    }

    /// Loan duration used when the caller does not give one
    pub fn default_days(&self) -> i64 {
        self.default_days
    }

    /// Borrow a book for `days` days.
    ///
    /// Always creates a new active loan: the catalog does not model copies, so
    /// a book can be out to several users (or twice to one user) at once.
    pub async fn borrow(&self, user_id: UserId, book_id: BookId, days: Option<i64>) -> AppResult<LoanId> {
        let loan = CreateLoan {
            user_id,
            book_id,
            days: days.unwrap_or(self.default_days),
        };
        loan.validate()?;

        let loan_id = self
            .repository
            .loans
            .create(loan.user_id, loan.book_id, loan.days)
            .await?;

        tracing::info!(
            "User {} borrowed book {} for {} days (loan {})",
            user_id, book_id, loan.days, loan_id
        );
        self.events.publish(LendingEvent::Borrowed {
            loan_id,
            user_id,
            book_id,
        });
        Ok(loan_id)
    }

    /// Return the user's most recent active loan of the book.
    ///
    /// `false` when there is no active loan for the pair; nothing changes then.
    pub async fn return_book(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let returned = self.repository.loans.return_active(user_id, book_id).await?;

        if returned {
            tracing::info!("User {} returned book {}", user_id, book_id);
            self.events.publish(LendingEvent::Returned { user_id, book_id });
        } else {
            tracing::debug!("No active loan of book {} for user {}", book_id, user_id);
        }
        Ok(returned)
    }

    /// Every loan of the user, newest first, returned ones included
    pub async fn list_loans_for_user(&self, user_id: UserId) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_for_user(user_id).await
    }

    /// The user's loans still out, newest first
    pub async fn list_active_loans_for_user(&self, user_id: UserId) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_active_for_user(user_id).await
    }

    /// Get loan by ID
    pub async fn get_loan(&self, id: LoanId) -> AppResult<Option<Loan>> {
        self.repository.loans.get_by_id(id).await
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.loans.count_active().await
    }

    /// Count overdue loans
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository.loans.count_overdue().await
    }
}
