//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::{Book, BookId};
use super::user::UserId;

/// Surrogate key of a loan row
pub type LoanId = i64;

const SECONDS_PER_DAY: i64 = 86_400;

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    /// Absent only on rows written before due dates were tracked
    pub due_date: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// A user's loan joined with the borrowed book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub loan_id: LoanId,
    #[sqlx(flatten)]
    pub book: Book,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl LoanDetails {
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Due-date report relative to `now`
    pub fn due_status(&self, now: DateTime<Utc>) -> DueStatus {
        match self.due_date {
            Some(due) => DueStatus::from_days(days_until_due(due, now)),
            None => DueStatus::Unknown,
        }
    }
}

/// Longest loan accepted, in days; keeps due dates inside SQLite's date range
pub const MAX_LOAN_DAYS: i64 = 36_500;

/// Borrow request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLoan {
    pub user_id: UserId,
    pub book_id: BookId,
    #[validate(range(
        min = 1,
        max = 36_500,
        message = "Loan duration must be between 1 and 36500 days"
    ))]
    pub days: i64,
}

/// Whole days from `now` until `due`, rounded toward negative infinity.
///
/// A negative value is the number of days the loan is overdue.
pub fn days_until_due(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Human-facing due-date state of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Days left before the due date (0 means due within the day)
    DaysLeft(i64),
    /// Days past the due date
    Overdue(i64),
    /// The loan predates due-date tracking
    Unknown,
}

impl DueStatus {
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            DueStatus::Overdue(-days)
        } else {
            DueStatus::DaysLeft(days)
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DueStatus::Overdue(_))
    }
}

impl std::fmt::Display for DueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DueStatus::DaysLeft(days) => write!(f, "{} days left until due date", days),
            DueStatus::Overdue(days) => write!(f, "overdue by {} days", days),
            DueStatus::Unknown => write!(f, "no due date recorded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_days_until_due_floors() {
        let now = Utc::now();
        assert_eq!(days_until_due(now + Duration::days(7), now), 7);
        assert_eq!(days_until_due(now + Duration::hours(30), now), 1);
        assert_eq!(days_until_due(now + Duration::hours(5), now), 0);
        // Half a day late is already one day overdue
        assert_eq!(days_until_due(now - Duration::hours(12), now), -1);
        assert_eq!(days_until_due(now - Duration::days(3), now), -3);
    }

    #[test]
    fn test_due_status() {
        assert_eq!(DueStatus::from_days(4), DueStatus::DaysLeft(4));
        assert_eq!(DueStatus::from_days(-2), DueStatus::Overdue(2));
        assert!(DueStatus::from_days(-1).is_overdue());
        assert_eq!(DueStatus::Overdue(2).to_string(), "overdue by 2 days");
    }

    #[test]
    fn test_create_loan_days_bounds() {
        let loan = |days| CreateLoan { user_id: 1, book_id: 1, days };
        assert!(loan(1).validate().is_ok());
        assert!(loan(MAX_LOAN_DAYS).validate().is_ok());
        assert!(loan(0).validate().is_err());
        assert!(loan(-5).validate().is_err());
        assert!(loan(MAX_LOAN_DAYS + 1).validate().is_err());
        assert!(loan(10_000_000).validate().is_err());
    }
}
