//! Lending endpoints for the signed-in user

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookId,
        loan::{days_until_due, LoanDetails, LoanId},
    },
};

use super::AuthenticatedUser;

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Loan duration in days (server default when absent)
    pub days: Option<i64>,
}

/// Created loan
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    pub id: LoanId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub message: String,
}

/// Return outcome
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub returned: bool,
    pub message: String,
}

#[derive(Deserialize, IntoParams)]
pub struct LoansQuery {
    /// Only loans not yet returned
    pub active: Option<bool>,
}

/// A loan with its due-date report
#[derive(Serialize, ToSchema)]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: LoanDetails,
    /// Whole days until due (negative when overdue)
    pub days_until_due: Option<i64>,
    pub overdue: bool,
    pub due_message: String,
}

impl LoanView {
    fn new(loan: LoanDetails, now: DateTime<Utc>) -> Self {
        let status = loan.due_status(now);
        Self {
            days_until_due: loan.due_date.map(|due| days_until_due(due, now)),
            overdue: loan.is_active() && status.is_overdue(),
            due_message: if loan.is_active() {
                status.to_string()
            } else {
                "returned".to_string()
            },
            loan,
        }
    }
}

/// Loans of the signed-in user, newest first
#[utoipa::path(
    get,
    path = "/me/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoansQuery),
    responses(
        (status = 200, description = "User's loans", body = Vec<LoanView>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoansQuery>,
) -> AppResult<Json<Vec<LoanView>>> {
    let loans = if query.active.unwrap_or(false) {
        state.services.loans.list_active_loans_for_user(claims.user_id).await?
    } else {
        state.services.loans.list_loans_for_user(claims.user_id).await?
    };

    let now = Utc::now();
    Ok(Json(loans.into_iter().map(|loan| LoanView::new(loan, now)).collect()))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Invalid duration"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<BookId>,
    request: Option<Json<BorrowRequest>>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let days = request.and_then(|Json(request)| request.days);

    let loan_id = state
        .services
        .loans
        .borrow(claims.user_id, book_id, days)
        .await?;
    let loan = state
        .services
        .loans
        .get_loan(loan_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Loan {} vanished after creation", loan_id)))?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            id: loan.id,
            borrowed_at: loan.borrowed_at,
            due_date: loan.due_date,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 409, description = "No active loan for this book", body = ReturnResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<BookId>,
) -> AppResult<(StatusCode, Json<ReturnResponse>)> {
    let returned = state.services.loans.return_book(claims.user_id, book_id).await?;

    let response = if returned {
        (
            StatusCode::OK,
            Json(ReturnResponse {
                returned,
                message: "Book returned".to_string(),
            }),
        )
    } else {
        (
            StatusCode::CONFLICT,
            Json(ReturnResponse {
                returned,
                message: "No active loan for this book".to_string(),
            }),
        )
    };
    Ok(response)
}
