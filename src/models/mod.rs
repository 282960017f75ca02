//! Data models for Bookshelf

pub mod book;
pub mod favorite;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookId, CreateBook};
pub use favorite::FavoriteBook;
pub use loan::{DueStatus, Loan, LoanDetails, LoanId};
pub use user::{Credentials, User, UserId};
