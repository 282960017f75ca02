//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookId, CreateBook},
    repository::Repository,
};

use super::events::{LendingEvent, LendingEvents};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    events: LendingEvents,
}

impl CatalogService {
    pub fn new(repository: Repository, events: LendingEvents) -> Self {
        Self { repository, events }
    }

    /// All books ordered by title
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Books whose title, author or category contains `query`, ignoring case.
    ///
    /// An empty query matches every book.
    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: BookId) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Add a book; titles are not deduplicated
    pub async fn add_book(&self, book: &CreateBook) -> AppResult<BookId> {
        book.validate()?;

        let id = self.repository.books.create(book).await?;
        tracing::info!("Added book {} '{}'", id, book.title);
        self.events.publish(LendingEvent::BookAdded { book_id: id });
        Ok(id)
    }

    /// Delete a book; `false` if there was none.
    ///
    /// Favorites go with the book. Books with loan history are refused with
    /// `AppError::Conflict`.
    pub async fn delete_book(&self, id: BookId) -> AppResult<bool> {
        let deleted = self.repository.books.delete(id).await?;
        if deleted {
            tracing::info!("Deleted book {}", id);
            self.events.publish(LendingEvent::BookDeleted { book_id: id });
        }
        Ok(deleted)
    }

    /// Count books in the catalog
    pub async fn count(&self) -> AppResult<i64> {
        self.repository.books.count().await
    }
}
