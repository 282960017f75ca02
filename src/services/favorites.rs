//! Favorites service

use crate::{
    error::AppResult,
    models::{book::BookId, favorite::FavoriteBook, user::UserId},
    repository::Repository,
};

use super::events::{LendingEvent, LendingEvents};

#[derive(Clone)]
pub struct FavoritesService {
    repository: Repository,
    events: LendingEvents,
}

impl FavoritesService {
    pub fn new(repository: Repository, events: LendingEvents) -> Self {
        Self { repository, events }
    }

    /// Favorite a book; `false` if it already was
    pub async fn add_favorite(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let added = self.repository.favorites.add(user_id, book_id).await?;
        if added {
            self.events.publish(LendingEvent::FavoriteAdded { user_id, book_id });
        }
        Ok(added)
    }

    /// Unfavorite a book; `false` if it was not a favorite
    pub async fn remove_favorite(&self, user_id: UserId, book_id: BookId) -> AppResult<bool> {
        let removed = self.repository.favorites.remove(user_id, book_id).await?;
        if removed {
            self.events.publish(LendingEvent::FavoriteRemoved { user_id, book_id });
        }
        Ok(removed)
    }

    /// Favorites of a user, most recent first
    pub async fn list_favorites_for_user(&self, user_id: UserId) -> AppResult<Vec<FavoriteBook>> {
        self.repository.favorites.list_for_user(user_id).await
    }
}
