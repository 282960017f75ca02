//! Change notifications for views that mirror lending state
//!
//! Services publish after a change is committed. Subscribers that fall behind
//! lose the oldest events (`RecvError::Lagged`) and should re-read the store.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use crate::models::{book::BookId, loan::LoanId, user::UserId};

const CHANNEL_CAPACITY: usize = 256;

/// A committed state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LendingEvent {
    BookAdded { book_id: BookId },
    BookDeleted { book_id: BookId },
    Borrowed { loan_id: LoanId, user_id: UserId, book_id: BookId },
    Returned { user_id: UserId, book_id: BookId },
    FavoriteAdded { user_id: UserId, book_id: BookId },
    FavoriteRemoved { user_id: UserId, book_id: BookId },
}

impl LendingEvent {
    /// The user whose own views are affected, if any
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            LendingEvent::BookAdded { .. } | LendingEvent::BookDeleted { .. } => None,
            LendingEvent::Borrowed { user_id, .. }
            | LendingEvent::Returned { user_id, .. }
            | LendingEvent::FavoriteAdded { user_id, .. }
            | LendingEvent::FavoriteRemoved { user_id, .. } => Some(*user_id),
        }
    }
}

#[derive(Clone)]
pub struct LendingEvents {
    sender: broadcast::Sender<LendingEvent>,
}

impl LendingEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LendingEvent> {
        self.sender.subscribe()
    }

    /// Send to current subscribers; having none is fine
    pub fn publish(&self, event: LendingEvent) {
        tracing::debug!(?event, "publishing lending event");
        let _ = self.sender.send(event);
    }
}

impl Default for LendingEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let events = LendingEvents::new();
        events.publish(LendingEvent::BookAdded { book_id: 1 });

        let mut rx = events.subscribe();
        events.publish(LendingEvent::Returned { user_id: 2, book_id: 3 });

        let event = rx.recv().await.unwrap();
        assert_eq!(event, LendingEvent::Returned { user_id: 2, book_id: 3 });
        assert_eq!(event.user_id(), Some(2));
    }
}
