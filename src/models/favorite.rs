//! Favorite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;

/// A favorited book with the time it was favorited
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FavoriteBook {
    #[sqlx(flatten)]
    pub book: Book,
    pub added_at: DateTime<Utc>,
}
