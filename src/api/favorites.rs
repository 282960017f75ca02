//! Favorites endpoints for the signed-in user

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::BookId, favorite::FavoriteBook},
};

use super::AuthenticatedUser;

/// Favorite toggle outcome
#[derive(Serialize, ToSchema)]
pub struct FavoriteResponse {
    /// Whether this request changed anything
    pub changed: bool,
    pub message: String,
}

/// Favorites of the signed-in user, most recent first
#[utoipa::path(
    get,
    path = "/me/favorites",
    tag = "favorites",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorited books", body = Vec<FavoriteBook>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_favorites(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<FavoriteBook>>> {
    let favorites = state
        .services
        .favorites
        .list_favorites_for_user(claims.user_id)
        .await?;
    Ok(Json(favorites))
}

/// Favorite a book
#[utoipa::path(
    put,
    path = "/books/{id}/favorite",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Added to favorites", body = FavoriteResponse),
        (status = 200, description = "Already a favorite", body = FavoriteResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_favorite(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<BookId>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    let added = state.services.favorites.add_favorite(claims.user_id, book_id).await?;

    let (status, message) = if added {
        (StatusCode::CREATED, "Added to favorites")
    } else {
        (StatusCode::OK, "Already in favorites")
    };
    Ok((
        status,
        Json(FavoriteResponse {
            changed: added,
            message: message.to_string(),
        }),
    ))
}

/// Remove a book from favorites
#[utoipa::path(
    delete,
    path = "/books/{id}/favorite",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = FavoriteResponse),
        (status = 404, description = "Not a favorite", body = FavoriteResponse)
    )
)]
pub async fn remove_favorite(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<BookId>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    let removed = state
        .services
        .favorites
        .remove_favorite(claims.user_id, book_id)
        .await?;

    let (status, message) = if removed {
        (StatusCode::OK, "Removed from favorites")
    } else {
        (StatusCode::NOT_FOUND, "This book is not in your favorites")
    };
    Ok((
        status,
        Json(FavoriteResponse {
            changed: removed,
            message: message.to_string(),
        }),
    ))
}
