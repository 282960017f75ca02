//! Server-sent change feed

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use super::AuthenticatedUser;

/// Stream lending events relevant to the signed-in user.
///
/// Catalog changes are sent to everyone; loan and favorite changes only to
/// their owner.
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "text/event-stream of LendingEvent JSON objects"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn event_stream(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = claims.user_id;

    let stream = BroadcastStream::new(state.services.events.subscribe()).filter_map(move |event| {
        // A lagged receiver just skips what it missed
        let event = event.ok()?;
        if event.user_id().map_or(true, |owner| owner == user_id) {
            Event::default().json_data(&event).ok().map(Ok)
        } else {
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
