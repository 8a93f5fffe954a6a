use axum::{
    Router,
    routing::{get, post},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_bookmarks))
        .route("/:id/read", post(handler::mark_read))
        .route("/:id/archive", post(handler::archive))
        .route("/:id/unarchive", post(handler::unarchive))
}
