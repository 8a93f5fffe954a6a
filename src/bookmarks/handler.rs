//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::{ArchiveReceipt, Bookmarks, Filter, ListQuery, ReadReceipt};
use crate::handler::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub archived: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    /// Clamps caller-supplied paging values instead of passing parse
    /// failures through. Only the literal string "true" selects the
    /// archived view.
    pub fn into_list_query(self) -> ListQuery {
        ListQuery {
            filter: Filter::parse(self.filter.as_deref()),
            archived: self.archived.as_deref() == Some("true"),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let lib = Bookmarks::new(state.db.connection());
    let query = params.into_list_query();

    match lib.list(&query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list bookmarks: {}", e);
            internal_error("Failed to list bookmarks")
        }
    }
}

pub async fn mark_read(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let lib = Bookmarks::new(state.db.connection());

    match lib.mark_read(&id).await {
        Ok(Some(read_at)) => (
            StatusCode::OK,
            Json(ReadReceipt {
                success: true,
                read_at: Some(read_at),
            }),
        )
            .into_response(),
        Ok(None) => not_found("Bookmark not found"),
        Err(e) => {
            tracing::error!("Failed to mark bookmark {} read: {}", id, e);
            internal_error("Failed to mark bookmark read")
        }
    }
}

pub async fn archive(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let lib = Bookmarks::new(state.db.connection());

    match lib.archive(&id).await {
        Ok(Some(archived_at)) => (
            StatusCode::OK,
            Json(ArchiveReceipt {
                success: true,
                archived_at: Some(archived_at),
            }),
        )
            .into_response(),
        Ok(None) => not_found("Bookmark not found"),
        Err(e) => {
            tracing::error!("Failed to archive bookmark {}: {}", id, e);
            internal_error("Failed to archive bookmark")
        }
    }
}

pub async fn unarchive(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let lib = Bookmarks::new(state.db.connection());

    match lib.unarchive(&id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ArchiveReceipt {
                success: true,
                archived_at: None,
            }),
        )
            .into_response(),
        Ok(false) => not_found("Bookmark not found"),
        Err(e) => {
            tracing::error!("Failed to unarchive bookmark {}: {}", id, e);
            internal_error("Failed to unarchive bookmark")
        }
    }
}
