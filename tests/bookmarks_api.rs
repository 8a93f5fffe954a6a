use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bokmerke::bookmarks::{self, Bookmarks, NewBookmark, SourceType};
use bokmerke::db::Database;
use bokmerke::handler::AppState;
use tower::util::ServiceExt;

async fn app() -> (Arc<Database>, Router) {
    let db = Arc::new(Database::new_local(":memory:").await.unwrap());
    let router = Router::new()
        .nest("/api/bookmarks", bookmarks::routes())
        .with_state(AppState { db: db.clone() });
    (db, router)
}

async fn seed(db: &Database, x_id: &str, source_type: SourceType, created_at: &str) {
    Bookmarks::new(db.connection())
        .insert(NewBookmark {
            x_id: x_id.to_string(),
            url: format!("https://example.com/{x_id}"),
            title: format!("bookmark {x_id}"),
            description: None,
            author: None,
            thumbnail_url: None,
            source_type,
            created_at: Some(created_at.to_string()),
        })
        .await
        .unwrap();
}

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn listing_returns_rows_and_aggregates() {
    let (db, router) = app().await;
    seed(&db, "a", SourceType::XArticle, "2026-01-01T00:00:00.000Z").await;
    seed(&db, "b", SourceType::External, "2026-01-02T00:00:00.000Z").await;

    let (status, body) = send(&router, "GET", "/api/bookmarks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["x_id"], "b");
    assert_eq!(body["total"], 2);
    assert_eq!(body["unread_count"], 2);

    let (status, body) = send(&router, "GET", "/api/bookmarks?filter=x_article").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["source_type"], "x_article");
}

#[tokio::test]
async fn wrong_methods_are_rejected() {
    let (_db, router) = app().await;

    let (status, _) = send(&router, "POST", "/api/bookmarks").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&router, "GET", "/api/bookmarks/a/read").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&router, "GET", "/api/bookmarks/a/archive").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&router, "GET", "/api/bookmarks/a/unarchive").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_ids_yield_404_and_mutate_nothing() {
    let (db, router) = app().await;
    seed(&db, "a", SourceType::External, "2026-01-01T00:00:00.000Z").await;

    for action in ["read", "archive", "unarchive"] {
        let (status, body) = send(&router, "POST", &format!("/api/bookmarks/nope/{action}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Bookmark not found");
    }

    let row = Bookmarks::new(db.connection()).get("a").await.unwrap().unwrap();
    assert_eq!(row.read_at, None);
    assert_eq!(row.archived_at, None);
}

#[tokio::test]
async fn read_and_archive_flow_moves_rows_between_views() {
    let (db, router) = app().await;
    seed(&db, "a", SourceType::External, "2026-01-01T00:00:00.000Z").await;

    let (status, body) = send(&router, "POST", "/api/bookmarks/a/read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["read_at"].is_string());

    let (status, body) = send(&router, "POST", "/api/bookmarks/a/archive").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["archived_at"].is_string());

    let (_, body) = send(&router, "GET", "/api/bookmarks").await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 0);

    let (_, body) = send(&router, "GET", "/api/bookmarks?archived=true").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&router, "POST", "/api/bookmarks/a/unarchive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["archived_at"].is_null());

    let (_, body) = send(&router, "GET", "/api/bookmarks").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn paging_walks_the_listing_without_gaps() {
    let (db, router) = app().await;
    for i in 1..=4 {
        seed(
            &db,
            &format!("bm{i}"),
            SourceType::External,
            &format!("2026-01-0{i}T00:00:00.000Z"),
        )
        .await;
    }

    let (_, first) = send(&router, "GET", "/api/bookmarks?limit=2&offset=0").await;
    let (_, second) = send(&router, "GET", "/api/bookmarks?limit=2&offset=2").await;

    let ids: Vec<&str> = first["data"]
        .as_array()
        .unwrap()
        .iter()
        .chain(second["data"].as_array().unwrap().iter())
        .map(|b| b["x_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["bm4", "bm3", "bm2", "bm1"]);
}

#[tokio::test]
async fn malformed_paging_values_fail_closed() {
    let (_db, router) = app().await;

    let (status, _) = send(&router, "GET", "/api/bookmarks?limit=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Garbage filter degrades to "no extra predicate" rather than erroring.
    let (status, _) = send(&router, "GET", "/api/bookmarks?filter=bogus").await;
    assert_eq!(status, StatusCode::OK);
}
