//! Client Module
//!
//! The consumer side of the listing flow: a `BookmarkApi` trait describing
//! the wire operations, a `reqwest`-backed implementation, and
//! `ListController`, the paging/filter state machine behind the bookmarks
//! page. The controller owns all of its state as named fields and is
//! constructed once per page; UI events dispatch into its methods.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bokmerke::client::{HttpApi, ListController, FilterSelection};
//!
//! let mut list = ListController::new(HttpApi::new("http://localhost:8080"));
//! list.refresh().await?;
//! list.select(FilterSelection::Unread).await?;
//! if let Some(url) = list.open("1881234").await? {
//!     // open url, row is now marked read
//! }
//! ```

mod api;
mod controller;

pub use api::{BookmarkApi, HttpApi};
pub use controller::{FilterSelection, ListController, Phase};

use chrono::{DateTime, Utc};

/// Relative timestamp for card metadata: "now", then minutes/hours/days,
/// then a short month-day date. Unparseable input is returned as-is.
pub fn format_time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };

    let seconds = (now - parsed.with_timezone(&Utc)).num_seconds();

    if seconds < 60 {
        return "now".to_string();
    }
    if seconds < 3600 {
        return format!("{}m ago", seconds / 60);
    }
    if seconds < 86400 {
        return format!("{}h ago", seconds / 3600);
    }
    if seconds < 604800 {
        return format!("{}d ago", seconds / 86400);
    }

    parsed.format("%b %-d").to_string()
}
