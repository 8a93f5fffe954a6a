//! Bookmarks Module
//!
//! The bookmark listing and status flow: a predicate builder over the
//! filter/archived flags, paged listing with aggregate counts, and
//! single-row timestamp mutations (read, archive, unarchive). Rows are
//! created by an external ingestion pipeline and never hard-deleted here.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bokmerke::bookmarks;
//!
//! // Get the migrations to run
//! for (name, sql) in bookmarks::migrations() {
//!     // Run migration...
//! }
//!
//! // Mount the routes
//! let app = Router::new()
//!     .nest("/api/bookmarks", bookmarks::routes())
//!     .with_state(app_state);
//!
//! // Use the library directly
//! let lib = bookmarks::Bookmarks::new(connection);
//! let page = lib.list(&query).await?;
//! ```

mod handler;
mod lib;
mod routes;

pub use handler::ListParams;
// Re-export the core library types and functions
pub use lib::*;

// Re-export the routes function
pub use routes::routes;

/// Returns the migrations for the bookmarks module.
///
/// These should be run during application startup to ensure the database
/// schema is up to date.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[(
        "bookmarks_001_schema.sql",
        include_str!("migrations/001_schema.sql"),
    )]
}
