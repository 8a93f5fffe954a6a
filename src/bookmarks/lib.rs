use anyhow::Result;
use libsql::Connection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    XArticle,
    External,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::XArticle => "x_article",
            SourceType::External => "external",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "x_article" => Some(SourceType::XArticle),
            "external" => Some(SourceType::External),
            _ => None,
        }
    }
}

/// Listing filter. Unrecognized query-string values degrade to `All`,
/// which contributes no extra predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Unread,
    XArticle,
    External,
}

impl Filter {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("unread") => Filter::Unread,
            Some("x_article") => Filter::XArticle,
            Some("external") => Filter::External,
            _ => Filter::All,
        }
    }

    /// Query-string value for this filter, `None` for `All`.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Filter::All => None,
            Filter::Unread => Some("unread"),
            Filter::XArticle => Some("x_article"),
            Filter::External => Some("external"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: Filter,
    pub archived: bool,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub x_id: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub thumbnail_url: Option<String>,
    pub source_type: SourceType,
    pub created_at: String,
    pub read_at: Option<String>,
    pub archived_at: Option<String>,
    pub updated_at: String,
}

/// One listing response: a page of rows plus aggregates computed over the
/// same predicate set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkPage {
    pub data: Vec<Bookmark>,
    pub total: i64,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub success: bool,
    pub read_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReceipt {
    pub success: bool,
    pub archived_at: Option<String>,
}

/// Ingestion input. Rows are created by the external ingestion pipeline
/// (and by tests); there is no HTTP endpoint for this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmark {
    pub x_id: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub thumbnail_url: Option<String>,
    pub source_type: SourceType,
    pub created_at: Option<String>,
}

/// WHERE clause and bound parameters for a filter/archived combination.
///
/// The archived flag always contributes exactly one predicate; the filter
/// contributes at most one more.
pub fn build_predicate(filter: Filter, archived: bool) -> (String, Vec<libsql::Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if archived {
        conditions.push("archived_at IS NOT NULL");
    } else {
        conditions.push("archived_at IS NULL");
    }

    match filter {
        Filter::Unread => conditions.push("read_at IS NULL"),
        Filter::XArticle | Filter::External => {
            conditions.push("source_type = ?");
            params.push(filter.as_param().unwrap_or_default().into());
        }
        Filter::All => {}
    }

    (format!("WHERE {}", conditions.join(" AND ")), params)
}

pub struct Bookmarks<'a> {
    conn: &'a Connection,
}

impl<'a> Bookmarks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Paged rows plus aggregates for one listing request.
    ///
    /// The SELECT and the COUNT run as two independent statements; a write
    /// landing between them can make `total` drift from the visible rows.
    pub async fn list(&self, query: &ListQuery) -> Result<BookmarkPage> {
        let (where_clause, mut params) = build_predicate(query.filter, query.archived);

        let page_sql = format!(
            r#"
SELECT x_id, url, title, description, author, thumbnail_url, source_type,
       created_at, read_at, archived_at, updated_at
FROM bookmarks
{where_clause}
ORDER BY created_at DESC
LIMIT ? OFFSET ?
"#
        );
        params.push(query.limit.into());
        params.push(query.offset.into());

        let mut rows = self.conn.query(&page_sql, params).await?;
        let mut data = Vec::new();
        while let Some(row) = rows.next().await? {
            data.push(self.row_to_bookmark(&row)?);
        }

        let (where_clause, count_params) = build_predicate(query.filter, query.archived);
        let count_sql = format!(
            r#"
SELECT COUNT(*) AS total,
       COUNT(*) FILTER (WHERE read_at IS NULL) AS unread
FROM bookmarks
{where_clause}
"#
        );

        let mut rows = self.conn.query(&count_sql, count_params).await?;
        let (total, unread_count) = if let Some(row) = rows.next().await? {
            (row.get::<i64>(0)?, row.get::<i64>(1)?)
        } else {
            (0, 0)
        };

        Ok(BookmarkPage {
            data,
            total,
            unread_count,
        })
    }

    pub async fn get(&self, x_id: &str) -> Result<Option<Bookmark>> {
        let query = r#"
SELECT x_id, url, title, description, author, thumbnail_url, source_type,
       created_at, read_at, archived_at, updated_at
FROM bookmarks
WHERE x_id = ?
"#;

        let mut rows = self.conn.query(query, libsql::params![x_id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(self.row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Stamps `read_at` and returns the new timestamp, `None` for an
    /// unknown id. Re-reading overwrites with a fresh timestamp.
    pub async fn mark_read(&self, x_id: &str) -> Result<Option<String>> {
        let query = r#"
UPDATE bookmarks
SET read_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
WHERE x_id = ?
RETURNING read_at
"#;

        let mut rows = self.conn.query(query, libsql::params![x_id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Stamps `archived_at` and returns the new timestamp, `None` for an
    /// unknown id.
    pub async fn archive(&self, x_id: &str) -> Result<Option<String>> {
        let query = r#"
UPDATE bookmarks
SET archived_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
WHERE x_id = ?
RETURNING archived_at
"#;

        let mut rows = self.conn.query(query, libsql::params![x_id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Clears `archived_at`. Returns false for an unknown id.
    pub async fn unarchive(&self, x_id: &str) -> Result<bool> {
        let query = r#"
UPDATE bookmarks
SET archived_at = NULL,
    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
WHERE x_id = ?
"#;

        let affected = self.conn.execute(query, libsql::params![x_id]).await?;
        Ok(affected > 0)
    }

    pub async fn insert(&self, input: NewBookmark) -> Result<Bookmark> {
        let query = r#"
INSERT INTO bookmarks (x_id, url, title, description, author, thumbnail_url,
                       source_type, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?,
        COALESCE(?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))
RETURNING x_id, url, title, description, author, thumbnail_url, source_type,
          created_at, read_at, archived_at, updated_at
"#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![
                    input.x_id,
                    input.url,
                    input.title,
                    input.description,
                    input.author,
                    input.thumbnail_url,
                    input.source_type.as_str(),
                    input.created_at
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(self.row_to_bookmark(&row)?)
        } else {
            anyhow::bail!("Failed to insert bookmark")
        }
    }

    fn row_to_bookmark(&self, row: &libsql::Row) -> Result<Bookmark> {
        let type_str: String = row.get(6)?;
        let source_type = SourceType::from_str(&type_str)
            .ok_or_else(|| anyhow::anyhow!("Invalid source type: {}", type_str))?;

        Ok(Bookmark {
            x_id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            author: row.get(4)?,
            thumbnail_url: row.get(5)?,
            source_type,
            created_at: row.get(7)?,
            read_at: row.get(8)?,
            archived_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}
