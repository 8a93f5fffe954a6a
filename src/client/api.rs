use crate::bookmarks::{ArchiveReceipt, BookmarkPage, ListQuery, ReadReceipt};
use crate::error::ClientError;

/// The wire operations the list controller needs. The HTTP implementation
/// below talks to the service; tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait BookmarkApi {
    async fn list(&self, query: &ListQuery) -> Result<BookmarkPage, ClientError>;
    async fn mark_read(&self, x_id: &str) -> Result<ReadReceipt, ClientError>;
    async fn archive(&self, x_id: &str) -> Result<ArchiveReceipt, ClientError>;
    async fn unarchive(&self, x_id: &str) -> Result<ArchiveReceipt, ClientError>;
}

pub struct HttpApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn listing_url(&self, query: &ListQuery) -> String {
        let mut url = format!(
            "{}/api/bookmarks?limit={}&offset={}",
            self.base_url, query.limit, query.offset
        );
        if query.archived {
            url.push_str("&archived=true");
        }
        if let Some(filter) = query.filter.as_param() {
            url.push_str("&filter=");
            url.push_str(filter);
        }
        url
    }

    async fn post_status(&self, x_id: &str, action: &str) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}/api/bookmarks/{}/{}", self.base_url, x_id, action);
        let resp = self.http.post(url).send().await?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(x_id.to_string()))
        } else {
            Err(ClientError::Status(status.as_u16()))
        }
    }
}

impl BookmarkApi for HttpApi {
    async fn list(&self, query: &ListQuery) -> Result<BookmarkPage, ClientError> {
        let resp = self.http.get(self.listing_url(query)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(resp.json().await?)
    }

    async fn mark_read(&self, x_id: &str) -> Result<ReadReceipt, ClientError> {
        Ok(self.post_status(x_id, "read").await?.json().await?)
    }

    async fn archive(&self, x_id: &str) -> Result<ArchiveReceipt, ClientError> {
        Ok(self.post_status(x_id, "archive").await?.json().await?)
    }

    async fn unarchive(&self, x_id: &str) -> Result<ArchiveReceipt, ClientError> {
        Ok(self.post_status(x_id, "unarchive").await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::Filter;

    fn query(filter: Filter, archived: bool, limit: i64, offset: i64) -> ListQuery {
        ListQuery {
            filter,
            archived,
            limit,
            offset,
        }
    }

    #[test]
    fn listing_urls_carry_only_set_flags() {
        let api = HttpApi::new("http://localhost:8080/");

        assert_eq!(
            api.listing_url(&query(Filter::All, false, 20, 0)),
            "http://localhost:8080/api/bookmarks?limit=20&offset=0"
        );
        assert_eq!(
            api.listing_url(&query(Filter::Unread, false, 20, 40)),
            "http://localhost:8080/api/bookmarks?limit=20&offset=40&filter=unread"
        );
        assert_eq!(
            api.listing_url(&query(Filter::All, true, 10, 0)),
            "http://localhost:8080/api/bookmarks?limit=10&offset=0&archived=true"
        );
    }
}
