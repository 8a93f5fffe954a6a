use super::api::BookmarkApi;
use crate::bookmarks::{Bookmark, BookmarkPage, Filter, ListQuery};
use crate::error::ClientError;

const PAGE_SIZE: i64 = 20;

/// A filter-bar selection. `Archived` is a view toggle, not a predicate
/// filter: it switches the archive scope and resets the filter to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSelection {
    All,
    Unread,
    XArticle,
    External,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Empty,
}

/// Paging state machine for the bookmarks page.
///
/// Holds the accumulated row set, the running offset, and the aggregate
/// counts from the last response. Filter changes rebuild from scratch;
/// "load more" appends. A fetch triggered while one is in flight is a
/// no-op.
pub struct ListController<A> {
    api: A,
    filter: Filter,
    archived: bool,
    limit: i64,
    offset: i64,
    bookmarks: Vec<Bookmark>,
    total: i64,
    unread_count: i64,
    loading: bool,
}

impl<A: BookmarkApi> ListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            filter: Filter::All,
            archived: false,
            limit: PAGE_SIZE,
            offset: 0,
            bookmarks: Vec::new(),
            total: 0,
            unread_count: 0,
            loading: false,
        }
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn unread_count(&self) -> i64 {
        self.unread_count
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn archived(&self) -> bool {
        self.archived
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.bookmarks.is_empty() {
            Phase::Empty
        } else {
            Phase::Idle
        }
    }

    /// Whether another page exists past the accumulated set. Drives the
    /// load-more control.
    pub fn has_more(&self) -> bool {
        self.offset < self.total
    }

    /// Applies a filter-bar press and reloads from scratch.
    pub async fn select(&mut self, selection: FilterSelection) -> Result<(), ClientError> {
        match selection {
            FilterSelection::Archived => {
                self.archived = true;
                self.filter = Filter::All;
            }
            FilterSelection::All => {
                self.archived = false;
                self.filter = Filter::All;
            }
            FilterSelection::Unread => {
                self.archived = false;
                self.filter = Filter::Unread;
            }
            FilterSelection::XArticle => {
                self.archived = false;
                self.filter = Filter::XArticle;
            }
            FilterSelection::External => {
                self.archived = false;
                self.filter = Filter::External;
            }
        }

        self.fetch(true).await
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.fetch(true).await
    }

    /// Requests the next page at the current offset.
    pub async fn load_more(&mut self) -> Result<(), ClientError> {
        self.fetch(false).await
    }

    async fn fetch(&mut self, reset: bool) -> Result<(), ClientError> {
        let Some(query) = self.begin_fetch(reset) else {
            return Ok(());
        };

        match self.api.list(&query).await {
            Ok(page) => {
                self.apply_page(page);
                Ok(())
            }
            Err(e) => {
                self.loading = false;
                Err(e)
            }
        }
    }

    /// Starts a fetch, returning the query to issue. `None` while another
    /// fetch is in flight.
    fn begin_fetch(&mut self, reset: bool) -> Option<ListQuery> {
        if self.loading {
            return None;
        }

        self.loading = true;
        if reset {
            self.offset = 0;
            self.bookmarks.clear();
        }

        Some(ListQuery {
            filter: self.filter,
            archived: self.archived,
            limit: self.limit,
            offset: self.offset,
        })
    }

    fn apply_page(&mut self, page: BookmarkPage) {
        self.offset += page.data.len() as i64;
        self.bookmarks.extend(page.data);
        self.total = page.total;
        self.unread_count = page.unread_count;
        self.loading = false;
    }

    /// Resolves a card activation: returns the URL to open, marking the
    /// row read on first open. A second open does not re-post.
    pub async fn open(&mut self, x_id: &str) -> Result<Option<String>, ClientError> {
        let Some(index) = self.bookmarks.iter().position(|b| b.x_id == x_id) else {
            return Ok(None);
        };

        let url = self.bookmarks[index].url.clone();

        if self.bookmarks[index].read_at.is_none() {
            let receipt = self.api.mark_read(x_id).await?;
            self.bookmarks[index].read_at = receipt.read_at;
            self.unread_count = (self.unread_count - 1).max(0);
        }

        Ok(Some(url))
    }

    /// Archives (default view) or unarchives (archived view) a card, then
    /// drops it from the accumulated set.
    pub async fn toggle_archive(&mut self, x_id: &str) -> Result<bool, ClientError> {
        let Some(index) = self.bookmarks.iter().position(|b| b.x_id == x_id) else {
            return Ok(false);
        };

        if self.archived {
            self.api.unarchive(x_id).await?;
        } else {
            self.api.archive(x_id).await?;
        }

        self.bookmarks.remove(index);
        self.total -= 1;
        Ok(true)
    }
}
