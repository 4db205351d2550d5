//! The page-fetching boundary between the table state and the remote catalog.

use crate::artic::models::Artwork;
use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;

/// One page of the catalog as it looked when it was fetched
#[derive(Debug, Clone)]
pub struct Page {
    pub number: u32,
    pub items: Vec<Artwork>,
    pub total_pages: u32,
    pub total_records: Option<u64>,
    /// Page length the source says it uses, when it says so
    pub page_limit: Option<u32>,
    pub fetched_at: OffsetDateTime,
}

impl Page {
    pub fn new(number: u32, items: Vec<Artwork>, total_pages: u32) -> Self {
        Page {
            number,
            items,
            total_pages,
            total_records: None,
            page_limit: None,
            fetched_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Anything that can hand out catalog pages by number (1-based).
///
/// Implementations do not retry and do not cache: every call is a fresh read
/// and may observe a catalog that changed since the previous call.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Page, FetchError>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(&self, page: u32) -> Result<Page, FetchError> {
        (**self).fetch_page(page).await
    }
}
