//! In-memory catalog used by the unit tests.

use crate::artic::models::Artwork;
use crate::error::FetchError;
use crate::source::{Page, PageSource};
use async_trait::async_trait;
use std::sync::Mutex;

pub fn artwork(id: u64) -> Artwork {
    let mut artwork = Artwork::with_id(id);
    artwork.title = Some(format!("Artwork {}", id));
    artwork
}

pub fn ids(rows: &[Artwork]) -> Vec<u64> {
    rows.iter().map(|row| row.id.0).collect()
}

/// Catalog of `total` artworks with ids `1..=total`, cut into pages of `page_len`.
/// Pages past the end come back empty, like the remote API.
pub struct FixtureCatalog {
    pages: Vec<Vec<Artwork>>,
    fail_on: Mutex<Option<u32>>,
    requested: Mutex<Vec<u32>>,
}

impl FixtureCatalog {
    pub fn new(total: u64, page_len: usize) -> Self {
        let rows: Vec<Artwork> = (1..=total).map(artwork).collect();
        let pages = rows.chunks(page_len).map(|chunk| chunk.to_vec()).collect();
        Self::from_pages(pages)
    }

    pub fn from_pages(pages: Vec<Vec<Artwork>>) -> Self {
        FixtureCatalog {
            pages,
            fail_on: Mutex::new(None),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Make every later request for `page` fail
    pub fn fail_on(&self, page: u32) {
        *self.fail_on.lock().unwrap() = Some(page);
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    pub fn forget_requests(&self) {
        self.requested.lock().unwrap().clear();
    }
}

#[async_trait]
impl PageSource for FixtureCatalog {
    async fn fetch_page(&self, page: u32) -> Result<Page, FetchError> {
        self.requested.lock().unwrap().push(page);
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }
        if *self.fail_on.lock().unwrap() == Some(page) {
            return Err(FetchError::Source(format!("page {} unavailable", page)));
        }
        // Yield like a real request would
        tokio::task::yield_now().await;

        let items = self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();
        let mut fetched = Page::new(page, items, self.pages.len() as u32);
        fetched.total_records = Some(self.pages.iter().map(Vec::len).sum::<usize>() as u64);
        fetched.page_limit = self.pages.first().map(|first| first.len() as u32);
        Ok(fetched)
    }
}
