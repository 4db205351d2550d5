use crate::artic::models::Artwork;
use crate::busy::{BusyFlag, BusyIndicator};
use crate::error::FetchError;
use crate::source::PageSource;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// The page currently on screen, as last fetched from the source.
///
/// Pages are 1-based. The state only moves when a page change is asked for
/// explicitly, and only once the requested page has been fetched.
#[derive(Debug)]
pub struct PaginationState {
    current_page: u32,
    items: Vec<Artwork>,
    total_pages: u32,
    total_records: Option<u64>,
    page_limit: Option<u32>,
    fetched_at: Option<OffsetDateTime>,
    busy: BusyFlag,
}

impl PaginationState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            items: Vec::new(),
            total_pages: 0,
            total_records: None,
            page_limit: None,
            fetched_at: None,
            busy: BusyFlag::new(),
        }
    }

    /// Create the state and fetch the first page right away
    pub async fn load<S>(source: &S) -> Result<Self, FetchError>
    where
        S: PageSource + ?Sized,
    {
        let mut state = Self::new();
        state.go_to_page(source, 1).await?;
        Ok(state)
    }

    pub async fn go_to_page<S>(&mut self, source: &S, page: u32) -> Result<(), FetchError>
    where
        S: PageSource + ?Sized,
    {
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }

        let _busy = self.busy.raise();
        debug!(page, from = self.current_page, "Navigating to page");

        match source.fetch_page(page).await {
            Ok(fetched) => {
                self.current_page = page;
                self.items = fetched.items;
                self.total_pages = fetched.total_pages;
                self.total_records = fetched.total_records;
                if fetched.page_limit.is_some() {
                    self.page_limit = fetched.page_limit;
                }
                self.fetched_at = Some(fetched.fetched_at);
                Ok(())
            }
            Err(e) => {
                warn!(page, current_page = self.current_page, error = %e, "Page change failed");
                Err(e)
            }
        }
    }

    /// Returns `Ok(false)` without fetching when already on the last page
    pub async fn next_page<S>(&mut self, source: &S) -> Result<bool, FetchError>
    where
        S: PageSource + ?Sized,
    {
        if !self.can_go_next() {
            return Ok(false);
        }
        self.go_to_page(source, self.current_page + 1).await?;
        Ok(true)
    }

    /// Returns `Ok(false)` without fetching when already on the first page
    pub async fn prev_page<S>(&mut self, source: &S) -> Result<bool, FetchError>
    where
        S: PageSource + ?Sized,
    {
        if !self.can_go_prev() {
            return Ok(false);
        }
        self.go_to_page(source, self.current_page - 1).await?;
        Ok(true)
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Rows of the current page, available without another fetch
    pub fn items(&self) -> &[Artwork] {
        &self.items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_records(&self) -> Option<u64> {
        self.total_records
    }

    /// When the resident page was fetched, `None` before the first load
    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.fetched_at
    }

    /// Zero-based catalog index of the first resident row
    pub fn first_row_index(&self) -> u64 {
        let page_len = self
            .page_limit
            .map(u64::from)
            .unwrap_or(self.items.len() as u64);
        u64::from(self.current_page - 1) * page_len
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_flag(&self) -> &BusyFlag {
        &self.busy
    }

    pub fn busy_indicator(&self) -> BusyIndicator {
        self.busy.indicator()
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}
