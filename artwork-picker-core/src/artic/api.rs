use super::{client::ArticClient, models::*};
use crate::error::FetchError;
use crate::source::{Page, PageSource};
use async_trait::async_trait;
use log::debug;

impl ArticClient {
    pub fn artworks_page_url(&self, page: u32) -> String {
        format!(
            "{}/artworks?page={}&fields={}",
            self.base_url(),
            page,
            ARTWORK_FIELDS
        )
    }

    pub async fn get_artworks_page(&self, page: u32) -> Result<Page, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }

        let uri = self.artworks_page_url(page);
        let response = self.call(&uri).await?;
        let body = response.bytes().await?;
        let answer: ArticPageResponse = serde_json::from_slice(&body)?;

        debug!(
            "artic page {} returned {} artworks ({} pages total)",
            page,
            answer.data.len(),
            answer.pagination.total_pages
        );

        let mut fetched = Page::new(page, answer.data, answer.pagination.total_pages);
        fetched.total_records = answer.pagination.total;
        fetched.page_limit = answer.pagination.limit;
        Ok(fetched)
    }
}

#[async_trait]
impl PageSource for ArticClient {
    async fn fetch_page(&self, page: u32) -> Result<Page, FetchError> {
        self.get_artworks_page(page).await
    }
}
