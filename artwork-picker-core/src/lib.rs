pub mod accumulator;
pub mod artic;
pub mod busy;
pub mod config;
pub mod error;
pub mod pagination;
pub mod selection;
pub mod source;
pub mod table;

#[cfg(test)]
mod test_support;

pub use accumulator::{SelectionProgress, accumulate};
pub use artic::{ApiCall, ArticClient, Artwork, ArtworkId};
pub use busy::{BusyFlag, BusyGuard, BusyIndicator};
pub use config::CatalogConfig;
pub use error::{ConfigError, FetchError};
pub use pagination::PaginationState;
pub use selection::SelectionSet;
pub use source::{Page, PageSource};
pub use table::{ArtworkTable, RowView, TableSnapshot};

/// Open a table on page 1 of the remote catalog described by `config`
pub async fn open_catalog_table(
    config: &CatalogConfig,
) -> Result<ArtworkTable<ArticClient>, FetchError> {
    let client = ArticClient::new(config)?;
    ArtworkTable::open(client).await
}
