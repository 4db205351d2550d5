use crate::accumulator::{SelectionProgress, accumulate};
use crate::artic::models::{Artwork, ArtworkId};
use crate::busy::BusyIndicator;
use crate::error::FetchError;
use crate::pagination::PaginationState;
use crate::selection::SelectionSet;
use crate::source::PageSource;
use time::OffsetDateTime;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// One resident row as the view should draw it
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub artwork: Artwork,
    pub selected: bool,
}

/// Everything the view layer needs to render the table, copied out of the state
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: Option<u64>,
    pub first_row_index: u64,
    pub fetched_at: Option<OffsetDateTime>,
    pub busy: bool,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub rows: Vec<RowView>,
    pub selected_count: usize,
}

/// A paginated artwork table with a selection that outlives page changes.
///
/// All transitions take `&mut self`, so a page change can never interleave
/// with a running row accumulation on the same table.
pub struct ArtworkTable<S> {
    source: S,
    pagination: PaginationState,
    selection: SelectionSet,
}

impl<S: PageSource> ArtworkTable<S> {
    /// Open the table on page 1
    pub async fn open(source: S) -> Result<Self, FetchError> {
        let pagination = PaginationState::load(&source).await?;
        Ok(ArtworkTable {
            source,
            pagination,
            selection: SelectionSet::new(),
        })
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<(), FetchError> {
        self.pagination.go_to_page(&self.source, page).await
    }

    pub async fn next_page(&mut self) -> Result<bool, FetchError> {
        self.pagination.next_page(&self.source).await
    }

    pub async fn prev_page(&mut self) -> Result<bool, FetchError> {
        self.pagination.prev_page(&self.source).await
    }

    /// Returns whether the row is selected afterwards
    pub fn toggle_row(&mut self, row: &Artwork) -> bool {
        self.selection.toggle(row)
    }

    pub fn select_row(&mut self, row: Artwork) -> bool {
        self.selection.select(row)
    }

    pub fn unselect_row(&mut self, id: ArtworkId) -> bool {
        self.selection.unselect(id)
    }

    /// Replace the selection with the first `count` rows from the current
    /// page onward. On error the previous selection is left as it was.
    /// Returns the number of rows now selected.
    pub async fn select_rows(&mut self, count: usize) -> Result<usize, FetchError> {
        self.select_rows_inner(count, None).await
    }

    pub async fn select_rows_with_progress(
        &mut self,
        count: usize,
        progress: &UnboundedSender<SelectionProgress>,
    ) -> Result<usize, FetchError> {
        self.select_rows_inner(count, Some(progress)).await
    }

    /// Submit handler for the "how many rows" prompt: an empty or negative
    /// entry selects nothing.
    pub async fn select_rows_from_input(
        &mut self,
        input: Option<i64>,
    ) -> Result<usize, FetchError> {
        let count = input
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(0);
        self.select_rows(count).await
    }

    async fn select_rows_inner(
        &mut self,
        count: usize,
        progress: Option<&UnboundedSender<SelectionProgress>>,
    ) -> Result<usize, FetchError> {
        let rows = accumulate(&self.source, &self.pagination, count, progress).await?;
        info!(
            requested = count,
            selected = rows.len(),
            page = self.pagination.current_page(),
            "Replacing selection"
        );
        self.selection.replace_all(rows);
        Ok(self.selection.len())
    }
}

impl<S> ArtworkTable<S> {
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn busy_indicator(&self) -> BusyIndicator {
        self.pagination.busy_indicator()
    }

    /// Resident row by its 0-based position on the current page
    pub fn resident_row(&self, index: usize) -> Option<&Artwork> {
        self.pagination.items().get(index)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let rows = self
            .pagination
            .items()
            .iter()
            .map(|artwork| RowView {
                selected: self.selection.contains(artwork.id),
                artwork: artwork.clone(),
            })
            .collect();

        TableSnapshot {
            current_page: self.pagination.current_page(),
            total_pages: self.pagination.total_pages(),
            total_records: self.pagination.total_records(),
            first_row_index: self.pagination.first_row_index(),
            fetched_at: self.pagination.fetched_at(),
            busy: self.pagination.is_busy(),
            can_go_prev: self.pagination.can_go_prev(),
            can_go_next: self.pagination.can_go_next(),
            rows,
            selected_count: self.selection.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixtureCatalog, ids};
    use std::sync::Arc;

    async fn open_table(
        total: u64,
        page_len: usize,
    ) -> (Arc<FixtureCatalog>, ArtworkTable<Arc<FixtureCatalog>>) {
        let catalog = Arc::new(FixtureCatalog::new(total, page_len));
        let table = ArtworkTable::open(Arc::clone(&catalog)).await.unwrap();
        catalog.forget_requests();
        (catalog, table)
    }

    #[tokio::test]
    async fn test_select_rows_replaces_selection_and_keeps_page() {
        let (catalog, mut table) = open_table(50, 12).await;
        let sixth = table.resident_row(5).unwrap().clone();
        table.toggle_row(&sixth);

        let selected = table.select_rows(15).await.unwrap();
        assert_eq!(selected, 15);
        assert_eq!(ids(&table.selection().to_vec()), (1..=15).collect::<Vec<_>>());
        assert_eq!(table.pagination().current_page(), 1);
        assert_eq!(catalog.requested(), vec![2]);
        assert!(!table.busy_indicator().is_busy());
    }

    #[tokio::test]
    async fn test_failed_selection_leaves_previous_selection() {
        let (catalog, mut table) = open_table(50, 12).await;
        table.select_rows(3).await.unwrap();
        let before = table.selection().ids();
        catalog.fail_on(2);

        let result = table.select_rows(20).await;
        assert!(matches!(result, Err(FetchError::Source(_))));
        assert_eq!(table.selection().ids(), before);
        assert!(!table.busy_indicator().is_busy());
        assert!(!table.snapshot().busy);
    }

    #[tokio::test]
    async fn test_selection_survives_navigation() {
        let (_catalog, mut table) = open_table(50, 12).await;
        let row = table.resident_row(0).unwrap().clone();
        assert!(table.toggle_row(&row));

        table.go_to_page(2).await.unwrap();
        assert!(table.selection().contains(row.id));
        let snapshot = table.snapshot();
        assert_eq!(snapshot.current_page, 2);
        assert_eq!(snapshot.selected_count, 1);
        assert!(snapshot.rows.iter().all(|view| !view.selected));

        table.go_to_page(1).await.unwrap();
        let snapshot = table.snapshot();
        assert!(snapshot.rows[0].selected);
        assert!(!snapshot.rows[1].selected);
    }

    #[tokio::test]
    async fn test_select_from_later_page_starts_there() {
        let (catalog, mut table) = open_table(50, 12).await;
        table.next_page().await.unwrap();
        catalog.forget_requests();

        table.select_rows(14).await.unwrap();
        assert_eq!(ids(&table.selection().to_vec()), (13..=26).collect::<Vec<_>>());
        assert_eq!(catalog.requested(), vec![3]);
        assert_eq!(table.pagination().current_page(), 2);
    }

    #[tokio::test]
    async fn test_prompt_input_is_clamped() {
        let (catalog, mut table) = open_table(50, 12).await;
        table.select_rows(2).await.unwrap();

        assert_eq!(table.select_rows_from_input(None).await.unwrap(), 0);
        assert!(table.selection().is_empty());
        assert_eq!(table.select_rows_from_input(Some(-4)).await.unwrap(), 0);
        assert_eq!(table.select_rows_from_input(Some(4)).await.unwrap(), 4);
        assert!(catalog.requested().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_reflects_pagination() {
        let (_catalog, mut table) = open_table(30, 12).await;
        table.go_to_page(3).await.unwrap();

        let snapshot = table.snapshot();
        assert_eq!(snapshot.total_pages, 3);
        assert_eq!(snapshot.total_records, Some(30));
        assert_eq!(snapshot.first_row_index, 24);
        assert_eq!(snapshot.rows.len(), 6);
        assert!(snapshot.can_go_prev);
        assert!(!snapshot.can_go_next);
        assert!(!snapshot.busy);
        assert_eq!(snapshot.fetched_at, table.pagination().fetched_at());
        assert!(snapshot.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_select_and_unselect_single_rows() {
        let (catalog, mut table) = open_table(50, 12).await;
        let third = table.resident_row(2).unwrap().clone();

        assert!(table.select_row(third.clone()));
        assert!(!table.select_row(third.clone()));
        assert_eq!(table.selection().len(), 1);
        let snapshot = table.snapshot();
        assert!(snapshot.rows[2].selected);
        assert_eq!(snapshot.selected_count, 1);

        assert!(table.unselect_row(third.id));
        assert!(!table.unselect_row(third.id));
        assert!(table.selection().is_empty());
        assert!(!table.snapshot().rows[2].selected);
        assert!(catalog.requested().is_empty());
    }

    #[tokio::test]
    async fn test_progress_channel_sees_final_count() {
        let (_catalog, mut table) = open_table(50, 12).await;
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        table.select_rows_with_progress(40, &tx).await.unwrap();
        drop(tx);

        let mut last = None;
        while let Some(progress) = rx.recv().await {
            last = Some(progress);
        }
        assert_eq!(last.map(|p| p.collected), Some(40));
    }
}
