//! Cross-page row selection.
//!
//! `accumulate` answers "the first N rows of the catalog starting at the page
//! on screen": it takes what is resident, then walks forward one page at a
//! time until it has N rows or the source hands back an empty page.

use crate::artic::models::{Artwork, ArtworkId};
use crate::error::FetchError;
use crate::pagination::PaginationState;
use crate::source::PageSource;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionProgress {
    pub target: usize,
    pub collected: usize,
    pub pages_fetched: usize,
    /// Last page consulted, the current page before any fetch
    pub last_page: u32,
}

/// Collect up to `target` rows starting with the resident page of `start`.
///
/// Pages after the current one are fetched strictly one after another, in
/// increasing order, each at most once. An empty page ends the walk and the
/// result is simply shorter than `target`. Any fetch error aborts the whole
/// call and nothing gathered so far is returned.
///
/// Rows whose id was already collected in this call are skipped, so a
/// catalog that shifts between requests cannot produce duplicates.
pub async fn accumulate<S>(
    source: &S,
    start: &PaginationState,
    target: usize,
    progress: Option<&UnboundedSender<SelectionProgress>>,
) -> Result<Vec<Artwork>, FetchError>
where
    S: PageSource + ?Sized,
{
    if target == 0 {
        return Ok(Vec::new());
    }

    let _busy = start.busy_flag().raise();
    let mut collector = Collector::new(target);
    collector.extend(start.items().iter().cloned());

    let mut last_page = start.current_page();
    let mut pages_fetched = 0;
    report(progress, &collector, pages_fetched, last_page);
    debug!(
        target,
        resident = collector.rows.len(),
        page = last_page,
        "Seeded selection from resident page"
    );

    while !collector.is_full() {
        let Some(page) = last_page.checked_add(1) else {
            break;
        };

        let fetched = match source.fetch_page(page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(
                    page,
                    target,
                    collected = collector.rows.len(),
                    error = %e,
                    "Selection aborted, discarding partial rows"
                );
                return Err(e);
            }
        };
        pages_fetched += 1;
        last_page = page;

        if fetched.is_empty() {
            info!(
                page,
                target,
                collected = collector.rows.len(),
                "Catalog exhausted before target was reached"
            );
            break;
        }

        collector.extend(fetched.items);
        report(progress, &collector, pages_fetched, last_page);
    }

    debug!(
        target,
        collected = collector.rows.len(),
        pages_fetched,
        "Selection accumulated"
    );
    Ok(collector.rows)
}

struct Collector {
    target: usize,
    rows: Vec<Artwork>,
    seen: HashSet<ArtworkId>,
}

impl Collector {
    fn new(target: usize) -> Self {
        Collector {
            target,
            rows: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.rows.len() >= self.target
    }

    fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Artwork>,
    {
        for row in items {
            if self.is_full() {
                break;
            }
            if !self.seen.insert(row.id) {
                debug!(id = %row.id, "Skipping row already collected from an earlier page");
                continue;
            }
            self.rows.push(row);
        }
    }
}

fn report(
    progress: Option<&UnboundedSender<SelectionProgress>>,
    collector: &Collector,
    pages_fetched: usize,
    last_page: u32,
) {
    if let Some(tx) = progress {
        // The receiver going away only means nobody is watching anymore
        let _ = tx.send(SelectionProgress {
            target: collector.target,
            collected: collector.rows.len(),
            pages_fetched,
            last_page,
        });
    }
}
