//! Loading flag shared by page navigation and row accumulation.
//!
//! The flag is a counter of outstanding guards so that it reads busy while at
//! least one fetch chain holds it and clears only when the last guard drops,
//! whichever way the owning operation returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    holders: Arc<AtomicUsize>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the flag busy until the returned guard is dropped
    pub fn raise(&self) -> BusyGuard {
        self.holders.fetch_add(1, Ordering::AcqRel);
        BusyGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }

    /// Read-only handle for a view that only needs to show a spinner
    pub fn indicator(&self) -> BusyIndicator {
        BusyIndicator {
            holders: Arc::clone(&self.holders),
        }
    }
}

#[derive(Debug)]
#[must_use = "the flag is lowered as soon as the guard is dropped"]
pub struct BusyGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
    }
}

#[derive(Debug, Clone)]
pub struct BusyIndicator {
    holders: Arc<AtomicUsize>,
}

impl BusyIndicator {
    pub fn is_busy(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }
}
