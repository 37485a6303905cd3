//! Reference-counted loading indicator.
//!
//! Overlapping operations each hold a [`BusyGuard`]; the indicator stays on until the last
//! guard is dropped, so a fast call finishing cannot hide the spinner of a slow one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BusyCounter {
    in_flight: Arc<AtomicUsize>,
}

impl BusyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one operation as started. The operation settles when the guard drops.
    pub fn begin(&self) -> BusyGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        BusyGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }
}

#[derive(Debug)]
#[must_use = "the operation counts as settled as soon as the guard is dropped"]
pub struct BusyGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
