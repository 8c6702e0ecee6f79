//! Reference-counted in-flight indicator.
//!
//! Every gateway call holds a [`BusyGuard`] for its duration, so the counter
//! is exact under concurrency and always returns to zero, including when a
//! call fails or its future is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BusyIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one call as started; the returned guard marks it finished on drop.
    ///
    /// ```
    /// use factcheck_llm::busy::BusyIndicator;
    ///
    /// let busy = BusyIndicator::new();
    /// {
    ///     let _a = busy.enter();
    ///     let _b = busy.enter();
    ///     assert_eq!(busy.in_flight(), 2);
    /// }
    /// assert!(!busy.is_busy());
    /// ```
    pub fn enter(&self) -> BusyGuard {
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
pub struct BusyGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
