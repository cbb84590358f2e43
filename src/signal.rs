//! Stop signal shared by all workers.
//!
//! Workers check it once per iteration and return instead of looping forever.

use core::sync::atomic::{AtomicBool, Ordering};

/// One-way stop flag.
///
/// ```ignore
/// static STOP: StopSignal = StopSignal::new();
///
/// // In a worker loop:
/// while !STOP.is_raised() {
///     step();
/// }
///
/// // Anywhere else:
/// STOP.raise();
/// ```
pub struct StopSignal {
    raised: AtomicBool,
}

impl StopSignal {
    /// New signal (not raised).
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Ask every worker to stop after its current iteration.
    #[inline]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Check whether stop was requested.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
