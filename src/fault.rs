//! Fault state management for RustSinePwm.
//!
//! The duty arithmetic cannot fail. What can fail is the world around it:
//! a pin driver rejecting a write, or a worker context dying. Those latch a
//! fault here; the affected worker stops, the others keep running.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes indicating why a worker stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Output pin driver returned an error on set_high/set_low.
    /// Data: GPIO number.
    OutputFault = 1,

    /// Worker context panicked instead of returning.
    /// Data: worker slot index.
    WorkerPanicked = 2,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::OutputFault,
            2 => FaultCode::WorkerPanicked,
            _ => FaultCode::None,
        }
    }

    /// Short name for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::None => "none",
            FaultCode::OutputFault => "output fault",
            FaultCode::WorkerPanicked => "worker panicked",
        }
    }
}

/// Thread-safe fault state.
///
/// Set by any worker, read by the orchestrator through a [`FaultWatch`].
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// // In a worker:
/// if pin.set_high().is_err() {
///     FAULT.set(FaultCode::OutputFault, pin_number as u32);
///     return WorkerExit::Faulted(FaultCode::OutputFault);
/// }
///
/// // In the orchestrator's idle loop:
/// if let Some(snapshot) = watch.poll(&FAULT) {
///     rt_error!(BG_LOG_STREAM, now_us(), "{}", snapshot);
/// }
/// ```
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (pin number, worker slot).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Set fault state.
    ///
    /// Code and data are stored before the active flag, so a reader that
    /// sees `is_active()` also sees the matching code.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}

impl core::fmt::Display for FaultSnapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FAULT: {} (data {}, total {})", self.code.as_str(), self.data, self.count)
    }
}

/// Reports each new fault once.
///
/// Tracks the fault counter seen at the last poll; a poll returns a
/// snapshot only when the counter moved.
#[derive(Debug, Default)]
pub struct FaultWatch {
    seen: u32,
}

impl FaultWatch {
    pub const fn new() -> Self {
        Self { seen: 0 }
    }

    /// Snapshot of the latest fault, if any fault was latched since the last poll.
    pub fn poll(&mut self, fault: &FaultState) -> Option<FaultSnapshot> {
        let snapshot = fault.snapshot();
        if !snapshot.active || snapshot.count == self.seen {
            return None;
        }
        self.seen = snapshot.count;
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_state_basic() {
        let fault = FaultState::new();

        assert!(!fault.is_active());
        assert_eq!(fault.code(), FaultCode::None);
        assert_eq!(fault.count(), 0);

        fault.set(FaultCode::OutputFault, 2);

        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::OutputFault);
        assert_eq!(fault.data(), 2);
        assert_eq!(fault.count(), 1);
    }

    #[test]
    fn test_watch_reports_each_fault_once() {
        let fault = FaultState::new();
        let mut watch = FaultWatch::new();

        assert_eq!(watch.poll(&fault), None);

        fault.set(FaultCode::OutputFault, 4);
        let first = watch.poll(&fault).unwrap();
        assert_eq!(first.code, FaultCode::OutputFault);
        assert_eq!(first.data, 4);
        assert_eq!(format!("{}", first), "FAULT: output fault (data 4, total 1)");

        // Same fault, already reported
        assert_eq!(watch.poll(&fault), None);

        fault.set(FaultCode::WorkerPanicked, 1);
        let second = watch.poll(&fault).unwrap();
        assert_eq!(second.code, FaultCode::WorkerPanicked);
        assert_eq!(second.count, 2);
        assert_eq!(watch.poll(&fault), None);
    }

    #[test]
    fn test_fault_code_roundtrip() {
        for code in [FaultCode::None, FaultCode::OutputFault, FaultCode::WorkerPanicked] {
            assert_eq!(FaultCode::from_u8(code as u8), code);
        }
        assert_eq!(FaultCode::from_u8(200), FaultCode::None);
    }
}
