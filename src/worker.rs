//! Worker outcome shared by every long-running loop.

use crate::fault::FaultCode;

/// How a worker loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// Stop signal observed between iterations.
    Stopped,
    /// Worker gave up after latching a fault.
    Faulted(FaultCode),
}

impl core::fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WorkerExit::Stopped => f.write_str("stopped"),
            WorkerExit::Faulted(code) => write!(f, "faulted ({})", code.as_str()),
        }
    }
}
