//! Global log stream instances.
//!
//! One stream for the generator core, one for everything else,
//! both drained by the log drain context.

use crate::logging::LogStream;

/// Log stream for the generator context (core 0).
///
/// Single producer (generator), single consumer (log drain).
pub static RT_LOG_STREAM: LogStream = LogStream::new();

/// Log stream for monitor, blinkers and orchestrator (core 1).
///
/// Multiple producers, single consumer (log drain).
pub static BG_LOG_STREAM: LogStream = LogStream::new();
