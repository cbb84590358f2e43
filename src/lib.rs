//! # RustSinePwm
//!
//! Sine-weighted software PWM on one GPIO, with a lock-free status monitor.
//!
//! ## Architecture
//!
//! Each worker runs in its own context and shares nothing but what is listed:
//! - [`DutyGenerator`] writes [`SharedStatus`] (atomic per field, no lock)
//! - [`StatusMonitor`] reads it through a [`StatusView`] and never writes
//! - Two [`BlinkWorker`]s toggle their own pins, independent of both
//! - Every worker checks the [`StopSignal`] once per iteration
//!
//! Torn multi-field reads of the status are accepted; each field alone is
//! always valid.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod sine;
pub mod duty;
pub mod status;
pub mod signal;
pub mod fault;
pub mod worker;
pub mod logging;
pub mod log_globals;
pub mod log_drain;
pub mod hal;
pub mod generator;
pub mod monitor;
pub mod blink;

#[cfg(any(test, feature = "std"))]
pub mod launch;

pub use config::{BlinkConfig, ConfigError, GeneratorConfig, MonitorConfig, CONFIG};
pub use status::{SharedStatus, StatusSnapshot, StatusView};
pub use signal::StopSignal;
pub use fault::{FaultCode, FaultSnapshot, FaultState, FaultWatch};
pub use worker::WorkerExit;
pub use generator::{DutyGenerator, GeneratorState, SineStep};
pub use monitor::{MonitorReport, StatusMonitor};
pub use blink::BlinkWorker;
pub use log_globals::{BG_LOG_STREAM, RT_LOG_STREAM};
