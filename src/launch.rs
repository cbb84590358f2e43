//! Worker launcher.
//!
//! Every worker gets its own thread (a FreeRTOS task on ESP-IDF, pinned to
//! a core). A worker whose context cannot be created fails alone; the
//! ones already started keep running.

use std::string::String;
use std::thread::{self, JoinHandle};
use std::vec::Vec;

use crate::fault::{FaultCode, FaultState};
use crate::worker::WorkerExit;

/// CPU core a worker is pinned to (ignored on the host).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Core {
    /// Timing-critical work (generator).
    Core0,
    /// Everything else.
    Core1,
}

/// How to start one worker.
#[derive(Clone, Copy, Debug)]
pub struct WorkerSpec {
    pub name: &'static str,
    pub stack_size: usize,
    pub core: Core,
}

/// Launch error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// L01: No memory / task slot for the worker's context
    ContextUnavailable(&'static str),
    /// L02: Core pinning could not be configured
    PinningFailed(&'static str),
}

impl SpawnError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ContextUnavailable(_) => "L01",
            Self::PinningFailed(_) => "L02",
        }
    }

    /// Name of the worker that failed to start
    pub fn worker(&self) -> &'static str {
        match self {
            Self::ContextUnavailable(name) | Self::PinningFailed(name) => name,
        }
    }
}

impl core::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ContextUnavailable(name) => write!(f, "{}: no context for worker '{}'", self.code(), name),
            Self::PinningFailed(name) => write!(f, "{}: cannot pin worker '{}'", self.code(), name),
        }
    }
}

/// Started workers, joined at shutdown.
#[derive(Default)]
pub struct Launcher {
    handles: Vec<(&'static str, JoinHandle<WorkerExit>)>,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `job` in its own context.
    pub fn spawn<F>(&mut self, spec: WorkerSpec, job: F) -> Result<(), SpawnError>
    where
        F: FnOnce() -> WorkerExit + Send + 'static,
    {
        pin_next_spawn(&spec)?;

        let spawned = thread::Builder::new()
            .name(String::from(spec.name))
            .stack_size(spec.stack_size)
            .spawn(job);

        reset_spawn_config();

        let handle = spawned.map_err(|_| SpawnError::ContextUnavailable(spec.name))?;
        self.handles.push((spec.name, handle));
        Ok(())
    }

    /// Number of workers started.
    pub fn running(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker. A panicked worker latches a fault.
    pub fn join_all(self, fault: &FaultState) -> Vec<(&'static str, WorkerExit)> {
        self.handles
            .into_iter()
            .enumerate()
            .map(|(slot, (name, handle))| {
                let exit = handle.join().unwrap_or_else(|_| {
                    fault.set(FaultCode::WorkerPanicked, slot as u32);
                    WorkerExit::Faulted(FaultCode::WorkerPanicked)
                });
                (name, exit)
            })
            .collect()
    }
}

#[cfg(target_os = "espidf")]
fn pin_next_spawn(spec: &WorkerSpec) -> Result<(), SpawnError> {
    use esp_idf_svc::hal::cpu::Core as EspCore;
    use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;

    let core = match spec.core {
        Core::Core0 => EspCore::Core0,
        Core::Core1 => EspCore::Core1,
    };

    ThreadSpawnConfiguration {
        stack_size: spec.stack_size,
        pin_to_core: Some(core),
        ..Default::default()
    }
    .set()
    .map_err(|_| SpawnError::PinningFailed(spec.name))
}

#[cfg(not(target_os = "espidf"))]
fn pin_next_spawn(_spec: &WorkerSpec) -> Result<(), SpawnError> {
    Ok(())
}

#[cfg(target_os = "espidf")]
fn reset_spawn_config() {
    use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;

    let _ = ThreadSpawnConfiguration::default().set();
}

#[cfg(not(target_os = "espidf"))]
fn reset_spawn_config() {}
