//! Fixed-period blinker.
//!
//! Two-state toggler with no link to the generator. Two instances run in
//! their own contexts to exercise parallel execution.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::BlinkConfig;
use crate::fault::{FaultCode, FaultState};
use crate::hal::now_us;
use crate::log_globals::BG_LOG_STREAM;
use crate::signal::StopSignal;
use crate::worker::WorkerExit;

pub struct BlinkWorker<P, D> {
    config: BlinkConfig,
    pin: P,
    delay: D,
    toggles: u32,
}

impl<P, D> BlinkWorker<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(config: BlinkConfig, pin: P, delay: D) -> Self {
        Self {
            config,
            pin,
            delay,
            toggles: 0,
        }
    }

    /// One full period: high for `dwell_ms`, then low for `dwell_ms`.
    pub fn blink_once(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.delay.delay_ms(self.config.dwell_ms);
        self.pin.set_low()?;
        self.delay.delay_ms(self.config.dwell_ms);
        self.toggles = self.toggles.wrapping_add(1);
        Ok(())
    }

    /// Blink until `stop` is raised or the pin fails.
    pub fn run(&mut self, stop: &StopSignal, fault: &FaultState) -> WorkerExit {
        while !stop.is_raised() {
            if self.blink_once().is_err() {
                fault.set(FaultCode::OutputFault, self.config.pin as u32);
                let _ = self.pin.set_low();
                crate::rt_error!(BG_LOG_STREAM, now_us(), "blink: output fault on pin {}", self.config.pin);
                return WorkerExit::Faulted(FaultCode::OutputFault);
            }
        }
        WorkerExit::Stopped
    }

    /// Completed high/low periods.
    #[inline]
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}
