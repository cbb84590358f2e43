//! Simulated GPIO line and std-backed delay for host runs.

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Observable state of one simulated output line.
#[derive(Default)]
pub struct SimLine {
    high: AtomicBool,
    rising_edges: AtomicU32,
}

impl SimLine {
    /// Current output level.
    pub fn is_high(&self) -> bool {
        self.high.load(Ordering::Acquire)
    }

    /// Number of low→high transitions so far.
    pub fn rising_edges(&self) -> u32 {
        self.rising_edges.load(Ordering::Acquire)
    }
}

/// Output pin that records its level in a shared [`SimLine`].
pub struct SimPin {
    number: u8,
    line: Arc<SimLine>,
}

impl SimPin {
    /// New pin, driven low.
    pub fn new(number: u8) -> Self {
        Self {
            number,
            line: Arc::new(SimLine::default()),
        }
    }

    /// GPIO number this pin stands in for.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Handle for observing the line after the pin moved into a worker.
    pub fn line(&self) -> Arc<SimLine> {
        Arc::clone(&self.line)
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.line.high.swap(true, Ordering::AcqRel) {
            self.line.rising_edges.fetch_add(1, Ordering::AcqRel);
        }
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.line.high.store(false, Ordering::Release);
        Ok(())
    }
}

/// Blocking delay on top of `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_pin_counts_rising_edges() {
        let mut pin = SimPin::new(2);
        let line = pin.line();

        pin.set_high().unwrap();
        pin.set_high().unwrap();
        assert!(line.is_high());
        pin.set_low().unwrap();
        pin.set_high().unwrap();

        assert_eq!(line.rising_edges(), 2);
        assert_eq!(pin.number(), 2);
    }
}
