//! Blinker tests

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType};

use rust_sine_pwm::config::{BlinkConfig, FAST_BLINK, SLOW_BLINK};
use rust_sine_pwm::hal::sim::SimPin;
use rust_sine_pwm::{BlinkWorker, FaultCode, FaultState, FaultWatch, StopSignal, WorkerExit};

struct StopAfter<'a> {
    waits: Vec<u32>,
    limit: usize,
    stop: &'a StopSignal,
}

impl DelayNs for StopAfter<'_> {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(ms);
        if self.waits.len() >= self.limit {
            self.stop.raise();
        }
    }
}

#[derive(Debug)]
struct Broken;

impl Error for Broken {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = Broken;
}

impl embedded_hal::digital::OutputPin for BrokenPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(Broken)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(Broken)
    }
}

#[test]
fn test_default_blinkers_are_independent() {
    assert_ne!(FAST_BLINK.pin, SLOW_BLINK.pin);
    assert_eq!(FAST_BLINK.dwell_ms, 100);
    assert_eq!(SLOW_BLINK.dwell_ms, 200);
}

#[test]
fn test_blink_dwell_and_stop() {
    let stop = StopSignal::new();
    let fault = FaultState::new();
    let pin = SimPin::new(FAST_BLINK.pin);
    let line = pin.line();
    let mut delay = StopAfter { waits: Vec::new(), limit: 4, stop: &stop };

    let mut worker = BlinkWorker::new(FAST_BLINK, pin, &mut delay);
    assert_eq!(worker.run(&stop, &fault), WorkerExit::Stopped);
    assert_eq!(worker.toggles(), 2);
    drop(worker);

    assert_eq!(delay.waits, vec![100, 100, 100, 100]);
    assert_eq!(line.rising_edges(), 2);
    assert!(!line.is_high());
}

#[test]
fn test_blink_fault() {
    let stop = StopSignal::new();
    let fault = FaultState::new();
    let config = BlinkConfig { pin: 9, dwell_ms: 1 };
    let mut delay = StopAfter { waits: Vec::new(), limit: usize::MAX, stop: &stop };

    let mut worker = BlinkWorker::new(config, BrokenPin, &mut delay);
    assert_eq!(worker.run(&stop, &fault), WorkerExit::Faulted(FaultCode::OutputFault));
    assert_eq!(fault.data(), 9);
}

#[test]
fn test_blink_fault_reported_once_by_watch() {
    let stop = StopSignal::new();
    let fault = FaultState::new();
    let mut watch = FaultWatch::new();
    let config = BlinkConfig { pin: 5, dwell_ms: 1 };
    let mut delay = StopAfter { waits: Vec::new(), limit: usize::MAX, stop: &stop };

    BlinkWorker::new(config, BrokenPin, &mut delay).run(&stop, &fault);

    let snapshot = watch.poll(&fault).unwrap();
    assert!(snapshot.active);
    assert_eq!(snapshot.code, FaultCode::OutputFault);
    assert_eq!(snapshot.data, 5);
    assert_eq!(watch.poll(&fault), None);
}
