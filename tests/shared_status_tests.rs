//! Cross-thread status sharing: one generator writing, readers polling.

use std::thread;

use embedded_hal::delay::DelayNs;

use rust_sine_pwm::config::{GeneratorConfig, MonitorConfig};
use rust_sine_pwm::hal::sim::SimPin;
use rust_sine_pwm::sine::TABLE_SIZE;
use rust_sine_pwm::{DutyGenerator, FaultState, SharedStatus, StatusMonitor, StopSignal, WorkerExit};

/// Zero-time delay so the generator writes as fast as it can.
#[derive(Clone, Copy)]
struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Raises the stop signal when dropped, so a failed assertion inside a
/// scope does not leave the generator thread running forever.
struct StopOnDrop<'a>(&'a StopSignal);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.raise();
    }
}

/// Odd step so consecutive steps land on scattered indices.
const SCATTER: GeneratorConfig = GeneratorConfig {
    phase_step: 0x0012_3457,
    ..GeneratorConfig::DEFAULT
};

#[test]
fn test_reader_sees_valid_index_and_monotonic_cycles() {
    let status = SharedStatus::new();
    let stop = StopSignal::new();
    let fault = FaultState::new();

    let pin = SimPin::new(SCATTER.output_pin);
    let line = pin.line();

    thread::scope(|s| {
        let _guard = StopOnDrop(&stop);
        let writer = s.spawn(|| {
            let mut gen = DutyGenerator::new(SCATTER, pin, NoDelay, &status);
            let exit = gen.run(&stop, &fault);
            (exit, gen.cycle_count())
        });

        let view = status.view();
        let mut last_cycles = 0;
        for _ in 0..200_000 {
            let snap = view.snapshot();
            assert!((snap.sine_index as usize) < TABLE_SIZE, "index {}", snap.sine_index);
            assert!(snap.cycle_count >= last_cycles, "cycle count went backwards");
            assert!((i16::MIN as i32..=i16::MAX as i32).contains(&snap.sine_value));
            last_cycles = snap.cycle_count;
        }

        stop.raise();
        let (exit, cycles) = writer.join().unwrap();
        assert_eq!(exit, WorkerExit::Stopped);
        assert_eq!(view.cycle_count(), cycles);
        assert_eq!(cycles % 3, 0);
        assert_eq!(line.rising_edges(), cycles);
        assert!(!line.is_high());
    });

    assert!(!fault.is_active());
}

#[test]
fn test_monitor_alongside_generator() {
    let status = SharedStatus::new();
    let stop = StopSignal::new();
    let fault = FaultState::new();

    let config = MonitorConfig {
        grace_ms: 0,
        interval_ms: 100,
        changes_only: false,
    };

    thread::scope(|s| {
        let _guard = StopOnDrop(&stop);
        s.spawn(|| {
            DutyGenerator::new(SCATTER, SimPin::new(2), NoDelay, &status).run(&stop, &fault)
        });

        let mut monitor = StatusMonitor::new(status.view(), config);
        let mut total: u64 = 0;
        let mut last_cycles = 0;
        for _ in 0..10_000 {
            let report = monitor.poll();
            let snap = report.snapshot;
            assert!((snap.sine_index as usize) < TABLE_SIZE);
            assert!(snap.cycle_count >= last_cycles);
            assert_eq!(report.cycles_delta, snap.cycle_count - last_cycles);
            // Torn reads can pair any duty with the nominal period
            assert!((0..100).contains(&report.duty_percent) || snap.pwm_period == 0);
            total += report.cycles_delta as u64;
            last_cycles = snap.cycle_count;
        }
        assert_eq!(total, last_cycles as u64);

        stop.raise();
    });
}
