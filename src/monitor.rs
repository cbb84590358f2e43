//! Status monitor: periodic read-only reporter of [`SharedStatus`].
//!
//! Side channel only. It holds a [`StatusView`], which has no store
//! methods, so it cannot influence the generator.
//!
//! [`SharedStatus`]: crate::status::SharedStatus

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::MonitorConfig;
use crate::hal::now_us;
use crate::log_globals::BG_LOG_STREAM;
use crate::signal::StopSignal;
use crate::status::{StatusSnapshot, StatusView};
use crate::worker::WorkerExit;

/// Metrics derived from one poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorReport {
    /// Raw (possibly torn) status copy.
    pub snapshot: StatusSnapshot,
    /// Cycles since the previous poll (wrapping).
    pub cycles_delta: u32,
    /// `cycles_delta` scaled to one second.
    pub cycles_per_sec: u32,
    /// duty / period in percent, 0 if no period yet.
    pub duty_percent: i32,
}

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.snapshot;
        write!(
            f,
            "Idx:{:4} Sine:{:6} Duty:{:4}/{:4} ({:3}%) Cycles:{} (+{}/sec) highEnd:{} periodEnd:{}",
            s.sine_index,
            s.sine_value,
            s.duty_value,
            s.pwm_period,
            self.duty_percent,
            s.cycle_count,
            self.cycles_per_sec,
            s.high_end,
            s.period_end
        )
    }
}

/// Periodic status reader.
pub struct StatusMonitor<'a> {
    view: StatusView<'a>,
    config: MonitorConfig,
    last_cycles: u32,
    last_index: Option<u32>,
}

impl<'a> StatusMonitor<'a> {
    pub fn new(view: StatusView<'a>, config: MonitorConfig) -> Self {
        Self {
            view,
            config,
            last_cycles: 0,
            last_index: None,
        }
    }

    /// Read the status once and derive metrics.
    ///
    /// Tolerates torn reads: every metric is computed from this poll's
    /// copy only, with wrapping/zero-safe arithmetic.
    pub fn poll(&mut self) -> MonitorReport {
        let snapshot = self.view.snapshot();

        let cycles_delta = snapshot.cycle_count.wrapping_sub(self.last_cycles);
        self.last_cycles = snapshot.cycle_count;

        let cycles_per_sec = match self.config.interval_ms {
            0 => cycles_delta,
            ms => ((cycles_delta as u64 * 1000) / ms as u64).min(u32::MAX as u64) as u32,
        };

        let duty_percent = if snapshot.pwm_period > 0 {
            ((snapshot.duty_value as i64 * 100) / snapshot.pwm_period as i64) as i32
        } else {
            0
        };

        MonitorReport {
            snapshot,
            cycles_delta,
            cycles_per_sec,
            duty_percent,
        }
    }

    /// Poll, returning the report only if it should be shown.
    ///
    /// With `changes_only`, a report is shown when the sine index moved.
    pub fn poll_filtered(&mut self) -> Option<MonitorReport> {
        let report = self.poll();
        if !self.config.changes_only {
            return Some(report);
        }
        let index = report.snapshot.sine_index;
        if self.last_index == Some(index) {
            None
        } else {
            self.last_index = Some(index);
            Some(report)
        }
    }

    /// Wait the grace interval, then report every `interval_ms` until stopped.
    pub fn run<D: DelayNs>(&mut self, delay: &mut D, stop: &StopSignal) -> WorkerExit {
        // Let the generator publish before the first read
        delay.delay_ms(self.config.grace_ms);

        // Start deltas from the current count, not from zero
        self.last_cycles = self.view.cycle_count();

        crate::rt_info!(
            BG_LOG_STREAM,
            now_us(),
            "monitor: started, every {} ms",
            self.config.interval_ms
        );

        while !stop.is_raised() {
            if let Some(report) = self.poll_filtered() {
                crate::rt_info!(BG_LOG_STREAM, now_us(), "{}", report);
            }
            delay.delay_ms(self.config.interval_ms);
        }

        WorkerExit::Stopped
    }
}
