//! Shared generator status.
//!
//! One writer (the generator context), one reader (the monitor context).
//!
//! ```text
//! Generator ──publish()──▶ [SharedStatus] ──StatusView──▶ Monitor
//!                          atomic per field
//! ```
//!
//! Fields are independent atomics. A reader can observe values from two
//! different sine steps at once (torn snapshot); that is accepted. Each
//! field on its own is always a value the writer stored, so `sine_index`
//! is always a valid table index and `cycle_count` never goes backwards.

use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};

/// Status record written by the generator.
///
/// Construct as a `static` with [`SharedStatus::new`] (all zero).
pub struct SharedStatus {
    sine_index: AtomicU32,
    sine_value: AtomicI32,
    duty_value: AtomicI32,
    pwm_period: AtomicI32,
    high_end: AtomicU32,
    period_end: AtomicU32,
    cycle_count: AtomicU32,
}

impl SharedStatus {
    /// Zeroed status.
    pub const fn new() -> Self {
        Self {
            sine_index: AtomicU32::new(0),
            sine_value: AtomicI32::new(0),
            duty_value: AtomicI32::new(0),
            pwm_period: AtomicI32::new(0),
            high_end: AtomicU32::new(0),
            period_end: AtomicU32::new(0),
            cycle_count: AtomicU32::new(0),
        }
    }

    /// Publish the per-sample fields of one sine step.
    ///
    /// `cycle_count` goes last with `Release` so a reader that sees it also
    /// sees the sample it was published with (or a newer one).
    #[inline]
    pub fn publish_sample(&self, sine_index: u32, sine_value: i16, duty_value: i32, cycle_count: u32) {
        self.sine_index.store(sine_index, Ordering::Relaxed);
        self.sine_value.store(sine_value as i32, Ordering::Relaxed);
        self.duty_value.store(duty_value, Ordering::Relaxed);
        self.cycle_count.store(cycle_count, Ordering::Release);
    }

    /// Publish the pulse boundaries (ms offsets within one sub-period).
    #[inline]
    pub fn publish_pulse(&self, high_end: u32, period_end: u32) {
        self.high_end.store(high_end, Ordering::Relaxed);
        self.period_end.store(period_end, Ordering::Relaxed);
    }

    /// Publish the cycle counter alone.
    #[inline]
    pub fn publish_cycles(&self, cycle_count: u32) {
        self.cycle_count.store(cycle_count, Ordering::Release);
    }

    /// Publish the nominal PWM period (set once at generator start).
    #[inline]
    pub fn set_pwm_period(&self, period: i32) {
        self.pwm_period.store(period, Ordering::Relaxed);
    }

    /// Read-only handle for the consumer side.
    #[inline]
    pub fn view(&self) -> StatusView<'_> {
        StatusView { status: self }
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of [`SharedStatus`].
///
/// Exposes loads only; a holder has no way to write the record.
#[derive(Clone, Copy)]
pub struct StatusView<'a> {
    status: &'a SharedStatus,
}

impl<'a> StatusView<'a> {
    #[inline]
    pub fn sine_index(&self) -> u32 {
        self.status.sine_index.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sine_value(&self) -> i32 {
        self.status.sine_value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn duty_value(&self) -> i32 {
        self.status.duty_value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pwm_period(&self) -> i32 {
        self.status.pwm_period.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn high_end(&self) -> u32 {
        self.status.high_end.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn period_end(&self) -> u32 {
        self.status.period_end.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cycle_count(&self) -> u32 {
        self.status.cycle_count.load(Ordering::Acquire)
    }

    /// Field-by-field copy of the current status.
    ///
    /// Not atomic as a whole: fields may come from different sine steps.
    /// `cycle_count` is read first so the other fields are at least as new.
    #[inline]
    pub fn snapshot(&self) -> StatusSnapshot {
        let cycle_count = self.cycle_count();
        StatusSnapshot {
            sine_index: self.sine_index(),
            sine_value: self.sine_value(),
            duty_value: self.duty_value(),
            pwm_period: self.pwm_period(),
            high_end: self.high_end(),
            period_end: self.period_end(),
            cycle_count,
        }
    }
}

/// Copy of the status at (roughly) one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub sine_index: u32,
    pub sine_value: i32,
    pub duty_value: i32,
    pub pwm_period: i32,
    pub high_end: u32,
    pub period_end: u32,
    pub cycle_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_starts_zeroed() {
        let status = SharedStatus::new();
        assert_eq!(status.view().snapshot(), StatusSnapshot::default());
    }

    #[test]
    fn test_publish_then_view() {
        let status = SharedStatus::new();
        status.set_pwm_period(4000);
        status.publish_sample(512, 32767, 3960, 7);
        status.publish_pulse(2, 3);

        let snap = status.view().snapshot();
        assert_eq!(snap.sine_index, 512);
        assert_eq!(snap.sine_value, 32767);
        assert_eq!(snap.duty_value, 3960);
        assert_eq!(snap.pwm_period, 4000);
        assert_eq!(snap.high_end, 2);
        assert_eq!(snap.period_end, 3);
        assert_eq!(snap.cycle_count, 7);
    }
}
