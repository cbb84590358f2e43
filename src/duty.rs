//! Module: duty
//!
//! Purpose: Pure fixed-point arithmetic that turns a phase accumulator into
//! a clamped duty cycle and per-pulse on/off times.
//!
//! Architecture:
//! - Phase accumulator: 32-bit, wraps; bits [8..19) select the table entry
//! - Duty domain: percent, truncating integer math, no floating point
//! - Every extreme is absorbed by a clamp, nothing here can fail
//!
//! Safety: Safe. No unsafe blocks. Total over its input domain.

use crate::sine::{self, INDEX_MASK};

/// Right shift applied to the phase accumulator before masking.
pub const PHASE_SHIFT: u32 = 8;

/// Number of phase steps (at step 1) before the index sequence repeats.
pub const PHASE_PERIOD: u32 = 1 << (PHASE_SHIFT + sine::TABLE_BITS);

/// Lower duty bound used for pulse timing (percent).
pub const DUTY_MIN_PCT: u32 = 20;

/// Upper duty bound used for pulse timing (percent).
pub const DUTY_MAX_PCT: u32 = 80;

/// Carrier pulses emitted per sine sample.
pub const PULSES_PER_SAMPLE: u32 = 3;

/// Carrier sub-period in milliseconds at the default 333 Hz carrier.
pub const DEFAULT_SUB_PERIOD_MS: u32 = 3;

/// Shortest on or off phase (milliseconds).
pub const MIN_PULSE_MS: u32 = 1;

/// Nominal PWM period published for the monitor (~10 ms in status units).
pub const NOMINAL_PWM_PERIOD: i32 = 4000;

/// Offset that moves a signed sample into the unsigned range.
const SAMPLE_OFFSET: i32 = 32768;

/// Table index selected by a phase accumulator value.
///
/// Always in `0..TABLE_SIZE`.
#[inline]
pub const fn sine_index(phase: u32) -> u32 {
    (phase >> PHASE_SHIFT) & INDEX_MASK
}

/// Raw duty percent for a table sample, before clamping.
///
/// `-32768 → 0`, `0 → 50`, `32767 → 99`.
#[inline]
pub const fn duty_percent(sample: i16) -> u32 {
    let normalized = (sample as i32 + SAMPLE_OFFSET) as u32;
    (normalized * 100) >> 16
}

/// Duty value as published in the status record (unclamped).
#[inline]
pub const fn published_duty(duty_pct: u32) -> i32 {
    (duty_pct as i32 * NOMINAL_PWM_PERIOD) / 100
}

/// Clamp a duty percent to the range usable for pulse timing.
#[inline]
pub const fn clamp_duty(duty_pct: u32) -> u32 {
    if duty_pct > DUTY_MAX_PCT {
        DUTY_MAX_PCT
    } else if duty_pct < DUTY_MIN_PCT {
        DUTY_MIN_PCT
    } else {
        duty_pct
    }
}

/// On/off durations for one carrier pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseTiming {
    /// High time in milliseconds (>= 1)
    pub on_ms: u32,
    /// Low time in milliseconds (>= 1)
    pub off_ms: u32,
}

impl PulseTiming {
    /// Split one sub-period according to a clamped duty percent.
    ///
    /// Both phases are floored at [`MIN_PULSE_MS`].
    #[inline]
    pub const fn for_duty(duty_pct: u32, sub_period_ms: u32) -> Self {
        let duty_pct = clamp_duty(duty_pct);
        let on_ms = (duty_pct * sub_period_ms) / 100;
        let off_ms = ((100 - duty_pct) * sub_period_ms) / 100;
        Self {
            on_ms: if on_ms < MIN_PULSE_MS { MIN_PULSE_MS } else { on_ms },
            off_ms: if off_ms < MIN_PULSE_MS { MIN_PULSE_MS } else { off_ms },
        }
    }

    /// Total time of one pulse.
    #[inline]
    pub const fn period_ms(&self) -> u32 {
        self.on_ms + self.off_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_period_constant() {
        assert_eq!(PHASE_PERIOD, 524_288);
    }

    #[test]
    fn test_duty_percent_anchor_points() {
        assert_eq!(duty_percent(i16::MIN), 0);
        assert_eq!(duty_percent(0), 50);
        assert_eq!(duty_percent(i16::MAX), 99);
    }

    #[test]
    fn test_clamp_duty_bounds() {
        assert_eq!(clamp_duty(0), 20);
        assert_eq!(clamp_duty(20), 20);
        assert_eq!(clamp_duty(55), 55);
        assert_eq!(clamp_duty(80), 80);
        assert_eq!(clamp_duty(99), 80);
    }

    #[test]
    fn test_published_duty_is_unclamped() {
        assert_eq!(published_duty(0), 0);
        assert_eq!(published_duty(50), 2000);
        assert_eq!(published_duty(99), 3960);
    }
}
