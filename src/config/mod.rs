//! Module: config
//!
//! Purpose: Launch-time configuration for the generator, the monitor and
//! the two blinkers.
//!
//! Architecture:
//! - Plain `Copy` structs with `const` defaults, validated once in `main`
//! - Never mutated after the workers start (handed out by value)
//! - Derived timing (sub-period, phase step) computed here, not in the loop
//!
//! Safety: Safe. No unsafe blocks.

use crate::duty::{DEFAULT_SUB_PERIOD_MS, PHASE_PERIOD, PULSES_PER_SAMPLE};

/// Highest GPIO number on the supported chips.
pub const MAX_GPIO: u8 = 48;

/// Shortest sub-period that still leaves 1 ms for each phase.
pub const MIN_SUB_PERIOD_MS: u32 = 2;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: Carrier frequency is zero
    ZeroCarrier,
    /// C02: Carrier faster than the minimum sub-period allows
    CarrierTooFast,
    /// C03: Pin number outside the GPIO matrix
    InvalidPin,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroCarrier => "C01",
            Self::CarrierTooFast => "C02",
            Self::InvalidPin => "C03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroCarrier => "carrier frequency is zero",
            Self::CarrierTooFast => "carrier above 500 Hz",
            Self::InvalidPin => "pin out of range",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Sine PWM generator parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Output GPIO number.
    pub output_pin: u8,

    /// Nominal carrier frequency in Hz.
    pub carrier_frequency_hz: u32,

    /// Intended sine sweep frequency in Hz.
    ///
    /// Only consulted by [`GeneratorConfig::with_tracked_sine_frequency`].
    pub sine_frequency_hz: u32,

    /// Phase accumulator increment per sine step.
    pub phase_step: u32,
}

impl GeneratorConfig {
    /// Defaults: pin 2, 333 Hz carrier, step 1 (about 0.16 Hz sweep).
    pub const DEFAULT: Self = Self {
        output_pin: 2,
        carrier_frequency_hz: 333,
        sine_frequency_hz: 1,
        phase_step: 1,
    };

    /// Check the configuration before any worker starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_pin > MAX_GPIO {
            return Err(ConfigError::InvalidPin);
        }
        if self.carrier_frequency_hz == 0 {
            return Err(ConfigError::ZeroCarrier);
        }
        if 1000 / self.carrier_frequency_hz < MIN_SUB_PERIOD_MS {
            return Err(ConfigError::CarrierTooFast);
        }
        Ok(())
    }

    /// Carrier sub-period in milliseconds.
    ///
    /// 333 Hz gives 3 ms. Falls back to the default for a zero carrier.
    #[inline]
    pub fn sub_period_ms(&self) -> u32 {
        match self.carrier_frequency_hz {
            0 => DEFAULT_SUB_PERIOD_MS,
            hz => (1000 / hz).max(MIN_SUB_PERIOD_MS),
        }
    }

    /// Time spent on one sine step (all pulses of one sample).
    #[inline]
    pub fn step_duration_ms(&self) -> u32 {
        self.sub_period_ms() * PULSES_PER_SAMPLE
    }

    /// Phase step that would make one table sweep last `1 / sine_frequency_hz`.
    ///
    /// step = f * 2^19 * step_duration / 1000, at least 1.
    pub fn tracked_phase_step(&self) -> u32 {
        let step = (self.sine_frequency_hz as u64
            * PHASE_PERIOD as u64
            * self.step_duration_ms() as u64)
            / 1000;
        step.clamp(1, u32::MAX as u64) as u32
    }

    /// Copy of this config with `phase_step` derived from `sine_frequency_hz`.
    pub fn with_tracked_sine_frequency(self) -> Self {
        Self {
            phase_step: self.tracked_phase_step(),
            ..self
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Blinker parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlinkConfig {
    /// Output GPIO number.
    pub pin: u8,
    /// Time spent in each state (ms).
    pub dwell_ms: u32,
}

/// Monitor parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Wait before the first read (ms).
    pub grace_ms: u32,
    /// Time between reads (ms).
    pub interval_ms: u32,
    /// Report only when the sine index moved.
    pub changes_only: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MONITOR
    }
}

/// Generator configuration used by the firmware.
pub const CONFIG: GeneratorConfig = GeneratorConfig::DEFAULT;

/// Fast blinker: 100 ms high, 100 ms low.
pub const FAST_BLINK: BlinkConfig = BlinkConfig { pin: 4, dwell_ms: 100 };

/// Slow blinker: 200 ms high, 200 ms low.
pub const SLOW_BLINK: BlinkConfig = BlinkConfig { pin: 5, dwell_ms: 200 };

/// Status monitor cadence.
pub const MONITOR: MonitorConfig = MonitorConfig {
    grace_ms: 100,
    interval_ms: 100,
    changes_only: false,
};
