//! Sine-weighted duty-cycle generator.
//!
//! Pure timing logic over `embedded-hal` traits. No ESP-IDF types, fully
//! testable on host with fake pins and delays.
//!
//! # Per sine step
//!
//! ```text
//! phase ──▶ index ──▶ sample ──▶ duty% ──publish──▶ SharedStatus
//!                                  │
//!                                clamp 20..80
//!                                  │
//!                      3 × (high on_ms, low off_ms)
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::GeneratorConfig;
use crate::duty::{self, PulseTiming, NOMINAL_PWM_PERIOD, PULSES_PER_SAMPLE};
use crate::fault::{FaultCode, FaultState};
use crate::hal::now_us;
use crate::log_globals::RT_LOG_STREAM;
use crate::signal::StopSignal;
use crate::sine;
use crate::status::SharedStatus;
use crate::worker::WorkerExit;

/// Generator lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorState {
    /// Created, output not yet configured.
    Initializing,
    /// Emitting pulses.
    Running,
    /// Stop signal observed.
    Stopped,
    /// Output pin failed, fault latched.
    Faulted,
}

/// Everything derived from one phase value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SineStep {
    /// Table index, always < 2048.
    pub sine_index: u32,
    /// Table sample.
    pub sine_value: i16,
    /// Duty percent before clamping (0..=99).
    pub raw_duty_pct: u32,
    /// Duty percent used for pulses (20..=80).
    pub duty_pct: u32,
    /// Per-pulse on/off times.
    pub timing: PulseTiming,
}

impl SineStep {
    /// Derive a step from a phase value and carrier sub-period.
    #[inline]
    pub fn from_phase(phase: u32, sub_period_ms: u32) -> Self {
        let sine_index = duty::sine_index(phase);
        Self::from_sample(sine_index, sine::sample(sine_index), sub_period_ms)
    }

    /// Derive a step from an explicit sample.
    #[inline]
    pub fn from_sample(sine_index: u32, sine_value: i16, sub_period_ms: u32) -> Self {
        let raw_duty_pct = duty::duty_percent(sine_value);
        let duty_pct = duty::clamp_duty(raw_duty_pct);
        Self {
            sine_index,
            sine_value,
            raw_duty_pct,
            duty_pct,
            timing: PulseTiming::for_duty(duty_pct, sub_period_ms),
        }
    }
}

/// Sine PWM generator.
///
/// Owns its output pin and delay. Writes [`SharedStatus`], never reads it.
///
/// # Example
///
/// ```ignore
/// static STATUS: SharedStatus = SharedStatus::new();
/// static STOP: StopSignal = StopSignal::new();
/// static FAULT: FaultState = FaultState::new();
///
/// let mut gen = DutyGenerator::new(CONFIG, pin, FreeRtos, &STATUS);
/// let exit = gen.run(&STOP, &FAULT);
/// ```
pub struct DutyGenerator<'a, P, D> {
    config: GeneratorConfig,
    pin: P,
    delay: D,
    status: &'a SharedStatus,
    /// Phase accumulator (32-bit, wraps; bits 8..19 = table index)
    phase: u32,
    /// Pulses emitted since start (wraps)
    cycle_count: u32,
    sub_period_ms: u32,
    state: GeneratorState,
}

impl<'a, P, D> DutyGenerator<'a, P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a generator. Nothing touches the pin until [`Self::init`].
    pub fn new(config: GeneratorConfig, pin: P, delay: D, status: &'a SharedStatus) -> Self {
        Self {
            config,
            pin,
            delay,
            status,
            phase: 0,
            cycle_count: 0,
            sub_period_ms: config.sub_period_ms(),
            state: GeneratorState::Initializing,
        }
    }

    /// Drive the output low and publish the nominal period.
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.status.set_pwm_period(NOMINAL_PWM_PERIOD);
        self.state = GeneratorState::Running;
        crate::rt_debug!(
            RT_LOG_STREAM,
            now_us(),
            "generator: pin {} low, period {}",
            self.config.output_pin,
            NOMINAL_PWM_PERIOD
        );
        Ok(())
    }

    /// Run one sine step: publish, emit all pulses, advance the phase.
    ///
    /// Calls [`Self::init`] first if needed.
    pub fn step(&mut self) -> Result<SineStep, P::Error> {
        if self.state == GeneratorState::Initializing {
            self.init()?;
        }

        let step = SineStep::from_phase(self.phase, self.sub_period_ms);

        // Published duty is the unclamped one
        self.status.publish_sample(
            step.sine_index,
            step.sine_value,
            duty::published_duty(step.raw_duty_pct),
            self.cycle_count,
        );
        self.status
            .publish_pulse(step.timing.on_ms, step.timing.period_ms());

        for _ in 0..PULSES_PER_SAMPLE {
            self.pin.set_high()?;
            self.delay.delay_ms(step.timing.on_ms);
            self.pin.set_low()?;
            self.delay.delay_ms(step.timing.off_ms);
            self.cycle_count = self.cycle_count.wrapping_add(1);
        }

        self.phase = self.phase.wrapping_add(self.config.phase_step);
        Ok(step)
    }

    /// Run until `stop` is raised or the pin fails.
    ///
    /// The stop signal is checked once per sine step.
    pub fn run(&mut self, stop: &StopSignal, fault: &FaultState) -> WorkerExit {
        crate::rt_info!(
            RT_LOG_STREAM,
            now_us(),
            "generator: pin {} carrier {} Hz sub-period {} ms step {}",
            self.config.output_pin,
            self.config.carrier_frequency_hz,
            self.sub_period_ms,
            self.config.phase_step
        );

        while !stop.is_raised() {
            if self.step().is_err() {
                return self.fail(fault);
            }
        }

        self.status.publish_cycles(self.cycle_count);
        self.state = GeneratorState::Stopped;
        crate::rt_info!(RT_LOG_STREAM, now_us(), "generator: stopped after {} cycles", self.cycle_count);
        WorkerExit::Stopped
    }

    fn fail(&mut self, fault: &FaultState) -> WorkerExit {
        fault.set(FaultCode::OutputFault, self.config.output_pin as u32);
        // Best effort: leave the line low
        let _ = self.pin.set_low();
        self.state = GeneratorState::Faulted;
        crate::rt_error!(
            RT_LOG_STREAM,
            now_us(),
            "generator: output fault on pin {}",
            self.config.output_pin
        );
        WorkerExit::Faulted(FaultCode::OutputFault)
    }

    /// Current phase accumulator.
    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Pulses emitted so far.
    #[inline]
    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Give back the pin and delay.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duty::DEFAULT_SUB_PERIOD_MS;

    #[test]
    fn test_step_from_sample_extremes() {
        let low = SineStep::from_sample(1536, i16::MIN, DEFAULT_SUB_PERIOD_MS);
        assert_eq!(low.raw_duty_pct, 0);
        assert_eq!(low.duty_pct, 20);
        assert_eq!(low.timing, PulseTiming { on_ms: 1, off_ms: 2 });

        let high = SineStep::from_sample(512, i16::MAX, DEFAULT_SUB_PERIOD_MS);
        assert_eq!(high.raw_duty_pct, 99);
        assert_eq!(high.duty_pct, 80);
        assert_eq!(high.timing, PulseTiming { on_ms: 2, off_ms: 1 });
    }

    #[test]
    fn test_step_from_phase_uses_table() {
        let step = SineStep::from_phase(512 << 8, DEFAULT_SUB_PERIOD_MS);
        assert_eq!(step.sine_index, 512);
        assert_eq!(step.sine_value, sine::SINE_TABLE[512]);
        assert_eq!(step.duty_pct, 80);
    }
}
