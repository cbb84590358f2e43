//! RustSinePwm - Main entry point
//!
//! 1. Validate configuration, print banner and the head of the sine table
//! 2. Start log drain, blinkers, generator (core 0) and monitor
//! 3. Idle (firmware) or run for a fixed time, stop and join (host)

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use rust_sine_pwm::config::{CONFIG, FAST_BLINK, MONITOR, SLOW_BLINK};
use rust_sine_pwm::hal::now_us;
use rust_sine_pwm::launch::{Core, Launcher, WorkerSpec};
use rust_sine_pwm::log_drain::LogDrain;
use rust_sine_pwm::sine::SINE_TABLE;
use rust_sine_pwm::{
    rt_info, rt_warn, BlinkWorker, DutyGenerator, FaultState, FaultWatch, SharedStatus,
    StatusMonitor, StopSignal, BG_LOG_STREAM,
};

// Static allocations shared by all workers (zeroed before any worker starts)
static STATUS: SharedStatus = SharedStatus::new();
static STOP: StopSignal = StopSignal::new();
static FAULT: FaultState = FaultState::new();

const LOG_DRAIN: WorkerSpec = WorkerSpec { name: "log-drain", stack_size: 6 * 1024, core: Core::Core1 };
const BLINK_FAST: WorkerSpec = WorkerSpec { name: "blink-fast", stack_size: 4 * 1024, core: Core::Core1 };
const BLINK_SLOW: WorkerSpec = WorkerSpec { name: "blink-slow", stack_size: 4 * 1024, core: Core::Core1 };
const GENERATOR: WorkerSpec = WorkerSpec { name: "sine-pwm", stack_size: 6 * 1024, core: Core::Core0 };
const MONITOR_TASK: WorkerSpec = WorkerSpec { name: "monitor", stack_size: 6 * 1024, core: Core::Core1 };

/// Output lines, all of one driver type.
struct Outputs<P> {
    pwm: P,
    fast: P,
    slow: P,
}

/// `fmt::Write` adapter over the process stdout (UART0 console on ESP-IDF).
struct Console;

impl core::fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        use std::io::Write;
        std::io::stdout().write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

fn print_banner() {
    println!("{}", env!("VERSION_STRING"));
    println!(
        "PWM on pin {}, carrier {} Hz, blinkers on pins {} and {}",
        CONFIG.output_pin, CONFIG.carrier_frequency_hz, FAST_BLINK.pin, SLOW_BLINK.pin
    );
    println!("Sine table (first 20 values):");
    let head: Vec<String> = SINE_TABLE[..20].iter().map(|v| v.to_string()).collect();
    println!("{}\n", head.join(" "));
}

/// Start every worker. A worker that fails to start is reported and skipped.
fn start<P, D>(outputs: Outputs<P>, delay: D) -> Launcher
where
    P: OutputPin + Send + 'static,
    D: DelayNs + Clone + Send + 'static,
{
    let mut launcher = Launcher::new();
    let Outputs { pwm, fast, slow } = outputs;

    let mut drain_delay = delay.clone();
    let mut results = vec![launcher.spawn(LOG_DRAIN, move || {
        LogDrain::global().run(&mut Console, &mut drain_delay, &STOP)
    })];

    let fast_delay = delay.clone();
    results.push(launcher.spawn(BLINK_FAST, move || {
        BlinkWorker::new(FAST_BLINK, fast, fast_delay).run(&STOP, &FAULT)
    }));

    let slow_delay = delay.clone();
    results.push(launcher.spawn(BLINK_SLOW, move || {
        BlinkWorker::new(SLOW_BLINK, slow, slow_delay).run(&STOP, &FAULT)
    }));

    let gen_delay = delay.clone();
    results.push(launcher.spawn(GENERATOR, move || {
        DutyGenerator::new(CONFIG, pwm, gen_delay, &STATUS).run(&STOP, &FAULT)
    }));

    let mut monitor_delay = delay;
    results.push(launcher.spawn(MONITOR_TASK, move || {
        StatusMonitor::new(STATUS.view(), MONITOR).run(&mut monitor_delay, &STOP)
    }));

    for err in results.into_iter().filter_map(Result::err) {
        rt_warn!(BG_LOG_STREAM, now_us(), "launch: {}, skipped", err);
    }
    rt_info!(BG_LOG_STREAM, now_us(), "launch: {} workers running", launcher.running());

    launcher
}

#[cfg(target_os = "espidf")]
fn main() {
    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    if let Err(err) = CONFIG.validate() {
        println!("invalid configuration: {}", err);
        return;
    }

    print_banner();

    if let Err(err) = firmware() {
        println!("startup failed: {:?}", err);
    }
}

#[cfg(target_os = "espidf")]
fn firmware() -> Result<(), esp_idf_svc::sys::EspError> {
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::{OutputPin as _, PinDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // GPIO numbers must match CONFIG / FAST_BLINK / SLOW_BLINK
    let outputs = Outputs {
        pwm: PinDriver::output(pins.gpio2.downgrade_output())?,
        fast: PinDriver::output(pins.gpio4.downgrade_output())?,
        slow: PinDriver::output(pins.gpio5.downgrade_output())?,
    };

    // Workers never finish on the device; keep their handles alive
    let _launcher = start(outputs, FreeRtos);

    let mut watch = FaultWatch::new();
    loop {
        if let Some(snapshot) = watch.poll(&FAULT) {
            rust_sine_pwm::rt_error!(BG_LOG_STREAM, now_us(), "{}", snapshot);
        }
        FreeRtos::delay_ms(1000);
    }
}

/// Host simulation run time.
#[cfg(not(target_os = "espidf"))]
const HOST_RUN_MS: u64 = 3_000;

#[cfg(not(target_os = "espidf"))]
fn main() {
    use rust_sine_pwm::hal::sim::{SimPin, StdDelay};

    if let Err(err) = CONFIG.validate() {
        println!("invalid configuration: {}", err);
        return;
    }

    print_banner();

    let outputs = Outputs {
        pwm: SimPin::new(CONFIG.output_pin),
        fast: SimPin::new(FAST_BLINK.pin),
        slow: SimPin::new(SLOW_BLINK.pin),
    };
    let pwm_line = outputs.pwm.line();

    let launcher = start(outputs, StdDelay);

    std::thread::sleep(std::time::Duration::from_millis(HOST_RUN_MS));
    STOP.raise();

    for (name, exit) in launcher.join_all(&FAULT) {
        println!("{:>10}: {}", name, exit);
    }
    if let Some(snapshot) = FaultWatch::new().poll(&FAULT) {
        println!("{}", snapshot);
    }
    println!(
        "pwm pin {}: {} pulses, final status {:?}",
        CONFIG.output_pin,
        pwm_line.rising_edges(),
        STATUS.view().snapshot()
    );
}
